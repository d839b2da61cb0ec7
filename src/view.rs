use std::fmt::Write as _;
use cozy_chess::{BitBoard, File, Rank, Square};
use crate::board::{piece_char, BoardSnapshot};

/// What the session asks of whatever draws the board.
pub trait BoardView {
    fn highlight_squares(&mut self, squares: BitBoard);
    fn reset_highlights(&mut self);
    fn refresh(&mut self, board: &BoardSnapshot);
    fn show_message(&mut self, message: &str);
    /// Permanently stop accepting clicks. Calling it again changes nothing.
    fn disable_input(&mut self);
}

/// Plain text board for terminals. Highlighted squares render as `*` when
/// empty and bracketed when occupied.
#[derive(Clone, Debug)]
pub struct TextBoard {
    board: BoardSnapshot,
    highlights: BitBoard,
    message: Option<String>,
    input_enabled: bool,
    disable_calls: u32,
}

impl TextBoard {
    pub fn new(board: BoardSnapshot) -> Self {
        Self { board, highlights: BitBoard::EMPTY, message: None, input_enabled: true, disable_calls: 0 }
    }

    pub fn highlights(&self) -> BitBoard { self.highlights }
    pub fn board(&self) -> &BoardSnapshot { &self.board }
    pub fn message(&self) -> Option<&str> { self.message.as_deref() }
    pub fn input_enabled(&self) -> bool { self.input_enabled }
    pub fn disable_calls(&self) -> u32 { self.disable_calls }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for rank in Rank::ALL.iter().rev() {
            let _ = write!(out, "{} ", rank);
            for file in File::ALL {
                let sq = Square::new(file, *rank);
                let lit = self.highlights.has(sq);
                let cell = match (self.board.get(sq), lit) {
                    (Some((c, p)), true) => format!("[{}]", piece_char(c, p)),
                    (Some((c, p)), false) => format!(" {} ", piece_char(c, p)),
                    (None, true) => " * ".to_string(),
                    (None, false) => " . ".to_string(),
                };
                out.push_str(&cell);
            }
            out.push('\n');
        }
        out.push_str("  ");
        for file in File::ALL { let _ = write!(out, " {} ", file); }
        out.push('\n');
        if let Some(msg) = &self.message {
            out.push_str(msg);
            out.push('\n');
        }
        out
    }
}

impl BoardView for TextBoard {
    fn highlight_squares(&mut self, squares: BitBoard) { self.highlights = squares; }

    fn reset_highlights(&mut self) { self.highlights = BitBoard::EMPTY; }

    fn refresh(&mut self, board: &BoardSnapshot) { self.board = board.clone(); }

    fn show_message(&mut self, message: &str) { self.message = Some(message.to_string()); }

    fn disable_input(&mut self) {
        self.disable_calls += 1;
        self.input_enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_render_and_reset() {
        let mut view = TextBoard::new(BoardSnapshot::from_board(&cozy_chess::Board::default()));
        view.highlight_squares(Square::E3.bitboard() | Square::E4.bitboard());
        let text = view.render();
        assert!(text.starts_with("8  r  n  b  q  k  b  n  r "));
        let rank4 = text.lines().find(|l| l.starts_with('4')).unwrap();
        assert_eq!(rank4.matches('*').count(), 1);
        view.reset_highlights();
        assert!(!view.render().contains('*'));
    }

    #[test]
    fn disable_input_is_sticky() {
        let mut view = TextBoard::new(BoardSnapshot::from_board(&cozy_chess::Board::default()));
        assert!(view.input_enabled());
        view.disable_input();
        view.disable_input();
        assert!(!view.input_enabled());
        assert_eq!(view.disable_calls(), 2);
    }
}
