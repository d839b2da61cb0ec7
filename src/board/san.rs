use cozy_chess::{Board, Move, Piece, Square};
use crate::board::cozy::is_castle;

/// Format a legal move as Standard Algebraic Notation, given the board it is
/// played on.
pub fn format_san(board: &Board, mv: Move) -> String {
    let mut out = String::new();
    let piece = board.piece_on(mv.from).unwrap_or(Piece::Pawn);

    if is_castle(board, mv) {
        out.push_str(if mv.to.file() as usize > mv.from.file() as usize { "O-O" } else { "O-O-O" });
    } else if piece == Piece::Pawn {
        // En passant lands on an empty square, so file change is the capture mark.
        if mv.from.file() != mv.to.file() {
            out.push_str(&mv.from.file().to_string());
            out.push('x');
        }
        out.push_str(&mv.to.to_string());
        if let Some(promo) = mv.promotion {
            out.push('=');
            out.push(piece_letter(promo));
        }
    } else {
        out.push(piece_letter(piece));
        out.push_str(&disambiguation(board, mv, piece));
        if board.colors(!board.side_to_move()).has(mv.to) { out.push('x'); }
        out.push_str(&mv.to.to_string());
    }

    let mut child = board.clone();
    child.play_unchecked(mv);
    if !child.checkers().is_empty() {
        let has_reply = child.generate_moves(|moves| !moves.is_empty());
        out.push(if has_reply { '+' } else { '#' });
    }
    out
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// File, rank, or full origin square of `mv` when another piece of the same
/// kind could also reach its destination.
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let mut rivals: Vec<Square> = Vec::new();
    board.generate_moves(|moves| {
        if moves.piece == piece && moves.from != mv.from && moves.to.has(mv.to) {
            rivals.push(moves.from);
        }
        false
    });
    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != mv.from.file()) {
        mv.from.file().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != mv.from.rank()) {
        mv.from.rank().to_string()
    } else {
        mv.from.to_string()
    }
}
