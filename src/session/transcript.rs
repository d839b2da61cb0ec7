use cozy_chess::{Color, Square};
use crate::board::{BoardPiece, RulesEngine};

/// Append-only move transcript in the form `"1. e4 e5 2. Nf3 Nc6 "`.
#[derive(Clone, Debug, Default)]
pub struct MoveRecorder {
    white_moves: u32,
    history: String,
}

impl MoveRecorder {
    pub fn new() -> Self { Self::default() }

    /// Append the move just made and return its token. White moves get a
    /// `"<n>. "` prefix, with the counter bumped before it is written.
    pub fn record<E: RulesEngine + ?Sized>(&mut self, target: Square, piece: &BoardPiece, engine: &E, turn: Color) -> String {
        let token = engine.move_notation(target, piece);
        self.push_token(&token, turn);
        token
    }

    pub fn push_token(&mut self, token: &str, turn: Color) {
        if turn == Color::White {
            self.white_moves += 1;
            self.history.push_str(&format!("{}. ", self.white_moves));
        }
        self.history.push_str(token);
        self.history.push(' ');
    }

    pub fn full_history(&self) -> &str { &self.history }

    pub fn white_moves(&self) -> u32 { self.white_moves }
}
