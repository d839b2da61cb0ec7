use cozy_chess::{BitBoard, Board as CozyBoard, Color, File, Move, Piece, Square};
use crate::board::{san, BoardPiece, BoardSnapshot, DrawReason, RulesEngine, RulesError};

/// cozy-chess backed rules engine. Keeps the pre-move board of every move
/// played so notation and repetition can be answered after the fact.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<(Move, CozyBoard)>,
    hashes: Vec<u64>,
}

impl Position {
    pub fn startpos() -> Self { Self::with_board(CozyBoard::default()) }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        CozyBoard::from_fen(fen, false)
            .map(Self::with_board)
            .map_err(|e| RulesError::InvalidFen(format!("{e:?}")))
    }

    fn with_board(board: CozyBoard) -> Self {
        let hashes = vec![board.hash()];
        Self { board, history: Vec::new(), hashes }
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Moves played so far, each with the board it was played on.
    pub fn history(&self) -> &[(Move, CozyBoard)] { &self.history }

    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), RulesError> {
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if format!("{}", m) == mv_uci { found = Some(m); break; }
            }
            found.is_some()
        });
        match found {
            Some(m) => { self.play(m); Ok(()) }
            None => Err(RulesError::UnknownMove(mv_uci.to_string())),
        }
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, RulesError> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    fn play(&mut self, mv: Move) {
        let before = self.board.clone();
        self.board.play_unchecked(mv);
        self.history.push((mv, before));
        self.hashes.push(self.board.hash());
    }

    /// Legal moves of the piece on `from`, keyed by the square the user clicks.
    fn moves_from(&self, from: Square) -> Vec<(Square, Move)> {
        let mut out = Vec::new();
        self.board.generate_moves(|moves| {
            if moves.from == from {
                for m in moves { out.push((click_target(&self.board, m), m)); }
            }
            false
        });
        out
    }

    fn has_legal_move(&self) -> bool {
        self.board.generate_moves(|moves| !moves.is_empty())
    }

    fn repetitions(&self) -> usize {
        let current = self.board.hash();
        // Irreversible moves reset the clock, so only that window can repeat.
        self.hashes.iter()
            .rev()
            .take(self.board.halfmove_clock() as usize + 1)
            .step_by(2)
            .filter(|&&h| h == current)
            .count()
    }

    fn insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if (knights | bishops).len() <= 1 { return true; }
        if !knights.is_empty() { return false; }
        let mut shades = bishops.into_iter().map(|sq| (sq.file() as usize + sq.rank() as usize) % 2);
        match shades.next() {
            Some(first) => shades.all(|s| s == first),
            None => true,
        }
    }
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

/// cozy-chess encodes castling as king-takes-own-rook; the user clicks the
/// king's destination on the g or c file instead.
fn click_target(board: &CozyBoard, mv: Move) -> Square {
    if is_castle(board, mv) {
        let file = if mv.to.file() as usize > mv.from.file() as usize { File::G } else { File::C };
        Square::new(file, mv.from.rank())
    } else {
        mv.to
    }
}

pub(crate) fn is_castle(board: &CozyBoard, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.colors(board.side_to_move()).has(mv.to)
}

impl RulesEngine for Position {
    fn side_to_move(&self) -> Color { self.board.side_to_move() }

    fn piece_at(&self, sq: Square) -> Option<BoardPiece> {
        let color = self.board.color_on(sq)?;
        let kind = self.board.piece_on(sq)?;
        Some(BoardPiece::new(color, kind, sq))
    }

    fn legal_targets(&self, piece: &BoardPiece) -> BitBoard {
        if self.board.side_to_move() != piece.color { return BitBoard::EMPTY; }
        self.moves_from(piece.square)
            .into_iter()
            .fold(BitBoard::EMPTY, |acc, (sq, _)| acc | sq.bitboard())
    }

    fn make_move(&mut self, target: Square, piece: &BoardPiece) -> Result<(), RulesError> {
        if self.piece_at(piece.square).map(|p| (p.color, p.kind)) != Some((piece.color, piece.kind)) {
            return Err(RulesError::NoSuchPiece { color: piece.color, kind: piece.kind, square: piece.square });
        }
        let candidates: Vec<Move> = self.moves_from(piece.square)
            .into_iter()
            .filter(|(sq, _)| *sq == target)
            .map(|(_, m)| m)
            .collect();
        if candidates.is_empty() {
            return Err(RulesError::IllegalMove { from: piece.square, to: target });
        }
        let mv = candidates.iter()
            .copied()
            .find(|m| m.promotion == piece.promotion())
            .ok_or(RulesError::MissingPromotion { from: piece.square, to: target })?;
        log::debug!("engine plays {}", mv);
        self.play(mv);
        Ok(())
    }

    fn move_notation(&self, target: Square, piece: &BoardPiece) -> String {
        match self.history.last() {
            Some((mv, before)) if mv.from == piece.square => san::format_san(before, *mv),
            _ => format!("{}{}", piece.square, target),
        }
    }

    fn snapshot(&self) -> BoardSnapshot { BoardSnapshot::from_board(&self.board) }

    fn is_checkmate(&self, color: Color) -> bool {
        self.board.side_to_move() == color
            && !self.board.checkers().is_empty()
            && !self.has_legal_move()
    }

    fn is_stalemate(&self, color: Color) -> bool {
        self.board.side_to_move() == color
            && self.board.checkers().is_empty()
            && !self.has_legal_move()
    }

    fn draw_reason(&self) -> Option<DrawReason> {
        if self.insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.repetitions() >= 3 {
            Some(DrawReason::Repetition)
        } else if self.board.halfmove_clock() >= 100 {
            Some(DrawReason::FiftyMoveRule)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(pos: &Position, sq: Square) -> Vec<Square> {
        let piece = pos.piece_at(sq).expect("piece on square");
        pos.legal_targets(&piece).into_iter().collect()
    }

    #[test]
    fn pawn_targets_from_start() {
        let pos = Position::startpos();
        let mut t = targets(&pos, Square::E2);
        t.sort_by_key(|sq| *sq as usize);
        assert_eq!(t, vec![Square::E3, Square::E4]);
    }

    #[test]
    fn opponent_pieces_have_no_targets() {
        let pos = Position::startpos();
        assert!(targets(&pos, Square::E7).is_empty());
    }

    #[test]
    fn castling_is_clicked_on_king_destination() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let king = pos.piece_at(Square::E1).unwrap();
        let t = pos.legal_targets(&king);
        assert!(t.has(Square::G1) && t.has(Square::C1));
        assert!(!t.has(Square::H1) && !t.has(Square::A1));
        pos.make_move(Square::G1, &king).unwrap();
        assert_eq!(pos.board().piece_on(Square::G1), Some(Piece::King));
        assert_eq!(pos.board().piece_on(Square::F1), Some(Piece::Rook));
        assert_eq!(pos.move_notation(Square::G1, &king), "O-O");
    }

    #[test]
    fn promotion_requires_a_kind() {
        let mut pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let mut pawn = pos.piece_at(Square::E7).unwrap();
        assert!(matches!(pos.make_move(Square::E8, &pawn), Err(RulesError::MissingPromotion { .. })));
        pawn.set_promotion(Piece::Knight);
        pos.make_move(Square::E8, &pawn).unwrap();
        assert_eq!(pos.board().piece_on(Square::E8), Some(Piece::Knight));
    }

    #[test]
    fn rejects_stale_piece_descriptor() {
        let mut pos = Position::startpos();
        let knight = BoardPiece::new(Color::White, Piece::Knight, Square::E2);
        assert!(matches!(pos.make_move(Square::E4, &knight), Err(RulesError::NoSuchPiece { .. })));
    }

    #[test]
    fn detects_insufficient_material() {
        let bare = Position::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(bare.draw_reason(), Some(DrawReason::InsufficientMaterial));
        let same_bishops = Position::from_fen("k7/8/8/8/8/8/2b5/K1B5 w - - 0 1").unwrap();
        assert_eq!(same_bishops.draw_reason(), None, "c1 and c2 bishops are on opposite shades");
        let light_pair = Position::from_fen("k7/8/8/8/8/8/5b2/K1B5 w - - 0 1").unwrap();
        assert_eq!(light_pair.draw_reason(), Some(DrawReason::InsufficientMaterial));
        let rook = Position::from_fen("k7/8/8/8/8/8/8/KR6 w - - 0 1").unwrap();
        assert_eq!(rook.draw_reason(), None);
    }

    #[test]
    fn fifty_move_rule_from_clock() {
        let pos = Position::from_fen("k7/8/8/8/8/8/8/KR6 w - - 100 80").unwrap();
        assert_eq!(pos.draw_reason(), Some(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn threefold_repetition_by_knight_shuffle() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let mut pos = Position::startpos();
        for m in shuffle { pos.make_move_uci(m).unwrap(); }
        assert_eq!(pos.draw_reason(), None);
        for m in shuffle { pos.make_move_uci(m).unwrap(); }
        assert_eq!(pos.draw_reason(), Some(DrawReason::Repetition));
    }
}
