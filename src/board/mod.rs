pub mod cozy;
pub mod san;

use std::fmt;

pub use cozy_chess::{BitBoard, Color, File, Piece, Rank, Square};

/// A piece as seen by the session: owned by the rules engine, described here
/// by colour, kind and square. The only identity change the session makes is
/// setting the resolved promotion kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPiece {
    pub color: Color,
    pub kind: Piece,
    pub square: Square,
    promotion: Option<Piece>,
}

impl BoardPiece {
    pub fn new(color: Color, kind: Piece, square: Square) -> Self {
        Self { color, kind, square, promotion: None }
    }

    /// Kind the piece will have after this move: the promotion kind once set.
    pub fn resolved_kind(&self) -> Piece { self.promotion.unwrap_or(self.kind) }

    pub fn promotion(&self) -> Option<Piece> { self.promotion }

    pub fn set_promotion(&mut self, kind: Piece) { self.promotion = Some(kind); }

    /// True when moving this pawn to `target` lands on its last rank.
    pub fn promotes_on(&self, target: Square) -> bool {
        self.kind == Piece::Pawn && target.rank() == Rank::Eighth.relative_to(self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    Repetition,
    InsufficientMaterial,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::FiftyMoveRule => write!(f, "fifty-move rule"),
            DrawReason::Repetition => write!(f, "threefold repetition"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
    #[error("No {kind:?} of {color:?} on {square}")]
    NoSuchPiece { color: Color, kind: Piece, square: Square },
    #[error("Unknown or illegal move: {0}")]
    UnknownMove(String),
    #[error("Illegal move: {from}{to}")]
    IllegalMove { from: Square, to: Square },
    #[error("Pawn move {from}{to} needs a promotion kind")]
    MissingPromotion { from: Square, to: Square },
}

/// Occupancy copy handed to the view on refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    squares: [Option<(Color, Piece)>; Square::NUM],
}

impl BoardSnapshot {
    pub fn from_board(board: &cozy_chess::Board) -> Self {
        let mut squares = [None; Square::NUM];
        for sq in Square::ALL {
            squares[sq as usize] = board.color_on(sq).zip(board.piece_on(sq));
        }
        Self { squares }
    }

    pub fn get(&self, sq: Square) -> Option<(Color, Piece)> { self.squares[sq as usize] }
}

/// FEN-style letter: uppercase for White.
pub fn piece_char(color: Color, piece: Piece) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White { c.to_ascii_uppercase() } else { c }
}

/// Rules engine the session talks to. It is the only authority over board
/// occupancy; the session reads through it and requests mutations from it.
pub trait RulesEngine {
    fn side_to_move(&self) -> Color;

    fn piece_at(&self, sq: Square) -> Option<BoardPiece>;

    /// Squares the user may click to move `piece`.
    fn legal_targets(&self, piece: &BoardPiece) -> BitBoard;

    fn is_valid_move(&self, piece: &BoardPiece, target: Square, color: Color) -> bool {
        piece.color == color && self.legal_targets(piece).has(target)
    }

    /// Plays `piece` to `target`, honouring its resolved promotion kind.
    fn make_move(&mut self, target: Square, piece: &BoardPiece) -> Result<(), RulesError>;

    /// Notation of the move just made with `piece` to `target`.
    fn move_notation(&self, target: Square, piece: &BoardPiece) -> String;

    fn snapshot(&self) -> BoardSnapshot;

    fn is_checkmate(&self, color: Color) -> bool;

    fn is_stalemate(&self, color: Color) -> bool;

    fn draw_reason(&self) -> Option<DrawReason>;

    fn is_draw(&self) -> bool { self.draw_reason().is_some() }
}
