use cozy_chess::{Piece, Square};
use serde::{Deserialize, Serialize};
use crate::board::BoardPiece;

/// Chooses the kind a pawn becomes on its last rank. Called synchronously
/// before the move reaches the rules engine.
pub trait PromotionResolver {
    fn resolve(&mut self, pawn: &BoardPiece, target: Square) -> Piece;
}

impl<F: FnMut(&BoardPiece, Square) -> Piece> PromotionResolver for F {
    fn resolve(&mut self, pawn: &BoardPiece, target: Square) -> Piece { self(pawn, target) }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysQueen;

impl PromotionResolver for AlwaysQueen {
    fn resolve(&mut self, _pawn: &BoardPiece, _target: Square) -> Piece { Piece::Queen }
}

#[derive(Clone, Copy, Debug)]
pub struct Fixed(pub Piece);

impl PromotionResolver for Fixed {
    fn resolve(&mut self, _pawn: &BoardPiece, _target: Square) -> Piece { self.0 }
}

/// Configured promotion policy. `Ask` is handled by the front end, which
/// supplies its own resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionChoice {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
    Ask,
}

impl PromotionChoice {
    pub fn piece(self) -> Option<Piece> {
        match self {
            PromotionChoice::Queen => Some(Piece::Queen),
            PromotionChoice::Rook => Some(Piece::Rook),
            PromotionChoice::Bishop => Some(Piece::Bishop),
            PromotionChoice::Knight => Some(Piece::Knight),
            PromotionChoice::Ask => None,
        }
    }
}

pub fn is_promotion_kind(kind: Piece) -> bool {
    matches!(kind, Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)
}

/// Parse a promotion letter (q, r, b, n); anything else is `None`.
pub fn parse_promotion(s: &str) -> Option<Piece> {
    match s.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Some(Piece::Queen),
        "r" | "rook" => Some(Piece::Rook),
        "b" | "bishop" => Some(Piece::Bishop),
        "n" | "knight" => Some(Piece::Knight),
        _ => None,
    }
}

/// Resolve and apply the promotion kind to `pawn` in place.
pub fn promote(resolver: &mut dyn PromotionResolver, pawn: &mut BoardPiece, target: Square) -> Piece {
    let mut kind = resolver.resolve(pawn, target);
    if !is_promotion_kind(kind) {
        log::warn!("resolver chose {:?} for {} -> {}, promoting to Queen", kind, pawn.square, target);
        kind = Piece::Queen;
    }
    pawn.set_promotion(kind);
    log::info!("{:?} pawn {} promotes to {:?} on {}", pawn.color, pawn.square, kind, target);
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_chess::Color;

    fn pawn() -> BoardPiece { BoardPiece::new(Color::White, Piece::Pawn, Square::B7) }

    #[test]
    fn default_resolver_picks_queen() {
        let mut p = pawn();
        assert_eq!(promote(&mut AlwaysQueen, &mut p, Square::B8), Piece::Queen);
        assert_eq!(p.resolved_kind(), Piece::Queen);
    }

    #[test]
    fn closure_resolver_sees_pawn_and_target() {
        let mut seen = None;
        let mut p = pawn();
        let mut pick = |pawn: &BoardPiece, target: Square| { seen = Some((pawn.square, target)); Piece::Knight };
        promote(&mut pick, &mut p, Square::A8);
        assert_eq!(seen, Some((Square::B7, Square::A8)));
        assert_eq!(p.resolved_kind(), Piece::Knight);
    }

    #[test]
    fn invalid_choice_falls_back_to_queen() {
        let mut p = pawn();
        assert_eq!(promote(&mut Fixed(Piece::King), &mut p, Square::B8), Piece::Queen);
        assert_eq!(p.promotion(), Some(Piece::Queen));
    }

    #[test]
    fn parses_letters_and_names() {
        assert_eq!(parse_promotion("N"), Some(Piece::Knight));
        assert_eq!(parse_promotion(" rook "), Some(Piece::Rook));
        assert_eq!(parse_promotion("k"), None);
        assert_eq!(PromotionChoice::default().piece(), Some(Piece::Queen));
        assert_eq!(PromotionChoice::Ask.piece(), None);
    }
}
