use crate::coord::Coord;
use crate::force::Force;
use crate::piece::{Piece, PieceKind};


// A pawn on the last rank waiting for the player to pick its replacement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PendingPromotion {
    pub square: Coord,
    // Side that promotes: the dialog offers pieces of this color.
    pub force: Force,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromotionError {
    NoPromotionPending,
    // Only queen, rook, bishop and knight are allowed.
    InvalidPieceKind(PieceKind),
    // Choice already sent; waiting for the authority.
    AwaitingResponse,
}

impl PendingPromotion {
    // Choices offered by the dialog, in display order.
    pub fn choices(&self) -> Vec<Piece> {
        PieceKind::promotion_targets()
            .rev()
            .map(|kind| Piece::new(kind, self.force))
            .collect()
    }

    pub fn validate_choice(&self, kind: PieceKind) -> Result<PieceKind, PromotionError> {
        if kind.is_promotion_target() { Ok(kind) } else { Err(PromotionError::InvalidPieceKind(kind)) }
    }
}
