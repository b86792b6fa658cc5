use derive_new::new;
use enum_map::Enum;
use strum::{EnumIter, IntoEnumIterator};

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new)]
pub struct Piece {
    pub kind: PieceKind,
    pub force: Force,
}

impl PieceKind {
    // Canonical upper-case name used by the authority.
    pub fn wire_name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "PAWN",
            PieceKind::Knight => "KNIGHT",
            PieceKind::Bishop => "BISHOP",
            PieceKind::Rook => "ROOK",
            PieceKind::Queen => "QUEEN",
            PieceKind::King => "KING",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        PieceKind::iter().find(|kind| kind.wire_name().eq_ignore_ascii_case(s.trim()))
    }

    // Should not be used to construct moves in algebraic notation, because it returns a
    // non-empty name for a pawn (use `to_algebraic_for_move` instead).
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn to_algebraic_for_move(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    pub fn is_promotion_target(self) -> bool {
        matches!(self, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)
    }

    pub fn promotion_targets() -> impl DoubleEndedIterator<Item = Self> {
        PieceKind::iter().filter(|kind| kind.is_promotion_target())
    }
}

impl Piece {
    // E.g. "w-pawn", "b-queen". Key into the piece visual table.
    pub fn asset_key(self) -> String {
        format!("{}-{}", self.force.asset_prefix(), self.kind.wire_name().to_ascii_lowercase())
    }

    // E.g. "black pawn". Used in capture descriptions.
    pub fn description(self) -> String {
        format!(
            "{} {}",
            self.force.wire_name(),
            self.kind.wire_name().to_ascii_lowercase()
        )
    }
}

pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    use self::Force::*;
    use self::PieceKind::*;
    match (force, piece_kind) {
        (White, Pawn) => '♙',
        (White, Knight) => '♘',
        (White, Bishop) => '♗',
        (White, Rook) => '♖',
        (White, Queen) => '♕',
        (White, King) => '♔',
        (Black, Pawn) => '♟',
        (Black, Knight) => '♞',
        (Black, Bishop) => '♝',
        (Black, Rook) => '♜',
        (Black, Queen) => '♛',
        (Black, King) => '♚',
    }
}
