use std::collections::BTreeMap;

use crate::coord::Coord;
use crate::force::Force;
use crate::piece::{Piece, PieceKind};


// Authoritative piece placement as of the last authority response. Never patched: each
// update builds a new `BoardState` and replaces the previous one wholesale.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BoardState {
    pieces: BTreeMap<Coord, Piece>,
}

impl BoardState {
    pub fn empty() -> Self { Self::default() }

    // Builds a board from (square, piece) pairs. A square listed twice keeps its first
    // piece; the duplicate is reported back so the caller can log it.
    pub fn from_placements(placements: impl IntoIterator<Item = (Coord, Piece)>) -> (Self, Vec<Coord>) {
        let mut pieces = BTreeMap::new();
        let mut duplicates = vec![];
        for (coord, piece) in placements {
            if pieces.contains_key(&coord) {
                duplicates.push(coord);
            } else {
                pieces.insert(coord, piece);
            }
        }
        (BoardState { pieces }, duplicates)
    }

    pub fn get(&self, coord: Coord) -> Option<Piece> { self.pieces.get(&coord).copied() }
    pub fn len(&self) -> usize { self.pieces.len() }
    pub fn is_empty(&self) -> bool { self.pieces.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces.iter().map(|(&coord, &piece)| (coord, piece))
    }

    pub fn count(&self, force: Force) -> usize {
        self.pieces.values().filter(|piece| piece.force == force).count()
    }

    pub fn find_king(&self, force: Force) -> Option<Coord> {
        let king = Piece::new(PieceKind::King, force);
        self.iter().find(|&(_, piece)| piece == king).map(|(coord, _)| coord)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }

    #[test]
    fn duplicate_square_keeps_first_piece() {
        let (board, duplicates) = BoardState::from_placements([
            (sq("e1"), Piece::new(PieceKind::King, Force::White)),
            (sq("e1"), Piece::new(PieceKind::Queen, Force::White)),
            (sq("e8"), Piece::new(PieceKind::King, Force::Black)),
        ]);
        assert_eq!(board.len(), 2);
        assert_eq!(board.get(sq("e1")), Some(Piece::new(PieceKind::King, Force::White)));
        assert_eq!(duplicates, vec![sq("e1")]);
    }

    #[test]
    fn find_king() {
        let (board, _) = BoardState::from_placements([
            (sq("g1"), Piece::new(PieceKind::King, Force::White)),
            (sq("a8"), Piece::new(PieceKind::King, Force::Black)),
        ]);
        assert_eq!(board.find_king(Force::White), Some(sq("g1")));
        assert_eq!(board.find_king(Force::Black), Some(sq("a8")));
        assert_eq!(BoardState::empty().find_king(Force::White), None);
    }
}
