use crate::coord::Coord;
use crate::event::GameStatus;
use crate::piece::{Piece, PieceKind};


// Long algebraic notation: "e2-e4", "Ng1-f3", "Bb5xc6+", "Qh5xf7#". `piece` is the piece
// that stood on `from` before the move; without it the piece letter is omitted.
pub fn move_notation(
    piece: Option<Piece>, from: Coord, to: Coord, capture: bool, status_after: &GameStatus,
) -> String {
    let piece_letter = piece.map_or("", |p| p.kind.to_algebraic_for_move());
    let separator = if capture { 'x' } else { '-' };
    let suffix = match (status_after.in_check, status_after.is_game_over) {
        (true, true) => "#",
        (true, false) => "+",
        (false, _) => "",
    };
    format!("{piece_letter}{from}{separator}{to}{suffix}")
}

pub fn promotion_notation(square: Coord, kind: PieceKind) -> String {
    format!("{}={}", square, kind.to_full_algebraic())
}
