use crate::board::BoardState;
use crate::board_view::BoardView;
use crate::event::GameStatus;


const DEFAULT_RESULT: &str = "Game Over";

// Turn indicator, check annotation, result banner and the last error notice.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct StatusView {
    turn_text: String,
    result_banner: Option<String>,
    notice: Option<String>,
}

impl StatusView {
    pub fn new() -> Self { Self::default() }

    pub fn turn_text(&self) -> &str { &self.turn_text }
    // `None` means the banner is hidden.
    pub fn result_banner(&self) -> Option<&str> { self.result_banner.as_deref() }
    pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

    // What the status line shows: an error notice replaces the turn text until cleared.
    pub fn status_line(&self) -> &str { self.notice.as_deref().unwrap_or(&self.turn_text) }

    // Must be called after the board view highlights were refreshed, since it adds the
    // check mark on top of them.
    pub fn apply(&mut self, status: &GameStatus, board: &BoardState, board_view: &mut BoardView) {
        self.turn_text = format!("Current Turn: {}", status.current_turn.display_name());
        if status.in_check {
            self.turn_text.push_str(" (In Check)");
            if let Some(king) = board.find_king(status.current_turn) {
                board_view.mark_check(king);
            }
        }
        self.result_banner = status
            .is_game_over
            .then(|| status.result.clone().unwrap_or_else(|| DEFAULT_RESULT.to_owned()));
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) { self.notice = Some(notice.into()); }
    pub fn clear_notice(&mut self) { self.notice = None; }

    pub fn reset(&mut self) { *self = Self::default(); }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_view::PieceGlyphs;
    use crate::coord::Coord;
    use crate::force::Force;
    use crate::piece::{Piece, PieceKind};

    fn sq(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }

    fn kings() -> BoardState {
        BoardState::from_placements([
            (sq("e1"), Piece::new(PieceKind::King, Force::White)),
            (sq("e8"), Piece::new(PieceKind::King, Force::Black)),
        ])
        .0
    }

    #[test]
    fn check_marks_king_of_side_to_move() {
        let mut view = StatusView::new();
        let mut board_view = BoardView::new(PieceGlyphs::pictograms());
        let status = GameStatus {
            current_turn: Force::Black,
            in_check: true,
            is_game_over: false,
            result: None,
        };
        view.apply(&status, &kings(), &mut board_view);
        assert_eq!(view.turn_text(), "Current Turn: Black (In Check)");
        assert!(board_view.square(sq("e8")).check);
        assert!(!board_view.square(sq("e1")).check);
        assert_eq!(view.result_banner(), None);
    }

    #[test]
    fn banner_defaults_to_game_over() {
        let mut view = StatusView::new();
        let mut board_view = BoardView::new(PieceGlyphs::pictograms());
        let status = GameStatus {
            current_turn: Force::White,
            in_check: false,
            is_game_over: true,
            result: None,
        };
        view.apply(&status, &kings(), &mut board_view);
        assert_eq!(view.result_banner(), Some("Game Over"));
    }

    #[test]
    fn notice_overrides_status_line_until_cleared() {
        let mut view = StatusView::new();
        let mut board_view = BoardView::new(PieceGlyphs::pictograms());
        let status = GameStatus {
            current_turn: Force::White,
            in_check: false,
            is_game_over: false,
            result: None,
        };
        view.apply(&status, &kings(), &mut board_view);
        view.set_notice("An error occurred. Please try again.");
        assert_eq!(view.status_line(), "An error occurred. Please try again.");
        view.apply(&status, &kings(), &mut board_view);
        assert_eq!(view.status_line(), "An error occurred. Please try again.");
        view.clear_notice();
        assert_eq!(view.status_line(), "Current Turn: White");
    }
}
