use std::collections::BTreeSet;

use crate::board::BoardState;
use crate::coord::Coord;
use crate::error::AuthorityError;
use crate::force::Force;
use crate::piece::{Piece, PieceKind};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameStatus {
    pub current_turn: Force,
    pub in_check: bool,
    pub is_game_over: bool,
    pub result: Option<String>,
}

// Authority's verdict on a square click.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClickOutcome {
    // Next selection; `None` means deselect. Never `None` when `valid_moves` is non-empty.
    pub selected: Option<Coord>,
    pub valid_moves: BTreeSet<Coord>,
    pub completed_move: Option<CompletedMove>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CompletedMove {
    pub board: BoardState,
    pub status: GameStatus,
    pub captured: Option<Piece>,
    // Square of the pawn awaiting promotion.
    pub promotion: Option<Coord>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PromotionOutcome {
    pub board: BoardState,
    pub status: GameStatus,
}

// Game-affecting calls to the authority. At most one is in flight at any time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AuthorityRequest {
    NewGame,
    FetchBoard,
    FetchStatus,
    SquareClick {
        position: Coord,
        selected_position: Option<Coord>,
    },
    Promote {
        position: Coord,
        piece_kind: PieceKind,
    },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AuthorityReply {
    GameCreated,
    Board(BoardState),
    Status(GameStatus),
    SquareClicked(ClickOutcome),
    Promoted(PromotionOutcome),
    Failed {
        request: AuthorityRequest,
        error: AuthorityError,
    },
}

impl AuthorityRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AuthorityRequest::NewGame => "new-game",
            AuthorityRequest::FetchBoard => "board",
            AuthorityRequest::FetchStatus => "status",
            AuthorityRequest::SquareClick { .. } => "square-click",
            AuthorityRequest::Promote { .. } => "promote",
        }
    }
}
