use std::collections::{BTreeSet, VecDeque};
use std::mem;
use std::sync::mpsc;

use log::{debug, error, info, warn};

use crate::board::BoardState;
use crate::board_view::{BoardView, PieceGlyphs};
use crate::coord::Coord;
use crate::error::AuthorityError;
use crate::event::{AuthorityReply, AuthorityRequest, ClickOutcome, CompletedMove, GameStatus};
use crate::force::Force;
use crate::history::{CapturedTally, MoveHistory};
use crate::notation::{move_notation, promotion_notation};
use crate::piece::{Piece, PieceKind};
use crate::promotion::{PendingPromotion, PromotionError};
use crate::status_view::StatusView;


const CLICK_FAILED_NOTICE: &str = "An error occurred. Please try again.";
const PROMOTION_FAILED_NOTICE: &str = "Failed to promote pawn. Please try again.";
const NEW_GAME_FAILED_NOTICE: &str = "Failed to start new game. Please try again.";
const SYNC_FAILED_NOTICE: &str = "Failed to load the game. Please start a new game.";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Selection {
    pub square: Coord,
    // Destinations reported by the authority for `square`. May be empty: the authority
    // can select a piece that has no legal moves.
    pub valid_moves: BTreeSet<Coord>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncReason {
    NewGame,
    // Re-fetch board and status without starting a new game.
    Resync,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SyncStage {
    // Keeps the state to return to if the authority refuses to start a game.
    CreatingGame { previous: Box<InteractionState> },
    FetchingBoard,
    FetchingStatus { board: BoardState },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum InteractionState {
    // No authoritative state yet (or it was lost). Only new game / resume are accepted.
    Unsynced,
    Syncing { reason: SyncReason, stage: SyncStage },
    Idle,
    Selected(Selection),
    // Click sent, response pending. `selection` is the state to fall back to on failure.
    AwaitingClick { clicked: Coord, selection: Option<Selection> },
    // Board input is suspended until a piece is chosen or the dialog is dismissed.
    Promoting(PendingPromotion),
    AwaitingPromotion { pending: PendingPromotion, kind: PieceKind },
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickRejection {
    NotSynced,
    AwaitingResponse,
    PromotionPending,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NewGameRejection {
    AwaitingResponse,
    // Only a new game leaves a finished game; re-fetching cannot.
    GameOver,
}

#[derive(Clone, Debug)]
pub enum EventError {
    // Reply does not match the request the controller is waiting for.
    UnexpectedReply(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveCompleted {
    pub from: Coord,
    pub to: Coord,
    // Piece that moved, if the board before the move knew it.
    pub piece: Option<PieceKind>,
    pub force: Option<Force>,
    pub notation: String,
    // E.g. "black pawn".
    pub capture: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted,
    MoveCompleted(MoveCompleted),
    PromotionRequired(Coord),
    GameOver(String),
}

// Owns the interaction state and every view derived from authority responses. Front-ends
// feed user input and authority replies in, and paint snapshots of the views.
pub struct ClientState {
    requests_tx: mpsc::Sender<AuthorityRequest>,
    interaction: InteractionState,
    board: BoardState,
    status: Option<GameStatus>,
    board_view: BoardView,
    status_view: StatusView,
    history: MoveHistory,
    captured: CapturedTally,
    notable_events: VecDeque<NotableEvent>,
}

impl ClientState {
    pub fn new(glyphs: PieceGlyphs, requests_tx: mpsc::Sender<AuthorityRequest>) -> Self {
        ClientState {
            requests_tx,
            interaction: InteractionState::Unsynced,
            board: BoardState::empty(),
            status: None,
            board_view: BoardView::new(glyphs),
            status_view: StatusView::new(),
            history: MoveHistory::new(),
            captured: CapturedTally::new(),
            notable_events: VecDeque::new(),
        }
    }

    pub fn interaction(&self) -> &InteractionState { &self.interaction }
    pub fn board(&self) -> &BoardState { &self.board }
    pub fn status(&self) -> Option<&GameStatus> { self.status.as_ref() }
    pub fn board_view(&self) -> &BoardView { &self.board_view }
    pub fn status_view(&self) -> &StatusView { &self.status_view }
    pub fn history(&self) -> &MoveHistory { &self.history }
    pub fn history_mut(&mut self) -> &mut MoveHistory { &mut self.history }
    pub fn captured(&self) -> &CapturedTally { &self.captured }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.interaction {
            InteractionState::Selected(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        match self.interaction {
            InteractionState::Promoting(pending) => Some(pending),
            InteractionState::AwaitingPromotion { pending, .. } => Some(pending),
            _ => None,
        }
    }

    pub fn is_awaiting_response(&self) -> bool {
        matches!(
            self.interaction,
            InteractionState::Syncing { .. }
                | InteractionState::AwaitingClick { .. }
                | InteractionState::AwaitingPromotion { .. }
        )
    }

    pub fn is_game_over(&self) -> bool { self.interaction == InteractionState::GameOver }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> { self.notable_events.pop_front() }

    // Starts a new game: new-game call, then board fetch, then status fetch. Local state is
    // reset once the authority confirms the new game.
    pub fn new_game(&mut self) -> Result<(), NewGameRejection> {
        if self.is_awaiting_response() {
            return Err(NewGameRejection::AwaitingResponse);
        }
        let previous = mem::replace(&mut self.interaction, InteractionState::Unsynced);
        self.interaction = InteractionState::Syncing {
            reason: SyncReason::NewGame,
            stage: SyncStage::CreatingGame { previous: Box::new(previous) },
        };
        self.send(AuthorityRequest::NewGame);
        Ok(())
    }

    // Attaches to the game the authority currently holds.
    pub fn resume(&mut self) -> Result<(), NewGameRejection> {
        if self.is_awaiting_response() {
            return Err(NewGameRejection::AwaitingResponse);
        }
        if self.is_game_over() {
            return Err(NewGameRejection::GameOver);
        }
        self.start_resync();
        Ok(())
    }

    pub fn click_square(&mut self, position: Coord) -> Result<(), ClickRejection> {
        use InteractionState::*;
        let selection = match &self.interaction {
            Idle => None,
            Selected(selection) => Some(selection.clone()),
            Unsynced => return Err(ClickRejection::NotSynced),
            Syncing { .. } | AwaitingClick { .. } => return Err(ClickRejection::AwaitingResponse),
            Promoting(_) | AwaitingPromotion { .. } => return Err(ClickRejection::PromotionPending),
            GameOver => return Err(ClickRejection::GameOver),
        };
        let selected_position = selection.as_ref().map(|s| s.square);
        self.interaction = AwaitingClick { clicked: position, selection };
        self.send(AuthorityRequest::SquareClick { position, selected_position });
        Ok(())
    }

    pub fn choose_promotion(&mut self, kind: PieceKind) -> Result<(), PromotionError> {
        let pending = match self.interaction {
            InteractionState::Promoting(pending) => pending,
            InteractionState::AwaitingPromotion { .. } => return Err(PromotionError::AwaitingResponse),
            _ => return Err(PromotionError::NoPromotionPending),
        };
        let kind = pending.validate_choice(kind)?;
        self.interaction = InteractionState::AwaitingPromotion { pending, kind };
        self.send(AuthorityRequest::Promote { position: pending.square, piece_kind: kind });
        Ok(())
    }

    // Local cancel: drops the selection or dismisses the promotion dialog. Never talks to
    // the authority and never affects a request in flight.
    pub fn escape(&mut self) {
        match self.interaction {
            InteractionState::Selected(_) => {
                debug!("Selection cleared");
                self.set_interaction(InteractionState::Idle);
            }
            InteractionState::Promoting(pending) => {
                debug!("Promotion dialog for {} dismissed", pending.square);
                self.set_interaction(self.idle_or_game_over());
            }
            _ => {}
        }
    }

    pub fn process_authority_reply(&mut self, reply: AuthorityReply) -> Result<(), EventError> {
        use InteractionState::*;
        let state = mem::replace(&mut self.interaction, Unsynced);
        match (state, reply) {
            (Syncing { reason, stage: SyncStage::CreatingGame { .. } }, AuthorityReply::GameCreated) => {
                info!("New game created");
                self.reset_game();
                self.interaction = Syncing { reason, stage: SyncStage::FetchingBoard };
                self.send(AuthorityRequest::FetchBoard);
            }
            (Syncing { reason, stage: SyncStage::FetchingBoard }, AuthorityReply::Board(board)) => {
                self.interaction = Syncing {
                    reason,
                    stage: SyncStage::FetchingStatus { board },
                };
                self.send(AuthorityRequest::FetchStatus);
            }
            (
                Syncing { reason, stage: SyncStage::FetchingStatus { board } },
                AuthorityReply::Status(status),
            ) => {
                self.finish_sync(reason, board, status);
            }
            (Syncing { stage: SyncStage::CreatingGame { previous }, .. }, AuthorityReply::Failed { error, .. }) => {
                self.report_failure(&error, NEW_GAME_FAILED_NOTICE);
                self.set_interaction(*previous);
            }
            (Syncing { reason, .. }, AuthorityReply::Failed { error, .. }) => {
                let notice = match reason {
                    SyncReason::NewGame => NEW_GAME_FAILED_NOTICE,
                    SyncReason::Resync => SYNC_FAILED_NOTICE,
                };
                self.report_failure(&error, notice);
                self.set_interaction(Unsynced);
            }
            (AwaitingClick { clicked, selection }, AuthorityReply::SquareClicked(outcome)) => {
                self.apply_click_outcome(clicked, selection, outcome);
            }
            (AwaitingClick { selection, .. }, AuthorityReply::Failed { error, .. }) => {
                self.report_failure(&error, CLICK_FAILED_NOTICE);
                self.set_interaction(match selection {
                    Some(selection) => Selected(selection),
                    None => Idle,
                });
            }
            (AwaitingPromotion { pending, kind }, AuthorityReply::Promoted(outcome)) => {
                info!("Promoted {} to {:?}", pending.square, kind);
                self.status_view.clear_notice();
                self.replace_snapshot(outcome.board, outcome.status);
                self.history.record_move(promotion_notation(pending.square, kind));
                let next = self.idle_or_game_over();
                self.enter(next);
            }
            (AwaitingPromotion { .. }, AuthorityReply::Failed { error, .. }) => {
                // The authority may have changed the position before failing: re-fetch
                // instead of trusting the local copy.
                self.report_failure(&error, PROMOTION_FAILED_NOTICE);
                self.start_resync();
            }
            (state, reply) => {
                let message = format!("Unexpected reply {:?} in state {:?}", reply, state);
                warn!("{}", message);
                self.interaction = state;
                return Err(EventError::UnexpectedReply(message));
            }
        }
        Ok(())
    }

    fn send(&mut self, request: AuthorityRequest) {
        if let Err(mpsc::SendError(request)) = self.requests_tx.send(request) {
            error!("Cannot send {:?}: authority channel closed", request);
            let error = AuthorityError::Transport("authority channel closed".to_owned());
            // The state is already waiting for this request, so the failure path applies.
            let _ = self.process_authority_reply(AuthorityReply::Failed { request, error });
        }
    }

    fn start_resync(&mut self) {
        self.interaction = InteractionState::Syncing {
            reason: SyncReason::Resync,
            stage: SyncStage::FetchingBoard,
        };
        self.send(AuthorityRequest::FetchBoard);
    }

    fn finish_sync(&mut self, reason: SyncReason, board: BoardState, status: GameStatus) {
        self.replace_snapshot(board, status);
        info!(
            "Synced: {} white and {} black pieces, {}",
            self.board.count(Force::White),
            self.board.count(Force::Black),
            self.status_view.turn_text()
        );
        if reason == SyncReason::NewGame {
            self.notable_events.push_back(NotableEvent::GameStarted);
        }
        let next = self.idle_or_game_over();
        self.enter(next);
    }

    fn apply_click_outcome(&mut self, clicked: Coord, selection: Option<Selection>, outcome: ClickOutcome) {
        let ClickOutcome { selected, valid_moves, completed_move } = outcome;
        self.status_view.clear_notice();
        let completed = match (completed_move, selection) {
            (Some(completed), Some(selection)) => Some((completed, selection.square)),
            (Some(_), None) => {
                warn!("Authority reported a move from a click on {} without selection, ignoring it", clicked);
                None
            }
            (None, _) => None,
        };
        match completed {
            Some((completed, from)) => self.apply_completed_move(from, clicked, completed),
            None => {
                let next = match selected {
                    Some(square) => InteractionState::Selected(Selection { square, valid_moves }),
                    None => InteractionState::Idle,
                };
                self.set_interaction(next);
            }
        }
    }

    fn apply_completed_move(&mut self, from: Coord, to: Coord, completed: CompletedMove) {
        let CompletedMove { board, status, captured, promotion } = completed;
        let moving_piece = self.board.get(from).or_else(|| board.get(to));
        let notation = move_notation(moving_piece, from, to, captured.is_some(), &status);
        info!("Move completed: {}", notation);
        self.replace_snapshot(board, status);
        self.history.record_move(notation.clone());
        if let Some(piece) = captured {
            self.captured.record_capture(piece.force, piece.kind);
        }
        self.notable_events.push_back(NotableEvent::MoveCompleted(MoveCompleted {
            from,
            to,
            piece: moving_piece.map(|p| p.kind),
            force: moving_piece.map(|p| p.force),
            notation,
            capture: captured.map(Piece::description),
        }));
        let next = match promotion {
            Some(square) => {
                let force = self
                    .board
                    .get(square)
                    .or(moving_piece)
                    .map_or_else(|| self.current_turn().opponent(), |p| p.force);
                InteractionState::Promoting(PendingPromotion { square, force })
            }
            None => self.idle_or_game_over(),
        };
        self.enter(next);
    }

    fn current_turn(&self) -> Force { self.status.as_ref().map_or(Force::White, |s| s.current_turn) }

    fn idle_or_game_over(&self) -> InteractionState {
        if self.status.as_ref().is_some_and(|s| s.is_game_over) {
            InteractionState::GameOver
        } else {
            InteractionState::Idle
        }
    }

    // Like `set_interaction`, but also announces states that other UI parts react to.
    fn enter(&mut self, next: InteractionState) {
        self.set_interaction(next);
        match &self.interaction {
            InteractionState::Promoting(pending) => {
                self.notable_events.push_back(NotableEvent::PromotionRequired(pending.square));
            }
            InteractionState::GameOver => {
                let result = self.status_view.result_banner().unwrap_or_default().to_owned();
                info!("Game over: {}", result);
                self.notable_events.push_back(NotableEvent::GameOver(result));
            }
            _ => {}
        }
    }

    fn set_interaction(&mut self, next: InteractionState) {
        debug!("{:?} -> {:?}", self.interaction, next);
        self.interaction = next;
        self.refresh_highlights();
    }

    fn replace_snapshot(&mut self, board: BoardState, status: GameStatus) {
        self.board = board;
        self.status = Some(status);
        self.board_view.render(&self.board);
    }

    fn refresh_highlights(&mut self) {
        let no_moves = BTreeSet::new();
        let (selected, valid_moves) = match &self.interaction {
            InteractionState::Selected(selection) => (Some(selection.square), &selection.valid_moves),
            _ => (None, &no_moves),
        };
        self.board_view.highlight(selected, valid_moves);
        if let Some(status) = &self.status {
            self.status_view.apply(status, &self.board, &mut self.board_view);
        }
    }

    fn report_failure(&mut self, error: &AuthorityError, notice: &str) {
        error!("{}: {}", notice, error);
        self.status_view.set_notice(notice);
    }

    fn reset_game(&mut self) {
        self.board = BoardState::empty();
        self.status = None;
        self.board_view.clear();
        self.status_view.reset();
        self.history.clear();
        self.captured.clear();
    }
}
