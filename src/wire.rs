// JSON schema of the remote authority endpoints and the one place where untyped payloads
// become typed values. Field-level leniency lives here: missing or null arrays/objects
// default to empty, invalid entries are skipped with a warning. Everything past this
// module works with `event` types only.

use std::collections::BTreeSet;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::board::BoardState;
use crate::coord::Coord;
use crate::event::{ClickOutcome, CompletedMove, GameStatus, PromotionOutcome};
use crate::force::Force;
use crate::piece::{Piece, PieceKind};


#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareClickRequest {
    pub position: Coord,
    pub selected_position: Option<Coord>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub position: Coord,
    pub piece_type: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquareClickResponse {
    #[serde(deserialize_with = "lenient")]
    pub selected_position: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub valid_moves: Vec<Value>,
    #[serde(deserialize_with = "lenient")]
    pub move_success: bool,
    #[serde(deserialize_with = "lenient")]
    pub new_board_state: Vec<Value>,
    #[serde(deserialize_with = "lenient")]
    pub game_status: WireGameStatus,
    #[serde(deserialize_with = "lenient")]
    pub captured_piece: Option<WireCapturedPiece>,
    #[serde(deserialize_with = "lenient")]
    pub pawn_promotion: bool,
    #[serde(deserialize_with = "lenient")]
    pub promotion_position: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoteResponse {
    #[serde(deserialize_with = "lenient")]
    pub board: Vec<Value>,
    #[serde(deserialize_with = "lenient")]
    pub game_status: WireGameStatus,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireGameStatus {
    #[serde(deserialize_with = "lenient")]
    pub current_turn: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub in_check: bool,
    #[serde(deserialize_with = "lenient")]
    pub is_game_over: bool,
    #[serde(deserialize_with = "lenient")]
    pub result: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WirePiece {
    pub position: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireCapturedPiece {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
}


// Null, or a value of the wrong JSON type, becomes the default. A single bad field must
// not discard the rest of the payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(&value).unwrap_or_else(|err| {
        warn!("Ignoring malformed field {value}: {err}");
        T::default()
    }))
}

fn parse_square(s: &str, what: &str) -> Option<Coord> {
    let coord = Coord::from_algebraic(s);
    if coord.is_none() {
        warn!("Invalid {what} square: {s:?}");
    }
    coord
}

fn decode_piece(entry: Value) -> Option<(Coord, Piece)> {
    let Ok(wire) = serde_json::from_value::<WirePiece>(entry.clone()) else {
        warn!("Invalid piece data: {entry}");
        return None;
    };
    let (Some(position), Some(color), Some(kind)) = (&wire.position, &wire.color, &wire.kind)
    else {
        warn!("Invalid piece data: {entry}");
        return None;
    };
    match (Coord::from_algebraic(position), Force::from_wire(color), PieceKind::from_wire(kind)) {
        (Some(coord), Some(force), Some(kind)) => Some((coord, Piece::new(kind, force))),
        _ => {
            warn!("Invalid piece data: {entry}");
            None
        }
    }
}

pub fn decode_board(entries: Vec<Value>) -> BoardState {
    let (board, duplicates) = BoardState::from_placements(entries.into_iter().filter_map(decode_piece));
    for coord in duplicates {
        warn!("Square {coord} occupied more than once, keeping the first piece");
    }
    board
}

pub fn decode_status(wire: WireGameStatus) -> GameStatus {
    let current_turn = match wire.current_turn.as_deref() {
        None => Force::White,
        Some(s) => Force::from_wire(s).unwrap_or_else(|| {
            warn!("Invalid current turn: {s:?}, assuming white");
            Force::White
        }),
    };
    GameStatus {
        current_turn,
        in_check: wire.in_check,
        is_game_over: wire.is_game_over,
        result: wire.result,
    }
}

fn decode_captured(wire: WireCapturedPiece) -> Option<Piece> {
    let force = wire.color.as_deref().and_then(Force::from_wire);
    let kind = wire.kind.as_deref().and_then(PieceKind::from_wire);
    match (kind, force) {
        (Some(kind), Some(force)) => Some(Piece::new(kind, force)),
        _ => {
            warn!("Invalid captured piece: {wire:?}");
            None
        }
    }
}

fn decode_square_list(entries: Vec<Value>) -> BTreeSet<Coord> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => parse_square(&s, "destination"),
            other => {
                warn!("Invalid position: {other}");
                None
            }
        })
        .collect()
}

pub fn decode_square_click(response: SquareClickResponse, request: &SquareClickRequest) -> ClickOutcome {
    let selected = response
        .selected_position
        .as_deref()
        .and_then(|s| parse_square(s, "selected"));
    let mut valid_moves = decode_square_list(response.valid_moves);
    if selected.is_none() && !valid_moves.is_empty() {
        warn!("Got {} valid moves without a selected square, ignoring them", valid_moves.len());
        valid_moves.clear();
    }
    let completed_move = response.move_success.then(|| {
        let promotion = response.pawn_promotion.then(|| {
            response
                .promotion_position
                .as_deref()
                .and_then(|s| parse_square(s, "promotion"))
                .unwrap_or(request.position)
        });
        CompletedMove {
            board: decode_board(response.new_board_state),
            status: decode_status(response.game_status),
            captured: response.captured_piece.and_then(decode_captured),
            promotion,
        }
    });
    ClickOutcome { selected, valid_moves, completed_move }
}

pub fn decode_promotion(response: PromoteResponse) -> PromotionOutcome {
    PromotionOutcome {
        board: decode_board(response.board),
        status: decode_status(response.game_status),
    }
}
