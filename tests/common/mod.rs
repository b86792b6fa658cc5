// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use serde_json::{Value, json};

use chessboard_client::test_util::piece_json;


// `/square-click` answer that only changes the selection.
#[allow(dead_code)]
pub fn selection_json(selected: Option<&str>, valid_moves: &[&str]) -> Value {
    json!({
        "selectedPosition": selected,
        "validMoves": valid_moves,
    })
}

// `/square-click` answer for a completed move.
#[allow(dead_code)]
pub fn move_json(board: Value, status: Value, captured: Option<(&str, &str)>) -> Value {
    let mut response = json!({
        "selectedPosition": null,
        "validMoves": [],
        "moveSuccess": true,
        "newBoardState": board,
        "gameStatus": status,
    });
    if let Some((kind, color)) = captured {
        response["capturedPiece"] = json!({ "type": kind, "color": color });
    }
    response
}

#[allow(dead_code)]
pub fn with_promotion(mut response: Value, square: &str) -> Value {
    response["pawnPromotion"] = json!(true);
    response["promotionPosition"] = json!(square);
    response
}

// Board payload from "e1:white:KING" style descriptions.
#[allow(dead_code)]
pub fn board_json(pieces: &[&str]) -> Value {
    Value::Array(
        pieces
            .iter()
            .map(|p| {
                let parts: Vec<_> = p.split(':').collect();
                piece_json(parts[0], parts[1], parts[2])
            })
            .collect(),
    )
}

// Applies a move to a board payload the way the authority would report it afterwards.
#[allow(dead_code)]
pub fn moved(board: &Value, from: &str, to: &str) -> Value {
    let pieces = board.as_array().unwrap();
    Value::Array(
        pieces
            .iter()
            .filter(|p| p["position"] != to)
            .map(|p| {
                let mut p = p.clone();
                if p["position"] == from {
                    p["position"] = json!(to);
                    p["id"] = json!(to);
                }
                p
            })
            .collect(),
    )
}
