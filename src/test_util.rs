// Test utilities that cannot be moved to the "tests" folder, because the console crate tests
// use them too.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, mpsc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::authority::{self, Authority};
use crate::board_view::PieceGlyphs;
use crate::client::ClientState;
use crate::coord::Coord;
use crate::error::AuthorityError;
use crate::event::AuthorityRequest;
use crate::wire::{PromoteRequest, PromoteResponse, SquareClickRequest, SquareClickResponse, WireGameStatus};


pub fn sq(s: &str) -> Coord {
    Coord::from_algebraic(s).unwrap_or_else(|| panic!("invalid square: {s:?}"))
}

pub fn piece_json(position: &str, color: &str, kind: &str) -> Value {
    json!({ "id": position, "position": position, "color": color, "type": kind })
}

// `GET /board` payload for the classic starting position.
pub fn starting_position_json() -> Value {
    let back_rank = ["ROOK", "KNIGHT", "BISHOP", "QUEEN", "KING", "BISHOP", "KNIGHT", "ROOK"];
    let mut pieces = vec![];
    for (col, kind) in ('a'..='h').zip(back_rank) {
        pieces.push(piece_json(&format!("{col}1"), "white", kind));
        pieces.push(piece_json(&format!("{col}2"), "white", "PAWN"));
        pieces.push(piece_json(&format!("{col}7"), "black", "PAWN"));
        pieces.push(piece_json(&format!("{col}8"), "black", kind));
    }
    Value::Array(pieces)
}

pub fn status_json(current_turn: &str, in_check: bool, is_game_over: bool, result: Option<&str>) -> Value {
    json!({
        "currentTurn": current_turn,
        "inCheck": in_check,
        "isGameOver": is_game_over,
        "result": result,
    })
}


// In-memory authority answering from per-endpoint scripts. Every call consumes the next
// scripted answer for its endpoint; an empty script is a transport failure.
#[derive(Default)]
pub struct ScriptedAuthority {
    scripts: Mutex<HashMap<&'static str, VecDeque<Result<Value, AuthorityError>>>>,
    calls: Mutex<Vec<(&'static str, Option<Value>)>>,
}

impl ScriptedAuthority {
    pub fn new() -> Self { Self::default() }

    pub fn respond(&self, endpoint: &'static str, body: Value) {
        self.push(endpoint, Ok(body));
    }
    pub fn fail(&self, endpoint: &'static str, error: AuthorityError) {
        self.push(endpoint, Err(error));
    }

    // Scripts the three bootstrap calls.
    pub fn respond_new_game(&self, board: Value, status: Value) {
        self.respond("new-game", Value::Null);
        self.respond("board", board);
        self.respond("status", status);
    }

    // Endpoints called so far, in order.
    pub fn endpoints(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(endpoint, _)| *endpoint).collect()
    }
    pub fn request_bodies(&self, endpoint: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .filter_map(|(_, body)| body.clone())
            .collect()
    }
    pub fn num_calls(&self) -> usize { self.calls.lock().unwrap().len() }

    fn push(&self, endpoint: &'static str, answer: Result<Value, AuthorityError>) {
        self.scripts.lock().unwrap().entry(endpoint).or_default().push_back(answer);
    }

    fn answer<T: DeserializeOwned>(&self, endpoint: &'static str, body: Option<Value>) -> Result<T, AuthorityError> {
        self.calls.lock().unwrap().push((endpoint, body));
        let answer = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(|script| script.pop_front())
            .unwrap_or_else(|| Err(AuthorityError::Transport(format!("nothing scripted for {endpoint}"))))?;
        Ok(serde_json::from_value(answer)?)
    }
}

#[async_trait]
impl Authority for ScriptedAuthority {
    async fn new_game(&self) -> Result<(), AuthorityError> {
        self.answer::<Value>("new-game", None).map(|_| ())
    }
    async fn board(&self) -> Result<Vec<Value>, AuthorityError> { self.answer("board", None) }
    async fn status(&self) -> Result<WireGameStatus, AuthorityError> { self.answer("status", None) }
    async fn square_click(&self, request: &SquareClickRequest) -> Result<SquareClickResponse, AuthorityError> {
        self.answer("square-click", Some(serde_json::to_value(request)?))
    }
    async fn promote(&self, request: &PromoteRequest) -> Result<PromoteResponse, AuthorityError> {
        self.answer("promote", Some(serde_json::to_value(request)?))
    }
}


// Client wired to a `ScriptedAuthority`. Requests stay queued until `pump` or
// `deliver_next` is called, so tests can observe the in-flight state.
pub struct TestClient {
    pub state: ClientState,
    pub authority: ScriptedAuthority,
    requests_rx: mpsc::Receiver<AuthorityRequest>,
}

impl TestClient {
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = mpsc::channel();
        TestClient {
            state: ClientState::new(PieceGlyphs::pictograms(), requests_tx),
            authority: ScriptedAuthority::new(),
            requests_rx,
        }
    }

    // Performs the oldest queued request and feeds the reply back. Returns false if there
    // was nothing to deliver.
    pub async fn deliver_next(&mut self) -> bool {
        let Ok(request) = self.requests_rx.try_recv() else {
            return false;
        };
        let reply = authority::dispatch(&self.authority, request).await;
        self.state.process_authority_reply(reply).unwrap();
        true
    }

    // Delivers requests until the client stops asking. Returns the number delivered.
    pub async fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while self.deliver_next().await {
            delivered += 1;
        }
        delivered
    }

    // Starts a new game against the given payloads and waits for the bootstrap to finish.
    pub async fn start(&mut self, board: Value, status: Value) {
        self.authority.respond_new_game(board, status);
        self.state.new_game().unwrap();
        self.pump().await;
        while self.state.next_notable_event().is_some() {}
    }

    pub async fn click(&mut self, square: &str) {
        self.state.click_square(sq(square)).unwrap();
        self.pump().await;
    }
}
