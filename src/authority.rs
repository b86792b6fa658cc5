use async_trait::async_trait;
use log::{debug, error};
use serde_json::Value;

use crate::error::AuthorityError;
use crate::event::{AuthorityReply, AuthorityRequest};
use crate::wire::{
    self, PromoteRequest, PromoteResponse, SquareClickRequest, SquareClickResponse, WireGameStatus,
};


// Remote rules authority. Owns legality, check detection and game state; the client only
// mirrors what it answers. Implementations return raw wire payloads: decoding and
// validation happen once, in `dispatch`.
#[async_trait]
pub trait Authority {
    async fn new_game(&self) -> Result<(), AuthorityError>;
    async fn board(&self) -> Result<Vec<Value>, AuthorityError>;
    async fn status(&self) -> Result<WireGameStatus, AuthorityError>;
    async fn square_click(&self, request: &SquareClickRequest) -> Result<SquareClickResponse, AuthorityError>;
    async fn promote(&self, request: &PromoteRequest) -> Result<PromoteResponse, AuthorityError>;
}

// Performs one request and converts the outcome into a typed reply. Never fails: transport
// and payload errors are reported as `AuthorityReply::Failed`.
pub async fn dispatch<A: Authority + ?Sized>(authority: &A, request: AuthorityRequest) -> AuthorityReply {
    debug!("-> {}: {:?}", request.endpoint(), request);
    let result = match request {
        AuthorityRequest::NewGame => authority.new_game().await.map(|()| AuthorityReply::GameCreated),
        AuthorityRequest::FetchBoard => {
            authority.board().await.map(|entries| AuthorityReply::Board(wire::decode_board(entries)))
        }
        AuthorityRequest::FetchStatus => authority
            .status()
            .await
            .map(|status| AuthorityReply::Status(wire::decode_status(status))),
        AuthorityRequest::SquareClick { position, selected_position } => {
            let click = SquareClickRequest { position, selected_position };
            authority
                .square_click(&click)
                .await
                .map(|response| AuthorityReply::SquareClicked(wire::decode_square_click(response, &click)))
        }
        AuthorityRequest::Promote { position, piece_kind } => {
            let promote = PromoteRequest {
                position,
                piece_type: piece_kind.wire_name().to_owned(),
            };
            authority
                .promote(&promote)
                .await
                .map(|response| AuthorityReply::Promoted(wire::decode_promotion(response)))
        }
    };
    match result {
        Ok(reply) => {
            debug!("<- {}: {:?}", request.endpoint(), reply);
            reply
        }
        Err(error) => {
            error!("Request to {} failed: {}", request.endpoint(), error);
            AuthorityReply::Failed { request, error }
        }
    }
}
