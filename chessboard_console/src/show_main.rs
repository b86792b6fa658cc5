use std::sync::mpsc;

use chessboard_client::client::{ClientState, InteractionState};
use log::warn;

use crate::client_config::ClientConfig;
use crate::http_authority::HttpAuthority;
use crate::{network, tui};


// Fetches the game the server currently holds and prints it once. Never starts a new game.
pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    let authority = HttpAuthority::new(&config)?;
    let (requests_tx, requests_rx) = mpsc::channel();
    let mut client_state = ClientState::new(config.piece_glyphs(), requests_tx);
    client_state.resume().map_err(|err| anyhow::anyhow!("Cannot fetch game: {:?}", err))?;
    network::serve_requests(&authority, requests_rx, |reply| {
        if let Err(err) = client_state.process_authority_reply(reply) {
            warn!("{:?}", err);
        }
        client_state.is_awaiting_response()
    });
    if *client_state.interaction() == InteractionState::Unsynced {
        anyhow::bail!(
            "{} ({})",
            client_state.status_view().status_line(),
            authority.base_url()
        );
    }
    for line in tui::render_client(&client_state) {
        println!("{line}");
    }
    Ok(())
}
