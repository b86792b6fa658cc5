use std::sync::mpsc;
use std::thread;

use chessboard_client::authority::{self, Authority};
use chessboard_client::event::{AuthorityReply, AuthorityRequest};
use log::info;


// Executes authority requests one at a time, in the order they were sent, and reports each
// reply through `on_reply`. Returns when the request channel is closed or `on_reply` asks
// to stop.
pub fn serve_requests<A, F>(authority: &A, requests_rx: mpsc::Receiver<AuthorityRequest>, mut on_reply: F)
where
    A: Authority + ?Sized,
    F: FnMut(AuthorityReply) -> bool,
{
    for request in requests_rx {
        let reply = async_std::task::block_on(authority::dispatch(authority, request));
        if !on_reply(reply) {
            break;
        }
    }
    info!("Authority worker stopped");
}

pub fn spawn_worker<A, F>(
    authority: A, requests_rx: mpsc::Receiver<AuthorityRequest>, on_reply: F,
) -> thread::JoinHandle<()>
where
    A: Authority + Send + 'static,
    F: FnMut(AuthorityReply) -> bool + Send + 'static,
{
    thread::spawn(move || serve_requests(&authority, requests_rx, on_reply))
}


#[cfg(test)]
mod tests {
    use chessboard_client::test_util::{ScriptedAuthority, sq, starting_position_json};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn replies_come_back_in_request_order() {
        let authority = ScriptedAuthority::new();
        authority.respond("board", starting_position_json());
        let (requests_tx, requests_rx) = mpsc::channel();
        requests_tx.send(AuthorityRequest::FetchBoard).unwrap();
        requests_tx
            .send(AuthorityRequest::SquareClick { position: sq("e2"), selected_position: None })
            .unwrap();
        drop(requests_tx);

        let mut replies = vec![];
        serve_requests(&authority, requests_rx, |reply| {
            replies.push(reply);
            true
        });
        assert_eq!(replies.len(), 2);
        assert!(matches!(&replies[0], AuthorityReply::Board(board) if board.len() == 32));
        // Nothing scripted for the click: reported as a failure, not a crash.
        assert!(matches!(&replies[1], AuthorityReply::Failed { .. }));
        assert_eq!(authority.endpoints(), vec!["board", "square-click"]);
    }

    #[test]
    fn stops_when_receiver_is_gone() {
        let authority = ScriptedAuthority::new();
        let (requests_tx, requests_rx) = mpsc::channel();
        requests_tx.send(AuthorityRequest::FetchStatus).unwrap();
        requests_tx.send(AuthorityRequest::FetchStatus).unwrap();
        let mut num_replies = 0;
        serve_requests(&authority, requests_rx, |_| {
            num_replies += 1;
            false
        });
        assert_eq!(num_replies, 1);
    }
}
