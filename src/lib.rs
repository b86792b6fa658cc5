#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod authority;
pub mod board;
pub mod board_view;
pub mod client;
pub mod coord;
pub mod error;
pub mod event;
pub mod force;
pub mod history;
pub mod notation;
pub mod piece;
pub mod promotion;
pub mod status_view;
pub mod test_util;
pub mod wire;
