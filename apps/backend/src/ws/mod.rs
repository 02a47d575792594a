//! Realtime adapter: websocket sessions and the hub that routes pushes.

pub mod hub;
pub mod protocol;
pub mod session;
