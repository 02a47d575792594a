//! Stateful services around the pure domain: the session store, the flow
//! orchestration that drives it, persistence, and housekeeping.

pub mod broadcast;
pub mod game_flow;
pub mod janitor;
pub mod persistence;
pub mod session_store;
