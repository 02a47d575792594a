//! Helpers shared by the backend's integration tests: one-time logging,
//! problem+json assertions, and unique player ids.

pub mod logging;
pub mod players;
pub mod problem_details;
