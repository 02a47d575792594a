//! Outbound snapshot delivery seam.

use crate::domain::Snapshot;

/// Delivers a player's own snapshot to wherever that player is connected.
///
/// Implementations must not block: they are called with the session lock
/// held, once per slot holder, right after a mutation commits.
pub trait BroadcastGateway: Send + Sync {
    fn send(&self, player_id: &str, snapshot: &Snapshot);

    /// Whether `player_id` currently has an open channel.
    fn is_connected(&self, _player_id: &str) -> bool {
        false
    }
}

/// Gateway that drops every push. Used when no realtime adapter is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGateway;

impl BroadcastGateway for NullGateway {
    fn send(&self, _player_id: &str, _snapshot: &Snapshot) {}
}
