//! Game flow orchestration: bridges the pure duel rules with the session
//! store, snapshot persistence, and the broadcast gateway.
//!
//! Every operation follows the same shape: look the session up, lock it, run
//! the domain operation, then project, save, and push one snapshot per slot
//! holder before releasing the lock. Saves and gateway sends only enqueue;
//! nothing awaits under a lock.

mod lifecycle;
mod mutation;
mod player_actions;


use std::sync::Arc;

use crate::domain::{ConnectionStatus, Session};
use crate::services::broadcast::BroadcastGateway;
use crate::services::persistence::SnapshotWriter;
use crate::services::session_store::SessionStore;

pub use lifecycle::CreatedSession;

pub struct GameFlowService {
    store: Arc<SessionStore>,
    gateway: Arc<dyn BroadcastGateway>,
    writer: SnapshotWriter,
}

impl GameFlowService {
    pub fn new(
        store: Arc<SessionStore>,
        gateway: Arc<dyn BroadcastGateway>,
        writer: SnapshotWriter,
    ) -> Self {
        Self {
            store,
            gateway,
            writer,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session_count(&self) -> usize {
        self.store.len()
    }

    /// Seed a freshly seated player's connection flag from the gateway, so
    /// the seating push already shows them online.
    fn mark_present(&self, session: &mut Session, player_id: &str) {
        if !self.gateway.is_connected(player_id) {
            return;
        }
        if let Some(slot) = session
            .slot_of(player_id)
            .and_then(|slot_id| session.slot_mut(slot_id))
        {
            slot.connection_status = ConnectionStatus::Connected;
        }
    }
}
