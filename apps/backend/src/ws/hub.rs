//! Connection registry: which websocket actors belong to which player.
//!
//! Implements [`BroadcastGateway`] so the flow service can push snapshots
//! without knowing about actors.

use std::collections::HashSet;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::Snapshot;
use crate::services::broadcast::BroadcastGateway;
use crate::ws::session::{HubEvent, Shutdown};

struct Connection {
    player_id: String,
    events: Recipient<HubEvent>,
    shutdown: Recipient<Shutdown>,
}

#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<Uuid, Connection>,
    by_player: DashMap<String, HashSet<Uuid>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(
        &self,
        player_id: &str,
        conn_id: Uuid,
        events: Recipient<HubEvent>,
        shutdown: Recipient<Shutdown>,
    ) {
        self.connections.insert(
            conn_id,
            Connection {
                player_id: player_id.to_string(),
                events,
                shutdown,
            },
        );
        self.by_player
            .entry(player_id.to_string())
            .or_default()
            .insert(conn_id);
        debug!(player_id, conn_id = %conn_id, "[WS HUB] connection registered");
    }

    pub fn unregister_connection(&self, conn_id: Uuid) {
        let Some((_, conn)) = self.connections.remove(&conn_id) else {
            return;
        };
        let now_empty = match self.by_player.get_mut(&conn.player_id) {
            Some(mut ids) => {
                ids.remove(&conn_id);
                ids.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.by_player
                .remove_if(&conn.player_id, |_, ids| ids.is_empty());
        }
        debug!(player_id = %conn.player_id, conn_id = %conn_id, "[WS HUB] connection unregistered");
    }

    pub fn is_connected(&self, player_id: &str) -> bool {
        self.by_player
            .get(player_id)
            .is_some_and(|ids| !ids.is_empty())
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Deliver `event` to every open connection of `player_id`.
    pub fn send_to_player(&self, player_id: &str, event: HubEvent) {
        let Some(ids) = self.by_player.get(player_id).map(|ids| ids.clone()) else {
            return;
        };
        for conn_id in ids {
            if let Some(conn) = self.connections.get(&conn_id) {
                conn.events.do_send(event.clone());
            }
        }
    }

    /// Ask every connection to close; used on server shutdown.
    pub fn shutdown_all(&self) {
        let count = self.connections.len();
        for conn in self.connections.iter() {
            conn.shutdown.do_send(Shutdown);
        }
        info!(connections = count, "[WS HUB] shutdown requested");
    }
}

impl BroadcastGateway for WsRegistry {
    fn send(&self, player_id: &str, snapshot: &Snapshot) {
        self.send_to_player(
            player_id,
            HubEvent::GameState {
                snapshot: snapshot.clone(),
            },
        );
    }

    fn is_connected(&self, player_id: &str) -> bool {
        WsRegistry::is_connected(self, player_id)
    }
}
