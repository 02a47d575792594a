use tracing::{debug, info};

use super::GameFlowService;
use crate::domain::{self, project_for, ConnectionStatus, Snapshot};
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Current view of a session for one of its players. Read-only, no push.
    pub fn get_snapshot(&self, session_id: &str, player_id: &str) -> Result<Snapshot, DomainError> {
        let shared = self
            .store
            .get(session_id)
            .ok_or_else(|| DomainError::session_not_found(session_id))?;
        let session = shared.lock();
        project_for(&session, player_id)
    }

    pub fn attack(
        &self,
        session_id: &str,
        player_id: &str,
        attacker_id: &str,
        target_id: &str,
    ) -> Result<Snapshot, DomainError> {
        let committed = self.run_mutation(session_id, player_id, |session| {
            domain::attack(session, player_id, attacker_id, target_id)
        })?;

        let outcome = &committed.value;
        debug!(
            session_id,
            player_id,
            attacker_id,
            target_id,
            damage = outcome.damage,
            target_health = outcome.target_health,
            "Attack resolved"
        );
        if outcome.game_finished {
            info!(session_id, winner = ?committed.snapshot.winner, "Game finished");
        }
        Ok(committed.snapshot)
    }

    pub fn apply_bonus(
        &self,
        session_id: &str,
        player_id: &str,
        bonus_card_id: &str,
        target_id: &str,
    ) -> Result<Snapshot, DomainError> {
        let committed = self.run_mutation(session_id, player_id, |session| {
            domain::apply_bonus(session, player_id, bonus_card_id, target_id)
        })?;

        debug!(
            session_id,
            player_id,
            bonus_card_id,
            target_id,
            percent = committed.value.percent,
            "Bonus applied"
        );
        Ok(committed.snapshot)
    }

    pub fn end_turn(&self, session_id: &str, player_id: &str) -> Result<Snapshot, DomainError> {
        let committed = self.run_mutation(session_id, player_id, |session| {
            domain::end_turn(session, player_id)
        })?;

        let change = &committed.value;
        debug!(
            session_id,
            player_id,
            next = ?change.next,
            round = change.round_number,
            expired = change.expired.len(),
            "Turn ended"
        );
        if change.game_finished {
            info!(session_id, winner = ?committed.snapshot.winner, "Game finished");
        }
        Ok(committed.snapshot)
    }

    pub fn select_character(
        &self,
        session_id: &str,
        player_id: &str,
        character_id: &str,
    ) -> Result<Snapshot, DomainError> {
        let committed = self.run_mutation(session_id, player_id, |session| {
            domain::select_character(session, player_id, character_id)
        })?;
        debug!(session_id, player_id, character_id, "Active character selected");
        Ok(committed.snapshot)
    }

    pub fn forfeit(&self, session_id: &str, player_id: &str) -> Result<Snapshot, DomainError> {
        let committed = self.run_mutation(session_id, player_id, |session| {
            domain::forfeit(session, player_id)
        })?;
        info!(session_id, player_id, winner = ?committed.value, "Player forfeited");
        Ok(committed.snapshot)
    }

    /// Record whether a player's realtime channel is up.
    ///
    /// Pushes only when the status actually changes.
    pub fn set_connection(
        &self,
        session_id: &str,
        player_id: &str,
        status: ConnectionStatus,
    ) -> Result<(), DomainError> {
        let shared = self
            .store
            .get(session_id)
            .ok_or_else(|| DomainError::session_not_found(session_id))?;

        let mut session = shared.lock();
        let slot_id = session.member_slot(player_id)?;
        let Some(slot) = session.slot_mut(slot_id) else {
            return Ok(());
        };
        if slot.connection_status == status {
            return Ok(());
        }
        slot.connection_status = status;
        self.publish(&session);

        debug!(session_id, player_id, ?status, "Connection status changed");
        Ok(())
    }
}
