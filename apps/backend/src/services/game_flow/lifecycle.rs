use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use super::GameFlowService;
use crate::domain::{self, project_all, project_for, SessionStatus, Snapshot};
use crate::errors::domain::DomainError;
use crate::services::session_store::{EvictionReport, IdlePolicy, JoinOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct CreatedSession {
    pub session_id: String,
    pub snapshot: Snapshot,
}

impl GameFlowService {
    /// Open a new session with `host_player_id` in slot A.
    ///
    /// Nothing is pushed: the host is the only member and gets the snapshot
    /// in the response.
    pub fn create_session(
        &self,
        host_player_id: &str,
        host_name: &str,
    ) -> Result<CreatedSession, DomainError> {
        let shared = self
            .store
            .create(host_player_id, host_name, OffsetDateTime::now_utc())?;

        let (session_id, snapshot) = {
            let mut session = shared.lock();
            self.mark_present(&mut session, host_player_id);
            if let Some(pending) = self.writer.capture(&session) {
                self.writer.save(&session.session_id, pending);
            }
            (
                session.session_id.clone(),
                project_for(&session, host_player_id)?,
            )
        };

        info!(session_id = %session_id, host = host_player_id, "Session created");
        Ok(CreatedSession {
            session_id,
            snapshot,
        })
    }

    /// Seat a guest, or return the current view to a player already seated.
    pub fn join_session(
        &self,
        session_id: &str,
        player_id: &str,
        name: &str,
    ) -> Result<Snapshot, DomainError> {
        let store = &self.store;
        let committed = self.run_mutation(session_id, player_id, |session| {
            let outcome = store.join(session, player_id, name)?;
            self.mark_present(session, player_id);
            Ok(outcome)
        })?;

        if committed.value == JoinOutcome::Seated {
            info!(
                session_id,
                guest = player_id,
                first = ?committed.snapshot.turn_owner,
                "Guest joined, game started"
            );
        }
        Ok(committed.snapshot)
    }

    /// Destroy a session on behalf of one of its players.
    ///
    /// Deleting a game still in play concedes it first: both players get
    /// the finished state pushed before the session goes away.
    pub fn delete_session(&self, session_id: &str, player_id: &str) -> Result<(), DomainError> {
        let mut rejection = None;
        let mut conceded = false;
        let removed = self.store.remove_if(session_id, |session| {
            if let Err(e) = session.member_slot(player_id) {
                rejection = Some(e);
                return false;
            }
            if session.status == SessionStatus::Playing {
                if let Err(e) = domain::forfeit(session, player_id) {
                    rejection = Some(e);
                    return false;
                }
                session.touch(OffsetDateTime::now_utc());
                self.push(&project_all(session));
                conceded = true;
            }
            true
        });

        if !removed {
            return Err(rejection.unwrap_or_else(|| DomainError::session_not_found(session_id)));
        }
        self.writer.remove(session_id);
        info!(session_id, player_id, conceded, "Session deleted");
        Ok(())
    }

    /// Apply the idle policy and notify players of forfeited games.
    pub fn evict_idle(&self, now: OffsetDateTime, policy: IdlePolicy) -> EvictionReport {
        let report = self.store.evict_idle(now, policy);

        for id in &report.removed {
            self.writer.remove(id);
        }
        for id in &report.forfeited {
            if let Some(shared) = self.store.get(id) {
                self.publish(&shared.lock());
            }
        }
        report
    }
}
