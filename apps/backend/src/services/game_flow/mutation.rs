use time::OffsetDateTime;
use tracing::debug;

use super::GameFlowService;
use crate::domain::{project_all, Session, Snapshot};
use crate::errors::domain::DomainError;

/// A committed mutation: the operation's own result plus the caller's view.
#[derive(Debug)]
pub(super) struct Committed<T> {
    pub value: T,
    pub snapshot: Snapshot,
}

impl GameFlowService {
    /// Run `op` against one locked session and fan the result out.
    ///
    /// On error the session is untouched and nothing is pushed; the error
    /// goes back to the caller only.
    pub(super) fn run_mutation<T, F>(
        &self,
        session_id: &str,
        player_id: &str,
        op: F,
    ) -> Result<Committed<T>, DomainError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        let shared = self
            .store
            .get(session_id)
            .ok_or_else(|| DomainError::session_not_found(session_id))?;

        let (value, snapshots) = {
            let mut session = shared.lock();
            let value = op(&mut *session)?;
            session.touch(OffsetDateTime::now_utc());
            (value, self.publish(&session))
        };

        let snapshot = snapshots
            .into_iter()
            .find_map(|(id, snapshot)| (id == player_id).then_some(snapshot))
            .ok_or_else(|| DomainError::NotAMember(player_id.to_string()))?;

        Ok(Committed { value, snapshot })
    }

    /// Save and push the committed state of a locked session.
    ///
    /// Must run under the session lock: two commits on one session then
    /// reach every player in commit order. Both the save and the gateway
    /// sends only enqueue work.
    pub(super) fn publish(&self, session: &Session) -> Vec<(String, Snapshot)> {
        let snapshots = project_all(session);
        if let Some(pending) = self.writer.capture(session) {
            self.writer.save(&session.session_id, pending);
        }
        self.push(&snapshots);
        snapshots
    }

    pub(super) fn push(&self, snapshots: &[(String, Snapshot)]) {
        for (player_id, snapshot) in snapshots {
            self.gateway.send(player_id, snapshot);
        }
        debug!(recipients = snapshots.len(), "Snapshots pushed");
    }
}
