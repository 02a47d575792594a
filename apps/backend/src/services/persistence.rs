//! Best-effort JSON snapshots of session state.
//!
//! When a snapshot directory is configured, every committed mutation writes
//! `<dir>/<session_id>.json`. Writes happen off the request path and their
//! failures are only logged; in-memory state is always authoritative.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Session;

#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    dir: Option<PathBuf>,
    ledger: Arc<WriteLedger>,
}

/// Orders writes that finish on the blocking pool in any order.
///
/// Every save and remove draws a sequence number when it is issued; a file
/// operation only lands if its number beats the last one applied for that
/// session.
#[derive(Debug, Default)]
struct WriteLedger {
    next_seq: AtomicU64,
    applied: Mutex<HashMap<String, u64>>,
}

impl WriteLedger {
    fn next(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A serialized session waiting to be written.
#[derive(Debug)]
pub struct PendingSave {
    seq: u64,
    state: Value,
}

impl SnapshotWriter {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            ledger: Arc::default(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Serialize the full session. Call while holding the session lock so
    /// sequence numbers follow commit order.
    pub fn capture(&self, session: &Session) -> Option<PendingSave> {
        self.dir.as_ref()?;
        match serde_json::to_value(session) {
            Ok(state) => Some(self.stage(state)),
            Err(e) => {
                warn!(session_id = %session.session_id, error = %e, "Failed to serialize session");
                None
            }
        }
    }

    fn stage(&self, state: Value) -> PendingSave {
        PendingSave {
            seq: self.ledger.next(),
            state,
        }
    }

    pub fn save(&self, session_id: &str, pending: PendingSave) {
        let Some(dir) = self.dir.clone() else {
            return;
        };
        let ledger = Arc::clone(&self.ledger);
        let session_id = session_id.to_string();
        run_blocking(move || match write_if_newer(&dir, &ledger, &session_id, &pending) {
            Ok(true) => debug!(session_id = %session_id, seq = pending.seq, "Session snapshot written"),
            Ok(false) => debug!(session_id = %session_id, seq = pending.seq, "Stale session snapshot dropped"),
            Err(e) => warn!(session_id = %session_id, error = %e, "Failed to write session snapshot"),
        });
    }

    /// Delete the snapshot file. Saves issued before this call never
    /// recreate it.
    pub fn remove(&self, session_id: &str) {
        let Some(dir) = self.dir.clone() else {
            return;
        };
        let seq = self.ledger.next();
        let ledger = Arc::clone(&self.ledger);
        let session_id = session_id.to_string();
        run_blocking(move || {
            let mut applied = ledger.applied.lock();
            let last = applied.entry(session_id.clone()).or_default();
            if *last > seq {
                // A newer session reused the code.
                return;
            }
            *last = seq;
            let path = snapshot_path(&dir, &session_id);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove session snapshot"),
            }
        });
    }
}

fn snapshot_path(dir: &Path, session_id: &str) -> PathBuf {
    dir.join(format!("{session_id}.json"))
}

/// Write to a temp file unique to this save, then rename it into place if no
/// newer save or remove has been applied meanwhile.
fn write_if_newer(
    dir: &Path,
    ledger: &WriteLedger,
    session_id: &str,
    pending: &PendingSave,
) -> io::Result<bool> {
    fs::create_dir_all(dir)?;
    let bytes = serde_json::to_vec_pretty(&pending.state)?;
    let tmp = dir.join(format!(".{session_id}.{}.json.tmp", pending.seq));
    fs::write(&tmp, bytes)?;

    let mut applied = ledger.applied.lock();
    let last = applied.entry(session_id.to_string()).or_default();
    if *last >= pending.seq {
        drop(applied);
        fs::remove_file(&tmp)?;
        return Ok(false);
    }
    if let Err(e) = fs::rename(&tmp, snapshot_path(dir, session_id)) {
        drop(applied);
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    *last = pending.seq;
    Ok(true)
}

/// Run file IO on tokio's blocking pool when inside a runtime, inline
/// otherwise.
fn run_blocking<F>(job: F)
where
    F: FnOnce() + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(job);
        }
        Err(_) => job(),
    }
}
