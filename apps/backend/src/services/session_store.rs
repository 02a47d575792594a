//! In-memory session store.
//!
//! Sessions live in a `DashMap` keyed by session code. Each value is an
//! `Arc<Mutex<Session>>`: lookups hold the map shard lock only long enough
//! to clone the `Arc`, and the per-session mutex serializes every mutation
//! of that session. Conditional removal takes the shard lock first, then the
//! session lock.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::catalog::CardCatalog;
use crate::domain::rules::{DrawPolicy, FirstTurnPolicy, GameRules};
use crate::domain::{deal_hand, PlayerSlot, Session, SessionStatus, SlotId};
use crate::errors::domain::DomainError;
use crate::utils::join_code::generate_join_code;

pub type SharedSession = Arc<Mutex<Session>>;

const MAX_CODE_ATTEMPTS: usize = 32;

/// How long sessions may sit idle in each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdlePolicy {
    pub waiting: Duration,
    pub playing: Duration,
    pub finished: Duration,
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self {
            waiting: Duration::seconds(900),
            playing: Duration::seconds(1800),
            finished: Duration::seconds(300),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictionReport {
    /// Sessions dropped from the store.
    pub removed: Vec<String>,
    /// Playing sessions finished because the turn owner went idle.
    pub forfeited: Vec<String>,
}

impl EvictionReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.forfeited.is_empty()
    }
}

/// Result of seating a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Seated,
    /// The player already held a slot; nothing changed.
    AlreadySeated,
}

pub struct SessionStore {
    sessions: DashMap<String, SharedSession>,
    catalog: Arc<CardCatalog>,
    rules: GameRules,
    rng: Mutex<ChaCha8Rng>,
}

impl SessionStore {
    pub fn new(catalog: Arc<CardCatalog>, rules: GameRules) -> Self {
        Self::with_rng(catalog, rules, ChaCha8Rng::from_os_rng())
    }

    /// Deterministic dealing and codes, for tests.
    pub fn with_seed(catalog: Arc<CardCatalog>, rules: GameRules, seed: u64) -> Self {
        Self::with_rng(catalog, rules, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Arc<CardCatalog>, rules: GameRules, rng: ChaCha8Rng) -> Self {
        Self {
            sessions: DashMap::new(),
            catalog,
            rules,
            rng: Mutex::new(rng),
        }
    }

    pub fn rules(&self) -> GameRules {
        self.rules
    }

    /// Deal the host a hand and register a Waiting session under a fresh
    /// code.
    pub fn create(
        &self,
        host_player_id: &str,
        host_name: &str,
        now: OffsetDateTime,
    ) -> Result<SharedSession, DomainError> {
        let mut rng = self.rng.lock();
        let hand = deal_hand(&self.catalog, self.rules.hand_size, &HashSet::new(), &mut *rng)?;

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = generate_join_code(&mut *rng);
            match self.sessions.entry(code.clone()) {
                Entry::Occupied(_) => {
                    debug!(attempt, code = %code, "Session code collision, retrying");
                }
                Entry::Vacant(slot) => {
                    let host = PlayerSlot::new(host_player_id, host_name, hand);
                    let shared = Arc::new(Mutex::new(Session::new(code, host, now)));
                    slot.insert(Arc::clone(&shared));
                    return Ok(shared);
                }
            }
        }

        warn!(attempts = MAX_CODE_ATTEMPTS, "Exhausted session code attempts");
        Err(DomainError::Infra(
            "could not allocate a unique session code".to_string(),
        ))
    }

    /// Seat `player_id` in slot B of a locked session and start play.
    ///
    /// A player who already holds a slot gets `AlreadySeated` and no new hand.
    pub fn join(
        &self,
        session: &mut Session,
        player_id: &str,
        name: &str,
    ) -> Result<JoinOutcome, DomainError> {
        if session.slot_of(player_id).is_some() {
            return Ok(JoinOutcome::AlreadySeated);
        }
        if session.is_full() {
            return Err(DomainError::AlreadyFull(session.session_id.clone()));
        }

        let exclude: HashSet<String> = match self.rules.draw {
            DrawPolicy::Exclusive => session.slot_a.dealt_ids.iter().cloned().collect(),
            DrawPolicy::Independent => HashSet::new(),
        };

        let mut rng = self.rng.lock();
        let hand = deal_hand(&self.catalog, self.rules.hand_size, &exclude, &mut *rng)?;
        let first = match self.rules.first_turn {
            FirstTurnPolicy::SlotA => SlotId::A,
            FirstTurnPolicy::Random if rng.random_bool(0.5) => SlotId::B,
            FirstTurnPolicy::Random => SlotId::A,
        };
        drop(rng);

        session.seat_guest(PlayerSlot::new(player_id, name, hand), first)?;
        Ok(JoinOutcome::Seated)
    }

    pub fn get(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Remove a session only if `keep_or_drop` approves it under the session
    /// lock.
    ///
    /// The map entry stays write-locked while the predicate runs, so no other
    /// caller can reach the session between the check and the removal. Lock
    /// order is map shard, then session; never call into the store while
    /// holding a session lock.
    pub fn remove_if<F>(&self, session_id: &str, approve: F) -> bool
    where
        F: FnOnce(&mut Session) -> bool,
    {
        self.sessions
            .remove_if(session_id, |_, shared| {
                let mut session = shared.lock();
                approve(&mut *session)
            })
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Drop stale Waiting and Finished sessions; forfeit stalled games.
    ///
    /// A stalled Playing session is lost by the side whose turn it is.
    pub fn evict_idle(&self, now: OffsetDateTime, policy: IdlePolicy) -> EvictionReport {
        let entries: Vec<(String, SharedSession)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut report = EvictionReport::default();
        let mut candidates = Vec::new();
        for (id, shared) in entries {
            let mut session = shared.lock();
            if is_expired(&session, now, policy) {
                candidates.push(id);
            } else if session.status == SessionStatus::Playing
                && now - session.last_activity >= policy.playing
            {
                let winner = session.turn_owner.other();
                session.finish(Some(winner));
                session.touch(now);
                report.forfeited.push(id);
            }
        }

        report.removed = self.remove_expired(candidates, now, policy);
        if !report.is_empty() {
            info!(
                removed = report.removed.len(),
                forfeited = report.forfeited.len(),
                remaining = self.sessions.len(),
                "Idle sessions evicted"
            );
        }
        report
    }

    /// Second eviction phase: re-check each candidate before dropping it, so
    /// a join or action that landed after the scan keeps its session.
    fn remove_expired(
        &self,
        candidates: Vec<String>,
        now: OffsetDateTime,
        policy: IdlePolicy,
    ) -> Vec<String> {
        candidates
            .into_iter()
            .filter(|id| self.remove_if(id, |session| is_expired(session, now, policy)))
            .collect()
    }
}

/// Waiting and Finished sessions past their idle limit are dropped outright.
fn is_expired(session: &Session, now: OffsetDateTime, policy: IdlePolicy) -> bool {
    let idle = now - session.last_activity;
    match session.status {
        SessionStatus::Waiting => idle >= policy.waiting,
        SessionStatus::Finished => idle >= policy.finished,
        SessionStatus::Playing => false,
    }
}
