//! The duel session state machine: two slots, a turn pointer, and status.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::catalog::CardDefinition;
use crate::domain::cards::CardInstance;
use crate::domain::dealing::DealtHand;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    pub const fn other(self) -> SlotId {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// Host seated, waiting for a guest.
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// One of the two player positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSlot {
    pub player_id: String,
    pub display_name: String,
    /// Fixed roster of dealt characters; never grows or shrinks.
    pub character_instances: Vec<CardInstance>,
    /// Unplayed bonus cards; shrinks as bonuses are applied.
    pub bonus_hand: Vec<Arc<CardDefinition>>,
    pub active_character_id: Option<String>,
    pub connection_status: ConnectionStatus,
    /// Every definition id dealt to this slot, used for exclusive draws.
    pub dealt_ids: BTreeSet<String>,
}

impl PlayerSlot {
    pub fn new(player_id: impl Into<String>, display_name: impl Into<String>, hand: DealtHand) -> Self {
        let dealt_ids = hand.ids().into_iter().collect();
        let character_instances: Vec<CardInstance> =
            hand.characters.into_iter().map(CardInstance::deal).collect();
        let active_character_id = character_instances.first().map(|c| c.id().to_string());
        Self {
            player_id: player_id.into(),
            display_name: display_name.into(),
            character_instances,
            bonus_hand: hand.bonuses,
            active_character_id,
            connection_status: ConnectionStatus::default(),
            dealt_ids,
        }
    }

    pub fn character_position(&self, id: &str) -> Option<usize> {
        self.character_instances.iter().position(|c| c.id() == id)
    }

    pub fn character(&self, id: &str) -> Option<&CardInstance> {
        self.character_instances.iter().find(|c| c.id() == id)
    }

    pub fn living_count(&self) -> usize {
        self.character_instances.iter().filter(|c| c.is_alive()).count()
    }

    /// Reset every living character to its base turns-per-round.
    pub fn refresh_turns(&mut self) {
        for card in &mut self.character_instances {
            card.refresh_turns();
        }
    }

    pub fn exhaust_turns(&mut self) {
        for card in &mut self.character_instances {
            card.current_stats.turns_remaining = 0;
        }
    }
}

/// Authoritative state of one duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub session_id: String,
    pub status: SessionStatus,
    pub slot_a: PlayerSlot,
    pub slot_b: Option<PlayerSlot>,
    pub turn_owner: SlotId,
    /// Starts at 1, incremented on every end of turn.
    pub round_number: u32,
    pub winner: Option<SlotId>,
    /// The one own character the turn owner has buffed this turn.
    pub turn_scoped_bonus_target: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_activity: OffsetDateTime,
}

impl Session {
    /// A Waiting session with only the host seated.
    pub fn new(session_id: impl Into<String>, host: PlayerSlot, now: OffsetDateTime) -> Self {
        Self {
            session_id: session_id.into(),
            status: SessionStatus::Waiting,
            slot_a: host,
            slot_b: None,
            turn_owner: SlotId::A,
            round_number: 1,
            winner: None,
            turn_scoped_bonus_target: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn slot(&self, id: SlotId) -> Option<&PlayerSlot> {
        match id {
            SlotId::A => Some(&self.slot_a),
            SlotId::B => self.slot_b.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut PlayerSlot> {
        match id {
            SlotId::A => Some(&mut self.slot_a),
            SlotId::B => self.slot_b.as_mut(),
        }
    }

    /// Both slots at once, acting side first. `None` until the guest joins.
    pub fn slots_mut(&mut self, acting: SlotId) -> Option<(&mut PlayerSlot, &mut PlayerSlot)> {
        let a = &mut self.slot_a;
        let b = self.slot_b.as_mut()?;
        Some(match acting {
            SlotId::A => (a, b),
            SlotId::B => (b, a),
        })
    }

    pub fn slot_of(&self, player_id: &str) -> Option<SlotId> {
        if self.slot_a.player_id == player_id {
            Some(SlotId::A)
        } else if self
            .slot_b
            .as_ref()
            .is_some_and(|b| b.player_id == player_id)
        {
            Some(SlotId::B)
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.slot_b.is_some()
    }

    /// Player ids of every current slot holder.
    pub fn holders(&self) -> Vec<String> {
        std::iter::once(&self.slot_a)
            .chain(self.slot_b.as_ref())
            .map(|slot| slot.player_id.clone())
            .collect()
    }

    /// Membership check shared by every player-scoped operation.
    pub fn member_slot(&self, player_id: &str) -> Result<SlotId, DomainError> {
        self.slot_of(player_id)
            .ok_or_else(|| DomainError::NotAMember(player_id.to_string()))
    }

    pub fn ensure_playing(&self) -> Result<(), DomainError> {
        match self.status {
            SessionStatus::Playing => Ok(()),
            other => Err(DomainError::GameNotInProgress(format!(
                "session {} is {other:?}",
                self.session_id
            ))),
        }
    }

    /// Gate for turn-bound actions: member, then Playing, then turn owner.
    pub fn require_turn(&self, player_id: &str) -> Result<SlotId, DomainError> {
        let slot = self.member_slot(player_id)?;
        self.ensure_playing()?;
        if slot != self.turn_owner {
            return Err(DomainError::NotYourTurn);
        }
        Ok(slot)
    }

    /// Seat the guest and start play.
    ///
    /// `first` owns the opening turn; its living characters receive their
    /// base turns and the other side starts exhausted.
    pub fn seat_guest(&mut self, guest: PlayerSlot, first: SlotId) -> Result<(), DomainError> {
        if self.is_full() {
            return Err(DomainError::AlreadyFull(self.session_id.clone()));
        }
        if self.status != SessionStatus::Waiting {
            return Err(DomainError::GameNotInProgress(format!(
                "session {} is {:?}",
                self.session_id, self.status
            )));
        }

        self.slot_b = Some(guest);
        self.status = SessionStatus::Playing;
        self.turn_owner = first;
        self.turn_scoped_bonus_target = None;

        if let Some((opening, waiting)) = self.slots_mut(first) {
            opening.refresh_turns();
            waiting.exhaust_turns();
        }
        Ok(())
    }

    /// Finish the game if a side has no living characters.
    ///
    /// Both sides empty at once is a draw. Returns `true` only on the call
    /// that performs the transition; repeated calls are no-ops.
    pub fn check_termination(&mut self) -> bool {
        if self.status != SessionStatus::Playing {
            return false;
        }
        let Some(b) = self.slot_b.as_ref() else {
            return false;
        };
        let winner = match (self.slot_a.living_count(), b.living_count()) {
            (0, 0) => None,
            (0, _) => Some(SlotId::B),
            (_, 0) => Some(SlotId::A),
            _ => return false,
        };
        self.finish(winner);
        true
    }

    pub fn finish(&mut self, winner: Option<SlotId>) {
        self.status = SessionStatus::Finished;
        self.winner = winner;
        self.turn_scoped_bonus_target = None;
    }

    pub fn touch(&mut self, now: OffsetDateTime) {
        self.last_activity = now;
    }
}
