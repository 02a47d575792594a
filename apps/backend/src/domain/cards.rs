//! Runtime card instances and the bonus ledger attached to them.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::CardDefinition;

/// An active, time-limited attack modifier on one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusEffect {
    pub source_bonus_id: String,
    pub percent: u32,
    pub turns_remaining: u32,
    pub name: String,
}

impl BonusEffect {
    pub fn from_card(card: &CardDefinition) -> Self {
        Self {
            source_bonus_id: card.id.clone(),
            percent: card.bonus_percent,
            turns_remaining: card.bonus_duration,
            name: card.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentStats {
    /// Signed so overkill stays visible.
    pub health: i32,
    pub attack: u32,
    pub turns_remaining: u32,
    pub active_bonuses: Vec<BonusEffect>,
}

/// A dealt copy of a character definition. Owned by exactly one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardInstance {
    pub definition: Arc<CardDefinition>,
    pub current_stats: CurrentStats,
}

impl CardInstance {
    /// Fresh instance at full health with no attacks available yet.
    pub fn deal(definition: Arc<CardDefinition>) -> Self {
        let current_stats = CurrentStats {
            health: i32::try_from(definition.base_health).unwrap_or(i32::MAX),
            attack: definition.base_attack,
            turns_remaining: 0,
            active_bonuses: Vec::new(),
        };
        Self {
            definition,
            current_stats,
        }
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn is_alive(&self) -> bool {
        self.current_stats.health > 0
    }

    pub fn can_attack(&self) -> bool {
        self.is_alive() && self.current_stats.turns_remaining > 0
    }

    /// Base attack scaled by the sum of every active bonus percent.
    ///
    /// Bonuses stack additively: two +10% effects on a base of 7 give
    /// `7 * 120 / 100 = 8`.
    pub fn effective_attack(&self) -> u32 {
        effective_attack(
            self.definition.base_attack,
            &self.current_stats.active_bonuses,
        )
    }

    /// Re-derive `current_stats.attack` from the ledger.
    pub fn recalculate_attack(&mut self) {
        self.current_stats.attack = self.effective_attack();
    }

    pub fn refresh_turns(&mut self) {
        self.current_stats.turns_remaining = if self.is_alive() {
            self.definition.base_turns_per_round
        } else {
            0
        };
    }

    pub fn apply_damage(&mut self, damage: u32) {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.current_stats.health = self.current_stats.health.saturating_sub(damage);
    }
}

pub fn effective_attack(base_attack: u32, bonuses: &[BonusEffect]) -> u32 {
    let percent = bonuses
        .iter()
        .fold(0u128, |acc, b| acc.saturating_add(u128::from(b.percent)));
    let scaled = u128::from(base_attack).saturating_mul(100 + percent) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
