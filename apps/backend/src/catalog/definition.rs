//! Immutable card definitions and the in-memory catalog.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// The two card families dealt to every player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Character,
    Bonus,
}

impl CardKind {
    /// Id prefix carried by every card of this kind.
    pub const fn prefix(self) -> char {
        match self {
            CardKind::Character => 'P',
            CardKind::Bonus => 'B',
        }
    }
}

impl FromStr for CardKind {
    type Err = String;

    /// Accepts the generator's French names alongside the English ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" | "characters" | "perso" => Ok(CardKind::Character),
            "bonus" | "bonuses" => Ok(CardKind::Bonus),
            other => Err(format!(
                "card kind must be 'character' or 'bonus', got '{other}'"
            )),
        }
    }
}

/// A card as printed: loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDefinition {
    pub id: String,
    pub kind: CardKind,
    pub base_health: u32,
    pub base_attack: u32,
    pub base_turns_per_round: u32,
    pub bonus_percent: u32,
    pub bonus_duration: u32,
    pub name: String,
    pub power_name: String,
    pub description: String,
}

impl CardDefinition {
    pub fn character(
        id: impl Into<String>,
        name: impl Into<String>,
        base_health: u32,
        base_attack: u32,
        base_turns_per_round: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CardKind::Character,
            base_health,
            base_attack,
            base_turns_per_round,
            bonus_percent: 0,
            bonus_duration: 0,
            name: name.into(),
            power_name: String::new(),
            description: String::new(),
        }
    }

    pub fn bonus(
        id: impl Into<String>,
        name: impl Into<String>,
        bonus_percent: u32,
        bonus_duration: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CardKind::Bonus,
            base_health: 0,
            base_attack: 0,
            base_turns_per_round: 0,
            bonus_percent,
            bonus_duration,
            name: name.into(),
            power_name: String::new(),
            description: String::new(),
        }
    }
}

/// Read-only card collections shared by every session.
///
/// Built once at startup; lookups and sampling take `&self` so the catalog can
/// sit behind an `Arc` without locking.
#[derive(Debug)]
pub struct CardCatalog {
    characters: Vec<Arc<CardDefinition>>,
    bonuses: Vec<Arc<CardDefinition>>,
    index: HashMap<(CardKind, String), usize>,
}

impl CardCatalog {
    /// Build a catalog, rejecting duplicate ids, wrong prefixes, and cards
    /// filed under the wrong kind.
    pub fn new(
        characters: Vec<CardDefinition>,
        bonuses: Vec<CardDefinition>,
    ) -> Result<Self, DomainError> {
        let mut index = HashMap::new();

        for (kind, cards) in [(CardKind::Character, &characters), (CardKind::Bonus, &bonuses)] {
            for (pos, card) in cards.iter().enumerate() {
                if card.kind != kind {
                    return Err(DomainError::invalid_catalog(format!(
                        "card {} is a {:?} card listed as {:?}",
                        card.id, card.kind, kind
                    )));
                }
                if !card.id.starts_with(kind.prefix()) {
                    return Err(DomainError::invalid_catalog(format!(
                        "card id {} must start with '{}'",
                        card.id,
                        kind.prefix()
                    )));
                }
                if index.insert((kind, card.id.clone()), pos).is_some() {
                    return Err(DomainError::invalid_catalog(format!(
                        "duplicate card id {}",
                        card.id
                    )));
                }
            }
        }

        Ok(Self {
            characters: characters.into_iter().map(Arc::new).collect(),
            bonuses: bonuses.into_iter().map(Arc::new).collect(),
            index,
        })
    }

    pub fn get_all(&self, kind: CardKind) -> &[Arc<CardDefinition>] {
        match kind {
            CardKind::Character => &self.characters,
            CardKind::Bonus => &self.bonuses,
        }
    }

    pub fn get_by_id(&self, kind: CardKind, id: &str) -> Option<&Arc<CardDefinition>> {
        self.index
            .get(&(kind, id.to_string()))
            .map(|&pos| &self.get_all(kind)[pos])
    }

    /// Draw `count` distinct cards of `kind`, skipping every id in `exclude`.
    ///
    /// Fails with `InsufficientCards` rather than returning a short hand.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        kind: CardKind,
        count: usize,
        exclude: &HashSet<String>,
        rng: &mut R,
    ) -> Result<Vec<Arc<CardDefinition>>, DomainError> {
        let candidates: Vec<&Arc<CardDefinition>> = self
            .get_all(kind)
            .iter()
            .filter(|card| !exclude.contains(&card.id))
            .collect();

        if candidates.len() < count {
            return Err(DomainError::InsufficientCards(format!(
                "need {count} {kind:?} cards, only {} available",
                candidates.len()
            )));
        }

        Ok(candidates
            .choose_multiple(rng, count)
            .map(|card| Arc::clone(card))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
