//! JSON catalog loading.
//!
//! The stock files are arrays of card records. Field names follow the card
//! generator's French keys (`nomcarteperso`, `pointsdevie`, ...); the English
//! names are accepted as aliases. Numeric ids are normalized to the `P`/`B`
//! prefixed form.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::definition::{CardCatalog, CardDefinition, CardKind};
use crate::errors::domain::DomainError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn normalize(self, kind: CardKind) -> String {
        let raw = match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        };
        if raw.starts_with(kind.prefix()) {
            raw
        } else {
            format!("{}{raw}", kind.prefix())
        }
    }
}

#[derive(Debug, Deserialize)]
struct CharacterRecord {
    id: RawId,
    #[serde(alias = "nomcarteperso")]
    name: String,
    #[serde(alias = "nomdupouvoir", default)]
    power_name: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "pointsdevie")]
    base_health: u32,
    #[serde(alias = "forceattaque")]
    base_attack: u32,
    #[serde(alias = "tourattaque")]
    base_turns_per_round: u32,
}

#[derive(Debug, Deserialize)]
struct BonusRecord {
    id: RawId,
    #[serde(alias = "nomcartebonus")]
    name: String,
    #[serde(alias = "nomdupouvoir", default)]
    power_name: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "pourcentagebonus")]
    bonus_percent: u32,
    #[serde(alias = "tourbonus")]
    bonus_duration: u32,
}

impl From<CharacterRecord> for CardDefinition {
    fn from(r: CharacterRecord) -> Self {
        CardDefinition {
            id: r.id.normalize(CardKind::Character),
            kind: CardKind::Character,
            base_health: r.base_health,
            base_attack: r.base_attack,
            base_turns_per_round: r.base_turns_per_round,
            bonus_percent: 0,
            bonus_duration: 0,
            name: r.name,
            power_name: r.power_name,
            description: r.description,
        }
    }
}

impl From<BonusRecord> for CardDefinition {
    fn from(r: BonusRecord) -> Self {
        CardDefinition {
            id: r.id.normalize(CardKind::Bonus),
            kind: CardKind::Bonus,
            base_health: 0,
            base_attack: 0,
            base_turns_per_round: 0,
            bonus_percent: r.bonus_percent,
            bonus_duration: r.bonus_duration,
            name: r.name,
            power_name: r.power_name,
            description: r.description,
        }
    }
}

/// Parse both card collections from JSON text.
pub fn catalog_from_json(characters: &str, bonuses: &str) -> Result<CardCatalog, DomainError> {
    let characters: Vec<CharacterRecord> = serde_json::from_str(characters)
        .map_err(|e| DomainError::invalid_catalog(format!("character cards: {e}")))?;
    let bonuses: Vec<BonusRecord> = serde_json::from_str(bonuses)
        .map_err(|e| DomainError::invalid_catalog(format!("bonus cards: {e}")))?;

    CardCatalog::new(
        characters.into_iter().map(Into::into).collect(),
        bonuses.into_iter().map(Into::into).collect(),
    )
}

/// Load the catalog from the two stock files.
///
/// Any failure here is fatal to startup: no session can be served without
/// card data.
pub fn load_catalog(
    characters_path: &Path,
    bonuses_path: &Path,
) -> Result<CardCatalog, DomainError> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|e| {
            DomainError::invalid_catalog(format!("cannot read {}: {e}", path.display()))
        })
    };

    let catalog = catalog_from_json(&read(characters_path)?, &read(bonuses_path)?)?;

    info!(
        characters = catalog.get_all(CardKind::Character).len(),
        bonuses = catalog.get_all(CardKind::Bonus).len(),
        "Card catalog loaded"
    );

    Ok(catalog)
}
