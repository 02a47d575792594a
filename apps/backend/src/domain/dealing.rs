//! Hand dealing from the shared catalog.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use crate::catalog::{CardCatalog, CardDefinition, CardKind};
use crate::errors::domain::DomainError;

/// The cards drawn for one slot, before they become runtime instances.
#[derive(Debug, Clone)]
pub struct DealtHand {
    pub characters: Vec<Arc<CardDefinition>>,
    pub bonuses: Vec<Arc<CardDefinition>>,
}

impl DealtHand {
    /// Every definition id in the hand, both kinds.
    pub fn ids(&self) -> HashSet<String> {
        self.characters
            .iter()
            .chain(self.bonuses.iter())
            .map(|card| card.id.clone())
            .collect()
    }
}

/// Draw `hand_size` characters and `hand_size` bonuses without replacement,
/// skipping every id in `exclude`.
///
/// Character and bonus ids never collide (distinct prefixes), so one
/// exclusion set serves both draws.
pub fn deal_hand<R: Rng + ?Sized>(
    catalog: &CardCatalog,
    hand_size: usize,
    exclude: &HashSet<String>,
    rng: &mut R,
) -> Result<DealtHand, DomainError> {
    let characters = catalog.sample(CardKind::Character, hand_size, exclude, rng)?;
    let bonuses = catalog.sample(CardKind::Bonus, hand_size, exclude, rng)?;
    Ok(DealtHand {
        characters,
        bonuses,
    })
}
