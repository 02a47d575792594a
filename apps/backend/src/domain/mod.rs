//! Domain layer: pure, synchronous duel rules.
//!
//! Nothing here knows about locks, sockets, or HTTP. Every operation takes a
//! `&mut Session`, validates fully before mutating, and returns a typed
//! [`DomainError`](crate::errors::DomainError) on rejection.

pub mod bonus;
pub mod cards;
pub mod combat;
pub mod dealing;
pub mod player_view;
pub mod rules;
pub mod session;
pub mod turns;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_bonus;
#[cfg(test)]
mod tests_player_view;
#[cfg(test)]
mod tests_props_duel;

// Re-exports for ergonomics
pub use bonus::{apply_bonus, tick_bonuses};
pub use cards::{BonusEffect, CardInstance, CurrentStats};
pub use combat::{attack, effective_attack, AttackOutcome};
pub use dealing::{deal_hand, DealtHand};
pub use player_view::{project_all, project_for, OpponentView, OwnView, Snapshot};
pub use rules::{DrawPolicy, FirstTurnPolicy, GameRules, HAND_SIZE};
pub use session::{ConnectionStatus, PlayerSlot, Session, SessionStatus, SlotId};
pub use turns::{end_turn, forfeit, select_character, TurnChange};
