//! Property tests over random action sequences (pure domain).
//!
//! Properties tested:
//! - A rejected action leaves the session byte-for-byte unchanged
//! - Health never increases and bonus hands never grow
//! - While Playing, only the turn owner has attacks available
//! - Finished is absorbing
//! - Snapshots never reveal the opponent's bonus card ids

use proptest::prelude::*;

use crate::domain::bonus::apply_bonus;
use crate::domain::combat::attack;
use crate::domain::player_view::project_for;
use crate::domain::session::{Session, SessionStatus, SlotId};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{fingerprint, standard_session, ALICE, BOB};
use crate::domain::turns::{end_turn, forfeit, select_character};

const CHARACTER_IDS: [&str; 6] = ["P1", "P2", "P3", "P4", "P5", "P99"];
const BONUS_IDS: [&str; 5] = ["B1", "B2", "B3", "B4", "B99"];

#[derive(Debug, Clone)]
enum Action {
    Attack { bob: bool, attacker: usize, target: usize },
    Bonus { bob: bool, bonus: usize, target: usize },
    EndTurn { bob: bool },
    Select { bob: bool, character: usize },
    Forfeit { bob: bool },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (any::<bool>(), 0..CHARACTER_IDS.len(), 0..CHARACTER_IDS.len())
            .prop_map(|(bob, attacker, target)| Action::Attack { bob, attacker, target }),
        3 => (any::<bool>(), 0..BONUS_IDS.len(), 0..CHARACTER_IDS.len())
            .prop_map(|(bob, bonus, target)| Action::Bonus { bob, bonus, target }),
        3 => any::<bool>().prop_map(|bob| Action::EndTurn { bob }),
        1 => (any::<bool>(), 0..CHARACTER_IDS.len())
            .prop_map(|(bob, character)| Action::Select { bob, character }),
        1 => any::<bool>().prop_map(|bob| Action::Forfeit { bob }),
    ]
}

fn run(session: &mut Session, action: &Action) -> bool {
    let who = |bob: bool| if bob { BOB } else { ALICE };
    match *action {
        Action::Attack { bob, attacker, target } => {
            attack(session, who(bob), CHARACTER_IDS[attacker], CHARACTER_IDS[target]).is_ok()
        }
        Action::Bonus { bob, bonus, target } => {
            apply_bonus(session, who(bob), BONUS_IDS[bonus], CHARACTER_IDS[target]).is_ok()
        }
        Action::EndTurn { bob } => end_turn(session, who(bob)).is_ok(),
        Action::Select { bob, character } => {
            select_character(session, who(bob), CHARACTER_IDS[character]).is_ok()
        }
        Action::Forfeit { bob } => forfeit(session, who(bob)).is_ok(),
    }
}

fn healths(session: &Session) -> Vec<i32> {
    std::iter::once(&session.slot_a)
        .chain(session.slot_b.as_ref())
        .flat_map(|slot| slot.character_instances.iter())
        .map(|c| c.current_stats.health)
        .collect()
}

fn bonus_counts(session: &Session) -> (usize, usize) {
    (
        session.slot_a.bonus_hand.len(),
        session.slot_b.as_ref().map_or(0, |b| b.bonus_hand.len()),
    )
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_random_play_keeps_invariants(actions in prop::collection::vec(action(), 1..60)) {
        let mut session = standard_session();

        for action in &actions {
            let before = fingerprint(&session);
            let health_before = healths(&session);
            let bonus_before = bonus_counts(&session);
            let was_finished = session.status == SessionStatus::Finished;

            let accepted = run(&mut session, action);

            if !accepted {
                prop_assert_eq!(&fingerprint(&session), &before);
            }
            if was_finished {
                prop_assert!(!accepted);
            }

            for (after, prior) in healths(&session).iter().zip(&health_before) {
                prop_assert!(after <= prior);
            }
            let bonus_after = bonus_counts(&session);
            prop_assert!(bonus_after.0 <= bonus_before.0 && bonus_after.1 <= bonus_before.1);

            if session.status == SessionStatus::Playing {
                let idle = session.slot(session.turn_owner.other()).unwrap();
                prop_assert!(idle
                    .character_instances
                    .iter()
                    .all(|c| c.current_stats.turns_remaining == 0));
            }
        }
    }

    #[test]
    fn prop_snapshots_hide_opponent_bonus_ids(actions in prop::collection::vec(action(), 0..30)) {
        let mut session = standard_session();
        for action in &actions {
            run(&mut session, action);
        }

        for (viewer, opponent) in [(ALICE, SlotId::B), (BOB, SlotId::A)] {
            let snap = project_for(&session, viewer).unwrap();
            let json = serde_json::to_string(&snap).unwrap();
            for card in &session.slot(opponent).unwrap().bonus_hand {
                let needle = format!("\"{}\"", card.id);
                prop_assert!(!json.contains(&needle), "leaked {}", needle);
            }
        }
    }
}
