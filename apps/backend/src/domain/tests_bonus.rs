use crate::domain::bonus::apply_bonus;
use crate::domain::combat::attack;
use crate::domain::test_state_helpers::{fingerprint, standard_session, ALICE, BOB};
use crate::domain::turns::end_turn;
use crate::errors::domain::DomainError;

#[test]
fn two_ten_percent_bonuses_stack_additively() {
    let mut session = standard_session();

    apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();
    apply_bonus(&mut session, ALICE, "B2", "P1").unwrap();

    let p1 = session.slot_a.character("P1").unwrap();
    assert_eq!(p1.current_stats.active_bonuses.len(), 2);
    assert_eq!(p1.current_stats.attack, 8);

    let outcome = attack(&mut session, ALICE, "P1", "P4").unwrap();
    assert_eq!(outcome.damage, 8);
}

#[test]
fn bonus_leaves_hand_and_pins_the_target() {
    let mut session = standard_session();

    let effect = apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();

    assert_eq!(effect.source_bonus_id, "B1");
    assert_eq!(effect.percent, 10);
    assert_eq!(effect.turns_remaining, 2);
    assert!(session.slot_a.bonus_hand.iter().all(|c| c.id != "B1"));
    assert_eq!(session.turn_scoped_bonus_target.as_deref(), Some("P1"));
}

#[test]
fn second_target_in_one_turn_is_forbidden() {
    let mut session = standard_session();
    apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();
    let before = fingerprint(&session);

    let err = apply_bonus(&mut session, ALICE, "B2", "P2").unwrap_err();

    assert_eq!(err, DomainError::MultipleTargetsForbidden("P1".into()));
    assert_eq!(fingerprint(&session), before);
}

#[test]
fn new_turn_allows_a_new_target() {
    let mut session = standard_session();
    apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();

    end_turn(&mut session, ALICE).unwrap();
    end_turn(&mut session, BOB).unwrap();

    apply_bonus(&mut session, ALICE, "B2", "P2").unwrap();
    assert_eq!(session.turn_scoped_bonus_target.as_deref(), Some("P2"));
}

#[test]
fn cards_outside_own_hand_or_roster_are_not_found() {
    let mut session = standard_session();
    let before = fingerprint(&session);

    let foreign_bonus = apply_bonus(&mut session, ALICE, "B4", "P1").unwrap_err();
    assert!(matches!(foreign_bonus, DomainError::CardNotFound(_)));

    let foreign_target = apply_bonus(&mut session, ALICE, "B1", "P4").unwrap_err();
    assert!(matches!(foreign_target, DomainError::CardNotFound(_)));

    assert_eq!(fingerprint(&session), before);
}

#[test]
fn dead_own_character_cannot_be_buffed() {
    let mut session = standard_session();
    session.slot_a.character_instances[1].current_stats.health = 0;

    let err = apply_bonus(&mut session, ALICE, "B1", "P2").unwrap_err();
    assert!(matches!(err, DomainError::InvalidTarget(_)));
}

#[test]
fn off_turn_bonus_is_rejected() {
    let mut session = standard_session();
    let before = fingerprint(&session);

    let err = apply_bonus(&mut session, BOB, "B4", "P4").unwrap_err();

    assert_eq!(err, DomainError::NotYourTurn);
    assert_eq!(fingerprint(&session), before);
}

#[test]
fn zero_duration_bonus_lasts_only_the_current_turn() {
    let mut session = standard_session();
    apply_bonus(&mut session, ALICE, "B3", "P1").unwrap();
    assert_eq!(session.slot_a.character("P1").unwrap().current_stats.attack, 10);

    let change = end_turn(&mut session, ALICE).unwrap();

    assert_eq!(change.expired.len(), 1);
    let p1 = session.slot_a.character("P1").unwrap();
    assert!(p1.current_stats.active_bonuses.is_empty());
    assert_eq!(p1.current_stats.attack, 7);
}

#[test]
fn effects_tick_once_per_owner_turn() {
    let mut session = standard_session();
    apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();

    end_turn(&mut session, ALICE).unwrap();
    let p1 = session.slot_a.character("P1").unwrap();
    assert_eq!(p1.current_stats.active_bonuses[0].turns_remaining, 1);

    // Bob's end of turn does not age Alice's effects.
    end_turn(&mut session, BOB).unwrap();
    let p1 = session.slot_a.character("P1").unwrap();
    assert_eq!(p1.current_stats.active_bonuses[0].turns_remaining, 1);

    end_turn(&mut session, ALICE).unwrap();
    let p1 = session.slot_a.character("P1").unwrap();
    assert!(p1.current_stats.active_bonuses.is_empty());
}
