use crate::domain::bonus::apply_bonus;
use crate::domain::player_view::{project_all, project_for};
use crate::domain::session::{SessionStatus, SlotId};
use crate::domain::test_state_helpers::{standard_session, waiting_session, ALICE, BOB};
use crate::errors::domain::DomainError;

#[test]
fn own_view_is_complete() {
    let session = standard_session();
    let snap = project_for(&session, ALICE).unwrap();

    assert_eq!(snap.your_slot, SlotId::A);
    assert!(snap.is_your_turn);
    assert_eq!(snap.status, SessionStatus::Playing);
    assert_eq!(snap.you.characters.len(), 3);
    assert_eq!(snap.you.bonus_hand.len(), 3);
    assert_eq!(snap.you.characters[0].attack, 7);
    assert_eq!(snap.you.characters[0].turns_remaining, 2);
}

#[test]
fn opponent_bonus_identities_never_leak() {
    let session = standard_session();
    let snap = project_for(&session, ALICE).unwrap();
    let opponent = snap.opponent.as_ref().unwrap();

    assert_eq!(opponent.bonus_hand_count, 1);

    let json = serde_json::to_string(&snap).unwrap();
    assert!(!json.contains("B4"));

    let value = serde_json::to_value(opponent).unwrap();
    let character = value["characters"][0].as_object().unwrap();
    let mut keys: Vec<&str> = character.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["alive", "health", "id", "name"]);
}

#[test]
fn views_are_asymmetric() {
    let session = standard_session();
    let alice = project_for(&session, ALICE).unwrap();
    let bob = project_for(&session, BOB).unwrap();

    assert!(alice.is_your_turn);
    assert!(!bob.is_your_turn);
    assert_eq!(bob.your_slot, SlotId::B);
    assert_eq!(bob.opponent.as_ref().unwrap().bonus_hand_count, 3);
    assert_eq!(bob.you.bonus_hand[0].id, "B4");
}

#[test]
fn bonus_target_is_shown_only_to_the_turn_owner() {
    let mut session = standard_session();
    apply_bonus(&mut session, ALICE, "B1", "P1").unwrap();

    let alice = project_for(&session, ALICE).unwrap();
    let bob = project_for(&session, BOB).unwrap();

    assert_eq!(alice.bonus_target_this_turn.as_deref(), Some("P1"));
    assert_eq!(bob.bonus_target_this_turn, None);
}

#[test]
fn waiting_session_has_no_opponent() {
    let session = waiting_session(&[("P1", 10, 1, 1)], &[]);
    let snap = project_for(&session, ALICE).unwrap();

    assert!(snap.opponent.is_none());
    assert!(!snap.is_your_turn);

    let json = serde_json::to_value(&snap).unwrap();
    assert!(json["opponent"].is_null());
}

#[test]
fn outsiders_cannot_project() {
    let session = standard_session();
    assert!(matches!(
        project_for(&session, "mallory"),
        Err(DomainError::NotAMember(_))
    ));
}

#[test]
fn project_all_covers_every_holder() {
    let session = standard_session();
    let all = project_all(&session);

    let ids: Vec<&str> = all.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec![ALICE, BOB]);
    assert_eq!(all[0].1.your_slot, SlotId::A);
    assert_eq!(all[1].1.your_slot, SlotId::B);
}
