// Unit tests for error mapping - pure domain errors without HTTP plumbing
use crate::errors::domain::DomainError;
use crate::{AppError, ErrorCode};

#[test]
fn maps_turn_violations_to_409() {
    let app: AppError = DomainError::NotYourTurn.into();
    assert_eq!(app.code(), ErrorCode::NotYourTurn);
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::AlreadyFull("ABC123".into()).into();
    assert_eq!(app.code().as_str(), "ALREADY_FULL");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::GameNotInProgress("waiting".into()).into();
    assert_eq!(app.code(), ErrorCode::GameNotInProgress);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_rule_preconditions_to_422() {
    for (err, code) in [
        (
            DomainError::InvalidAttacker("P1".into()),
            ErrorCode::InvalidAttacker,
        ),
        (DomainError::InvalidTarget("P2".into()), ErrorCode::InvalidTarget),
        (DomainError::CardNotFound("B1".into()), ErrorCode::CardNotFound),
        (
            DomainError::MultipleTargetsForbidden("P3".into()),
            ErrorCode::MultipleTargetsForbidden,
        ),
    ] {
        let app: AppError = err.into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 422);
    }
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::session_not_found("ZZZZZZ").into();
    assert_eq!(app.code(), ErrorCode::SessionNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::NotAMember("mallory".into()).into();
    assert_eq!(app.code(), ErrorCode::NotAMember);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::card_not_found("P99").into();
    assert_eq!(app.code(), ErrorCode::NotFound);
}

#[test]
fn maps_capacity_and_infra() {
    let app: AppError = DomainError::InsufficientCards("need 5".into()).into();
    assert_eq!(app.code(), ErrorCode::InsufficientCards);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::Infra("code space exhausted".into()).into();
    assert_eq!(app.code(), ErrorCode::InternalError);
    assert_eq!(app.status().as_u16(), 500);
}
