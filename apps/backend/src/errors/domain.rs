//! Domain-level error type used across the duel engine and services.
//!
//! This error type is HTTP- and transport-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//! The websocket adapter maps it to `ServerMsg::Error` instead.

use thiserror::Error;

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Card,
}

/// Central domain error type.
///
/// Every variant is recoverable: it rejects one requested action and leaves
/// the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("not found {kind:?}: {detail}")]
    NotFound { kind: NotFoundKind, detail: String },
    #[error("not your turn")]
    NotYourTurn,
    #[error("invalid attacker: {0}")]
    InvalidAttacker(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("card not found: {0}")]
    CardNotFound(String),
    #[error("session {0} already has two players")]
    AlreadyFull(String),
    #[error("bonuses this turn may only target {0}")]
    MultipleTargetsForbidden(String),
    #[error("insufficient cards: {0}")]
    InsufficientCards(String),
    #[error("game is not in progress: {0}")]
    GameNotInProgress(String),
    #[error("player {0} is not a member of this session")]
    NotAMember(String),
    #[error("invalid card catalog: {0}")]
    InvalidCatalog(String),
    #[error("infra: {0}")]
    Infra(String),
}

impl DomainError {
    pub fn session_not_found(session_id: &str) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Session,
            detail: format!("session {session_id} not found"),
        }
    }

    pub fn card_not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            kind: NotFoundKind::Card,
            detail: detail.into(),
        }
    }

    pub fn invalid_catalog(detail: impl Into<String>) -> Self {
        Self::InvalidCatalog(detail.into())
    }
}
