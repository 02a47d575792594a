//! Error codes for the duel backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and websocket error frames.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the duel backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Game rules
    /// Acting player does not hold the turn
    NotYourTurn,
    /// Attacker missing, dead, or out of attacks this turn
    InvalidAttacker,
    /// Target missing or already dead
    InvalidTarget,
    /// Bonus card or own character not found
    CardNotFound,
    /// A different character already received a bonus this turn
    MultipleTargetsForbidden,
    /// Session is waiting for a second player or already finished
    GameNotInProgress,

    // Resource Not Found
    /// Session not found
    SessionNotFound,
    /// Player is not seated in the session
    NotAMember,
    /// General not found error
    NotFound,

    // Conflicts
    /// Both slots are taken
    AlreadyFull,

    // Request Validation
    /// General bad request error
    BadRequest,
    /// General validation error
    ValidationError,

    // Capacity and infrastructure
    /// Card catalog cannot satisfy a deal
    InsufficientCards,
    /// Card catalog failed validation
    InvalidCatalog,
    /// Configuration error
    ConfigError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InvalidAttacker => "INVALID_ATTACKER",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::MultipleTargetsForbidden => "MULTIPLE_TARGETS_FORBIDDEN",
            Self::GameNotInProgress => "GAME_NOT_IN_PROGRESS",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyFull => "ALREADY_FULL",
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InsufficientCards => "INSUFFICIENT_CARDS",
            Self::InvalidCatalog => "INVALID_CATALOG",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
