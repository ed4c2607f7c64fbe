//! Error taxonomy
//!
//! Mirrors the propagation policy of the core: most pipeline phases append
//! their own messages to the result stream rather than unwinding on soft
//! failures (see `combat::events::ActionResult`). Only [`CoreError::ContractViolation`]
//! is meant to ever escape a call boundary — the other variants exist so
//! callers that *do* want to inspect a failure mode can match on one, but the
//! core itself never returns them from the happy-path pipeline entry points.

use thiserror::Error;

/// The five error kinds the core distinguishes.
///
/// - [`ContractViolation`](CoreError::ContractViolation) is the only kind that
///   escapes a pipeline call; it indicates a caller bug (missing required
///   component on a target that the operation assumes has one).
/// - [`InvalidInput`](CoreError::InvalidInput) is handled locally: the caller
///   gets a single user-visible warning message and the turn is not consumed.
/// - [`DeniedAction`](CoreError::DeniedAction) is action-legal but blocked by
///   a game rule; whether the turn is consumed depends on the rule.
/// - [`ExternalUnavailable`](CoreError::ExternalUnavailable) marks an optional
///   collaborator (metrics, knowledge system) being absent; always fails
///   closed and never propagates past the accessor that detected it.
/// - [`Fatal`](CoreError::Fatal) marks data-model corruption; the core
///   substitutes a safe default and continues, logging the occurrence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("denied: {0}")]
    DeniedAction(String),

    #[error("external collaborator unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("fatal data corruption: {0}")]
    Fatal(String),
}

impl CoreError {
    pub fn contract(msg: impl Into<String>) -> Self {
        CoreError::ContractViolation(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidInput(msg.into())
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        CoreError::DeniedAction(msg.into())
    }
}

/// Result alias used at the few boundaries that can raise a [`CoreError::ContractViolation`].
pub type CoreResult<T> = Result<T, CoreError>;
