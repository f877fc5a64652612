//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! The action router and the event emitter never surface these: they report
//! outcomes as plain booleans. Errors appear at construction time and at the
//! transport boundary.

/// Top-level error for cloudlink.
#[derive(Debug, thiserror::Error)]
pub enum CloudLinkError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The event sink is no longer accepting messages.
    #[error("event sink closed")]
    SinkClosed,

    /// The outbound transport failed to accept a message.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A device id was empty.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// A device with the same id is already registered.
    #[error("device {0} is already registered")]
    DuplicateDevice(String),
}
