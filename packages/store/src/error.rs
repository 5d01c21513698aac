//! Error types for the gateway and the users view.

use thiserror::Error;

/// Failure reported by a [`crate::RemoteStore`] call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote store answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("record has no identifier")]
    MissingId,
}

/// Failure of a users-view operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersError {
    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("user is not stored yet and cannot be changed remotely")]
    NotPersisted,

    #[error("row {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("row {index} is already being edited")]
    EditInProgress { index: usize },

    #[error("a previous submit has not finished yet")]
    SubmitInProgress,

    #[error(transparent)]
    Remote(#[from] StoreError),
}
