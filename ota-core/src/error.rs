//! Error taxonomy for the update task

use thiserror::Error;

use crate::partition::PartitionRole;

/// Partition layout problems that stop the task before any session opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The storage layer reported no partition for this role
    MissingPartition(PartitionRole),
    /// The next-update slot is the partition we are executing from
    UpdateIsRunning,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precondition::MissingPartition(role) => write!(f, "no {} partition", role),
            Precondition::UpdateIsRunning => {
                write!(f, "next-update partition is the running partition")
            }
        }
    }
}

/// Errors reported by a transport session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session begin failed: {0}")]
    BeginFailed(String),

    #[error("session opened without a handle")]
    NoSessionHandle,

    #[error("can't get server version: {0}")]
    DescriptorFetch(String),

    #[error("image validation failed")]
    ValidateFailed,

    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors handled inside the update controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtaError {
    #[error("fatal precondition: {0}")]
    FatalPrecondition(Precondition),

    #[error("begin failed: {0}")]
    BeginFailed(String),

    #[error("no session handle")]
    NoSessionHandle,

    #[error("descriptor fetch failed: {0}")]
    DescriptorFetch(String),

    #[error("no descriptor recorded for partition \"{0}\"")]
    DescriptorUnavailable(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("downloaded image is corrupted")]
    ValidateFailed,

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<SessionError> for OtaError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::BeginFailed(msg) => OtaError::BeginFailed(msg),
            SessionError::NoSessionHandle => OtaError::NoSessionHandle,
            SessionError::DescriptorFetch(msg) => OtaError::DescriptorFetch(msg),
            SessionError::ValidateFailed => OtaError::ValidateFailed,
            SessionError::Transport(msg) => OtaError::Transport(msg),
        }
    }
}

/// Errors building a descriptor from text fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("{field} is {len} bytes, capacity is {capacity}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        capacity: usize,
    },
}

/// Errors validating an update configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("firmware URL is empty")]
    EmptyUrl,

    #[error("firmware URL must start with http:// or https:// ({0})")]
    UnsupportedScheme(String),

    #[error("receive timeout must be greater than zero")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_map_onto_taxonomy() {
        assert_eq!(
            OtaError::from(SessionError::NoSessionHandle),
            OtaError::NoSessionHandle
        );
        assert_eq!(
            OtaError::from(SessionError::ValidateFailed),
            OtaError::ValidateFailed
        );
        assert_eq!(
            OtaError::from(SessionError::Transport("reset by peer".into())),
            OtaError::Transport("reset by peer".into())
        );
    }

    #[test]
    fn precondition_messages_name_the_role() {
        let err = OtaError::FatalPrecondition(Precondition::MissingPartition(
            PartitionRole::NextUpdate,
        ));
        assert_eq!(err.to_string(), "fatal precondition: no next-update partition");
    }
}
