use std::io;

use thiserror::Error;

use crate::hint::ProfileId;

/// Failures inside a hint handler. These never reach the host; they are
/// logged and collapsed into a `HintStatus`.
#[derive(Debug, Error)]
pub enum HintError {
    #[error("no resources configured for profile {0}")]
    ConfigurationMissing(ProfileId),
    #[error("perf lock acquire failed for profile {profile} (handle {handle})")]
    AcquireFailed { profile: ProfileId, handle: i32 },
    #[error("invalid hint data: {0}")]
    InvalidInput(String),
    #[error("can't obtain scaling governor: {0}")]
    GovernorUnavailable(#[source] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("malformed metadata field `{0}`")]
    MalformedField(String),
    #[error("bad value `{value}` for metadata key `{key}`")]
    BadValue { key: String, value: String },
}

impl From<MetadataError> for HintError {
    fn from(e: MetadataError) -> Self {
        HintError::InvalidInput(e.to_string())
    }
}
