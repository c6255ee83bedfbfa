//! Contracts for the collaborators the arbiter drives.
//!
//! None of these are implemented here. The supervisor crate ships stock
//! governor/metadata/profile implementations; the perf-lock backend always
//! comes from the host.

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;
use crate::hint::ProfileId;

/// Opaque perf-lock handle. Anything `<= 0` means "no lock".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockHandle(pub i32);

impl LockHandle {
    pub const UNSET: LockHandle = LockHandle(-1);

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl Default for LockHandle {
    fn default() -> Self {
        LockHandle::UNSET
    }
}

/// One `(resource, value)` pair of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceValue {
    pub resource: u32,
    pub value: u32,
}

impl ResourceValue {
    pub const fn new(resource: u32, value: u32) -> Self {
        Self { resource, value }
    }
}

/// Resolves a profile id to its ordered resource list.
pub trait ProfileLookup {
    /// `None` when no resources are configured for `id`.
    fn lookup(&self, id: ProfileId) -> Option<Vec<ResourceValue>>;
}

/// The performance-lock subsystem.
pub trait PerfLock {
    /// Request `resources` for `duration_ms` (0 = until released). `existing`
    /// is the handle previously stored for the same slot; the returned handle
    /// supersedes it.
    fn acquire(&mut self, existing: LockHandle, duration_ms: u32, resources: &[ResourceValue]) -> LockHandle;

    /// Must tolerate unset or already-expired handles.
    fn release(&mut self, handle: LockHandle);

    /// Fire-and-forget profile application, not tracked by a handle.
    fn perform(&mut self, id: ProfileId, resources: &[ResourceValue]);

    /// Revert a previous `perform` for `id`.
    fn undo(&mut self, id: ProfileId);
}

/// Reports the active CPU frequency governor.
pub trait GovernorProbe {
    fn current_governor(&self) -> io::Result<String>;
}

/// Decoded video-encode metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeMetadata {
    /// 1 = encoder starting, 0 = stopping, -1 = unknown.
    pub state: i32,
    pub hint_id: ProfileId,
}

impl Default for EncodeMetadata {
    fn default() -> Self {
        Self {
            state: -1,
            hint_id: ProfileId::DEFAULT_VIDEO_ENCODE,
        }
    }
}

pub trait MetadataParser {
    fn parse(&self, raw: &str) -> Result<EncodeMetadata, MetadataError>;
}

/// Everything the arbiter needs from the outside world, as one argument.
pub trait HintEnv: ProfileLookup + PerfLock + GovernorProbe + MetadataParser {}

impl<T> HintEnv for T where T: ProfileLookup + PerfLock + GovernorProbe + MetadataParser {}
