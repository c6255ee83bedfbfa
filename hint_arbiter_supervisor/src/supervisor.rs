//! Hint supervisor.
//!
//! The host-integration boundary around `hint_arbiter_core`:
//! - owns the single `HintArbiter` context for the process
//! - owns the collaborators the arbiter drives
//! - decodes raw host hints and routes them through the arbiter
//!
//! No async. No internal locking: the host serializes calls.

use std::io;

use hint_arbiter_core::{
    ArbiterCfg, ArbiterState, CombinedMode, EncodeMetadata, GovernorProbe, HintArbiter, HintEvent,
    HintStatus, LockHandle, MetadataError, MetadataParser, PerfLock, ProfileId, ProfileLookup,
    ResourceValue,
};
use log::debug;

use crate::adapter::{decode_raw, HintData};
use crate::governor::SysfsGovernor;
use crate::metadata::KeyValueMetadataParser;

/// Boxed collaborators, wired into one `HintEnv`.
pub struct HalEnv {
    pub profiles: Box<dyn ProfileLookup>,
    pub locks: Box<dyn PerfLock>,
    pub governor: Box<dyn GovernorProbe>,
    pub metadata: Box<dyn MetadataParser>,
}

impl HalEnv {
    /// Host-provided profiles and perf-lock backend, stock sysfs governor
    /// probe and metadata parser.
    pub fn new(profiles: Box<dyn ProfileLookup>, locks: Box<dyn PerfLock>) -> Self {
        Self {
            profiles,
            locks,
            governor: Box::new(SysfsGovernor::default()),
            metadata: Box::new(KeyValueMetadataParser),
        }
    }

    pub fn with_governor(mut self, governor: Box<dyn GovernorProbe>) -> Self {
        self.governor = governor;
        self
    }
}

impl ProfileLookup for HalEnv {
    fn lookup(&self, id: ProfileId) -> Option<Vec<ResourceValue>> {
        self.profiles.lookup(id)
    }
}

impl PerfLock for HalEnv {
    fn acquire(&mut self, existing: LockHandle, duration_ms: u32, resources: &[ResourceValue]) -> LockHandle {
        self.locks.acquire(existing, duration_ms, resources)
    }

    fn release(&mut self, handle: LockHandle) {
        self.locks.release(handle)
    }

    fn perform(&mut self, id: ProfileId, resources: &[ResourceValue]) {
        self.locks.perform(id, resources)
    }

    fn undo(&mut self, id: ProfileId) {
        self.locks.undo(id)
    }
}

impl GovernorProbe for HalEnv {
    fn current_governor(&self) -> io::Result<String> {
        self.governor.current_governor()
    }
}

impl MetadataParser for HalEnv {
    fn parse(&self, raw: &str) -> Result<EncodeMetadata, MetadataError> {
        self.metadata.parse(raw)
    }
}

/// Point-in-time view of the arbiter for dumps and debugging.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArbiterSnapshot {
    pub mode: CombinedMode,
    pub state: ArbiterState,
    pub cfg: ArbiterCfg,
}

pub struct HintSupervisor {
    arbiter: HintArbiter,
    env: HalEnv,
}

impl HintSupervisor {
    pub fn new(cfg: ArbiterCfg, env: HalEnv) -> Self {
        Self {
            arbiter: HintArbiter::new(cfg),
            env,
        }
    }

    /// Dispatch entry point for raw host hints. Unrecognized hints, and
    /// payloads of the wrong shape, are ignored and reported `NotHandled`.
    pub fn power_hint(&mut self, raw_hint: u32, data: HintData<'_>) -> HintStatus {
        match decode_raw(raw_hint, data) {
            Some(event) => self.handle_event(event),
            None => {
                debug!("ignoring hint {:#x} ({:?})", raw_hint, data);
                HintStatus::NotHandled
            }
        }
    }

    pub fn handle_event(&mut self, event: HintEvent<'_>) -> HintStatus {
        self.arbiter.handle(&mut self.env, event)
    }

    pub fn is_hint_active(&self, profile: ProfileId) -> bool {
        self.arbiter.is_hint_active(profile)
    }

    pub fn set_interactive(&mut self, on: bool) -> HintStatus {
        self.arbiter.set_interactive(on)
    }

    pub fn snapshot(&self) -> ArbiterSnapshot {
        let state = self.arbiter.state().clone();
        ArbiterSnapshot {
            mode: state.modes.combined(),
            state,
            cfg: self.arbiter.cfg().clone(),
        }
    }
}
