use serde::{Deserialize, Serialize};

use crate::collab::LockHandle;

/// The two long-lived modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    pub sustained: bool,
    pub vr: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinedMode {
    Off,
    Sustained,
    Vr,
    SustainedVr,
}

impl ModeFlags {
    pub fn combined(self) -> CombinedMode {
        match (self.sustained, self.vr) {
            (false, false) => CombinedMode::Off,
            (true, false) => CombinedMode::Sustained,
            (false, true) => CombinedMode::Vr,
            (true, true) => CombinedMode::SustainedVr,
        }
    }

    #[inline]
    pub fn any(self) -> bool {
        self.sustained || self.vr
    }
}

/// Every category that owns a perf-lock handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostSlot {
    Sustained,
    Vr,
    VideoBoost,
    CameraLaunch,
    CameraStreaming,
    CameraShot,
    AudioStreaming,
    AudioLowLatency,
    Launch,
}

impl BoostSlot {
    pub const COUNT: usize = 9;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleSlots([LockHandle; BoostSlot::COUNT]);

impl Default for HandleSlots {
    fn default() -> Self {
        Self([LockHandle::UNSET; BoostSlot::COUNT])
    }
}

impl HandleSlots {
    #[inline]
    pub fn get(&self, slot: BoostSlot) -> LockHandle {
        self.0[slot.index()]
    }

    #[inline]
    pub fn set(&mut self, slot: BoostSlot, handle: LockHandle) {
        self.0[slot.index()] = handle;
    }

    /// Reset the slot and hand back what it held.
    #[inline]
    pub fn take(&mut self, slot: BoostSlot) -> LockHandle {
        std::mem::replace(&mut self.0[slot.index()], LockHandle::UNSET)
    }
}

/// All arbitration state for one process. The host owns exactly one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterState {
    pub modes: ModeFlags,
    /// An activity-launch boost is outstanding.
    pub launch_active: bool,
    pub slots: HandleSlots,
}
