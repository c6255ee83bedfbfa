//! Hint arbitration: decides which perf-lock profile each hint maps to and
//! keeps the handle bookkeeping consistent across the sustained/VR overlay.

use log::{debug, error, info};

use crate::cfg::ArbiterCfg;
use crate::collab::{HintEnv, LockHandle, ResourceValue};
use crate::error::HintError;
use crate::hint::{HintEvent, HintStatus, ProfileId};
use crate::state::{ArbiterState, BoostSlot, ModeFlags};

/// One of the two long-lived modes. Each handler is written once and run
/// with the roles swapped for the other mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Sustained,
    Vr,
}

impl Mode {
    fn other(self) -> Mode {
        match self {
            Mode::Sustained => Mode::Vr,
            Mode::Vr => Mode::Sustained,
        }
    }

    fn slot(self) -> BoostSlot {
        match self {
            Mode::Sustained => BoostSlot::Sustained,
            Mode::Vr => BoostSlot::Vr,
        }
    }

    /// Profile used while this mode is the only one active.
    fn solo_profile(self) -> ProfileId {
        match self {
            Mode::Sustained => ProfileId::SUSTAINED_PERF,
            Mode::Vr => ProfileId::VR_MODE,
        }
    }

    fn is_set(self, modes: ModeFlags) -> bool {
        match self {
            Mode::Sustained => modes.sustained,
            Mode::Vr => modes.vr,
        }
    }

    fn set(self, modes: &mut ModeFlags, on: bool) {
        match self {
            Mode::Sustained => modes.sustained = on,
            Mode::Vr => modes.vr = on,
        }
    }
}

/// The arbitration context. The host creates one and routes every hint
/// through it; nothing here is global.
#[derive(Clone, Debug, Default)]
pub struct HintArbiter {
    cfg: ArbiterCfg,
    state: ArbiterState,
}

impl HintArbiter {
    pub fn new(cfg: ArbiterCfg) -> Self {
        Self {
            cfg,
            state: ArbiterState::default(),
        }
    }

    pub fn cfg(&self) -> &ArbiterCfg {
        &self.cfg
    }

    pub fn state(&self) -> &ArbiterState {
        &self.state
    }

    /// Handle one hint event. Failures are logged here and reported as
    /// `NotHandled`; nothing is propagated to the host.
    pub fn handle<E: HintEnv + ?Sized>(&mut self, env: &mut E, event: HintEvent<'_>) -> HintStatus {
        let res = match event {
            HintEvent::VideoEncode(metadata) => self.video_encode(env, metadata),
            HintEvent::SustainedPerformance(on) => self.mode_event(env, Mode::Sustained, on),
            HintEvent::VrMode(on) => self.mode_event(env, Mode::Vr, on),
            HintEvent::Launch(on) => self.activity_launch(env, on),
            HintEvent::CameraLaunch(d) => {
                self.timed_boost(env, BoostSlot::CameraLaunch, ProfileId::CAMERA_LAUNCH, d)
            }
            HintEvent::CameraStreaming(d) => {
                self.timed_boost(env, BoostSlot::CameraStreaming, ProfileId::CAMERA_STREAMING, d)
            }
            HintEvent::CameraShot(d) => {
                self.timed_boost(env, BoostSlot::CameraShot, ProfileId::CAMERA_SHOT, d)
            }
            HintEvent::AudioStreaming(d) => {
                self.timed_boost(env, BoostSlot::AudioStreaming, ProfileId::AUDIO_STREAMING, d)
            }
            HintEvent::AudioLowLatency(on) => self.audio_low_latency(env, on),
        };

        match res {
            Ok(status) => status,
            Err(e) => {
                error!("{:?}: {}", event.hint(), e);
                HintStatus::NotHandled
            }
        }
    }

    /// Pure read of the mode flags for the mode-level profile ids.
    pub fn is_hint_active(&self, profile: ProfileId) -> bool {
        let modes = self.state.modes;
        match profile {
            ProfileId::SUSTAINED_PERF => modes.sustained,
            ProfileId::VR_MODE => modes.vr,
            ProfileId::VR_MODE_SUSTAINED_PERF => modes.sustained && modes.vr,
            _ => false,
        }
    }

    /// Screen interactivity changes are accepted and ignored.
    pub fn set_interactive(&mut self, _on: bool) -> HintStatus {
        HintStatus::Handled
    }

    fn mode_event<E: HintEnv + ?Sized>(
        &mut self,
        env: &mut E,
        mode: Mode,
        on: bool,
    ) -> Result<HintStatus, HintError> {
        let active = mode.is_set(self.state.modes);
        let other = mode.other();
        let other_active = other.is_set(self.state.modes);

        match (on, active) {
            (true, false) => {
                let profile = if other_active {
                    // The combined profile replaces the other mode's solo lock.
                    self.release_slot(env, other.slot());
                    ProfileId::VR_MODE_SUSTAINED_PERF
                } else {
                    mode.solo_profile()
                };
                self.acquire_into(env, mode.slot(), profile, 0)?;
                mode.set(&mut self.state.modes, true);
                info!("{:?} mode on ({:?})", mode, self.state.modes.combined());
            }
            (false, true) => {
                self.release_slot(env, mode.slot());
                if other_active {
                    match self.acquire_into(env, other.slot(), other.solo_profile(), 0) {
                        Ok(_) => {}
                        Err(e @ HintError::AcquireFailed { .. }) => {
                            // Mode still turns off; the other mode runs unlocked.
                            // A handle passed as `existing` now belongs to the lock manager.
                            error!("{:?} off: {}", mode, e);
                            self.state.slots.set(other.slot(), LockHandle::UNSET);
                        }
                        Err(e) => return Err(e),
                    }
                }
                mode.set(&mut self.state.modes, false);
                info!("{:?} mode off ({:?})", mode, self.state.modes.combined());
            }
            _ => {}
        }
        Ok(HintStatus::Handled)
    }

    fn activity_launch<E: HintEnv + ?Sized>(&mut self, env: &mut E, on: bool) -> Result<HintStatus, HintError> {
        if self.state.modes.any() {
            return Ok(HintStatus::Handled);
        }

        debug!("LAUNCH HINT: {}", if on { "ON" } else { "OFF" });
        if on {
            // Restarted even if the host never sent the matching "off".
            let duration = self.cfg.launch_boost_ms;
            let handle = self.boost(env, BoostSlot::Launch, ProfileId::BOOST, duration)?;
            if handle.is_valid() {
                self.state.launch_active = true;
                info!("Activity launch hint handled");
                Ok(HintStatus::Handled)
            } else {
                Ok(HintStatus::NotHandled)
            }
        } else if self.state.launch_active {
            self.release_slot(env, BoostSlot::Launch);
            self.state.launch_active = false;
            Ok(HintStatus::Handled)
        } else {
            Ok(HintStatus::NotHandled)
        }
    }

    fn video_encode<E: HintEnv + ?Sized>(
        &mut self,
        env: &mut E,
        metadata: Option<&str>,
    ) -> Result<HintStatus, HintError> {
        let raw = metadata.ok_or_else(|| HintError::InvalidInput("missing encode metadata".to_string()))?;
        let governor = env.current_governor().map_err(HintError::GovernorUnavailable)?;
        let md = env.parse(raw)?;
        let interactive = self.cfg.is_interactive_governor(&governor);

        match md.state {
            1 => {
                let duration = self.cfg.encode_boost_ms;
                if let Err(e) = self.boost(env, BoostSlot::VideoBoost, ProfileId::BOOST, duration) {
                    error!("encoder boost: {}", e);
                }
                debug!("LAUNCH ENCODER-ON: {} MS", duration);
                if interactive {
                    match lookup(env, md.hint_id) {
                        Ok(resources) => env.perform(md.hint_id, &resources),
                        Err(e) => error!("encoder start: {}", e),
                    }
                    info!("Video Encode hint start");
                }
                Ok(HintStatus::Handled)
            }
            0 if interactive => {
                env.undo(md.hint_id);
                info!("Video Encode hint stop");
                Ok(HintStatus::Handled)
            }
            _ => Ok(HintStatus::NotHandled),
        }
    }

    /// Duration-driven categories: `> 0` boosts, `0` releases, negative is rejected.
    fn timed_boost<E: HintEnv + ?Sized>(
        &mut self,
        env: &mut E,
        slot: BoostSlot,
        profile: ProfileId,
        duration: i32,
    ) -> Result<HintStatus, HintError> {
        if duration < 0 {
            return Err(HintError::InvalidInput(format!("{:?} duration {}", slot, duration)));
        }
        if duration == 0 {
            self.release_slot(env, slot);
            debug!("{:?} OFF", slot);
            return Ok(HintStatus::Handled);
        }

        let mut duration_ms = duration as u32;
        if slot == BoostSlot::AudioStreaming {
            duration_ms = self.cfg.audio_streaming_duration(duration_ms);
        }
        self.boost(env, slot, profile, duration_ms)?;
        debug!("{:?} ON: {} MS", slot, duration_ms);
        Ok(HintStatus::Handled)
    }

    fn audio_low_latency<E: HintEnv + ?Sized>(&mut self, env: &mut E, on: bool) -> Result<HintStatus, HintError> {
        if on {
            // Held until the host cancels it.
            self.boost(env, BoostSlot::AudioLowLatency, ProfileId::AUDIO_LOW_LATENCY, 0)?;
            debug!("AUDIO LOW LATENCY ON");
        } else {
            self.release_slot(env, BoostSlot::AudioLowLatency);
            debug!("AUDIO LOW LATENCY OFF");
        }
        Ok(HintStatus::Handled)
    }

    /// Like `acquire_into`, but a rejected acquire is only logged. The slot
    /// keeps whatever the lock manager returned.
    fn boost<E: HintEnv + ?Sized>(
        &mut self,
        env: &mut E,
        slot: BoostSlot,
        profile: ProfileId,
        duration_ms: u32,
    ) -> Result<LockHandle, HintError> {
        match self.acquire_into(env, slot, profile, duration_ms) {
            Ok(handle) => Ok(handle),
            Err(HintError::AcquireFailed { profile, handle }) => {
                error!("Failed perf lock acquire for profile {} (handle {})", profile, handle);
                Ok(LockHandle(handle))
            }
            Err(e) => Err(e),
        }
    }

    fn acquire_into<E: HintEnv + ?Sized>(
        &mut self,
        env: &mut E,
        slot: BoostSlot,
        profile: ProfileId,
        duration_ms: u32,
    ) -> Result<LockHandle, HintError> {
        let resources = lookup(env, profile)?;
        let handle = env.acquire(self.state.slots.get(slot), duration_ms, &resources);
        self.state.slots.set(slot, handle);
        if handle.is_valid() {
            Ok(handle)
        } else {
            Err(HintError::AcquireFailed {
                profile,
                handle: handle.0,
            })
        }
    }

    /// Releases whatever the slot holds, valid or not, and clears it.
    fn release_slot<E: HintEnv + ?Sized>(&mut self, env: &mut E, slot: BoostSlot) {
        let handle = self.state.slots.take(slot);
        env.release(handle);
    }
}

fn lookup<E: HintEnv + ?Sized>(env: &E, profile: ProfileId) -> Result<Vec<ResourceValue>, HintError> {
    match env.lookup(profile) {
        Some(resources) if !resources.is_empty() => Ok(resources),
        _ => Err(HintError::ConfigurationMissing(profile)),
    }
}
