#![allow(clippy::missing_safety_doc)]

use std::ffi::{c_char, c_void, CStr};
use std::io;
use std::path::Path;
use std::ptr;

use hint_arbiter_core::{
    ArbiterCfg, GovernorProbe, HintStatus, LockHandle, PerfLock, PowerHint, ProfileId,
    ProfileLookup, ResourceValue,
};
use hint_arbiter_supervisor::{load_cfg, HalEnv, HintData, HintSupervisor};
use log::error;

/// FFI ABI version for hint_arbiter_ffi.
///
/// Bump this when any `#[repr(C)]` struct layout or exported function signature changes.
pub const HINT_ARBITER_FFI_VERSION: u32 = 1;

pub const HINT_HANDLED: i32 = 0;
pub const HINT_NONE: i32 = 255;

/// Size of the first buffer handed to `lookup`. A profile with more resources
/// is looked up a second time with room for all of them.
pub const HA_LOOKUP_CAPACITY: usize = 64;

const GOVERNOR_BUF_LEN: usize = 80;

#[no_mangle]
pub extern "C" fn hint_arbiter_ffi_version() -> u32 {
    HINT_ARBITER_FFI_VERSION
}

/// One `(resource, value)` pair.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HaResource {
    pub resource: u32,
    pub value: u32,
}

impl From<ResourceValue> for HaResource {
    fn from(r: ResourceValue) -> Self {
        HaResource { resource: r.resource, value: r.value }
    }
}

/// Fills up to `cap` entries of `out` and returns the profile's total resource
/// count, or a negative value when the profile is unknown. A count above `cap`
/// gets a second call with a buffer of that size.
pub type HaLookupFn =
    unsafe extern "C" fn(ctx: *mut c_void, profile: u32, out: *mut HaResource, cap: usize) -> isize;
/// Returns the new handle; `<= 0` means the lock was not taken.
pub type HaAcquireFn = unsafe extern "C" fn(
    ctx: *mut c_void,
    existing: i32,
    duration_ms: u32,
    resources: *const HaResource,
    len: usize,
) -> i32;
pub type HaReleaseFn = unsafe extern "C" fn(ctx: *mut c_void, handle: i32);
pub type HaPerformFn =
    unsafe extern "C" fn(ctx: *mut c_void, profile: u32, resources: *const HaResource, len: usize);
pub type HaUndoFn = unsafe extern "C" fn(ctx: *mut c_void, profile: u32);
/// Writes the governor name (no NUL needed) and returns its length, or a negative value on failure.
pub type HaGovernorFn = unsafe extern "C" fn(ctx: *mut c_void, buf: *mut u8, cap: usize) -> isize;

/// Host collaborators. `lookup`, `acquire` and `release` are required;
/// `perform`/`undo` may be null (no-ops); a null `governor` reads sysfs.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HaCallbacks {
    pub ctx: *mut c_void,
    pub lookup: Option<HaLookupFn>,
    pub acquire: Option<HaAcquireFn>,
    pub release: Option<HaReleaseFn>,
    pub perform: Option<HaPerformFn>,
    pub undo: Option<HaUndoFn>,
    pub governor: Option<HaGovernorFn>,
}

/// Arbiter tunables for FFI (keep it minimal).
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct HaCfg {
    pub launch_boost_ms: u32,
    pub encode_boost_ms: u32,
    pub audio_streaming_max_ms: i32, // -1 means no cap
}

#[no_mangle]
pub extern "C" fn hint_arbiter_cfg_default() -> HaCfg {
    let d = ArbiterCfg::default();
    HaCfg {
        launch_boost_ms: d.launch_boost_ms,
        encode_boost_ms: d.encode_boost_ms,
        audio_streaming_max_ms: d.audio_streaming_max_ms.map(|v| v as i32).unwrap_or(-1),
    }
}

fn cfg_from_ffi(c: HaCfg) -> ArbiterCfg {
    ArbiterCfg {
        launch_boost_ms: c.launch_boost_ms,
        encode_boost_ms: c.encode_boost_ms,
        audio_streaming_max_ms: if c.audio_streaming_max_ms < 0 { None } else { Some(c.audio_streaming_max_ms as u32) },
        ..ArbiterCfg::default()
    }
}

fn status_to_ffi(s: HintStatus) -> i32 {
    match s {
        HintStatus::Handled => HINT_HANDLED,
        HintStatus::NotHandled => HINT_NONE,
    }
}

struct CallbackProfiles {
    ctx: *mut c_void,
    lookup: HaLookupFn,
}

impl CallbackProfiles {
    fn fill(&self, id: ProfileId, buf: &mut [HaResource]) -> Option<usize> {
        let n = unsafe { (self.lookup)(self.ctx, id.0, buf.as_mut_ptr(), buf.len()) };
        usize::try_from(n).ok()
    }
}

impl ProfileLookup for CallbackProfiles {
    fn lookup(&self, id: ProfileId) -> Option<Vec<ResourceValue>> {
        let mut buf = vec![HaResource::default(); HA_LOOKUP_CAPACITY];
        let mut n = self.fill(id, &mut buf)?;
        if n > buf.len() {
            buf.resize(n, HaResource::default());
            n = self.fill(id, &mut buf)?;
            if n > buf.len() {
                error!("profile {}: lookup reported {} resources after sizing for {}", id, n, buf.len());
                return None;
            }
        }
        buf.truncate(n);
        Some(buf.into_iter().map(|r| ResourceValue::new(r.resource, r.value)).collect())
    }
}

struct CallbackLock {
    ctx: *mut c_void,
    acquire: HaAcquireFn,
    release: HaReleaseFn,
    perform: Option<HaPerformFn>,
    undo: Option<HaUndoFn>,
}

fn to_ffi_resources(resources: &[ResourceValue]) -> Vec<HaResource> {
    resources.iter().copied().map(HaResource::from).collect()
}

impl PerfLock for CallbackLock {
    fn acquire(&mut self, existing: LockHandle, duration_ms: u32, resources: &[ResourceValue]) -> LockHandle {
        let res = to_ffi_resources(resources);
        LockHandle(unsafe { (self.acquire)(self.ctx, existing.0, duration_ms, res.as_ptr(), res.len()) })
    }

    fn release(&mut self, handle: LockHandle) {
        unsafe { (self.release)(self.ctx, handle.0) }
    }

    fn perform(&mut self, id: ProfileId, resources: &[ResourceValue]) {
        if let Some(perform) = self.perform {
            let res = to_ffi_resources(resources);
            unsafe { perform(self.ctx, id.0, res.as_ptr(), res.len()) }
        }
    }

    fn undo(&mut self, id: ProfileId) {
        if let Some(undo) = self.undo {
            unsafe { undo(self.ctx, id.0) }
        }
    }
}

struct CallbackGovernor {
    ctx: *mut c_void,
    governor: HaGovernorFn,
}

impl GovernorProbe for CallbackGovernor {
    fn current_governor(&self) -> io::Result<String> {
        let mut buf = [0u8; GOVERNOR_BUF_LEN];
        let n = unsafe { (self.governor)(self.ctx, buf.as_mut_ptr(), buf.len()) };
        if n < 0 {
            return Err(io::Error::other("governor callback failed"));
        }
        let n = (n as usize).min(buf.len());
        Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
    }
}

/// Opaque handle exposed over FFI.
pub struct HaArbiter {
    inner: HintSupervisor,
}

fn build(cfg: ArbiterCfg, cb: HaCallbacks) -> *mut HaArbiter {
    let (Some(lookup), Some(acquire), Some(release)) = (cb.lookup, cb.acquire, cb.release) else {
        error!("hint_arbiter_new: lookup/acquire/release callbacks are required");
        return ptr::null_mut();
    };

    let profiles = CallbackProfiles { ctx: cb.ctx, lookup };
    let locks = CallbackLock {
        ctx: cb.ctx,
        acquire,
        release,
        perform: cb.perform,
        undo: cb.undo,
    };
    let mut env = HalEnv::new(Box::new(profiles), Box::new(locks));
    if let Some(governor) = cb.governor {
        env = env.with_governor(Box::new(CallbackGovernor { ctx: cb.ctx, governor }));
    }

    let handle = HaArbiter {
        inner: HintSupervisor::new(cfg, env),
    };
    Box::into_raw(Box::new(handle))
}

/// Create the arbiter context. Returns null if a required callback is missing.
///
/// The host must serialize every call on the returned handle.
#[no_mangle]
pub extern "C" fn hint_arbiter_new(cfg: HaCfg, callbacks: HaCallbacks) -> *mut HaArbiter {
    build(cfg_from_ffi(cfg), callbacks)
}

/// Like `hint_arbiter_new`, with tunables read from a TOML file. Returns null
/// if the file can't be loaded.
#[no_mangle]
pub unsafe extern "C" fn hint_arbiter_new_from_config(path: *const c_char, callbacks: HaCallbacks) -> *mut HaArbiter {
    if path.is_null() {
        return ptr::null_mut();
    }
    let Ok(path) = CStr::from_ptr(path).to_str() else {
        error!("hint_arbiter_new_from_config: config path is not UTF-8");
        return ptr::null_mut();
    };
    match load_cfg(Path::new(path)) {
        Ok(cfg) => build(cfg, callbacks),
        Err(e) => {
            error!("{}", e);
            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn hint_arbiter_free(h: *mut HaArbiter) {
    if !h.is_null() {
        drop(Box::from_raw(h));
    }
}

/// Dispatch one power hint. Returns `HINT_HANDLED` (0) or `HINT_NONE` (255).
///
/// `data` depends on `hint`:
/// - sustained performance / VR / launch: non-null = on
/// - camera and audio-streaming hints: `*const i32` duration in ms
/// - audio low latency: `*const i32`, non-zero = on
/// - video encode: NUL-terminated metadata string
#[no_mangle]
pub unsafe extern "C" fn hint_arbiter_power_hint(h: *mut HaArbiter, hint: u32, data: *const c_void) -> i32 {
    if h.is_null() {
        return HINT_NONE;
    }
    let handle = &mut *h;

    let payload = if data.is_null() {
        HintData::Absent
    } else {
        match PowerHint::from_raw(hint) {
            Some(PowerHint::VideoEncode) => match CStr::from_ptr(data as *const c_char).to_str() {
                Ok(s) => HintData::Text(s),
                Err(_) => {
                    error!("video encode metadata is not UTF-8");
                    return HINT_NONE;
                }
            },
            Some(
                PowerHint::CameraLaunch
                | PowerHint::CameraStreaming
                | PowerHint::CameraShot
                | PowerHint::AudioStreaming
                | PowerHint::AudioLowLatency,
            ) => HintData::Int(*(data as *const i32)),
            Some(PowerHint::SustainedPerformance | PowerHint::VrMode | PowerHint::Launch) | None => {
                HintData::Present
            }
        }
    };

    status_to_ffi(handle.inner.power_hint(hint, payload))
}

#[no_mangle]
pub unsafe extern "C" fn hint_arbiter_is_hint_active(h: *const HaArbiter, profile: u32) -> u8 {
    if h.is_null() {
        return 0;
    }
    (*h).inner.is_hint_active(ProfileId(profile)) as u8
}

#[no_mangle]
pub unsafe extern "C" fn hint_arbiter_set_interactive(h: *mut HaArbiter, on: i32) -> i32 {
    if h.is_null() {
        return HINT_NONE;
    }
    status_to_ffi((*h).inner.set_interactive(on != 0))
}
