#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;

use hint_arbiter_core::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Acquire { existing: LockHandle, duration_ms: u32, profile: ProfileId },
    Release(LockHandle),
    Perform(ProfileId),
    Undo(ProfileId),
}

/// Records every perf-lock call. Profiles encode their id in the first
/// resource so acquires can be attributed.
pub struct MockEnv {
    pub profiles: HashMap<ProfileId, Vec<ResourceValue>>,
    pub calls: Vec<Call>,
    /// Handles returned by successive acquires; once empty, a counter takes over.
    pub scripted: VecDeque<i32>,
    pub next_handle: i32,
    pub governor: Option<String>,
}

impl MockEnv {
    pub fn new() -> Self {
        let mut profiles = HashMap::new();
        for id in [
            ProfileId::SUSTAINED_PERF,
            ProfileId::VR_MODE,
            ProfileId::VR_MODE_SUSTAINED_PERF,
            ProfileId::BOOST,
            ProfileId::CAMERA_LAUNCH,
            ProfileId::CAMERA_STREAMING,
            ProfileId::CAMERA_SHOT,
            ProfileId::AUDIO_STREAMING,
            ProfileId::AUDIO_LOW_LATENCY,
            ProfileId::DEFAULT_VIDEO_ENCODE,
        ] {
            profiles.insert(id, vec![ResourceValue::new(id.0, 1), ResourceValue::new(0x40800000, 1)]);
        }
        Self {
            profiles,
            calls: Vec::new(),
            scripted: VecDeque::new(),
            next_handle: 100,
            governor: Some("interactive\n".to_string()),
        }
    }

    pub fn without(mut self, id: ProfileId) -> Self {
        self.profiles.remove(&id);
        self
    }

    pub fn script(mut self, handles: &[i32]) -> Self {
        self.scripted.extend(handles.iter().copied());
        self
    }

    pub fn governor(mut self, governor: Option<&str>) -> Self {
        self.governor = governor.map(str::to_string);
        self
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ProfileLookup for MockEnv {
    fn lookup(&self, id: ProfileId) -> Option<Vec<ResourceValue>> {
        self.profiles.get(&id).cloned()
    }
}

impl PerfLock for MockEnv {
    fn acquire(&mut self, existing: LockHandle, duration_ms: u32, resources: &[ResourceValue]) -> LockHandle {
        let profile = ProfileId(resources[0].resource);
        self.calls.push(Call::Acquire { existing, duration_ms, profile });
        let h = match self.scripted.pop_front() {
            Some(h) => h,
            None => {
                self.next_handle += 1;
                self.next_handle
            }
        };
        LockHandle(h)
    }

    fn release(&mut self, handle: LockHandle) {
        self.calls.push(Call::Release(handle));
    }

    fn perform(&mut self, id: ProfileId, _resources: &[ResourceValue]) {
        self.calls.push(Call::Perform(id));
    }

    fn undo(&mut self, id: ProfileId) {
        self.calls.push(Call::Undo(id));
    }
}

impl GovernorProbe for MockEnv {
    fn current_governor(&self) -> io::Result<String> {
        self.governor
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "scaling_governor"))
    }
}

impl MetadataParser for MockEnv {
    fn parse(&self, raw: &str) -> Result<EncodeMetadata, MetadataError> {
        let mut md = EncodeMetadata::default();
        for field in raw.split(':').filter(|f| !f.is_empty()) {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| MetadataError::MalformedField(field.to_string()))?;
            let bad = || MetadataError::BadValue { key: key.to_string(), value: value.to_string() };
            match key {
                "state" => md.state = value.parse().map_err(|_| bad())?,
                "hint_id" => md.hint_id = ProfileId(value.parse().map_err(|_| bad())?),
                _ => {}
            }
        }
        Ok(md)
    }
}
