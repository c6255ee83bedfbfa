use serde::{Deserialize, Serialize};

/// Identifier of a resource profile, as understood by `ProfileLookup` and as
/// carried in the `hint_id` field of video-encode metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

impl ProfileId {
    pub const DEFAULT_VIDEO_ENCODE: ProfileId = ProfileId(0x0A00);
    pub const SUSTAINED_PERF: ProfileId = ProfileId(0x0F00);
    pub const VR_MODE: ProfileId = ProfileId(0x1000);
    pub const VR_MODE_SUSTAINED_PERF: ProfileId = ProfileId(0x1001);
    pub const BOOST: ProfileId = ProfileId(0x1002);
    pub const CAMERA_LAUNCH: ProfileId = ProfileId(0x1003);
    pub const CAMERA_STREAMING: ProfileId = ProfileId(0x1004);
    pub const CAMERA_SHOT: ProfileId = ProfileId(0x1005);
    pub const AUDIO_STREAMING: ProfileId = ProfileId(0x1006);
    pub const AUDIO_LOW_LATENCY: ProfileId = ProfileId(0x1007);
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Host hint identifiers this module recognizes.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerHint {
    VideoEncode = 3,
    SustainedPerformance = 6,
    VrMode = 7,
    Launch = 8,
    // Vendor extensions.
    CameraLaunch = 0x1100,
    CameraStreaming = 0x1101,
    CameraShot = 0x1102,
    AudioStreaming = 0x1103,
    AudioLowLatency = 0x1104,
}

impl PowerHint {
    pub const ALL: [PowerHint; 9] = [
        PowerHint::VideoEncode,
        PowerHint::SustainedPerformance,
        PowerHint::VrMode,
        PowerHint::Launch,
        PowerHint::CameraLaunch,
        PowerHint::CameraStreaming,
        PowerHint::CameraShot,
        PowerHint::AudioStreaming,
        PowerHint::AudioLowLatency,
    ];

    /// Map a raw host identifier; `None` for anything not handled here.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|h| h.raw() == raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// A decoded hint event with its typed payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintEvent<'a> {
    /// Opaque encoder metadata; `None` when the host passed nothing.
    VideoEncode(Option<&'a str>),
    SustainedPerformance(bool),
    VrMode(bool),
    Launch(bool),
    CameraLaunch(i32),
    CameraStreaming(i32),
    CameraShot(i32),
    AudioStreaming(i32),
    AudioLowLatency(bool),
}

impl HintEvent<'_> {
    pub fn hint(&self) -> PowerHint {
        match self {
            HintEvent::VideoEncode(_) => PowerHint::VideoEncode,
            HintEvent::SustainedPerformance(_) => PowerHint::SustainedPerformance,
            HintEvent::VrMode(_) => PowerHint::VrMode,
            HintEvent::Launch(_) => PowerHint::Launch,
            HintEvent::CameraLaunch(_) => PowerHint::CameraLaunch,
            HintEvent::CameraStreaming(_) => PowerHint::CameraStreaming,
            HintEvent::CameraShot(_) => PowerHint::CameraShot,
            HintEvent::AudioStreaming(_) => PowerHint::AudioStreaming,
            HintEvent::AudioLowLatency(_) => PowerHint::AudioLowLatency,
        }
    }
}

/// Outcome reported back to the host for every hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintStatus {
    Handled,
    NotHandled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_ids_map_back() {
        for h in PowerHint::ALL {
            assert_eq!(PowerHint::from_raw(h.raw()), Some(h));
        }
        assert_eq!(PowerHint::from_raw(2), None);
        assert_eq!(PowerHint::from_raw(0xffff), None);
    }

    #[test]
    fn profile_id_display_is_hex() {
        assert_eq!(ProfileId::VR_MODE.to_string(), "0x1000");
    }
}
