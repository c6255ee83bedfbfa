//! Host payload adapter: turn the untyped `(hint, data)` pair the host hands
//! over into a typed `HintEvent`.
//!
//! This module is intentionally small:
//! - No IO
//! - No policy (lives in core)
//!
//! What the payload means depends on the hint:
//! - sustained / VR / launch: present = on, absent = off
//! - camera / audio streaming: a signed duration in ms
//! - audio low latency: non-zero integer (or bare presence) = on
//! - video encode: a metadata string

use hint_arbiter_core::{HintEvent, PowerHint};

/// Raw payload as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintData<'a> {
    /// Null data pointer.
    Absent,
    /// Non-null data whose content is irrelevant for this hint.
    Present,
    Int(i32),
    Text(&'a str),
}

impl<'a> HintData<'a> {
    #[inline]
    pub fn is_present(&self) -> bool {
        !matches!(self, HintData::Absent)
    }

    fn as_int(&self) -> Option<i32> {
        match *self {
            HintData::Int(v) => Some(v),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&'a str> {
        match *self {
            HintData::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Decode a recognized hint's payload. `None` when the payload has the wrong
/// shape for a duration hint.
pub fn decode_event<'a>(hint: PowerHint, data: HintData<'a>) -> Option<HintEvent<'a>> {
    let ev = match hint {
        PowerHint::VideoEncode => HintEvent::VideoEncode(data.as_text()),
        PowerHint::SustainedPerformance => HintEvent::SustainedPerformance(data.is_present()),
        PowerHint::VrMode => HintEvent::VrMode(data.is_present()),
        PowerHint::Launch => HintEvent::Launch(data.is_present()),
        PowerHint::CameraLaunch => HintEvent::CameraLaunch(data.as_int()?),
        PowerHint::CameraStreaming => HintEvent::CameraStreaming(data.as_int()?),
        PowerHint::CameraShot => HintEvent::CameraShot(data.as_int()?),
        PowerHint::AudioStreaming => HintEvent::AudioStreaming(data.as_int()?),
        PowerHint::AudioLowLatency => HintEvent::AudioLowLatency(match data {
            HintData::Int(v) => v != 0,
            other => other.is_present(),
        }),
    };
    Some(ev)
}

/// Decode a raw host hint id plus payload; `None` for unrecognized hints.
pub fn decode_raw<'a>(raw_hint: u32, data: HintData<'a>) -> Option<HintEvent<'a>> {
    decode_event(PowerHint::from_raw(raw_hint)?, data)
}
