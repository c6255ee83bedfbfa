use serde::{Deserialize, Serialize};

/// Tunables for the arbiter. Loaded from TOML by the supervisor; every field
/// has a default so a partial file is fine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterCfg {
    /// Activity launch boost length.
    pub launch_boost_ms: u32,
    /// Boost applied when an encoder starts.
    pub encode_boost_ms: u32,
    /// Cap on audio-streaming boosts: shorter requests keep their own length,
    /// longer ones are cut to this. `None` passes the host's duration through.
    pub audio_streaming_max_ms: Option<u32>,
    /// Governor names that get the per-session encode profile.
    pub interactive_governors: Vec<String>,
}

impl Default for ArbiterCfg {
    fn default() -> Self {
        Self {
            launch_boost_ms: 5000,
            encode_boost_ms: 2000,
            audio_streaming_max_ms: Some(2000),
            interactive_governors: vec!["interactive".to_string()],
        }
    }
}

impl ArbiterCfg {
    pub fn is_interactive_governor(&self, governor: &str) -> bool {
        let g = governor.trim();
        self.interactive_governors.iter().any(|name| name == g)
    }

    pub fn audio_streaming_duration(&self, requested_ms: u32) -> u32 {
        match self.audio_streaming_max_ms {
            Some(max) => requested_ms.min(max),
            None => requested_ms,
        }
    }
}
