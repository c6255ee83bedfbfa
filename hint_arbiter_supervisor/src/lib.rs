//! hint_arbiter_supervisor
//!
//! Host-facing integration layer for `hint_arbiter_core`.
//!
//! Responsibilities:
//! - own the one `HintArbiter` context and its collaborators
//! - decode raw host payloads into typed hint events
//! - ship stock collaborators: sysfs governor probe, encode-metadata parser,
//!   in-memory profile table
//! - load arbiter tunables from TOML
//!
//! Non-goals:
//! - no perf-lock backend (always host-provided)
//! - no resource-table file format
//! - no internal locking

pub mod adapter;
pub mod config;
pub mod governor;
pub mod metadata;
pub mod profiles;
pub mod supervisor;

pub use adapter::{decode_event, decode_raw, HintData};
pub use config::{cfg_from_str, load_cfg, ConfigError};
pub use governor::SysfsGovernor;
pub use metadata::KeyValueMetadataParser;
pub use profiles::StaticProfiles;
pub use supervisor::{ArbiterSnapshot, HalEnv, HintSupervisor};
