pub mod hint;
pub mod collab;
pub mod error;
pub mod cfg;
pub mod state;
pub mod arbiter;

pub use hint::{HintEvent, HintStatus, PowerHint, ProfileId};
pub use collab::{
    EncodeMetadata, GovernorProbe, HintEnv, LockHandle, MetadataParser, PerfLock, ProfileLookup,
    ResourceValue,
};
pub use error::{HintError, MetadataError};
pub use cfg::ArbiterCfg;
pub use state::{ArbiterState, BoostSlot, CombinedMode, HandleSlots, ModeFlags};
pub use arbiter::HintArbiter;
