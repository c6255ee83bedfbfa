use std::fs;
use std::io;
use std::path::PathBuf;

use hint_arbiter_core::GovernorProbe;

const POLICY0_GOVERNOR: &str = "sys/devices/system/cpu/cpufreq/policy0/scaling_governor";
const CPU0_GOVERNOR: &str = "sys/devices/system/cpu/cpu0/cpufreq/scaling_governor";

/// Reads the CPU0 scaling governor from sysfs.
#[derive(Clone, Debug)]
pub struct SysfsGovernor {
    root: PathBuf,
}

impl Default for SysfsGovernor {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SysfsGovernor {
    /// `root` is prepended to the sysfs paths; tests point it at a fixture tree.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl GovernorProbe for SysfsGovernor {
    fn current_governor(&self) -> io::Result<String> {
        let governor = match fs::read_to_string(self.root.join(POLICY0_GOVERNOR)) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => fs::read_to_string(self.root.join(CPU0_GOVERNOR))?,
            Err(e) => return Err(e),
        };
        let governor = governor.trim();
        if governor.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "empty scaling_governor"));
        }
        Ok(governor.to_string())
    }
}
