/// Locations of the external programs deployer shells out to.
use std::ffi::OsString;

/// Default binaries, resolved through `PATH`.
pub const DEFAULT_AGE: &str = "age";
pub const DEFAULT_SOPS: &str = "sops";
pub const DEFAULT_TPUT: &str = "tput";

/// External tool locations, built from CLI flags or their env fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// `age` binary used to decrypt secrets.
    pub age: OsString,
    /// `sops` binary used to decrypt key files.
    pub sops: OsString,
    /// `tput` binary used to query terminal capabilities.
    pub tput: OsString,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE.into(),
            sops: DEFAULT_SOPS.into(),
            tput: DEFAULT_TPUT.into(),
        }
    }
}
