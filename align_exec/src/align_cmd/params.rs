//! Parameters structure for AlignCmd

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use autopilot::params::{ProfileParams, TargetParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the align command
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// The autopilot profile to use
    pub profile: ProfileParams,

    /// The initial target
    pub target: TargetParams,

    /// If true a record of every cycle is written to the session archive
    #[serde(default = "default_archive")]
    pub archive: bool
}

fn default_archive() -> bool {
    true
}
