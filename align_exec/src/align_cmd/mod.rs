//! # Align command module
//!
//! The align command drives the vehicle to a single autopilot target. Each
//! cycle it takes the current pose and velocity from the drivetrain, runs the
//! autopilot controller, and hands the resulting demands back to the
//! drivetrain. The command is finished once the controller reports that the
//! vehicle is at the target.
//!
//! The target may be replaced at any time, the next cycle simply drives to the
//! new one.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AlignCmd operation.
#[derive(Debug, thiserror::Error)]
pub enum AlignCmdError {
    #[error("Invalid autopilot parameters: {0}")]
    InvalidParams(autopilot::params::ParamsError),

    #[error("Could not create the archive: {0}")]
    ArchiveInitError(util::archive::ArchiveError),

    #[error("Could not write the archive: {0}")]
    ArchiveWriteError(util::archive::ArchiveError),
}
