//! # Align library.
//!
//! This library allows other crates in the workspace to access the align command and the
//! drivetrain interface.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Align command - drives the vehicle to a single target using the autopilot
pub mod align_cmd;

/// Drivetrain - the vehicle interface used by the align command, and a kinematic simulation of it
pub mod drive;
