//! # Arm library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to
//! access items defined inside the arm executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Joint actuator interface - the seam between arm control and the joint drivers
pub mod actuator;

/// Arm control module - converts arm commands into individual joint demands
pub mod arm_ctrl;

/// Data store - state shared between the stages of the control cycle
pub mod data_store;

/// Kinematics - forward and inverse kinematics of the six joint arm
pub mod kinematics;

/// Executable parameters
pub mod params;
