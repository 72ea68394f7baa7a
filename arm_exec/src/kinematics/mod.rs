//! # Kinematics module
//!
//! Closed-form forward and inverse kinematics for the six joint arm.
//!
//! The arm is split into three sub-problems: the base yaw, the shoulder and
//! elbow pitch pair which places the wrist centre, and the spherical wrist
//! which sets the orientation. Each sub-problem has two branches, giving up
//! to eight inverse kinematics candidates for any pose.
//!
//! # Units
//!
//! Joint angles are in degrees and Cartesian poses in millimeters, with the
//! exception of [`Solver::solve_fk`] which returns its position in the unit
//! of the arm geometry (meters for the parameters shipped with the arm).
//! Use [`Pose6D::metres_to_mm`] before feeding an FK pose back into IK.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arm_config;
mod fk;
mod ik;
mod rotation;
mod solver;
mod types;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use arm_config::*;
pub use rotation::*;
pub use solver::*;
pub use types::*;

pub use comms_if::eqpt::mech::NUM_JOINTS;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of candidate solutions produced by the inverse kinematics.
pub const NUM_IK_SOLUTIONS: usize = 8;

/// Number of stages (base, elbow, wrist) in an inverse kinematics solution.
pub const NUM_IK_STAGES: usize = 3;
