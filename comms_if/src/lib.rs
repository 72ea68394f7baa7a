//! # Communications interface crate.
//!
//! Provides the command surface of the arm software: telecommands accepted
//! by the executable and the demands it sends to joint actuators.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Command definitions for equipment (the joint actuators)
pub mod eqpt;
