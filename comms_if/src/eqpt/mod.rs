//! # Equipment Interface
//!
//! This module defines the interface structures which are sent to equipment.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod mech;
