//! Arm geometry

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Link lengths of the arm.
///
/// All lengths share one unit, which is also the unit of the position
/// returned by forward kinematics. The defaults describe the reference arm in
/// meters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ArmConfig {
    /// Height of the shoulder axis above the base plate.
    ///
    /// Units: meters
    pub l_base_m: f64,

    /// Horizontal offset of the shoulder axis from the base yaw axis.
    ///
    /// Units: meters
    pub d_base_m: f64,

    /// Length of the upper arm, shoulder axis to elbow axis.
    ///
    /// Units: meters
    pub l_arm_m: f64,

    /// Length of the forearm, elbow to wrist centre, along the forearm roll
    /// axis.
    ///
    /// Units: meters
    pub l_forearm_m: f64,

    /// Offset of the forearm roll axis from the elbow axis.
    ///
    /// Units: meters
    pub d_elbow_m: f64,

    /// Length from the wrist centre to the tool flange.
    ///
    /// Units: meters
    pub l_wrist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            l_base_m: 0.109,
            d_base_m: 0.035,
            l_arm_m: 0.146,
            l_forearm_m: 0.115,
            d_elbow_m: 0.052,
            l_wrist_m: 0.072,
        }
    }
}

impl ArmConfig {
    /// Distance from the elbow axis to the wrist centre, accounting for the
    /// elbow offset.
    pub fn effective_forearm_m(&self) -> f64 {
        self.l_forearm_m.hypot(self.d_elbow_m)
    }
}
