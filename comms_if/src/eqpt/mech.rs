//! # Mechanisms Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of joints on the arm.
pub const NUM_JOINTS: usize = 6;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of all joint actuators on the arm, ordered from the base to the wrist roll.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ActId {
    /// Base yaw
    Joint1,
    /// Shoulder pitch
    Joint2,
    /// Elbow pitch
    Joint3,
    /// Forearm roll
    Joint4,
    /// Wrist pitch
    Joint5,
    /// Wrist roll
    Joint6,
}

/// A single demand sent to one joint actuator.
#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone)]
pub enum ActDem {
    /// Move to the given joint angle over the given time.
    ///
    /// Units: degrees, seconds
    AngleWithTime { angle_deg: f64, duration_s: f64 },

    /// Move to the given raw motor position over the given time.
    ///
    /// Units: encoder counts, seconds
    PositionWithTime { counts: i64, duration_s: f64 },

    /// Enable or disable the motor driver.
    Enable(bool),

    /// Reboot the motor driver.
    Reboot,

    /// Request a fresh angle measurement.
    UpdateAngle,
}

/// A single demand sent to the gripper.
#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone)]
pub enum HandDem {
    /// Open the jaws to the given angle.
    ///
    /// Units: degrees
    Angle(f64),

    /// Limit the current through the gripper motor, zero lets the jaws go
    /// limp.
    ///
    /// Units: amps
    CurrentLimit(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActId {
    /// All joints, ordered from the base to the wrist roll.
    pub const ALL: [ActId; NUM_JOINTS] = [
        ActId::Joint1,
        ActId::Joint2,
        ActId::Joint3,
        ActId::Joint4,
        ActId::Joint5,
        ActId::Joint6,
    ];

    /// Zero-based index of the joint in joint-space vectors.
    pub fn index(&self) -> usize {
        match self {
            ActId::Joint1 => 0,
            ActId::Joint2 => 1,
            ActId::Joint3 => 2,
            ActId::Joint4 => 3,
            ActId::Joint5 => 4,
            ActId::Joint6 => 5,
        }
    }
}
