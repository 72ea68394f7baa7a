//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by arm control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum ArmCmd {
    /// Move every joint to the given angle in joint space.
    ///
    /// Angles are in degrees in the kinematic frame, so the home pose is
    /// `0 0 90 0 0 0`. The move is rejected if any joint would leave its
    /// limits.
    #[structopt(name = "movej", setting = AppSettings::AllowNegativeNumbers)]
    MoveJ {
        j1_deg: f64,
        j2_deg: f64,
        j3_deg: f64,
        j4_deg: f64,
        j5_deg: f64,
        j6_deg: f64,
    },

    /// Move the end effector to the given Cartesian pose.
    ///
    /// The inverse kinematics candidate closest to the current joints is
    /// executed as a joint-space move.
    #[structopt(name = "movel", setting = AppSettings::AllowNegativeNumbers)]
    MoveL {
        /// Position along the base X axis in millimeters.
        x_mm: f64,
        /// Position along the base Y axis in millimeters.
        y_mm: f64,
        /// Position along the base Z axis in millimeters.
        z_mm: f64,
        /// Roll about X in degrees.
        a_deg: f64,
        /// Pitch about Y in degrees.
        b_deg: f64,
        /// Yaw about Z in degrees.
        c_deg: f64,
    },

    /// Set the angular speed used to time joint-space moves.
    #[structopt(name = "speed")]
    SetJointSpeed {
        /// The speed of the fastest joint in degrees/second.
        speed_degs: f64,
    },

    /// Home the arm.
    ///
    /// Without `--already-calibrated` the shoulder and elbow are driven onto
    /// their calibration stops and the joints rebooted, which blocks the
    /// executable for the settle time.
    #[structopt(name = "homing")]
    Homing {
        #[structopt(long)]
        already_calibrated: bool,
    },

    /// Fold the arm into its rest pose.
    #[structopt(name = "rest")]
    Resting,

    /// Enable or disable all joint drivers.
    #[structopt(name = "enable")]
    SetEnable {
        #[structopt(parse(try_from_str))]
        enable: bool,
    },

    /// Request a fresh angle measurement from every joint.
    #[structopt(name = "update")]
    UpdateJointPos,

    /// Reboot all joint drivers.
    #[structopt(name = "reboot")]
    Reboot,

    /// Open the gripper jaws to the given angle.
    ///
    /// The angle is clamped to the travel of the jaws, `0` to `30` degrees.
    #[structopt(name = "hand")]
    HandAngle {
        angle_deg: f64,
    },

    /// Set the current limit of the gripper motor, which sets its grip force.
    ///
    /// Clamped to `0` to `1` amps.
    #[structopt(name = "hand-current")]
    HandCurrentLimit {
        current_a: f64,
    },

    /// Enable or disable the gripper on its own.
    #[structopt(name = "hand-enable")]
    HandEnable {
        #[structopt(parse(try_from_str))]
        enable: bool,
    },
}
