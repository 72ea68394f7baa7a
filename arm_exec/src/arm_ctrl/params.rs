//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::ArmCtrlError;
use crate::{
    actuator::hand::HAND_MAX_CURRENT_A,
    kinematics::{ArmConfig, Joint6D, NUM_JOINTS},
};
use comms_if::eqpt::mech::ActId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Arm control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- POSES ----

    /// Joint angles of the home pose. The motors read zero at this pose.
    ///
    /// Units: degrees
    pub home_offset_deg: [f64; NUM_JOINTS],

    /// Joint angles of the folded rest pose.
    ///
    /// Units: degrees
    pub rest_pose_deg: [f64; NUM_JOINTS],

    // ---- CAPABILITIES ----

    /// Lowest joint angle each joint can reach.
    ///
    /// Units: degrees
    pub joint_min_deg: [f64; NUM_JOINTS],

    /// Highest joint angle each joint can reach.
    ///
    /// Units: degrees
    pub joint_max_deg: [f64; NUM_JOINTS],

    /// Speed of the furthest travelling joint during a joint space move.
    ///
    /// Units: degrees/second
    pub joint_speed_degs: f64,

    // ---- MOTORS ----

    /// Gear reduction between each motor and its joint.
    pub reductions: [f64; NUM_JOINTS],

    /// Joints whose motor turns the opposite way to the joint.
    pub inverted: [bool; NUM_JOINTS],

    // ---- GRIPPER ----

    /// Current limit applied to the gripper whenever it is enabled.
    ///
    /// Units: amps
    pub hand_max_current_a: f64,

    // ---- CALIBRATION ----

    /// Time allowed for each joint to reach its calibration stop.
    ///
    /// Units: seconds
    pub calib_move_time_s: f64,

    /// Time to wait on the stops before rebooting the drivers.
    ///
    /// Units: seconds
    pub calib_settle_time_s: f64,

    /// Joints driven onto a mechanical stop during calibration.
    pub calib_stops: Vec<CalibStop>,

    // ---- GEOMETRY ----

    pub geometry: ArmConfig,
}

/// A mechanical stop used to calibrate one joint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CalibStop {
    pub joint: ActId,

    /// Units: degrees (motor frame)
    pub angle_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn home_offset(&self) -> Joint6D {
        Joint6D(self.home_offset_deg)
    }

    pub fn rest_pose(&self) -> Joint6D {
        Joint6D(self.rest_pose_deg)
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ArmCtrlError> {
        for i in 0..NUM_JOINTS {
            if !(self.joint_min_deg[i] <= self.joint_max_deg[i]) {
                return Err(ArmCtrlError::InvalidParams(format!(
                    "joint {} minimum {} is above its maximum {}",
                    i + 1, self.joint_min_deg[i], self.joint_max_deg[i]
                )))
            }

            if !(self.reductions[i] > 0.0) {
                return Err(ArmCtrlError::InvalidParams(format!(
                    "joint {} reduction must be positive",
                    i + 1
                )))
            }
        }

        if !(self.joint_speed_degs > 0.0 && self.joint_speed_degs.is_finite()) {
            return Err(ArmCtrlError::InvalidJointSpeed(self.joint_speed_degs))
        }

        if !(self.hand_max_current_a > 0.0 && self.hand_max_current_a <= HAND_MAX_CURRENT_A) {
            return Err(ArmCtrlError::InvalidParams(format!(
                "gripper current limit must be in (0, {}] A",
                HAND_MAX_CURRENT_A
            )))
        }

        let times = [self.calib_move_time_s, self.calib_settle_time_s];
        if times.iter().any(|t| !(*t >= 0.0 && t.is_finite())) {
            return Err(ArmCtrlError::InvalidParams(
                "calibration times must not be negative".into()
            ))
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            home_offset_deg: [0.0, 0.0, 90.0, 0.0, 0.0, 0.0],
            rest_pose_deg: [0.0, -75.0, 180.0, 0.0, 0.0, 0.0],
            joint_min_deg: [-170.0, -75.0, 35.0, -180.0, -120.0, -720.0],
            joint_max_deg: [170.0, 90.0, 180.0, 180.0, 120.0, 720.0],
            joint_speed_degs: 20.0,
            reductions: [50.0, 30.0, 30.0, 24.0, 30.0, 50.0],
            inverted: [true, true, true, false, true, true],
            hand_max_current_a: 0.7,
            calib_move_time_s: 5.0,
            calib_settle_time_s: 6.0,
            calib_stops: vec![
                CalibStop { joint: ActId::Joint2, angle_deg: 75.0 },
                CalibStop { joint: ActId::Joint3, angle_deg: -100.0 },
            ],
            geometry: ArmConfig::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Params::default().validate().unwrap();

        let mut p = Params::default();
        p.joint_speed_degs = 0.0;
        assert!(matches!(p.validate(), Err(ArmCtrlError::InvalidJointSpeed(_))));

        let mut p = Params::default();
        p.joint_min_deg[2] = 200.0;
        assert!(matches!(p.validate(), Err(ArmCtrlError::InvalidParams(_))));

        let mut p = Params::default();
        p.hand_max_current_a = 1.5;
        assert!(matches!(p.validate(), Err(ArmCtrlError::InvalidParams(_))));
    }

    #[test]
    fn test_load_from_toml() {
        let p: Params = util::params::from_str(include_str!("../../../params/arm_ctrl.toml"))
            .unwrap();

        p.validate().unwrap();
        assert_eq!(p.home_offset(), Joint6D::new(0.0, 0.0, 90.0, 0.0, 0.0, 0.0));
        assert_eq!(p.calib_stops, Params::default().calib_stops);
        assert_eq!(p.geometry, ArmConfig::default());
        assert_eq!(p.hand_max_current_a, 0.7);
    }
}
