//! # Arm control module
//!
//! Turns arm commands into per joint actuator demands. Joint space moves are
//! limit checked and timed so that the joint travelling furthest moves at the
//! configured joint speed. Cartesian moves go through the inverse kinematics
//! and execute the candidate closest to where the arm currently is.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_homing;
mod calc_move;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_move::select_closest;
pub use params::*;
pub use state::*;

use crate::kinematics::Pose6D;
use comms_if::eqpt::mech::ActId;

#[cfg(test)]
use crate::actuator::{
    mock::{mock_bank, mock_hand, DemLog, HandLog, MockHand, MockJoint},
    JointFeedback,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ArmCtrlError {
    #[error(
        "{joint:?} demand of {angle_deg:.3} deg is outside of its limits \
        [{min_deg:.3}, {max_deg:.3}] deg"
    )]
    JointLimit {
        joint: ActId,
        angle_deg: f64,
        min_deg: f64,
        max_deg: f64
    },

    #[error("No inverse kinematics solution for {0} is within the joint limits")]
    NoValidSolution(Pose6D),

    #[error("The joint speed must be positive and finite, got {0} deg/s")]
    InvalidJointSpeed(f64),

    #[error("The arm is in safe mode")]
    Safe,

    #[error("Invalid ArmCtrl parameters: {0}")]
    InvalidParams(String),
}

// ---------------------------------------------------------------------------
// TEST UTILITIES
// ---------------------------------------------------------------------------

/// Arm control driving a bank of mock joints and a mock gripper, with the
/// default parameters except for a zero calibration settle time.
#[cfg(test)]
pub(crate) fn mock_ctrl_with_hand()
    -> (ArmCtrl<MockJoint, MockHand>, JointFeedback, DemLog, HandLog)
{
    let (bank, log) = mock_bank();
    let (hand, hand_log) = mock_hand();
    let feedback = JointFeedback::default();
    let mut params = Params::default();
    params.calib_settle_time_s = 0.0;

    (
        ArmCtrl::with_params(params, bank, hand, feedback.clone()).unwrap(),
        feedback,
        log,
        hand_log
    )
}

/// As [`mock_ctrl_with_hand`] for tests which only look at the joints.
#[cfg(test)]
pub(crate) fn mock_ctrl() -> (ArmCtrl<MockJoint, MockHand>, JointFeedback, DemLog) {
    let (arm, feedback, log, _) = mock_ctrl_with_hand();
    (arm, feedback, log)
}
