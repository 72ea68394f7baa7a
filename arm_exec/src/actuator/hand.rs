//! # Gripper interface
//!
//! The gripper is a single servo jaw on the tool flange. It has no feedback,
//! the coordinator only sets the jaw angle and the motor current limit.
//! Disabling the gripper is a zero current limit.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use util::maths::clamp;

pub use comms_if::eqpt::mech::HandDem;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Widest the jaws can open.
///
/// Units: degrees
pub const HAND_MAX_ANGLE_DEG: f64 = 30.0;

/// Highest current limit the gripper driver accepts.
///
/// Units: amps
pub const HAND_MAX_CURRENT_A: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A gripper driver.
///
/// Demands built through the provided methods are always clamped to what the
/// gripper can do.
pub trait HandActuator {
    /// Send a demand to the gripper. No acknowledgement is expected.
    fn send(&mut self, dem: HandDem);

    /// Units: degrees
    fn set_angle(&mut self, angle_deg: f64) {
        self.send(HandDem::Angle(clamp(&angle_deg, &0.0, &HAND_MAX_ANGLE_DEG)))
    }

    /// Units: amps
    fn set_current_limit(&mut self, current_a: f64) {
        self.send(HandDem::CurrentLimit(clamp(&current_a, &0.0, &HAND_MAX_CURRENT_A)))
    }

    /// Enable the gripper at the given current limit, or disable it.
    fn set_enable(&mut self, enable: bool, max_current_a: f64) {
        match enable {
            true => self.set_current_limit(max_current_a),
            false => self.set_current_limit(0.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::actuator::mock::mock_hand;

    #[test]
    fn test_demands_are_clamped() {
        let (mut hand, log) = mock_hand();

        hand.set_angle(45.0);
        hand.set_angle(-5.0);
        hand.set_angle(12.5);
        hand.set_current_limit(2.0);
        hand.set_current_limit(-1.0);
        hand.set_enable(true, 0.7);
        hand.set_enable(false, 0.7);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                HandDem::Angle(30.0),
                HandDem::Angle(0.0),
                HandDem::Angle(12.5),
                HandDem::CurrentLimit(1.0),
                HandDem::CurrentLimit(0.0),
                HandDem::CurrentLimit(0.7),
                HandDem::CurrentLimit(0.0),
            ]
        );
    }
}
