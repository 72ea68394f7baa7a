//! # Joint actuator interface
//!
//! Every joint of the arm is driven by a closed loop stepper controller which
//! accepts fire and forget demands. The coordinator only ever talks to the
//! joints through [`JointActuator`], so the real drivers, the simulated ones
//! and the test doubles are interchangeable.
//!
//! The gripper on the tool flange has its own seam, [`HandActuator`].
//!
//! Angles given to an actuator are in the motor frame, that is the joint angle
//! minus the home offset. Inverting the direction of rotation for joints
//! mounted the other way round is the actuator's job.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod feedback;
pub mod hand;
pub mod sim;

#[cfg(test)]
pub(crate) mod mock;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use comms_if::eqpt::mech::{ActDem, ActId};
pub use feedback::*;
pub use hand::{HandActuator, HandDem};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of raw counts in one turn of a motor shaft, 200 full steps with 256
/// microsteps each.
pub const CTRL_CIRCLE_COUNT: f64 = 51200.0;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A single joint driver.
///
/// Only [`JointActuator::send`] has to be implemented, the named demands are
/// provided on top of it.
pub trait JointActuator {
    /// The joint this actuator drives.
    fn id(&self) -> ActId;

    /// Send a demand to the joint. No acknowledgement is expected.
    fn send(&mut self, dem: ActDem);

    /// Move to an angle over the given time.
    ///
    /// Units: degrees (motor frame), seconds
    fn set_angle_with_time(&mut self, angle_deg: f64, duration_s: f64) {
        self.send(ActDem::AngleWithTime { angle_deg, duration_s })
    }

    /// Move to a raw motor position over the given time.
    ///
    /// Units: counts, seconds
    fn set_position_with_time(&mut self, counts: i64, duration_s: f64) {
        self.send(ActDem::PositionWithTime { counts, duration_s })
    }

    fn set_enable(&mut self, enable: bool) {
        self.send(ActDem::Enable(enable))
    }

    fn reboot(&mut self) {
        self.send(ActDem::Reboot)
    }

    /// Ask the joint to publish its current angle into the shared
    /// [`JointFeedback`].
    fn update_angle(&mut self) {
        self.send(ActDem::UpdateAngle)
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert a motor frame angle into raw motor counts.
pub fn angle_to_counts(angle_deg: f64, reduction: f64, inverted: bool) -> f64 {
    let angle_deg = if inverted { -angle_deg } else { angle_deg };

    angle_deg / 360.0 * reduction * CTRL_CIRCLE_COUNT
}

/// Convert raw motor counts into a motor frame angle.
pub fn counts_to_angle(counts: f64, reduction: f64, inverted: bool) -> f64 {
    let angle_deg = counts / reduction / CTRL_CIRCLE_COUNT * 360.0;

    if inverted { -angle_deg } else { angle_deg }
}
