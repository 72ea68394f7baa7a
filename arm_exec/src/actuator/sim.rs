//! # Simulated joint actuator
//!
//! Stands in for the stepper controllers when the executable runs without
//! hardware. Motion is a straight line in motor counts from where the joint
//! is to where it was told to go, advanced by the control loop with
//! [`SimJoint::step`].
//!
//! The gripper is simulated by [`SimHand`], a servo slewing at a fixed rate
//! while it has current.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use super::{
    angle_to_counts, counts_to_angle, ActDem, ActId, HandActuator, HandDem, JointActuator,
    JointFeedback,
};
use crate::kinematics::NUM_JOINTS;
use util::maths::{clamp, lin_map};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Rate at which the simulated jaws open and close.
///
/// Units: degrees/second
const SIM_HAND_SPEED_DEGS: f64 = 60.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated stepper joint.
pub struct SimJoint {
    id: ActId,

    /// Gear reduction between the motor and the joint.
    reduction: f64,

    /// True if the motor turns the opposite way to the joint.
    inverted: bool,

    enabled: bool,

    /// Units: counts
    counts: f64,

    motion: Option<Motion>,

    feedback: JointFeedback,
}

/// A simulated gripper.
#[derive(Debug, Clone, Default)]
pub struct SimHand {
    /// Units: degrees
    angle_deg: f64,

    /// Units: degrees
    target_deg: f64,

    /// Units: amps
    current_limit_a: f64,
}

/// An in progress move.
#[derive(Debug, Clone, Copy)]
struct Motion {
    start_counts: f64,
    target_counts: f64,
    duration_s: f64,
    elapsed_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimJoint {
    pub fn new(
        id: ActId,
        reduction: f64,
        inverted: bool,
        enabled: bool,
        feedback: JointFeedback
    ) -> Self {
        Self {
            id,
            reduction,
            inverted,
            enabled,
            counts: 0.0,
            motion: None,
            feedback,
        }
    }

    /// Build one simulated joint per arm joint, all publishing into the same
    /// feedback.
    pub fn bank(
        reductions: &[f64; NUM_JOINTS],
        inverted: &[bool; NUM_JOINTS],
        enabled: bool,
        feedback: &JointFeedback
    ) -> [SimJoint; NUM_JOINTS] {
        let make = |id: ActId| SimJoint::new(
            id,
            reductions[id.index()],
            inverted[id.index()],
            enabled,
            feedback.clone()
        );

        [
            make(ActId::Joint1),
            make(ActId::Joint2),
            make(ActId::Joint3),
            make(ActId::Joint4),
            make(ActId::Joint5),
            make(ActId::Joint6),
        ]
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        if !self.enabled {
            return;
        }

        if let Some(ref mut m) = self.motion {
            m.elapsed_s += dt_s;

            if m.elapsed_s >= m.duration_s {
                self.counts = m.target_counts;
                self.motion = None;
            }
            else {
                let t = clamp(&m.elapsed_s, &0.0, &m.duration_s);
                self.counts = lin_map(
                    (0.0, m.duration_s),
                    (m.start_counts, m.target_counts),
                    t
                );
            }
        }
    }

    /// Current angle of the joint.
    ///
    /// Units: degrees (motor frame)
    pub fn angle_deg(&self) -> f64 {
        counts_to_angle(self.counts, self.reduction, self.inverted)
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn start_motion(&mut self, target_counts: f64, duration_s: f64) {
        if !self.enabled {
            trace!("{:?} is disabled, ignoring motion demand", self.id);
            return;
        }

        self.motion = Some(Motion {
            start_counts: self.counts,
            target_counts,
            duration_s: duration_s.max(0.0),
            elapsed_s: 0.0,
        });
    }
}

impl JointActuator for SimJoint {
    fn id(&self) -> ActId {
        self.id
    }

    fn send(&mut self, dem: ActDem) {
        trace!("{:?} <- {:?}", self.id, dem);

        match dem {
            ActDem::AngleWithTime { angle_deg, duration_s } => {
                let counts = angle_to_counts(angle_deg, self.reduction, self.inverted);
                self.start_motion(counts, duration_s);
            },
            ActDem::PositionWithTime { counts, duration_s } => {
                self.start_motion(counts as f64, duration_s);
            },
            ActDem::Enable(enable) => {
                // A disabled driver lets go, so any move in progress is lost
                if !enable {
                    self.motion = None;
                }
                self.enabled = enable;
            },
            ActDem::Reboot => {
                // The controller has no absolute encoder reference after a
                // restart, wherever it is becomes zero
                self.counts = 0.0;
                self.motion = None;
            },
            ActDem::UpdateAngle => {
                self.feedback.publish(self.id, self.angle_deg());
            }
        }
    }
}

impl SimHand {
    /// A gripper with its jaws closed and the given current limit.
    pub fn new(current_limit_a: f64) -> Self {
        Self {
            current_limit_a,
            ..Self::default()
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) {
        // Without current the jaws stay where they are
        if !self.is_enabled() {
            return;
        }

        let max_step = SIM_HAND_SPEED_DEGS * dt_s;
        let error = self.target_deg - self.angle_deg;

        self.angle_deg += clamp(&error, &-max_step, &max_step);
    }

    /// Units: degrees
    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    /// Units: amps
    pub fn current_limit_a(&self) -> f64 {
        self.current_limit_a
    }

    pub fn is_enabled(&self) -> bool {
        self.current_limit_a > 0.0
    }
}

impl HandActuator for SimHand {
    fn send(&mut self, dem: HandDem) {
        trace!("Hand <- {:?}", dem);

        match dem {
            HandDem::Angle(angle_deg) => self.target_deg = angle_deg,
            HandDem::CurrentLimit(current_a) => self.current_limit_a = current_a,
        }
    }
}
