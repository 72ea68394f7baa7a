//! Joint angle feedback shared between the actuators and the coordinator

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use super::ActId;
use crate::kinematics::{Joint6D, NUM_JOINTS};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Last measured motor frame angle of every joint.
///
/// Each angle is stored as the bit pattern of an `f64` in its own atomic, so
/// actuators can publish from any thread without ever blocking the control
/// loop. A snapshot may mix angles from different updates, which is fine
/// since every joint is measured independently anyway.
#[derive(Debug, Clone, Default)]
pub struct JointFeedback(Arc<[AtomicU64; NUM_JOINTS]>);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl JointFeedback {
    /// Publish a new angle for one joint.
    ///
    /// Units: degrees (motor frame)
    pub fn publish(&self, id: ActId, angle_deg: f64) {
        self.0[id.index()].store(angle_deg.to_bits(), Ordering::Relaxed);
    }

    /// Latest published angle of every joint, zero for joints which never
    /// published.
    ///
    /// Units: degrees (motor frame)
    pub fn snapshot(&self) -> Joint6D {
        let mut angles = [0f64; NUM_JOINTS];

        for (a, cell) in angles.iter_mut().zip(self.0.iter()) {
            *a = f64::from_bits(cell.load(Ordering::Relaxed));
        }

        Joint6D(angles)
    }
}
