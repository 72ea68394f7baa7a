//! Homing and resting sequences

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use std::{thread, time::Duration};

use super::{ArmCtrl, ArmCtrlError};
use crate::actuator::{angle_to_counts, HandActuator, JointActuator};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<A: JointActuator, H: HandActuator> ArmCtrl<A, H> {
    /// Home the arm.
    ///
    /// If the arm is already calibrated this is a joint space move to the
    /// home pose. Otherwise the calibration joints are driven onto their
    /// mechanical stops, and once they have settled every driver is rebooted
    /// so the stops become the new motor zero. The calibration blocks the
    /// caller for the whole settle time.
    pub fn homing(&mut self, already_calibrated: bool) -> Result<f64, ArmCtrlError> {
        if self.safe {
            return Err(ArmCtrlError::Safe)
        }

        if already_calibrated {
            return self.move_j(&self.params.home_offset())
        }

        for stop in self.params.calib_stops.iter() {
            let i = stop.joint.index();
            let counts = angle_to_counts(
                stop.angle_deg,
                self.params.reductions[i],
                self.params.inverted[i]
            );

            self.actuators[i].set_position_with_time(
                counts.round() as i64,
                self.params.calib_move_time_s
            );
        }

        info!(
            "Calibrating {} joints, waiting {} s",
            self.params.calib_stops.len(),
            self.params.calib_settle_time_s
        );
        thread::sleep(Duration::from_secs_f64(self.params.calib_settle_time_s));

        self.reboot();

        // The stops are the new motor zero, so the arm now reads as home
        self.last_commanded = Some(self.params.home_offset());

        info!("Calibration complete");

        Ok(0.0)
    }

    /// Fold the arm into its rest pose.
    pub fn resting(&mut self) -> Result<f64, ArmCtrlError> {
        self.move_j(&self.params.rest_pose())
    }
}

#[cfg(test)]
mod test {
    use super::super::mock_ctrl;
    use crate::{
        actuator::{ActDem, ActId},
        kinematics::Joint6D,
    };

    #[test]
    fn test_calibration() {
        let (mut arm, _, log) = mock_ctrl();

        assert_eq!(arm.homing(false).unwrap(), 0.0);
        assert_eq!(arm.last_commanded(), Some(arm.params().home_offset()));

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 8);
        assert_eq!(
            log[0],
            (ActId::Joint2, ActDem::PositionWithTime { counts: -320000, duration_s: 5.0 })
        );
        assert_eq!(
            log[1],
            (ActId::Joint3, ActDem::PositionWithTime { counts: 426667, duration_s: 5.0 })
        );
        for (j, id) in ActId::ALL.iter().enumerate() {
            assert_eq!(log[2 + j], (*id, ActDem::Reboot));
        }
    }

    #[test]
    fn test_already_calibrated() {
        let (mut arm, fb, log) = mock_ctrl();
        fb.publish(ActId::Joint1, 20.0);

        assert_eq!(arm.homing(true).unwrap(), 1.0);
        assert_eq!(arm.last_commanded(), Some(arm.params().home_offset()));
        assert_eq!(log.lock().unwrap().len(), 6);
    }

    #[test]
    fn test_resting() {
        let (mut arm, _, log) = mock_ctrl();

        // From home, joint 3 travels 90 deg
        assert_eq!(arm.resting().unwrap(), 4.5);
        assert_eq!(
            arm.last_commanded(),
            Some(Joint6D::new(0.0, -75.0, 180.0, 0.0, 0.0, 0.0))
        );

        let log = log.lock().unwrap();
        assert_eq!(
            log[1],
            (ActId::Joint2, ActDem::AngleWithTime { angle_deg: -75.0, duration_s: 4.5 })
        );
        assert_eq!(
            log[2],
            (ActId::Joint3, ActDem::AngleWithTime { angle_deg: 90.0, duration_s: 4.5 })
        );
    }
}
