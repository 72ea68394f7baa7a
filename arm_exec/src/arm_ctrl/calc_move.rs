//! Joint space and Cartesian moves

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace};

use super::{ArmCtrl, ArmCtrlError};
use crate::{
    actuator::{HandActuator, JointActuator},
    kinematics::{Joint6D, Pose6D},
};
use comms_if::eqpt::mech::ActId;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<A: JointActuator, H: HandActuator> ArmCtrl<A, H> {
    /// Send every joint to the target, timed so that the joint with the
    /// furthest to go moves at the joint speed.
    ///
    /// No limits are checked. The measured joints are left alone, they only
    /// change once the actuators report back.
    ///
    /// Returns the duration of the move in seconds.
    pub fn move_joints(&mut self, target: &Joint6D) -> f64 {
        let delta = *target - self.current_joints();
        let duration_s = delta.abs_max() / self.joint_speed_degs;

        let motor = *target - self.params.home_offset();

        for (act, angle_deg) in self.actuators.iter_mut().zip(motor.iter()) {
            act.set_angle_with_time(*angle_deg, duration_s);
        }

        debug!("Moving joints to {} over {:.3} s", target, duration_s);

        self.last_commanded = Some(*target);

        duration_s
    }

    /// Joint space move, rejected if any joint would leave its limits.
    pub fn move_j(&mut self, target: &Joint6D) -> Result<f64, ArmCtrlError> {
        if self.safe {
            return Err(ArmCtrlError::Safe)
        }

        self.check_limits(target)?;

        Ok(self.move_joints(target))
    }

    /// Cartesian move.
    ///
    /// Of the inverse kinematics candidates which reach the pose and are
    /// within the joint limits, the one needing the smallest single joint
    /// rotation from the measured joints is executed as a joint space move.
    ///
    /// The kinematics are seeded with all joints at zero rather than the
    /// measured joints. The seed only matters at singularities.
    pub fn move_l(&mut self, target: &Pose6D) -> Result<f64, ArmCtrlError> {
        if self.safe {
            return Err(ArmCtrlError::Safe)
        }

        let solutions = self.solver.solve_ik(target, &Joint6D::default());

        for (i, c, flags) in solutions.candidates() {
            let flags: Vec<i8> = flags.iter().map(|f| i8::from(*f)).collect();
            trace!("IK candidate {}: {} flags {:?}", i, c, flags);
        }

        let valid: Vec<Joint6D> = solutions
            .candidates()
            .filter(|(i, c, _)| solutions.is_reachable(*i) && self.check_limits(c).is_ok())
            .map(|(_, c, _)| *c)
            .collect();

        self.report.num_ik_candidates = valid.len();

        let current = self.current_joints();
        let target_joints = match select_closest(valid.iter(), &current) {
            Some(j) => *j,
            None => return Err(ArmCtrlError::NoValidSolution(*target))
        };

        debug!(
            "MoveL to {} using {} of {} valid IK candidates",
            target, target_joints, valid.len()
        );

        self.move_j(&target_joints)
    }

    /// Check every joint of `joints` is within its limits.
    pub fn check_limits(&self, joints: &Joint6D) -> Result<(), ArmCtrlError> {
        let home = self.params.home_offset();

        for id in ActId::ALL.iter() {
            let i = id.index();

            // Limits apply in the motor frame
            let angle_deg = joints[i] - home[i];
            let min_deg = self.params.joint_min_deg[i] - home[i];
            let max_deg = self.params.joint_max_deg[i] - home[i];

            if !(angle_deg >= min_deg && angle_deg <= max_deg) {
                return Err(ArmCtrlError::JointLimit {
                    joint: *id,
                    angle_deg,
                    min_deg,
                    max_deg
                })
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Select the candidate whose largest single joint difference from `current`
/// is smallest.
///
/// Ties go to the earliest candidate. Returns `None` if there are no
/// candidates.
pub fn select_closest<'a, I>(candidates: I, current: &Joint6D) -> Option<&'a Joint6D>
where
    I: Iterator<Item = &'a Joint6D>
{
    let mut best: Option<(&Joint6D, f64)> = None;

    for c in candidates {
        let dist = (*current - *c).abs_max();

        match best {
            Some((_, d)) if d <= dist => (),
            _ => best = Some((c, dist))
        }
    }

    best.map(|(c, _)| c)
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::{mock_ctrl, InputData};
    use crate::actuator::ActDem;
    use comms_if::tc::arm_ctrl::ArmCmd;
    use util::module::State;

    fn sent_angles(log: &[(ActId, ActDem)]) -> Vec<(ActId, f64, f64)> {
        log.iter()
            .filter_map(|(id, dem)| match dem {
                ActDem::AngleWithTime { angle_deg, duration_s } => {
                    Some((*id, *angle_deg, *duration_s))
                },
                _ => None
            })
            .collect()
    }

    #[test]
    fn test_move_j() {
        let (mut arm, _, log) = mock_ctrl();

        let target = Joint6D::new(10.0, 0.0, 90.0, 0.0, 0.0, 0.0);
        assert_eq!(arm.move_j(&target).unwrap(), 0.5);
        assert_eq!(arm.last_commanded(), Some(target));

        // Measurements have not arrived yet
        assert_eq!(arm.current_joints(), arm.params().home_offset());

        let sent = sent_angles(&log.lock().unwrap());
        assert_eq!(sent.len(), 6);
        assert_eq!(sent[0], (ActId::Joint1, 10.0, 0.5));
        assert_eq!(sent[2], (ActId::Joint3, 0.0, 0.5));
        for (j, s) in sent.iter().enumerate() {
            assert_eq!(s.0, ActId::ALL[j]);
        }
    }

    #[test]
    fn test_move_j_limits() {
        let (mut arm, _, log) = mock_ctrl();

        let cmd = ArmCmd::MoveJ {
            j1_deg: 999.0, j2_deg: 0.0, j3_deg: 0.0,
            j4_deg: 0.0, j5_deg: 0.0, j6_deg: 0.0
        };
        let (out, report) = arm.proc(&InputData { cmd: Some(cmd) }).unwrap();
        assert_eq!(out.duration_s, 0.0);
        assert!(report.cmd_rejected);

        assert!(matches!(
            arm.move_j(&Joint6D::new(999.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
            Err(ArmCtrlError::JointLimit { joint: ActId::Joint1, .. })
        ));

        // Limits are inclusive
        assert!(arm.move_j(&Joint6D::new(0.0, -75.0, 180.0, 0.0, 0.0, 0.0)).is_ok());
        assert!(matches!(
            arm.move_j(&Joint6D::new(0.0, -75.1, 180.0, 0.0, 0.0, 0.0)),
            Err(ArmCtrlError::JointLimit { joint: ActId::Joint2, .. })
        ));

        // Only the valid move was sent
        assert_eq!(sent_angles(&log.lock().unwrap()).len(), 6);
    }

    #[test]
    fn test_move_l() {
        let (mut arm, _, log) = mock_ctrl();

        let joints = Joint6D::new(10.0, 20.0, 100.0, 30.0, 40.0, 50.0);
        let target = arm.solver().solve_fk(&joints).metres_to_mm();

        let duration_s = arm.move_l(&target).unwrap();
        assert!((duration_s - 2.5).abs() < 1e-6);
        assert_eq!(arm.report.num_ik_candidates, 2);

        let commanded = arm.last_commanded().unwrap();
        assert!((commanded - joints).abs_max() < 1e-6);

        let sent = sent_angles(&log.lock().unwrap());
        assert_eq!(sent.len(), 6);
        for (j, s) in sent.iter().enumerate() {
            let home = arm.params().home_offset();
            assert!((s.1 - (joints[j] - home[j])).abs() < 1e-6);
        }
    }

    #[test]
    fn test_move_l_follows_measured_joints() {
        let (mut arm, fb, log) = mock_ctrl();

        let joints = Joint6D::new(10.0, 20.0, 100.0, 30.0, 40.0, 50.0);
        let flipped = Joint6D::new(10.0, 20.0, 100.0, -150.0, -40.0, -130.0);
        let target = arm.solver().solve_fk(&joints).metres_to_mm();

        // Wrist measured close to the flipped solution
        fb.publish(ActId::Joint4, -150.0);
        fb.publish(ActId::Joint5, -40.0);
        fb.publish(ActId::Joint6, -130.0);

        let duration_s = arm.move_l(&target).unwrap();
        assert_eq!(arm.report.num_ik_candidates, 2);

        // Only the shoulder has 20 deg to go
        assert!((duration_s - 1.0).abs() < 1e-6);
        assert!((arm.last_commanded().unwrap() - flipped).abs_max() < 1e-6);

        let sent = sent_angles(&log.lock().unwrap());
        assert!((sent[3].1 + 150.0).abs() < 1e-6);
        assert!((sent[5].1 + 130.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_l_unreachable() {
        let (mut arm, _, log) = mock_ctrl();

        let cmd = ArmCmd::MoveL {
            x_mm: 1000.0, y_mm: 0.0, z_mm: 300.0,
            a_deg: 0.0, b_deg: 90.0, c_deg: 0.0
        };
        let (out, report) = arm.proc(&InputData { cmd: Some(cmd) }).unwrap();

        assert_eq!(out.duration_s, 0.0);
        assert!(report.cmd_rejected);
        assert_eq!(report.num_ik_candidates, 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_move_l_never_exceeds_limits() {
        let (mut arm, _, log) = mock_ctrl();

        let poses = [
            Pose6D::from_euler(150.0, 40.0, 250.0, 10.0, 60.0, -20.0),
            Pose6D::from_euler(-100.0, 120.0, 150.0, 180.0, 0.0, 45.0),
            Pose6D::from_euler(0.0, -200.0, 100.0, 90.0, 30.0, 0.0),
        ];

        for p in poses.iter() {
            let _ = arm.move_l(p);
        }

        let params = arm.params().clone();
        for (id, angle_deg, _) in sent_angles(&log.lock().unwrap()) {
            let i = id.index();
            let home = params.home_offset_deg[i];
            assert!(angle_deg >= params.joint_min_deg[i] - home);
            assert!(angle_deg <= params.joint_max_deg[i] - home);
        }
    }

    #[test]
    fn test_select_closest() {
        let current = Joint6D::new(0.0, 0.0, 90.0, 0.0, 0.0, 0.0);
        let candidates = [
            Joint6D::new(30.0, 0.0, 90.0, 0.0, 0.0, 0.0),
            Joint6D::new(0.0, 10.0, 80.0, 10.0, 0.0, 0.0),
            Joint6D::new(0.0, -10.0, 90.0, 0.0, 0.0, 5.0),
            Joint6D::new(0.0, 0.0, 90.0, 0.0, 0.0, 50.0),
        ];

        // Candidates 1 and 2 tie, the first wins
        let best = select_closest(candidates.iter(), &current).unwrap();
        assert_eq!(*best, candidates[1]);

        assert!(select_closest([].iter(), &current).is_none());
    }
}
