//! Implementations for the ArmCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::{ArmCtrlError, Params};
use crate::{
    actuator::{HandActuator, JointActuator, JointFeedback},
    kinematics::{Joint6D, Pose6D, Solver, NUM_JOINTS},
};
use comms_if::tc::arm_ctrl::ArmCmd;
use util::{module::State, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Arm control module state
pub struct ArmCtrl<A: JointActuator, H: HandActuator> {
    pub(crate) params: Params,

    pub(crate) solver: Solver,

    /// One actuator per joint, ordered from the base.
    pub(crate) actuators: [A; NUM_JOINTS],

    pub(crate) hand: H,

    /// Motor frame angles published by the actuators.
    pub(crate) feedback: JointFeedback,

    pub(crate) joint_speed_degs: f64,

    pub(crate) report: StatusReport,

    /// Target of the last joint space move that was sent to the actuators.
    pub(crate) last_commanded: Option<Joint6D>,

    /// Pose computed from the measured joints by the last
    /// [`ArmCtrl::update_joint_pose_6d`].
    pub(crate) current_pose: Option<Pose6D>,

    /// While safe every motion command is rejected.
    pub(crate) safe: bool,
}

/// Input data to Arm Control.
#[derive(Default)]
pub struct InputData {
    /// The arm command to be executed, or `None` if there is no new command
    /// on this cycle.
    pub cmd: Option<ArmCmd>,
}

/// Output of Arm Control.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct OutputData {
    /// Time the commanded motion will take, zero if nothing was sent.
    ///
    /// Units: seconds
    pub duration_s: f64,
}

/// Status report for ArmCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// The command on this cycle was rejected and nothing was sent to the
    /// actuators.
    pub cmd_rejected: bool,

    /// Number of inverse kinematics candidates which passed the limit check
    /// during a Cartesian move.
    pub num_ik_candidates: usize,

    pub safe: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<A: JointActuator, H: HandActuator> State for ArmCtrl<A, H> {
    type InitData = Params;
    type InitError = ArmCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ArmCtrlError;

    /// Initialise the ArmCtrl module.
    ///
    /// Expected init data is the loaded parameters, which the executable also
    /// needs to build the actuators.
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.set_params(init_data)?;

        info!(
            "ArmCtrl initialised, home pose {}, joint speed {} deg/s",
            self.params.home_offset(),
            self.joint_speed_degs
        );

        Ok(())
    }

    /// Perform cyclic processing of Arm Control.
    ///
    /// A rejected command is not an error, it is reported in the status
    /// report and gives a zero duration.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        let mut output = OutputData::default();

        if let Some(ref cmd) = input_data.cmd {
            debug!("New ArmCtrl ArmCmd::{:?}", cmd);

            match self.exec_cmd(cmd) {
                Ok(d) => output.duration_s = d,
                Err(e) => {
                    warn!("ArmCmd::{:?} rejected: {}", cmd, e);
                    self.report.cmd_rejected = true;
                }
            }
        }

        self.report.safe = self.safe;

        Ok((output, self.report))
    }
}

impl<A: JointActuator, H: HandActuator> ArmCtrl<A, H> {
    /// Create a new arm controller with the default parameters.
    ///
    /// `feedback` must be the cell the actuators publish their angles into.
    pub fn new(actuators: [A; NUM_JOINTS], hand: H, feedback: JointFeedback) -> Self {
        let params = Params::default();

        Self {
            solver: Solver::new(params.geometry),
            joint_speed_degs: params.joint_speed_degs,
            params,
            actuators,
            hand,
            feedback,
            report: StatusReport::default(),
            last_commanded: None,
            current_pose: None,
            safe: false,
        }
    }

    /// Create a new arm controller with the given parameters.
    pub fn with_params(
        params: Params,
        actuators: [A; NUM_JOINTS],
        hand: H,
        feedback: JointFeedback
    ) -> Result<Self, ArmCtrlError> {
        let mut ctrl = Self::new(actuators, hand, feedback);
        ctrl.set_params(params)?;
        Ok(ctrl)
    }

    fn set_params(&mut self, params: Params) -> Result<(), ArmCtrlError> {
        params.validate()?;

        self.solver = Solver::new(params.geometry);
        self.joint_speed_degs = params.joint_speed_degs;
        self.params = params;

        Ok(())
    }

    /// Execute a single command, returning the duration of any motion it
    /// started.
    pub fn exec_cmd(&mut self, cmd: &ArmCmd) -> Result<f64, ArmCtrlError> {
        match *cmd {
            ArmCmd::MoveJ { j1_deg, j2_deg, j3_deg, j4_deg, j5_deg, j6_deg } => {
                self.move_j(&Joint6D::new(j1_deg, j2_deg, j3_deg, j4_deg, j5_deg, j6_deg))
            },
            ArmCmd::MoveL { x_mm, y_mm, z_mm, a_deg, b_deg, c_deg } => {
                self.move_l(&Pose6D::from_euler(x_mm, y_mm, z_mm, a_deg, b_deg, c_deg))
            },
            ArmCmd::SetJointSpeed { speed_degs } => {
                self.set_joint_speed(speed_degs).map(|_| 0.0)
            },
            ArmCmd::Homing { already_calibrated } => self.homing(already_calibrated),
            ArmCmd::Resting => self.resting(),
            ArmCmd::SetEnable { enable } => self.set_enable(enable).map(|_| 0.0),
            ArmCmd::UpdateJointPos => {
                self.update_joint_pos();
                Ok(0.0)
            },
            ArmCmd::Reboot => {
                self.reboot();
                Ok(0.0)
            },
            ArmCmd::HandAngle { angle_deg } => {
                self.set_hand_angle(angle_deg).map(|_| 0.0)
            },
            ArmCmd::HandCurrentLimit { current_a } => {
                self.set_hand_current_limit(current_a).map(|_| 0.0)
            },
            ArmCmd::HandEnable { enable } => self.set_hand_enable(enable).map(|_| 0.0),
        }
    }

    /// Function called when entering safe mode.
    ///
    /// Disables every joint and the gripper so the arm holds no torque, and
    /// rejects all motion until [`ArmCtrl::make_unsafe`] is called.
    pub fn make_safe(&mut self) {
        self.safe = true;

        for act in self.actuators.iter_mut() {
            act.set_enable(false);
        }
        self.hand.set_enable(false, self.params.hand_max_current_a);
    }

    /// Function called when leaving safe mode.
    pub fn make_unsafe(&mut self) {
        self.safe = false;

        for act in self.actuators.iter_mut() {
            act.set_enable(true);
        }
        self.hand.set_enable(true, self.params.hand_max_current_a);
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }

    /// Set the speed of the furthest travelling joint in joint space moves.
    pub fn set_joint_speed(&mut self, speed_degs: f64) -> Result<(), ArmCtrlError> {
        if !(speed_degs > 0.0 && speed_degs.is_finite()) {
            return Err(ArmCtrlError::InvalidJointSpeed(speed_degs))
        }

        self.joint_speed_degs = speed_degs;

        Ok(())
    }

    pub fn joint_speed_degs(&self) -> f64 {
        self.joint_speed_degs
    }

    /// Enable or disable every joint and the gripper.
    ///
    /// Nothing can be enabled while the arm is in safe mode.
    pub fn set_enable(&mut self, enable: bool) -> Result<(), ArmCtrlError> {
        if enable && self.safe {
            return Err(ArmCtrlError::Safe)
        }

        for act in self.actuators.iter_mut() {
            act.set_enable(enable);
        }
        self.hand.set_enable(enable, self.params.hand_max_current_a);

        Ok(())
    }

    /// Enable the gripper at its configured current limit, or disable it.
    pub fn set_hand_enable(&mut self, enable: bool) -> Result<(), ArmCtrlError> {
        if enable && self.safe {
            return Err(ArmCtrlError::Safe)
        }

        self.hand.set_enable(enable, self.params.hand_max_current_a);

        Ok(())
    }

    /// Open the gripper jaws.
    ///
    /// Units: degrees
    pub fn set_hand_angle(&mut self, angle_deg: f64) -> Result<(), ArmCtrlError> {
        if self.safe {
            return Err(ArmCtrlError::Safe)
        }

        self.hand.set_angle(angle_deg);

        Ok(())
    }

    /// Set the gripper current limit directly.
    ///
    /// Units: amps
    pub fn set_hand_current_limit(&mut self, current_a: f64) -> Result<(), ArmCtrlError> {
        if self.safe && current_a > 0.0 {
            return Err(ArmCtrlError::Safe)
        }

        self.hand.set_current_limit(current_a);

        Ok(())
    }

    /// Reboot every joint driver.
    pub fn reboot(&mut self) {
        for act in self.actuators.iter_mut() {
            act.reboot();
        }
    }

    /// Ask every joint to publish its angle.
    ///
    /// The measurement arrives through the feedback, so
    /// [`ArmCtrl::current_joints`] may not reflect it straight away.
    pub fn update_joint_pos(&mut self) {
        for act in self.actuators.iter_mut() {
            act.update_angle();
        }
    }

    /// Compute the pose of the measured joints and cache it.
    ///
    /// Units: millimeters, degrees
    pub fn update_joint_pose_6d(&mut self) -> Pose6D {
        let pose = self.solver
            .solve_fk(&self.current_joints())
            .metres_to_mm();

        self.current_pose = Some(pose);

        pose
    }

    /// Last measured joint angles.
    ///
    /// Units: degrees
    pub fn current_joints(&self) -> Joint6D {
        self.feedback.snapshot() + self.params.home_offset()
    }

    /// Target of the last joint space move sent to the actuators, if any.
    ///
    /// This is not updated by the measurements, so it differs from
    /// [`ArmCtrl::current_joints`] while the arm is moving.
    pub fn last_commanded(&self) -> Option<Joint6D> {
        self.last_commanded
    }

    /// Pose cached by the last [`ArmCtrl::update_joint_pose_6d`].
    pub fn current_pose(&self) -> Option<Pose6D> {
        self.current_pose
    }

    /// The joint actuators, for the owner to drive simulated joints.
    pub fn actuators_mut(&mut self) -> &mut [A; NUM_JOINTS] {
        &mut self.actuators
    }

    /// The gripper, for the owner to drive a simulated one.
    pub fn hand_mut(&mut self) -> &mut H {
        &mut self.hand
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::actuator::{ActDem, ActId, HandDem};
    use super::super::{mock_ctrl as ctrl, mock_ctrl_with_hand};

    #[test]
    fn test_current_joints() {
        let (mut arm, fb, _) = ctrl();

        // Motors at zero are at home
        assert_eq!(arm.current_joints(), arm.params().home_offset());

        fb.publish(ActId::Joint3, -15.0);
        assert_eq!(arm.current_joints(), Joint6D::new(0.0, 0.0, 75.0, 0.0, 0.0, 0.0));

        let pose = arm.update_joint_pose_6d();
        assert_eq!(arm.current_pose(), Some(pose));

        // Home pose in millimeters
        arm.feedback.publish(ActId::Joint3, 0.0);
        let pose = arm.update_joint_pose_6d();
        assert!((pose.x - 222.0).abs() < 1e-9);
        assert!((pose.z - 307.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_joint_speed() {
        let (mut arm, _, _) = ctrl();

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY].iter() {
            assert!(matches!(
                arm.set_joint_speed(*bad),
                Err(ArmCtrlError::InvalidJointSpeed(_))
            ));
        }
        assert_eq!(arm.joint_speed_degs(), 20.0);

        arm.set_joint_speed(40.0).unwrap();
        assert_eq!(arm.joint_speed_degs(), 40.0);
    }

    #[test]
    fn test_broadcasts() {
        let (mut arm, _, log) = ctrl();

        arm.set_enable(false).unwrap();
        arm.reboot();
        arm.update_joint_pos();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 18);
        for (i, dem) in [ActDem::Enable(false), ActDem::Reboot, ActDem::UpdateAngle]
            .iter()
            .enumerate()
        {
            for (j, id) in ActId::ALL.iter().enumerate() {
                assert_eq!(log[i * 6 + j], (*id, *dem));
            }
        }
    }

    #[test]
    fn test_safe_mode() {
        let (mut arm, _, log) = ctrl();

        arm.make_safe();
        assert!(arm.is_safe());
        assert_eq!(log.lock().unwrap().len(), 6);

        let cmd = ArmCmd::MoveJ {
            j1_deg: 10.0, j2_deg: 0.0, j3_deg: 90.0,
            j4_deg: 0.0, j5_deg: 0.0, j6_deg: 0.0
        };
        let (out, report) = arm.proc(&InputData { cmd: Some(cmd.clone()) }).unwrap();
        assert_eq!(out.duration_s, 0.0);
        assert!(report.cmd_rejected);
        assert!(report.safe);
        assert!(matches!(arm.set_enable(true), Err(ArmCtrlError::Safe)));
        assert_eq!(log.lock().unwrap().len(), 6);

        arm.make_unsafe();
        let (out, report) = arm.proc(&InputData { cmd: Some(cmd) }).unwrap();
        assert_eq!(out.duration_s, 0.5);
        assert!(!report.cmd_rejected);
        assert!(!report.safe);
    }

    #[test]
    fn test_proc_without_cmd() {
        let (mut arm, _, log) = ctrl();

        let (out, report) = arm.proc(&InputData::default()).unwrap();
        assert_eq!(out, OutputData::default());
        assert!(!report.cmd_rejected);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hand() {
        let (mut arm, _, log, hand_log) = mock_ctrl_with_hand();

        for cmd in [
            ArmCmd::HandAngle { angle_deg: 40.0 },
            ArmCmd::HandCurrentLimit { current_a: 0.5 },
            ArmCmd::HandEnable { enable: false },
            ArmCmd::HandEnable { enable: true },
        ].iter() {
            assert_eq!(arm.exec_cmd(cmd).unwrap(), 0.0);
        }

        assert_eq!(
            *hand_log.lock().unwrap(),
            vec![
                HandDem::Angle(30.0),
                HandDem::CurrentLimit(0.5),
                HandDem::CurrentLimit(0.0),
                HandDem::CurrentLimit(0.7),
            ]
        );

        // The joints are not touched
        assert!(log.lock().unwrap().is_empty());

        // Enabling the arm switches the gripper too
        hand_log.lock().unwrap().clear();
        arm.set_enable(false).unwrap();
        arm.set_enable(true).unwrap();
        assert_eq!(
            *hand_log.lock().unwrap(),
            vec![HandDem::CurrentLimit(0.0), HandDem::CurrentLimit(0.7)]
        );
    }

    #[test]
    fn test_hand_safe_mode() {
        let (mut arm, _, _, hand_log) = mock_ctrl_with_hand();

        arm.make_safe();
        assert_eq!(*hand_log.lock().unwrap(), vec![HandDem::CurrentLimit(0.0)]);

        assert!(matches!(arm.set_hand_angle(10.0), Err(ArmCtrlError::Safe)));
        assert!(matches!(arm.set_hand_enable(true), Err(ArmCtrlError::Safe)));
        assert!(matches!(arm.set_hand_current_limit(0.3), Err(ArmCtrlError::Safe)));

        // Letting go is always allowed
        arm.set_hand_current_limit(0.0).unwrap();
        arm.set_hand_enable(false).unwrap();
        assert_eq!(hand_log.lock().unwrap().len(), 3);

        arm.make_unsafe();
        assert_eq!(hand_log.lock().unwrap()[3], HandDem::CurrentLimit(0.7));
        arm.set_hand_angle(10.0).unwrap();
        assert_eq!(hand_log.lock().unwrap()[4], HandDem::Angle(10.0));
    }
}
