//! # Data Store

use std::collections::VecDeque;

use comms_if::tc::arm_ctrl::ArmCmd;
use log::{info, warn};

use crate::{actuator::{HandActuator, JointActuator}, arm_ctrl};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the arm has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    MakeSafeTc,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore<A: JointActuator, H: HandActuator> {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub session_time_s: f64,

    // Safe mode variables
    /// Determines if the arm is in safe mode.
    pub safe: bool,

    /// Gives the reason for the arm being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // ArmCtrl
    pub arm_ctrl: arm_ctrl::ArmCtrl<A, H>,
    pub arm_ctrl_input: arm_ctrl::InputData,
    pub arm_ctrl_output: arm_ctrl::OutputData,
    pub arm_ctrl_status_rpt: arm_ctrl::StatusReport,

    /// Arm commands waiting to be processed, one is taken on each cycle.
    pub arm_cmd_queue: VecDeque<ArmCmd>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl<A: JointActuator, H: HandActuator> DataStore<A, H> {
    pub fn new(arm_ctrl: arm_ctrl::ArmCtrl<A, H>) -> Self {
        Self {
            num_cycles: 0,
            is_1_hz_cycle: false,
            session_time_s: 0.0,
            safe: false,
            safe_cause: None,
            arm_ctrl,
            arm_ctrl_input: arm_ctrl::InputData::default(),
            arm_ctrl_output: arm_ctrl::OutputData::default(),
            arm_ctrl_status_rpt: arm_ctrl::StatusReport::default(),
            arm_cmd_queue: VecDeque::new(),
            num_consec_cycle_overruns: 0,
        }
    }

    /// Puts the arm into safe mode with the given cause.
    ///
    /// Any queued arm commands are dropped.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);

            if !self.arm_cmd_queue.is_empty() {
                warn!("Dropping {} queued arm commands", self.arm_cmd_queue.len());
                self.arm_cmd_queue.clear();
            }

            // Make arm_ctrl safe
            self.arm_ctrl.make_safe();
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// To remove safe mode the provided cause must match the initial reason for safe mode being
    /// enabled, otherwise the root cause is returned as the error.
    ///
    /// If safe mode was not enabled `Ok(())` is returned
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), SafeModeCause> {
        if !self.safe {
            return Ok(());
        }

        match self.safe_cause {
            Some(root_cause) if root_cause != cause => Err(root_cause),
            _ => {
                self.safe = false;
                self.safe_cause = None;
                self.arm_ctrl.make_unsafe();
                info!("Make unsafe requested, root cause match, safe mode disabled");
                Ok(())
            }
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, sets the 1Hz cycle flag and
    /// takes the next queued arm command.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_second = (cycle_frequency_hz.round() as u128).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_second == 0;

        self.arm_ctrl_input = arm_ctrl::InputData {
            cmd: self.arm_cmd_queue.pop_front()
        };
        self.arm_ctrl_output = arm_ctrl::OutputData::default();
        self.arm_ctrl_status_rpt = arm_ctrl::StatusReport::default();

        self.session_time_s = util::session::get_elapsed_seconds();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{actuator::{ActDem, ActId, HandDem}, arm_ctrl::mock_ctrl_with_hand};

    #[test]
    fn test_safe_mode() {
        let (arm, _, log, hand_log) = mock_ctrl_with_hand();
        let mut ds = DataStore::new(arm);

        ds.arm_cmd_queue.push_back(ArmCmd::Resting);
        ds.make_safe(SafeModeCause::MakeSafeTc);

        assert!(ds.safe);
        assert!(ds.arm_ctrl.is_safe());
        assert!(ds.arm_cmd_queue.is_empty());
        assert_eq!(log.lock().unwrap()[0], (ActId::Joint1, ActDem::Enable(false)));
        assert_eq!(*hand_log.lock().unwrap(), vec![HandDem::CurrentLimit(0.0)]);

        // Making safe twice does nothing more
        ds.make_safe(SafeModeCause::MakeSafeTc);
        assert_eq!(log.lock().unwrap().len(), 6);

        assert_eq!(ds.make_unsafe(SafeModeCause::MakeSafeTc), Ok(()));
        assert!(!ds.safe);
        assert!(!ds.arm_ctrl.is_safe());
        assert_eq!(log.lock().unwrap()[6], (ActId::Joint1, ActDem::Enable(true)));

        assert_eq!(ds.make_unsafe(SafeModeCause::MakeSafeTc), Ok(()));
        assert_eq!(log.lock().unwrap().len(), 12);
        assert_eq!(
            *hand_log.lock().unwrap(),
            vec![HandDem::CurrentLimit(0.0), HandDem::CurrentLimit(0.7)]
        );
    }
}
