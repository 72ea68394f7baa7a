//! # Telecommand processor module
//!
//! The telecommand processor handles TCs coming from either the script or the
//! interactive shell.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use arm_lib::{
    actuator::{HandActuator, JointActuator},
    data_store::{DataStore, SafeModeCause},
};
use comms_if::tc::Tc;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub(crate) fn exec<A: JointActuator, H: HandActuator>(ds: &mut DataStore<A, H>, tc: &Tc) {

    // Handle different Tcs
    match tc {
        Tc::MakeSafe => {
            debug!("Recieved MakeSafe command");
            ds.make_safe(SafeModeCause::MakeSafeTc);
        },
        Tc::MakeUnsafe => {
            debug!("Recieved MakeUnsafe command");
            if let Err(cause) = ds.make_unsafe(SafeModeCause::MakeSafeTc) {
                warn!("Cannot leave safe mode, it was caused by {:?}", cause);
            }
        },
        Tc::ArmCtrl(cmd) => {
            debug!("Queueing ArmCmd::{:?}", cmd);
            ds.arm_cmd_queue.push_back(cmd.clone());
        }
    }

}
