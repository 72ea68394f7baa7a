//! Main arm executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Simulated joint stepping
//!         - Telecommand processing and handling
//!         - Arm control processing
//!         - Joint position feedback and pose monitoring
//!
//! # Modules
//!
//! All modules (e.g. `arm_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use arm_lib::{
    actuator::{sim::{SimHand, SimJoint}, JointFeedback},
    arm_ctrl::{self, ArmCtrl},
    data_store::DataStore,
    params::ArmExecParams,
};

mod shell;
mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use shell::{Shell, ShellEvent};
use util::{
    raise_error,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingTcs},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Six joint arm executable.
#[derive(StructOpt)]
#[structopt(name = "arm_exec")]
struct Opts {
    /// TC script to execute. If not given an interactive shell is started.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Minimum level of log messages to output.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the telecommands incoming to the exec.
enum TcSource {
    Script(ScriptInterpreter),
    Shell(Shell),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "arm_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opts.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ArmExecParams = util::params::load("arm_exec.toml")
        .wrap_err("Could not load exec params")?;

    if !(exec_params.cycle_period_s > 0.0) {
        raise_error!(
            "The cycle period must be positive, found {} s",
            exec_params.cycle_period_s
        );
    }

    let arm_ctrl_params: arm_ctrl::Params = util::params::load("arm_ctrl.toml")
        .wrap_err("Could not load ArmCtrl params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    // TC source is used to determine whether we're getting TCs from a script
    // or from the operator.
    let mut tc_source = match opts.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            // Load the script interpreter
            let si = ScriptInterpreter::new(path)
                .wrap_err("Failed to load script")?;

            // Display some info
            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_tcs()
            );

            TcSource::Script(si)
        },
        None => {
            info!("No script provided, commands will be read from the shell\n");
            TcSource::Shell(Shell::spawn().wrap_err("Failed to start the shell")?)
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let feedback = JointFeedback::default();
    let joints = SimJoint::bank(
        &arm_ctrl_params.reductions,
        &arm_ctrl_params.inverted,
        exec_params.sim_enabled_at_start,
        &feedback
    );
    info!(
        "Simulated joints created, {}",
        if exec_params.sim_enabled_at_start { "enabled" } else { "disabled" }
    );

    let hand = SimHand::new(match exec_params.sim_enabled_at_start {
        true => arm_ctrl_params.hand_max_current_a,
        false => 0.0
    });
    info!("Simulated gripper created");

    let mut arm_ctrl = ArmCtrl::new(joints, hand, feedback);
    arm_ctrl.init(arm_ctrl_params, &session)
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    // ---- INITIALISE DATASTORE ----

    let mut ds = DataStore::new(arm_ctrl);

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let cycle_frequency_hz = exec_params.cycle_frequency_hz();

    info!("Begining main loop\n");

    'main: loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- SIMULATION ----

        for joint in ds.arm_ctrl.actuators_mut().iter_mut() {
            joint.step(exec_params.cycle_period_s);
        }
        ds.arm_ctrl.hand_mut().step(exec_params.cycle_period_s);

        // ---- TELECOMMAND PROCESSING ----

        // Branch depending on the source
        match tc_source {
            TcSource::Script(ref mut si) =>
                match si.get_pending_tcs() {
                    PendingTcs::None => (),
                    PendingTcs::Some(tc_vec) => {
                        for tc in tc_vec.iter() {
                            tc_processor::exec(&mut ds, tc);
                        }
                    }
                    // Exit if end of script reached
                    PendingTcs::EndOfScript => {
                        info!("End of TC script reached, stopping");
                        break 'main
                    }
                },

            TcSource::Shell(ref shell) => {
                // Get commands until none remain
                while let Some(event) = shell.poll() {
                    match event {
                        ShellEvent::Tc(tc) => tc_processor::exec(&mut ds, &tc),
                        ShellEvent::Exit => {
                            info!("Shell closed, stopping");
                            break 'main
                        }
                    }
                }
            }
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        // ArmCtrl processing
        match ds.arm_ctrl.proc(&ds.arm_ctrl_input) {
            Ok((o, r)) => {
                if o.duration_s > 0.0 {
                    info!("Arm moving for {:.3} s", o.duration_s);
                }
                ds.arm_ctrl_output = o;
                ds.arm_ctrl_status_rpt = r;
            },
            Err(e) => {
                warn!("Error during ArmCtrl processing: {}", e)
            }
        };

        // ---- JOINT FEEDBACK ----

        ds.arm_ctrl.update_joint_pos();

        if ds.is_1_hz_cycle {
            let pose = ds.arm_ctrl.update_joint_pose_6d();
            debug!(
                "[{:.1} s] Joints: {}, pose: {}",
                ds.session_time_s,
                ds.arm_ctrl.current_joints(),
                pose
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution after {} cycles", ds.num_cycles);

    Ok(())
}
