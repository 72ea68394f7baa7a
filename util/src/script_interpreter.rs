//! # Arm script interpreter module
//!
//! Arm scripts are plain text files of timed telecommands, one per entry:
//!
//! ```text
//! 1.0: {"type": "ArmCtrl", "payload": {"SetJointSpeed": {"speed_degs": 30.0}}};
//! ```
//!
//! Each entry is a time in seconds since the start of the session, a colon,
//! the JSON form of a [`Tc`] and a terminating semicolon.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::tc::{Tc, TcParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Matches one `<time>: <json>;` entry per line.
const ENTRY_PATTERN: &str = r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug)]
struct Command {
    exec_time_s: f64,
    tc: Tc
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_tcs` to acquire the telecommands that need executing.
#[derive(Debug)]
pub struct ScriptInterpreter {
    script_path: Option<PathBuf>,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, TcParseError),

    #[error("Could not build the script pattern: {0}")]
    PatternError(regex::Error)
}

/// Result of polling the interpreter for telecommands.
#[derive(Debug)]
pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut interp = Self::from_script(&script)?;
        interp.script_path = Some(path);

        Ok(interp)
    }

    /// Create a new interpreter from the text of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {
        let re = RegexBuilder::new(ENTRY_PATTERN)
            .multi_line(true)
            .build()
            .map_err(ScriptError::PatternError)?;

        let mut cmds = VecDeque::new();

        for cap in re.captures_iter(script) {
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Scripts contain JSON only
            let tc = Tc::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

            cmds.push_back(Command { exec_time_s, tc });
        }

        if cmds.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            script_path: None,
            cmds
        })
    }

    /// Return the TCs whose execution time has passed, based on the session
    /// clock.
    pub fn get_pending_tcs(&mut self) -> PendingTcs {
        self.get_pending_tcs_at(get_elapsed_seconds())
    }

    /// Return the TCs whose execution time is before `current_time_s`.
    pub fn get_pending_tcs_at(&mut self, current_time_s: f64) -> PendingTcs {

        // An empty queue means the script is over
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript
        }

        let mut tc_vec: Vec<Tc> = vec![];

        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                tc_vec.push(cmd.tc);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        }
        else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Path of the loaded script, if it was loaded from a file.
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    /// Get the number of TCs left in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::arm_ctrl::ArmCmd;

    const SCRIPT: &str = r#"
        0.5: {"type": "MakeUnsafe"};
        1.0: {"type": "ArmCtrl", "payload": {"SetJointSpeed": {"speed_degs": 30.0}}};
        1.0: {"type": "ArmCtrl", "payload": "Resting"};
        4.25: {"type": "MakeSafe"};
    "#;

    #[test]
    fn test_parse_script() {
        let interp = ScriptInterpreter::from_script(SCRIPT).unwrap();

        assert_eq!(interp.get_num_tcs(), 4);
        assert_eq!(interp.get_duration(), 4.25);
        assert!(interp.script_path().is_none());
    }

    #[test]
    fn test_demo_script() {
        let interp = ScriptInterpreter::from_script(
            include_str!("../../scripts/arm_demo.arm")
        ).unwrap();

        assert_eq!(interp.get_num_tcs(), 11);
        assert_eq!(interp.get_duration(), 20.0);
    }

    #[test]
    fn test_pending_tcs() {
        let mut interp = ScriptInterpreter::from_script(SCRIPT).unwrap();

        assert!(matches!(interp.get_pending_tcs_at(0.1), PendingTcs::None));

        match interp.get_pending_tcs_at(1.5) {
            PendingTcs::Some(tcs) => {
                assert_eq!(tcs.len(), 3);
                assert_eq!(tcs[0], Tc::MakeUnsafe);
                assert_eq!(
                    tcs[1], 
                    Tc::ArmCtrl(ArmCmd::SetJointSpeed { speed_degs: 30.0 })
                );
                assert_eq!(tcs[2], Tc::ArmCtrl(ArmCmd::Resting));
            },
            p => panic!("Expected 3 pending TCs, got {:?}", p)
        }

        assert!(matches!(interp.get_pending_tcs_at(5.0), PendingTcs::Some(_)));
        assert!(matches!(interp.get_pending_tcs_at(6.0), PendingTcs::EndOfScript));
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            ScriptInterpreter::from_script("# nothing to see here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script("2.0: {\"type\": \"Dance\"};"),
            Err(ScriptError::InvalidTc(t, _)) if t == 2.0
        ));
        assert!(matches!(
            ScriptInterpreter::new("/definitely/not/a/script.arm"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
