//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface.
//!
//! Telecommands can be built in two ways: from JSON, which is how scripts
//! store them, or from a command line, which is how the interactive shell
//! reads them:
//!
//! ```text
//! {"type": "ArmCtrl", "payload": {"MoveJ": {"j1_deg": 10, ...}}}
//! arm movej 10 0 90 0 0 0
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod arm_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use structopt::StructOpt;
use thiserror::Error;

// Internal
use arm_ctrl::ArmCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the arm executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(tag = "type", content = "payload")]
#[structopt(name = "tc", about = "Arm telecommands")]
pub enum Tc {
    /// Put the arm into safe mode, disabling all joints.
    #[structopt(name = "safe")]
    MakeSafe,

    /// Leave safe mode and re-enable all joints.
    #[structopt(name = "unsafe")]
    MakeUnsafe,

    /// A command for arm control.
    #[structopt(name = "arm")]
    ArmCtrl(ArmCmd),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC command line is invalid: {0}")]
    InvalidCommandLine(String),

    #[error("TC command line is empty")]
    Empty
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }

    /// Parse a new TC from a single line of shell input, for example
    /// `arm movel 250 0 300 0 90 0`.
    ///
    /// Help requests are reported as `InvalidCommandLine` carrying the help
    /// text.
    pub fn from_line(line: &str) -> Result<Self, TcParseError> {
        let mut words = line.split_whitespace().peekable();

        if words.peek().is_none() {
            return Err(TcParseError::Empty)
        }

        Tc::from_iter_safe(std::iter::once("tc").chain(words))
            .map_err(|e| TcParseError::InvalidCommandLine(e.message))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        assert_eq!(
            Tc::from_json(r#"{"type": "MakeSafe"}"#).unwrap(),
            Tc::MakeSafe
        );
        assert_eq!(
            Tc::from_json(
                r#"{"type": "ArmCtrl", "payload": {"Homing": {"already_calibrated": true}}}"#
            ).unwrap(),
            Tc::ArmCtrl(ArmCmd::Homing { already_calibrated: true })
        );
        assert!(matches!(
            Tc::from_json(r#"{"type": "ArmCtrl"}"#),
            Err(TcParseError::InvalidJson(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "Teleport", "payload": {}}"#),
            Err(TcParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_json_through_and_back() {
        let tc = Tc::ArmCtrl(ArmCmd::MoveL {
            x_mm: 250.0,
            y_mm: -20.0,
            z_mm: 300.0,
            a_deg: 0.0,
            b_deg: 90.0,
            c_deg: 0.0
        });

        let json = tc.to_json().unwrap();
        assert!(json.contains("\"type\":\"ArmCtrl\""));
        assert_eq!(Tc::from_json(&json).unwrap(), tc);
    }

    #[test]
    fn test_from_line() {
        assert_eq!(Tc::from_line("safe").unwrap(), Tc::MakeSafe);
        assert_eq!(
            Tc::from_line("arm movej 10 -20.5 90 0 0 -45").unwrap(),
            Tc::ArmCtrl(ArmCmd::MoveJ {
                j1_deg: 10.0,
                j2_deg: -20.5,
                j3_deg: 90.0,
                j4_deg: 0.0,
                j5_deg: 0.0,
                j6_deg: -45.0
            })
        );
        assert_eq!(
            Tc::from_line("  arm   speed 35 ").unwrap(),
            Tc::ArmCtrl(ArmCmd::SetJointSpeed { speed_degs: 35.0 })
        );
        assert_eq!(
            Tc::from_line("arm homing --already-calibrated").unwrap(),
            Tc::ArmCtrl(ArmCmd::Homing { already_calibrated: true })
        );
        assert_eq!(
            Tc::from_line("arm enable false").unwrap(),
            Tc::ArmCtrl(ArmCmd::SetEnable { enable: false })
        );
        assert_eq!(
            Tc::from_line("arm hand 12.5").unwrap(),
            Tc::ArmCtrl(ArmCmd::HandAngle { angle_deg: 12.5 })
        );
        assert_eq!(
            Tc::from_line("arm hand-current 0.4").unwrap(),
            Tc::ArmCtrl(ArmCmd::HandCurrentLimit { current_a: 0.4 })
        );
        assert_eq!(
            Tc::from_line("arm hand-enable true").unwrap(),
            Tc::ArmCtrl(ArmCmd::HandEnable { enable: true })
        );
        assert!(matches!(Tc::from_line("   "), Err(TcParseError::Empty)));
        assert!(matches!(
            Tc::from_line("arm movej 1 2 3"),
            Err(TcParseError::InvalidCommandLine(_))
        ));
    }
}
