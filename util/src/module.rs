//! Cyclic module interface
//!
//! Control modules in `arm_exec` are initialised once from their parameters
//! and then processed once per control cycle by the executable's main loop.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// A module driven by the control cycle.
pub trait State {
    /// Data needed by `init`, usually the parameter file path.
    type InitData;
    /// Failure during `init`.
    type InitError;

    /// Data consumed by one call to `proc`.
    type InputData;
    /// Data produced by one call to `proc`.
    type OutputData;
    /// Summary of what happened during one call to `proc`.
    type StatusReport;
    /// Failure during `proc`.
    type ProcError;

    /// Initialise the module before the first cycle.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one cycle of the module.
    ///
    /// Returns the output data with a status report, or a `ProcError` if the
    /// cycle could not be completed.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
