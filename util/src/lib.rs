//! Utility library for the arm software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
#[macro_use]
pub mod logger;
pub mod maths;
pub mod module;
pub mod params;
pub mod session;
pub mod script_interpreter;
pub mod time;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use comms_if;
pub use color_eyre::eyre;

// ---------------------------------------------------------------------------
// MACROS
// ---------------------------------------------------------------------------

/// Log an unrecoverable error and return it from the enclosing function as an
/// `eyre::Report`.
///
/// # Notes
/// - Only for use in executables whose `main` returns `eyre::Result`. Library
///   code should return its own error type instead.
#[macro_export]
macro_rules! raise_error {
    () => ({
        log::error!("Explicit error raised.");
        return Err($crate::eyre::eyre!("Unrecoverable error"));
    });
    ($fmt:expr) => ({
        log::error!("{}", $fmt);
        return Err($crate::eyre::eyre!("{}", $fmt));
    });
    ($fmt:expr, $($arg:tt)*) => ({
        log::error!("{}", std::format_args!($fmt, $($arg)*));
        return Err($crate::eyre::eyre!($fmt, $($arg)*));
    });
}
