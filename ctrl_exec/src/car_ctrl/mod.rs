//! # Car control module
//!
//! Per-tick steering and longitudinal actuation for a CAN/CAN FD platform.
//! The controller bounds the planner's requests so the EPS and radar never
//! see a command which would fault them, then decides which bus messages are
//! due on the tick.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod angle_limits;
pub mod fault_avoidance;
pub mod hud;
pub mod params;
pub mod sched;
pub mod sub_ctrl;
pub mod torque_gain;
pub mod torque_limits;
pub mod tuning;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use state::*;
pub use tuning::{TuningSnapshot, TuningSource, TuningError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Frequency the controller is ticked at.
///
/// Units: Hertz
pub const CONTROL_FREQUENCY_HZ: f64 = 100.0;

/// Period of one tick.
///
/// Units: seconds
pub const DT_CTRL_S: f64 = 1.0 / CONTROL_FREQUENCY_HZ;

/// Conversion from meters/second to kilometers/hour.
pub const MS_TO_KPH: f64 = 3.6;

/// Conversion from meters/second to miles/hour.
pub const MS_TO_MPH: f64 = 2.236936;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How the platform's EPS is commanded. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// A torque request, limited by the driver's own torque.
    TorqueSteering,

    /// A target steering wheel angle plus a torque reduction gain.
    AngleSteering
}

/// Possible errors that can occur during CarCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum CarCtrlError {
    #[error("Could not load the CarCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid CarCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("Could not apply the tuning overrides: {0}")]
    Tuning(#[from] TuningError),

    #[error("CarCtrl has not been initialised")]
    NotInitialised
}
