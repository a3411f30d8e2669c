//! # Vehicle state
//!
//! One snapshot of the vehicle, sampled before the tick starts. The control
//! core only ever reads it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Decoded signals of a stock bus frame, keyed by signal name.
///
/// The core never interprets these, it forwards them to the encoders which
/// copy the fields they do not override.
pub type SignalMap = BTreeMap<String, f64>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Vehicle state at the start of a tick.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct VehicleState {
    /// Raw (unfiltered) vehicle speed.
    ///
    /// Units: meters/second
    pub v_ego_raw_ms: f64,

    /// Measured steering wheel angle, positive to the left.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// Torque the driver is applying to the wheel as reported by the EPS.
    ///
    /// Units: EPS torque units
    pub steering_torque: f64,

    /// True if the driver is applying enough torque to count as an override.
    pub steering_pressed: bool,

    /// True if the cluster displays metric units.
    pub is_metric: bool,

    /// True if the stock cruise main switch is on.
    pub main_cruise_enabled: bool,

    /// Rolling counter of the last received cruise buttons frame.
    pub buttons_counter: u8,

    /// Last stock lane keeping frame (legacy platforms).
    pub lkas11: SignalMap,

    /// Last stock cluster frame (legacy platforms).
    pub clu11: SignalMap,

    /// Last stock LFA block frame (LKA steering platforms).
    pub lfa_block_msg: SignalMap,

    /// Last stock cruise info frame (alternate button platforms).
    pub cruise_info: SignalMap,

    /// Signals forwarded by the radar substitute, if one is fitted.
    pub escc: Option<EsccSignals>,

    /// Last frame captured by the ADAS driving ECU interceptor, if one is
    /// fitted.
    pub adas_drv_intercept: Option<SignalMap>
}

/// AEB signals forwarded by the enhanced SCC radar substitute.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct EsccSignals {
    pub aeb_warning: u8,
    pub aeb_dec_cmd_act: u8,
    pub cmd_act: u8,

    /// Units: meters/second^2
    pub aeb_dec_cmd: f64
}
