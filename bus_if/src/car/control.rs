//! # Control request and actuator echo

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything the planner asks of the vehicle for one tick.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CarControl {
    /// True while the system is engaged.
    pub enabled: bool,

    /// Planner asserts steering actuation this tick.
    pub lat_active: bool,

    /// Planner asserts longitudinal actuation this tick.
    pub long_active: bool,

    /// Desired actuation.
    pub actuators: Actuators,

    /// Intents towards the stock cruise control.
    pub cruise_control: CruiseControl,

    /// HUD hints.
    pub hud_control: HudControl,

    pub left_blinker: bool,
    pub right_blinker: bool,

    /// Lane assist (always-on lateral) state.
    pub lane_assist: LaneAssistControl
}

/// Desired actuation produced by the planner.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Actuators {
    /// Requested steering torque as a fraction of the maximum, in [-1, 1].
    pub torque: f64,

    /// Requested steering wheel angle.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// Requested acceleration.
    ///
    /// Units: meters/second^2
    pub accel: f64,

    /// State of the longitudinal controller.
    pub long_control_state: LongControlState
}

/// Requests towards the stock cruise control system, only used when the
/// longitudinal control is left to the stock system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CruiseControl {
    pub cancel: bool,
    pub resume: bool,

    /// Driver is overriding the longitudinal control with the pedal.
    #[serde(rename = "override")]
    pub long_override: bool
}

/// HUD hints.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct HudControl {
    /// Target cruise speed.
    ///
    /// Units: meters/second
    pub set_speed_ms: f64,

    pub left_lane_visible: bool,
    pub right_lane_visible: bool,
    pub left_lane_depart: bool,
    pub right_lane_depart: bool,
    pub lead_visible: bool,

    /// Alert category to show on the cluster.
    pub visual_alert: VisualAlert
}

/// Lane assist state provided by the arbitration layer upstream.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneAssistControl {
    /// Lane assist is supported and switched on for this session.
    pub available: bool,

    /// Lane assist is engaged (it may be paused, with `lat_active` false).
    pub enabled: bool
}

/// Actuator state echoed back to the planner after the limits were applied.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ActuatorsOut {
    /// Applied torque as a fraction of the platform maximum.
    pub torque: f64,

    /// Applied torque (or torque reduction gain on angle platforms) in the
    /// units sent on the bus.
    pub torque_output_can: f64,

    /// Applied steering wheel angle.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// Realised acceleration.
    ///
    /// Units: meters/second^2
    pub accel: f64
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// State of the longitudinal controller.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LongControlState {
    Off,
    Pid,
    Stopping,
    Starting
}

/// Alert category shown on the cluster.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisualAlert {
    None,
    Fcw,
    SteerRequired,
    BrakePressed,
    WrongGear,
    SeatbeltUnbuckled,
    SpeedTooHigh,
    Ldw
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for LongControlState {
    fn default() -> Self {
        LongControlState::Off
    }
}

impl Default for VisualAlert {
    fn default() -> Self {
        VisualAlert::None
    }
}
