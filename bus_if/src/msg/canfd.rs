//! # Extended CAN FD message set
//!
//! Builder arguments for the messages sent on CAN FD platforms.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use crate::car::SignalMap;
use super::Buttons;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CanFdPayload {
    /// Frame forwarded on behalf of the intercepted ADAS driving ECU
    AdasDrvIntercept {
        stock: SignalMap,
        long_self_managed: bool
    },

    /// Steering command, plus the LFA frame on LKA steering platforms
    Steering {
        enabled: bool,
        steer_req: bool,
        apply_torque: f64,
        apply_angle_deg: f64,
        angle_steering: bool,
        lkas_icon: u8
    },

    /// Stops the stock LFA activating by reporting no lane lines to the ADAS
    /// ECU
    SuppressLfa {
        stock: SignalMap,
        lka_steering_alt: bool
    },

    /// LFA and HDA cluster icons
    LfahdaCluster {
        enabled: bool,
        lfa_icon: u8
    },

    /// Blinker requests to the parking assist ECU
    SpasMessages {
        left_blinker: bool,
        right_blinker: bool
    },

    /// Frames normally produced by the suppressed ADAS driving ECU
    AdrvMessages {
        frame: u64
    },

    /// Forward collision warning light status
    FcaWarningLight {
        frame: u64
    },

    /// Adaptive cruise control command
    AccControl {
        enabled: bool,
        accel_last: f64,
        accel: f64,
        actual_accel: f64,
        jerk_upper: f64,
        jerk_lower: f64,
        stopping: bool,
        long_override: bool,
        set_speed: f64,
        lead_visible: bool,
        main_cruise_enabled: bool
    },

    /// Spoofed cruise buttons
    Buttons {
        counter: u8,
        button: Buttons
    },

    /// Cruise cancel on alternate button platforms
    AccCancel {
        cruise_info: SignalMap
    }
}
