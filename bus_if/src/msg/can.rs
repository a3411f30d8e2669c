//! # Legacy CAN message set
//!
//! Builder arguments for the messages sent on legacy platforms.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use crate::car::{EsccSignals, SignalMap};
use super::Buttons;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CanPayload {
    /// Lane keeping command and HUD state (LKAS11)
    Lkas11 {
        frame: u64,
        apply_torque: f64,
        steer_req: bool,
        torque_fault: bool,
        stock: SignalMap,
        sys_warning: bool,
        sys_state: u8,
        enabled: bool,
        left_lane_visible: bool,
        right_lane_visible: bool,
        left_lane_warning: u8,
        right_lane_warning: u8,
        lkas_icon: u8
    },

    /// Cluster frame carrying a spoofed cruise button (CLU11)
    Clu11 {
        frame: u64,
        stock: SignalMap,
        button: Buttons
    },

    /// Adaptive cruise commands (SCC11/12/14 and optional FCA frames)
    AccCommands {
        enabled: bool,
        accel: f64,
        actual_accel: f64,
        jerk: f64,
        idx: u64,
        lead_visible: bool,
        set_speed: f64,
        stopping: bool,
        long_override: bool,
        use_fca: bool,
        main_cruise_enabled: bool,
        escc: Option<EsccSignals>
    },

    /// LFA and HDA icons on the multi function camera (LFAHDA_MFC)
    LfahdaMfc {
        enabled: bool,
        lfa_icon: u8
    },

    /// ACC option frames
    AccOpt {
        use_fca: bool,
        escc_enabled: bool
    },

    /// Front radar options
    FrtRadarOpt
}
