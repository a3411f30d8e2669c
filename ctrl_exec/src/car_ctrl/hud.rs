//! HUD alert processing for the legacy lane keeping message

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use bus_if::car::{HudControl, VisualAlert};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Lane keeping HUD state sent alongside the steering command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudAlert {
    /// Steering warning shown on the cluster.
    pub sys_warning: bool,

    /// Lane keeping system state (lane lines shown on the cluster).
    pub sys_state: u8,

    pub left_lane_warning: u8,
    pub right_lane_warning: u8
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map the HUD hints onto the lane keeping HUD state.
///
/// `ldw_warning_level` is the value the platform's cluster expects for an
/// active departure warning.
pub fn process_hud_alert(enabled: bool, ldw_warning_level: u8, hud: &HudControl) -> HudAlert {
    let sys_warning = matches!(hud.visual_alert, VisualAlert::SteerRequired | VisualAlert::Ldw);

    // The HUD alert is only displayed when the LKAS status is active
    let sys_state = if (hud.left_lane_visible && hud.right_lane_visible) || sys_warning {
        match enabled || sys_warning {
            true => 3,
            false => 4
        }
    }
    else if hud.left_lane_visible {
        5
    }
    else if hud.right_lane_visible {
        6
    }
    else {
        1
    };

    let warning = |depart: bool| match depart {
        true => ldw_warning_level,
        false => 0
    };

    HudAlert {
        sys_warning,
        sys_state,
        left_lane_warning: warning(hud.left_lane_depart),
        right_lane_warning: warning(hud.right_lane_depart)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sys_state() {
        let mut hud = HudControl::default();
        assert_eq!(process_hud_alert(true, 2, &hud).sys_state, 1);

        hud.left_lane_visible = true;
        assert_eq!(process_hud_alert(true, 2, &hud).sys_state, 5);

        hud.right_lane_visible = true;
        assert_eq!(process_hud_alert(true, 2, &hud).sys_state, 3);
        assert_eq!(process_hud_alert(false, 2, &hud).sys_state, 4);

        hud.left_lane_visible = false;
        assert_eq!(process_hud_alert(false, 2, &hud).sys_state, 6);
    }

    #[test]
    fn test_warnings() {
        let hud = HudControl {
            visual_alert: VisualAlert::Ldw,
            right_lane_depart: true,
            ..HudControl::default()
        };

        let a = process_hud_alert(false, 1, &hud);
        assert!(a.sys_warning);
        assert_eq!(a.sys_state, 3);
        assert_eq!(a.left_lane_warning, 0);
        assert_eq!(a.right_lane_warning, 1);
    }
}
