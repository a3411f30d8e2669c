//! Lane assist arbitration
//!
//! Decides which lane keeping icons the cluster shows. When lane assist is
//! available steering can be engaged independently of the cruise control, so
//! the icons follow the lateral state rather than the overall engagement.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use bus_if::car::CarControl;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of a lane keeping icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneAssistIcon {
    Off = 0,
    Active = 1,
    Standby = 2
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct LaneAssist {
    lkas_icon: LaneAssistIcon,
    lfa_icon: LaneAssistIcon
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LaneAssist {
    pub fn update(&mut self, cc: &CarControl, frame: u64) {
        let icon = match cc.lane_assist.available {
            true => {
                if cc.lat_active {
                    LaneAssistIcon::Active
                }
                else if cc.lane_assist.enabled {
                    LaneAssistIcon::Standby
                }
                else {
                    LaneAssistIcon::Off
                }
            },
            false => match cc.enabled {
                true => LaneAssistIcon::Active,
                false => LaneAssistIcon::Off
            }
        };

        if icon != self.lkas_icon {
            debug!("Lane assist icon {:?} -> {:?} at tick {}", self.lkas_icon, icon, frame);
        }

        self.lkas_icon = icon;
        self.lfa_icon = icon;
    }

    /// Icon value for the lane keeping message.
    pub fn lkas_icon(&self) -> u8 {
        self.lkas_icon as u8
    }

    /// Icon value for the LFA/HDA messages.
    pub fn lfa_icon(&self) -> u8 {
        self.lfa_icon as u8
    }
}

impl Default for LaneAssist {
    fn default() -> Self {
        Self {
            lkas_icon: LaneAssistIcon::Off,
            lfa_icon: LaneAssistIcon::Off
        }
    }
}
