//! Longitudinal tuning sub-controller
//!
//! Runs on every other tick, at the rate the ACC command is sent. With tuning
//! enabled the acceleration command is jerk limited, otherwise it passes
//! straight through.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{clamp, rate_limit};

use bus_if::car::{CarControl, LongControlState};
use crate::car_ctrl::{params::Params, DT_CTRL_S};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period between two updates.
///
/// Units: seconds
const UPDATE_PERIOD_S: f64 = 2.0 * DT_CTRL_S;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct LongTuning {
    enabled: bool,
    accel_min_ms2: f64,
    accel_max_ms2: f64,
    jerk_upper_ms3: f64,
    jerk_lower_ms3: f64,

    /// Realised acceleration command.
    ///
    /// Units: meters/second^2
    pub actual_accel: f64,

    /// Jerk limits sent to the radar with the command.
    ///
    /// Units: meters/second^3
    pub jerk_upper: f64,
    pub jerk_lower: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LongTuning {
    pub fn new(params: &Params) -> Self {
        Self {
            enabled: params.flags.long_tuning,
            accel_min_ms2: params.accel_min_ms2,
            accel_max_ms2: params.accel_max_ms2,
            jerk_upper_ms3: params.long_tuning.jerk_upper_ms3,
            jerk_lower_ms3: params.long_tuning.jerk_lower_ms3,
            actual_accel: 0.0,
            jerk_upper: 0.0,
            jerk_lower: 0.0
        }
    }

    /// True if jerk limiting is applied.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn update(&mut self, cc: &CarControl) {
        let accel = clamp(
            &cc.actuators.accel,
            &self.accel_min_ms2,
            &self.accel_max_ms2
        );

        if !cc.long_active {
            self.actual_accel = 0.0;
            self.jerk_upper = 0.0;
            self.jerk_lower = 0.0;
            return;
        }

        if !self.enabled {
            self.actual_accel = accel;
            self.jerk_upper = self.jerk_upper_ms3;
            self.jerk_lower = self.jerk_lower_ms3;
            return;
        }

        // Stopping may brake as hard as it needs to
        let jerk_lower = match cc.actuators.long_control_state {
            LongControlState::Stopping => self.jerk_lower_ms3.max(self.jerk_upper_ms3) * 2.0,
            _ => self.jerk_lower_ms3
        };

        self.actual_accel = rate_limit(
            accel,
            self.actual_accel,
            -jerk_lower * UPDATE_PERIOD_S,
            self.jerk_upper_ms3 * UPDATE_PERIOD_S
        );
        self.jerk_upper = self.jerk_upper_ms3;
        self.jerk_lower = jerk_lower;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn active(accel: f64) -> CarControl {
        let mut cc = CarControl::default();
        cc.long_active = true;
        cc.actuators.accel = accel;
        cc.actuators.long_control_state = LongControlState::Pid;
        cc
    }

    #[test]
    fn test_passthrough_when_disabled() {
        let mut lt = LongTuning::new(&Params::default());
        lt.update(&active(1.5));
        assert_eq!(lt.actual_accel, 1.5);

        // Still clamped
        lt.update(&active(10.0));
        assert_eq!(lt.actual_accel, 2.0);
    }

    #[test]
    fn test_jerk_limited_when_enabled() {
        let mut p = Params::default();
        p.flags.long_tuning = true;
        let mut lt = LongTuning::new(&p);

        lt.update(&active(2.0));
        assert!((lt.actual_accel - 3.0 * UPDATE_PERIOD_S).abs() < 1e-12);

        lt.update(&active(-3.0));
        assert!((lt.actual_accel - (3.0 * UPDATE_PERIOD_S - 5.0 * UPDATE_PERIOD_S)).abs() < 1e-12);
    }

    #[test]
    fn test_inactive_resets() {
        let mut lt = LongTuning::new(&Params::default());
        lt.update(&active(1.0));

        let mut cc = active(1.0);
        cc.long_active = false;
        lt.update(&cc);
        assert_eq!(lt.actual_accel, 0.0);
    }
}
