//! # Torque reduction gain
//!
//! On angle steering platforms the EPS takes a gain alongside the angle,
//! bounding how much torque it may use to reach the angle. The gain ramps
//! down quickly when the driver overrides and otherwise converges on a target
//! one step per tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::tuning::TuningSnapshot;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Slowest ramp down during an override, the lowest rate the EPS has been
/// seen to use.
///
/// Units: gain/tick
pub const MIN_OVERRIDE_RAMP_RATE: f64 = 0.004;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the torque reduction gain for this tick.
///
/// - `gain_last` is the gain (or torque) sent on the previous tick.
/// - `target_gain` is the planner's requested torque magnitude.
///
/// The result is not clamped to `[min_gain, max_gain]`, that is the caller's
/// job.
pub fn calc_torque_reduction_gain(
    steering_pressed: bool,
    gain_last: f64,
    target_gain: f64,
    tuning: &TuningSnapshot
) -> f64 {
    if steering_pressed {
        // Ramp down adaptively so the override is recognised within
        // `override_cycles` ticks whatever the starting gain
        let gain_delta = gain_last - tuning.min_gain;
        let ramp_rate = (gain_delta / tuning.override_cycles as f64).max(MIN_OVERRIDE_RAMP_RATE);

        (gain_last - ramp_rate).max(tuning.min_gain)
    }
    else {
        let target = target_gain.max(tuning.active_gain).min(tuning.max_gain);

        if gain_last > target {
            (gain_last - tuning.ramp_down_rate).max(target)
        }
        else {
            (gain_last + tuning.ramp_up_rate).min(target)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ramps_towards_target() {
        let t = TuningSnapshot::default();

        // Requests below the active gain target the active gain
        let g = calc_torque_reduction_gain(false, t.min_gain, 0.0, &t);
        assert!((g - (t.min_gain + t.ramp_up_rate)).abs() < 1e-12);

        // Never overshoots
        let g = calc_torque_reduction_gain(false, t.active_gain - 0.001, 0.0, &t);
        assert_eq!(g, t.active_gain);

        // Ramps down from above the target
        let g = calc_torque_reduction_gain(false, t.max_gain, 0.6, &t);
        assert!((g - (t.max_gain - t.ramp_down_rate)).abs() < 1e-12);

        // Requests above the max target the max
        let g = calc_torque_reduction_gain(false, t.max_gain, 3.0, &t);
        assert_eq!(g, t.max_gain);
    }

    #[test]
    fn test_override_ramp() {
        let t = TuningSnapshot { override_cycles: 10, ..TuningSnapshot::default() };

        // Adaptive rate from the top
        let g = calc_torque_reduction_gain(true, 1.0, 1.0, &t);
        let expected = 1.0 - (1.0 - t.min_gain) / 10.0;
        assert!((g - expected).abs() < 1e-12);

        // Floor rate close to the bottom
        let g = calc_torque_reduction_gain(true, t.min_gain + 0.01, 1.0, &t);
        assert!((g - (t.min_gain + 0.01 - MIN_OVERRIDE_RAMP_RATE)).abs() < 1e-12);

        // Never below the min
        let g = calc_torque_reduction_gain(true, t.min_gain + 0.001, 1.0, &t);
        assert_eq!(g, t.min_gain);
    }

    #[test]
    fn test_override_convergence() {
        let t = TuningSnapshot {
            min_gain: 0.1,
            max_gain: 1.0,
            override_cycles: 25,
            ..TuningSnapshot::default()
        };

        let bound = ((t.max_gain - t.min_gain) / MIN_OVERRIDE_RAMP_RATE).ceil() as usize;
        let mut gain = t.max_gain;
        let mut reached = None;

        for tick in 0..bound {
            let next = calc_torque_reduction_gain(true, gain, 1.0, &t);
            assert!(next <= gain);
            gain = next;

            if gain == t.min_gain {
                reached = Some(tick);
                break;
            }
        }

        assert!(reached.is_some(), "gain {} did not reach the min within {} ticks", gain, bound);
    }
}
