//! # Driver aware torque limits
//!
//! Rate limits the torque command of torque steering platforms. The torque
//! the driver applies against the command shrinks the allowed command, and the
//! command may move back towards zero faster than it may grow.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::clamp;

use super::params::SteerLimits;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Limit `apply_torque` given the last command and the driver's torque.
///
/// The result is rounded to a whole torque unit, halves to even.
pub fn apply_driver_steer_torque_limits(
    apply_torque: f64,
    apply_torque_last: f64,
    driver_torque: f64,
    limits: &SteerLimits
) -> f64 {
    let steer_max = limits.steer_max;

    // ---- DRIVER TORQUE ----

    let driver_max_torque = steer_max
        + (limits.driver_allowance + driver_torque * limits.driver_factor) * limits.driver_multiplier;
    let driver_min_torque = -steer_max
        + (-limits.driver_allowance + driver_torque * limits.driver_factor) * limits.driver_multiplier;

    let max_steer_allowed = steer_max.min(driver_max_torque).max(0.0);
    let min_steer_allowed = (-steer_max).max(driver_min_torque).min(0.0);

    let mut torque = clamp(&apply_torque, &min_steer_allowed, &max_steer_allowed);

    // ---- RATE ----

    // Slow rate if the torque increases in magnitude
    if apply_torque_last > 0.0 {
        torque = clamp(
            &torque,
            &(apply_torque_last - limits.delta_down).max(-limits.delta_up),
            &(apply_torque_last + limits.delta_up)
        );
    }
    else {
        torque = clamp(
            &torque,
            &(apply_torque_last - limits.delta_up),
            &(apply_torque_last + limits.delta_down).min(limits.delta_up)
        );
    }

    torque.round_ties_even()
}
