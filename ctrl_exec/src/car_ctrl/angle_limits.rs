//! # Steering angle limits
//!
//! Bounds the angle command of angle steering platforms. The bounds are
//! derived from lateral jerk and lateral acceleration budgets through the
//! reference vehicle model, so they hold the same physical meaning at every
//! speed.
//!
//! The reference model is the least permissive angle steering platform, used
//! for all angle steering platforms since they are not yet characterised
//! individually.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{clamp, interp, rate_limit};

use crate::veh_model::{KinematicModel, ACCELERATION_DUE_TO_GRAVITY};
use super::{params::AngleLimits, CONTROL_FREQUENCY_HZ};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Baseline lateral acceleration limit.
///
/// Units: meters/second^2
pub const ISO_LATERAL_ACCEL: f64 = 3.0;

/// Baseline lateral jerk limit.
///
/// Units: meters/second^3
pub const ISO_LATERAL_JERK: f64 = 3.0;

/// Superelevation of an average banked road (~3.4 degrees).
///
/// The safety layer does not know the road roll, so the budgets get this much
/// extra tolerance. A higher actual roll lowers the lateral acceleration.
pub const AVERAGE_ROAD_ROLL: f64 = 0.06;

/// Lateral acceleration budget, ~3.6 m/s^2.
pub const MAX_LATERAL_ACCEL: f64 = ISO_LATERAL_ACCEL + ACCELERATION_DUE_TO_GRAVITY * AVERAGE_ROAD_ROLL;

/// Lateral jerk budget, ~3.6 m/s^3.
pub const MAX_LATERAL_JERK: f64 = ISO_LATERAL_JERK + ACCELERATION_DUE_TO_GRAVITY * AVERAGE_ROAD_ROLL;

/// Range of angles the steering message can encode.
///
/// Units: degrees
pub const ENCODABLE_ANGLE_MIN_DEG: f64 = -819.2;
pub const ENCODABLE_ANGLE_MAX_DEG: f64 = 819.1;

/// Changes smaller than this are not smoothed.
///
/// Units: degrees
pub const SMOOTHING_DEADZONE_DEG: f64 = 0.1;

/// Speeds are floored to this before dividing by their square.
///
/// Units: meters/second
pub const MIN_LIMIT_SPEED_MS: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-tick inputs of the angle limiter.
#[derive(Debug, Clone, Copy)]
pub struct AngleLimitInput {
    /// Angle requested by the planner.
    ///
    /// Units: degrees
    pub desired_angle_deg: f64,

    /// Raw vehicle speed.
    ///
    /// Units: meters/second
    pub v_ego_raw_ms: f64,

    /// Measured steering wheel angle.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// Steering actuation requested this tick.
    pub lat_active: bool,

    /// Angle commanded on the previous tick.
    ///
    /// Units: degrees
    pub apply_angle_last_deg: f64
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Maximum angle change per tick allowed by the lateral jerk budget.
///
/// `v_ego_ms` must already be floored away from zero.
///
/// Units: degrees/tick
pub fn get_max_angle_delta(v_ego_ms: f64, model: &dyn KinematicModel, freq_hz: f64) -> f64 {
    // (1/m)/s
    let max_curvature_rate = MAX_LATERAL_JERK / v_ego_ms.powi(2);

    // deg/s
    let max_angle_rate = model.steer_from_curvature(max_curvature_rate, v_ego_ms, 0.0).to_degrees();

    max_angle_rate / freq_hz
}

/// Maximum angle magnitude allowed by the lateral acceleration budget.
///
/// `v_ego_ms` must already be floored away from zero.
///
/// Units: degrees
pub fn get_max_angle(v_ego_ms: f64, model: &dyn KinematicModel) -> f64 {
    // 1/m
    let max_curvature = MAX_LATERAL_ACCEL / v_ego_ms.powi(2);

    model.steer_from_curvature(max_curvature, v_ego_ms, 0.0).to_degrees()
}

/// Blend the new angle with the previous one by a speed dependant factor.
///
/// Smoothing is strong at low speed and relaxes as speed grows. Changes below
/// `SMOOTHING_DEADZONE_DEG` are returned unchanged so small corrections stay
/// responsive.
pub fn smooth_angle(
    v_ego_raw_ms: f64,
    apply_angle_deg: f64,
    apply_angle_last_deg: f64,
    limits: &AngleLimits
) -> f64 {
    if (apply_angle_deg - apply_angle_last_deg).abs() <= SMOOTHING_DEADZONE_DEG {
        return apply_angle_deg;
    }

    // Tables are validated with the parameters, an empty table means no
    // smoothing
    let alpha = match interp(v_ego_raw_ms, &limits.smoothing_vego_ms, &limits.smoothing_alpha) {
        Some(a) => a.min(1.0),
        None => 1.0
    };

    apply_angle_deg * alpha + apply_angle_last_deg * (1.0 - alpha)
}

/// Apply all angle limits, returning the angle to command this tick.
pub fn apply_steer_angle_limits(
    input: &AngleLimitInput,
    limits: &AngleLimits,
    smoothing_enabled: bool,
    model: &dyn KinematicModel
) -> f64 {
    let v_ego_raw = input.v_ego_raw_ms;
    let mut apply_angle = clamp(
        &input.desired_angle_deg,
        &ENCODABLE_ANGLE_MIN_DEG,
        &ENCODABLE_ANGLE_MAX_DEG
    );

    if smoothing_enabled && v_ego_raw.abs() < limits.smoothing_max_vego_ms {
        apply_angle = smooth_angle(v_ego_raw, apply_angle, input.apply_angle_last_deg, limits);
    }

    let v_limit = v_ego_raw.max(MIN_LIMIT_SPEED_MS);

    // ---- LATERAL JERK ----

    let max_angle_delta = get_max_angle_delta(v_limit, model, CONTROL_FREQUENCY_HZ)
        .min(limits.max_angle_rate_deg);

    let mut new_apply_angle = rate_limit(
        apply_angle,
        input.apply_angle_last_deg,
        -max_angle_delta,
        max_angle_delta
    );

    // ---- LATERAL ACCELERATION ----

    let max_angle = get_max_angle(v_limit, model);
    new_apply_angle = clamp(&new_apply_angle, &-max_angle, &max_angle);

    // Track the real angle while inactive so engaging starts from it
    if !input.lat_active {
        new_apply_angle = input.steering_angle_deg;
    }

    clamp(
        &new_apply_angle,
        &-limits.steer_angle_max_deg,
        &limits.steer_angle_max_deg
    )
}
