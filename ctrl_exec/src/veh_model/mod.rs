//! # Vehicle kinematic model
//!
//! Steady state single track (bicycle) model relating path curvature to
//! steering wheel angle. The angle limiter uses it to turn lateral
//! acceleration and jerk budgets into angle and angle rate limits.
//!
//! Slip factor, curvature factor and roll compensation follow the classic
//! formulation:
//!
//! ```text
//! sf     = m (cF aF - cR aR) / (l^2 cF cR)
//! cf(u)  = 1 / (1 - sf u^2) / l
//! rc     = g roll / (1/sf - u^2)
//! steer  = (curv - rc) sR / cf(u)
//! ```

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Acceleration due to gravity.
///
/// Units: meters/second^2
pub const ACCELERATION_DUE_TO_GRAVITY: f64 = 9.81;

/// Below this magnitude the slip factor is treated as zero (neutral steer).
const NEUTRAL_SLIP_FACTOR: f64 = 1e-6;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Mapping between path curvature and steering wheel angle.
pub trait KinematicModel {
    /// Steering wheel angle needed to drive the given curvature.
    ///
    /// Units: `curv_m` 1/meters, `speed_ms` meters/second, `roll_rad`
    /// radians, returns radians.
    fn steer_from_curvature(&self, curv_m: f64, speed_ms: f64, roll_rad: f64) -> f64;

    /// Curvature driven with the given steering wheel angle.
    ///
    /// Units: `steer_rad` radians, `speed_ms` meters/second, `roll_rad`
    /// radians, returns 1/meters.
    fn curvature_from_steer(&self, steer_rad: f64, speed_ms: f64, roll_rad: f64) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Single track model built from a platform's parameters.
#[derive(Debug, Clone)]
pub struct VehicleModel {
    params: Params,

    /// Slip factor, cached since it only depends on the parameters.
    slip_factor: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleModel {
    /// Build the model for the given parameters.
    pub fn new(params: Params) -> Self {
        let slip_factor = calc_slip_factor(&params);

        Self { params, slip_factor }
    }

    /// Slip factor of the model. Negative values mean the vehicle understeers.
    pub fn slip_factor(&self) -> f64 {
        self.slip_factor
    }

    /// Model parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Curvature produced per radian of road wheel angle at the given speed.
    fn curvature_factor(&self, speed_ms: f64) -> f64 {
        1.0 / (1.0 - self.slip_factor * speed_ms.powi(2)) / self.params.wheelbase_m
    }

    /// Curvature induced by the road's roll (superelevation).
    fn roll_compensation(&self, roll_rad: f64, speed_ms: f64) -> f64 {
        if self.slip_factor.abs() < NEUTRAL_SLIP_FACTOR {
            0.0
        }
        else {
            (ACCELERATION_DUE_TO_GRAVITY * roll_rad) 
                / ((1.0 / self.slip_factor) - speed_ms.powi(2))
        }
    }
}

impl KinematicModel for VehicleModel {
    fn steer_from_curvature(&self, curv_m: f64, speed_ms: f64, roll_rad: f64) -> f64 {
        (curv_m - self.roll_compensation(roll_rad, speed_ms)) 
            * self.params.steer_ratio 
            / self.curvature_factor(speed_ms)
    }

    fn curvature_from_steer(&self, steer_rad: f64, speed_ms: f64, roll_rad: f64) -> f64 {
        steer_rad / self.params.steer_ratio * self.curvature_factor(speed_ms)
            + self.roll_compensation(roll_rad, speed_ms)
    }
}

impl Default for VehicleModel {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn calc_slip_factor(p: &Params) -> f64 {
    let center_to_rear_m = p.wheelbase_m - p.center_to_front_m;

    p.mass_kg 
        * (p.tire_stiffness_front * p.center_to_front_m 
            - p.tire_stiffness_rear * center_to_rear_m)
        / (p.wheelbase_m.powi(2) * p.tire_stiffness_front * p.tire_stiffness_rear)
}
