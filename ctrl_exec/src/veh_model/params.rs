//! Vehicle model parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

// Tyre stiffness of the platform the stiffness scaling is calibrated against.
const BASE_MASS_KG: f64 = 1326.0;
const BASE_WHEELBASE_M: f64 = 2.70;
const BASE_CENTER_TO_FRONT_M: f64 = BASE_WHEELBASE_M * 0.4;
const BASE_CENTER_TO_REAR_M: f64 = BASE_WHEELBASE_M - BASE_CENTER_TO_FRONT_M;
const BASE_TIRE_STIFFNESS_FRONT: f64 = 192150.0;
const BASE_TIRE_STIFFNESS_REAR: f64 = 202500.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the single track model.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Vehicle mass including a nominal driver.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Distance from the centre of gravity to the front axle.
    ///
    /// Units: meters
    pub center_to_front_m: f64,

    /// Ratio between steering wheel angle and road wheel angle.
    pub steer_ratio: f64,

    /// Front axle cornering stiffness.
    ///
    /// Units: newtons/radian
    pub tire_stiffness_front: f64,

    /// Rear axle cornering stiffness.
    ///
    /// Units: newtons/radian
    pub tire_stiffness_rear: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Build the parameters of a platform, scaling the base tyre stiffness by
    /// the platform's mass and weight distribution.
    pub fn from_platform(
        mass_kg: f64,
        wheelbase_m: f64,
        center_to_front_m: f64,
        steer_ratio: f64,
        tire_stiffness_factor: f64
    ) -> Self {
        let center_to_rear_m = wheelbase_m - center_to_front_m;
        let mass_scale = mass_kg / BASE_MASS_KG;

        let tire_stiffness_front = BASE_TIRE_STIFFNESS_FRONT * tire_stiffness_factor
            * mass_scale
            * (center_to_rear_m / wheelbase_m)
            / (BASE_CENTER_TO_REAR_M / BASE_WHEELBASE_M);

        let tire_stiffness_rear = BASE_TIRE_STIFFNESS_REAR * tire_stiffness_factor
            * mass_scale
            * (center_to_front_m / wheelbase_m)
            / (BASE_CENTER_TO_FRONT_M / BASE_WHEELBASE_M);

        Self {
            mass_kg,
            wheelbase_m,
            center_to_front_m,
            steer_ratio,
            tire_stiffness_front,
            tire_stiffness_rear
        }
    }
}

impl Default for Params {
    /// Least permissive angle steering platform. All angle steering platforms
    /// share its limits until each is characterised on its own.
    fn default() -> Self {
        Self::from_platform(2300.0, 2.955, 2.955 * 0.5, 14.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_base_platform_is_unscaled() {
        let p = Params::from_platform(
            BASE_MASS_KG, BASE_WHEELBASE_M, BASE_CENTER_TO_FRONT_M, 15.0, 1.0
        );

        assert!((p.tire_stiffness_front - BASE_TIRE_STIFFNESS_FRONT).abs() < 1e-6);
        assert!((p.tire_stiffness_rear - BASE_TIRE_STIFFNESS_REAR).abs() < 1e-6);
    }
}
