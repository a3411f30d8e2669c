//! Parameters structure for CarCtrl
//!
//! Every field has a compiled-in default so a parameter file only needs to
//! name the values which differ for the platform.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use bus_if::bus::{BusProtocol, CanFdBuses};
use crate::veh_model;
use super::ControlMode;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the car controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- PLATFORM ----

    /// Message set spoken by the platform.
    pub protocol: BusProtocol,

    /// Capability flags of the platform.
    pub flags: PlatformFlags,

    /// True if the longitudinal control is managed by this controller rather
    /// than the stock cruise control.
    pub long_self_managed: bool,

    /// Offset added to every CAN FD bus when the harness is multiplexed.
    pub bus_offset: u8,

    /// Lane departure warning level shown on the cluster. Some platforms
    /// only accept level 1.
    pub ldw_warning_level: u8,

    // ---- LIMITS ----

    /// Torque steering limits.
    pub steer: SteerLimits,

    /// Angle steering limits.
    pub angle: AngleLimits,

    /// Minimum acceleration command.
    ///
    /// Units: meters/second^2
    pub accel_min_ms2: f64,

    /// Maximum acceleration command.
    ///
    /// Units: meters/second^2
    pub accel_max_ms2: f64,

    // ---- SUB-CONTROLLERS ----

    /// Longitudinal tuning.
    pub long_tuning: LongTuningParams,

    /// Reference vehicle model used for the angle limits.
    pub veh_model: veh_model::Params
}

/// Capability flags of a platform.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PlatformFlags {
    /// Steering is commanded by angle rather than torque (CAN FD only).
    pub angle_steering: bool,

    /// Steering is done by the LKA ECU rather than the camera (CAN FD only).
    pub lka_steering: bool,

    /// Alternate LFA block message layout on LKA steering platforms.
    pub lka_steering_alt: bool,

    /// Cruise buttons live in an alternate message (CAN FD only).
    pub alt_buttons: bool,

    /// Smart cruise control is done by the camera (CAN FD only).
    pub camera_scc: bool,

    /// Blinkers can be requested through the parking assist ECU.
    pub enable_blinkers: bool,

    /// Send the LFA/HDA icons message (legacy only).
    pub send_lfa: bool,

    /// Forward collision avoidance frames are sent with the ACC commands.
    pub use_fca: bool,

    /// An enhanced SCC radar substitute is fitted.
    pub escc: bool,

    /// An ADAS driving ECU interceptor is fitted.
    pub adas_drv_interceptor: bool,

    /// Longitudinal tuning sub-controller is enabled.
    pub long_tuning: bool
}

/// Torque steering limits.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SteerLimits {
    /// Maximum steering torque.
    ///
    /// Units: EPS torque units
    pub steer_max: f64,

    /// Maximum increase of the torque magnitude per tick.
    pub delta_up: f64,

    /// Maximum decrease of the torque magnitude per tick.
    pub delta_down: f64,

    /// Driver torque below which the command is not reduced.
    pub driver_allowance: f64,

    /// Reduction of the command per unit of driver torque above the
    /// allowance.
    pub driver_multiplier: f64,

    /// Scale applied to the measured driver torque.
    pub driver_factor: f64
}

/// Angle steering limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AngleLimits {
    /// Maximum absolute steering wheel angle command.
    ///
    /// Units: degrees
    pub steer_angle_max_deg: f64,

    /// Hard cap on the angle change per tick, protecting the EPS.
    ///
    /// Units: degrees/tick
    pub max_angle_rate_deg: f64,

    /// Smoothing is only applied below this speed.
    ///
    /// Units: meters/second
    pub smoothing_max_vego_ms: f64,

    /// Speed breakpoints of the smoothing blend factor table.
    ///
    /// Units: meters/second
    pub smoothing_vego_ms: Vec<f64>,

    /// Smoothing blend factor at each speed breakpoint.
    pub smoothing_alpha: Vec<f64>
}

/// Longitudinal tuning parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LongTuningParams {
    /// Maximum rate of increase of the acceleration command.
    ///
    /// Units: meters/second^3
    pub jerk_upper_ms3: f64,

    /// Maximum rate of decrease of the acceleration command.
    ///
    /// Units: meters/second^3
    pub jerk_lower_ms3: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// The steering control mode of the platform.
    pub fn control_mode(&self) -> ControlMode {
        match self.flags.angle_steering {
            true => ControlMode::AngleSteering,
            false => ControlMode::TorqueSteering
        }
    }

    /// The CAN FD bus assignment of the platform.
    pub fn canfd_buses(&self) -> CanFdBuses {
        CanFdBuses::new(self.flags.lka_steering, self.bus_offset)
    }

    /// Check the parameters are consistent, returning a description of the
    /// first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.flags.angle_steering && self.protocol != BusProtocol::CanFd {
            return Err("angle steering is only supported on CAN FD platforms".into());
        }
        if self.steer.steer_max <= 0.0 {
            return Err(format!("steer_max must be positive, found {}", self.steer.steer_max));
        }
        if self.angle.steer_angle_max_deg <= 0.0 {
            return Err(format!(
                "steer_angle_max_deg must be positive, found {}",
                self.angle.steer_angle_max_deg
            ));
        }
        if self.angle.smoothing_vego_ms.is_empty()
            || self.angle.smoothing_vego_ms.len() != self.angle.smoothing_alpha.len()
        {
            return Err("smoothing tables must be non-empty and of equal length".into());
        }
        if self.angle.smoothing_vego_ms.windows(2).any(|w| w[1] < w[0]) {
            return Err("smoothing speed breakpoints must be increasing".into());
        }
        if self.accel_min_ms2 > self.accel_max_ms2 {
            return Err(format!(
                "accel_min_ms2 ({}) is greater than accel_max_ms2 ({})",
                self.accel_min_ms2, self.accel_max_ms2
            ));
        }

        Ok(())
    }

    /// Default parameters of a CAN FD platform.
    pub fn canfd() -> Self {
        Self {
            protocol: BusProtocol::CanFd,
            steer: SteerLimits {
                steer_max: 270.0,
                delta_up: 2.0,
                delta_down: 3.0,
                ..SteerLimits::default()
            },
            ..Self::default()
        }
    }

    /// Default parameters of a CAN FD angle steering platform.
    pub fn canfd_angle() -> Self {
        let mut p = Self::canfd();
        p.flags.angle_steering = true;
        p.flags.lka_steering = true;
        p
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            protocol: BusProtocol::Can,
            flags: PlatformFlags::default(),
            long_self_managed: false,
            bus_offset: 0,
            ldw_warning_level: 2,
            steer: SteerLimits::default(),
            angle: AngleLimits::default(),
            accel_min_ms2: -3.5,
            accel_max_ms2: 2.0,
            long_tuning: LongTuningParams::default(),
            veh_model: veh_model::Params::default()
        }
    }
}

impl Default for SteerLimits {
    fn default() -> Self {
        Self {
            steer_max: 384.0,
            delta_up: 3.0,
            delta_down: 7.0,
            driver_allowance: 50.0,
            driver_multiplier: 2.0,
            driver_factor: 1.0
        }
    }
}

impl Default for AngleLimits {
    fn default() -> Self {
        Self {
            steer_angle_max_deg: 180.0,
            max_angle_rate_deg: 5.0,
            smoothing_max_vego_ms: 30.0,
            smoothing_vego_ms: vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0],
            smoothing_alpha: vec![0.05, 0.1, 0.2, 0.35, 0.5, 0.75, 1.0]
        }
    }
}

impl Default for LongTuningParams {
    fn default() -> Self {
        Self {
            jerk_upper_ms3: 3.0,
            jerk_lower_ms3: 5.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
        assert!(Params::canfd().validate().is_ok());
        assert!(Params::canfd_angle().validate().is_ok());
    }

    #[test]
    fn test_angle_steering_needs_canfd() {
        let mut p = Params::default();
        p.flags.angle_steering = true;
        assert!(p.validate().is_err());
        assert_eq!(Params::canfd_angle().control_mode(), ControlMode::AngleSteering);
        assert_eq!(Params::default().control_mode(), ControlMode::TorqueSteering);
    }

    #[test]
    fn test_partial_param_file() {
        let p: Params = util::params::load_str(
            r#"
            protocol = "can_fd"
            long_self_managed = true

            [flags]
            lka_steering = true
            enable_blinkers = true

            [steer]
            steer_max = 270.0
            "#
        ).unwrap();

        assert_eq!(p.protocol, BusProtocol::CanFd);
        assert!(p.long_self_managed);
        assert!(p.flags.lka_steering && p.flags.enable_blinkers);
        assert!(!p.flags.escc);
        assert_eq!(p.steer.steer_max, 270.0);

        // Unset fields fall back on the defaults
        assert_eq!(p.steer.delta_down, 7.0);
        assert_eq!(p.angle.steer_angle_max_deg, 180.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_bad_smoothing_tables() {
        let mut p = Params::default();
        p.angle.smoothing_alpha.pop();
        assert!(p.validate().is_err());

        let mut p = Params::default();
        p.angle.smoothing_vego_ms = vec![10.0, 5.0];
        p.angle.smoothing_alpha = vec![0.1, 0.2];
        assert!(p.validate().is_err());
    }
}
