//! # Tuning snapshot
//!
//! Torque reduction gain and smoothing knobs. They have compiled-in defaults
//! which can be overridden once, at construction, from a key-value store.
//! The snapshot is read-only afterwards.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use std::collections::HashMap;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Store key of the minimum torque reduction gain, in percent.
pub const KEY_MIN_GAIN: &str = "HkgTuningAngleMinTorqueReductionGain";

/// Store key of the maximum torque reduction gain, in percent.
pub const KEY_MAX_GAIN: &str = "HkgTuningAngleMaxTorqueReductionGain";

/// Store key of the active torque reduction gain, in percent.
pub const KEY_ACTIVE_GAIN: &str = "HkgTuningAngleActiveTorqueReductionGain";

/// Store key of the number of ticks over which a driver override ramps the
/// gain down.
pub const KEY_OVERRIDE_CYCLES: &str = "HkgTuningOverridingCycles";

/// Store key of the angle smoothing enable flag.
pub const KEY_SMOOTHING_ENABLED: &str = "EnableHkgTuningAngleSmoothingFactor";

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A read-only key-value store holding tuning overrides.
pub trait TuningSource {
    /// Get the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Get a boolean flag. Missing keys read as false.
    fn get_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(v) => matches!(v.trim(), "1" | "true" | "True"),
            None => false
        }
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tuning values fixed for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningSnapshot {
    /// Lowest gain, reached while the driver overrides.
    pub min_gain: f64,

    /// Highest gain.
    pub max_gain: f64,

    /// Lowest gain targeted while the driver is not overriding.
    pub active_gain: f64,

    /// Gain increase per tick.
    pub ramp_up_rate: f64,

    /// Gain decrease per tick when the driver is not overriding.
    pub ramp_down_rate: f64,

    /// Number of ticks over which a driver override brings the gain down to
    /// `min_gain`.
    pub override_cycles: u32,

    /// Low speed angle smoothing enabled.
    pub smoothing_enabled: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while building the tuning snapshot.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Tuning value for {key} is not valid: {value:?}")]
    InvalidValue {
        key: &'static str,
        value: String
    },

    #[error("Tuning gains are not ordered: min {min}, active {active}, max {max}")]
    GainsNotOrdered {
        min: f64,
        active: f64,
        max: f64
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TuningSnapshot {
    /// Apply overrides from the given source on top of this snapshot.
    ///
    /// Gains are stored as percentages. A gain of zero is treated as unset and
    /// keeps the current value. When a source is given the smoothing flag is
    /// always taken from it, so a missing flag disables smoothing.
    pub fn with_overrides(mut self, source: &dyn TuningSource) -> Result<Self, TuningError> {
        if let Some(g) = parse_gain(source, KEY_MIN_GAIN)? {
            self.min_gain = g;
        }
        if let Some(g) = parse_gain(source, KEY_MAX_GAIN)? {
            self.max_gain = g;
        }
        if let Some(g) = parse_gain(source, KEY_ACTIVE_GAIN)? {
            self.active_gain = g;
        }

        if let Some(raw) = source.get(KEY_OVERRIDE_CYCLES) {
            match raw.trim().parse::<u32>() {
                Ok(c) if c > 0 => self.override_cycles = c,
                _ => return Err(TuningError::InvalidValue {
                    key: KEY_OVERRIDE_CYCLES,
                    value: raw
                })
            }
        }

        self.smoothing_enabled = source.get_bool(KEY_SMOOTHING_ENABLED);

        self.validate()?;

        info!("Tuning overrides applied: {:?}", self);

        Ok(self)
    }

    /// Check the gains are ordered `min <= active <= max`.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.min_gain <= self.active_gain && self.active_gain <= self.max_gain) {
            return Err(TuningError::GainsNotOrdered {
                min: self.min_gain,
                active: self.active_gain,
                max: self.max_gain
            });
        }

        Ok(())
    }
}

impl Default for TuningSnapshot {
    fn default() -> Self {
        Self {
            min_gain: 0.1,
            max_gain: 1.0,
            active_gain: 0.5,
            ramp_up_rate: 0.01,
            ramp_down_rate: 0.02,
            override_cycles: 17,
            smoothing_enabled: true
        }
    }
}

impl TuningSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl TuningSource for toml::value::Table {
    fn get(&self, key: &str) -> Option<String> {
        use toml::Value;

        match toml::value::Table::get(self, key)? {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            v => {
                debug!("Ignoring non-scalar tuning value for {}: {:?}", key, v);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a gain stored as a percentage, returning `None` if the key is
/// missing or holds zero.
fn parse_gain(source: &dyn TuningSource, key: &'static str) -> Result<Option<f64>, TuningError> {
    let raw = match source.get(key) {
        Some(r) => r,
        None => return Ok(None)
    };

    let pct: f64 = match raw.trim().parse() {
        Ok(p) => p,
        Err(_) => return Err(TuningError::InvalidValue { key, value: raw })
    };

    if !pct.is_finite() || pct < 0.0 {
        return Err(TuningError::InvalidValue { key, value: raw });
    }

    match pct == 0.0 {
        true => Ok(None),
        false => Ok(Some(pct / 100.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn store(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_overrides_applied() {
        let s = store(&[
            (KEY_MIN_GAIN, "20"),
            (KEY_MAX_GAIN, "90"),
            (KEY_ACTIVE_GAIN, "40"),
            (KEY_OVERRIDE_CYCLES, "25"),
            (KEY_SMOOTHING_ENABLED, "1"),
        ]);

        let t = TuningSnapshot::default().with_overrides(&s).unwrap();

        assert!((t.min_gain - 0.2).abs() < 1e-12);
        assert!((t.max_gain - 0.9).abs() < 1e-12);
        assert!((t.active_gain - 0.4).abs() < 1e-12);
        assert_eq!(t.override_cycles, 25);
        assert!(t.smoothing_enabled);
    }

    #[test]
    fn test_zero_or_missing_keeps_default() {
        let s = store(&[(KEY_MIN_GAIN, "0")]);
        let d = TuningSnapshot::default();
        let t = d.clone().with_overrides(&s).unwrap();

        assert_eq!(t.min_gain, d.min_gain);
        assert_eq!(t.max_gain, d.max_gain);
        assert_eq!(t.override_cycles, d.override_cycles);

        // A source without the flag disables smoothing
        assert!(!t.smoothing_enabled);
    }

    #[test]
    fn test_invalid_values() {
        let s = store(&[(KEY_MAX_GAIN, "lots")]);
        assert!(matches!(
            TuningSnapshot::default().with_overrides(&s),
            Err(TuningError::InvalidValue { key: KEY_MAX_GAIN, .. })
        ));

        let s = store(&[(KEY_OVERRIDE_CYCLES, "0")]);
        assert!(TuningSnapshot::default().with_overrides(&s).is_err());

        // Active gain above the max
        let s = store(&[(KEY_ACTIVE_GAIN, "95"), (KEY_MAX_GAIN, "80")]);
        assert!(matches!(
            TuningSnapshot::default().with_overrides(&s),
            Err(TuningError::GainsNotOrdered { .. })
        ));
    }

    #[test]
    fn test_toml_source() {
        let table: toml::value::Table = toml::from_str(
            r#"
            HkgTuningAngleMinTorqueReductionGain = 15
            HkgTuningOverridingCycles = "30"
            EnableHkgTuningAngleSmoothingFactor = true
            "#
        ).unwrap();

        let t = TuningSnapshot::default().with_overrides(&table).unwrap();

        assert!((t.min_gain - 0.15).abs() < 1e-12);
        assert_eq!(t.override_cycles, 30);
        assert!(t.smoothing_enabled);
    }
}
