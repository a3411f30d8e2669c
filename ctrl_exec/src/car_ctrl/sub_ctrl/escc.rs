//! Enhanced SCC radar substitute passthrough

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use bus_if::car::{EsccSignals, VehicleState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Forwards the AEB signals of the radar substitute into the ACC commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Escc {
    enabled: bool,
    signals: EsccSignals
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Escc {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            signals: EsccSignals::default()
        }
    }

    /// True if the radar substitute is fitted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Latch the latest forwarded signals. Ticks without fresh signals keep
    /// the previous ones.
    pub fn update(&mut self, cs: &VehicleState) {
        if !self.enabled {
            return;
        }

        if let Some(s) = cs.escc {
            self.signals = s;
        }
    }

    /// Signals to forward, or `None` when the substitute is not fitted.
    pub fn signals(&self) -> Option<EsccSignals> {
        match self.enabled {
            true => Some(self.signals),
            false => None
        }
    }
}
