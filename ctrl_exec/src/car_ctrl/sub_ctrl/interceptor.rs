//! ADAS driving ECU interceptor passthrough

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use bus_if::{
    bus::BusId,
    car::{SignalMap, VehicleState},
    msg::{Cadence, CanFdPayload, OutboundCommand}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Forwards the frames captured by the interceptor on behalf of the ADAS
/// driving ECU.
#[derive(Debug, Clone, Default)]
pub struct AdasDrvInterceptor {
    available: bool,
    last_frame: SignalMap
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AdasDrvInterceptor {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            last_frame: SignalMap::new()
        }
    }

    /// True if an interceptor is fitted. A fitted interceptor is assumed to be
    /// enabled.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Latch the latest captured frame.
    pub fn update(&mut self, cs: &VehicleState) {
        if !self.available {
            return;
        }

        if let Some(f) = &cs.adas_drv_intercept {
            self.last_frame = f.clone();
        }
    }

    /// Build the forwarded frame for this tick.
    pub fn create_msg(&self, bus: BusId, long_self_managed: bool) -> OutboundCommand {
        OutboundCommand::canfd(
            bus,
            Cadence::EveryTick,
            CanFdPayload::AdasDrvIntercept {
                stock: self.last_frame.clone(),
                long_self_managed
            }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_forwards_last_frame() {
        let mut ic = AdasDrvInterceptor::new(true);
        let mut cs = VehicleState::default();
        let mut frame = SignalMap::new();
        frame.insert("COUNTER".into(), 3.0);
        cs.adas_drv_intercept = Some(frame.clone());

        ic.update(&cs);
        cs.adas_drv_intercept = None;
        ic.update(&cs);

        match ic.create_msg(BusId(1), true).payload {
            bus_if::msg::Payload::CanFd(CanFdPayload::AdasDrvIntercept { stock, long_self_managed }) => {
                assert_eq!(stock, frame);
                assert!(long_self_managed);
            },
            p => panic!("Unexpected payload {:?}", p)
        }
    }
}
