//! # Cadence scheduler
//!
//! Decides which messages are due on a tick and builds their descriptors, in
//! the order they must be transmitted. Periodic messages are due on a tick
//! modulus, button spoofing is throttled by the ticks elapsed since the last
//! batch.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod can;
mod canfd;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use bus_if::{
    bus::{BusId, BusProtocol, CanFdBuses},
    car::{CarControl, VehicleState},
    msg::{Cadence, OutboundCommand, Payload}
};
use super::{
    params::{Params, PlatformFlags},
    sub_ctrl::{AdasDrvInterceptor, Escc, LongTuning}
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Diagnostic address of the radar (or ADAS driving ECU on CAN FD).
pub const RADAR_ADDR: u32 = 0x7d0;

/// Diagnostic address of the ADAS driving ECU on LKA steering platforms.
pub const ADRV_ADDR: u32 = 0x730;

/// Diagnostic address of the parking assist ECU, which owns the blinkers.
pub const SPAS_ADDR: u32 = 0x7b1;

/// Ticks which must elapse, exclusive, before another resume batch on legacy
/// platforms (0.1 s).
pub const CAN_RESUME_MIN_TICKS: u64 = 10;

/// Ticks which must elapse, inclusive, before the legacy resume latch moves
/// (0.15 s). Since the latch moves with every batch this also bounds the
/// batch rate.
pub const CAN_RESUME_LATCH_TICKS: u64 = 15;

/// Number of resume messages in a legacy batch.
pub const CAN_RESUME_BATCH: usize = 25;

/// Ticks which must elapse, exclusive, before another button batch on CAN FD
/// platforms (0.25 s).
pub const CANFD_BUTTON_MIN_TICKS: u64 = 25;

/// Number of button messages in a CAN FD batch.
pub const CANFD_BUTTON_BATCH: usize = 20;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything the scheduler needs to build the messages of one tick.
///
/// The commands have already been bounded by the controller.
pub struct TickCommand<'a> {
    pub frame: u64,

    pub cs: &'a VehicleState,
    pub cc: &'a CarControl,

    /// Steering request bit.
    pub steer_req: bool,

    /// Torque (or gain on angle steering platforms) to command.
    pub apply_torque: f64,

    /// Angle to command.
    ///
    /// Units: degrees
    pub apply_angle_deg: f64,

    /// Request cut by fault avoidance while lateral control is active.
    pub torque_fault: bool,

    /// Clamped acceleration command.
    ///
    /// Units: meters/second^2
    pub accel: f64,

    pub stopping: bool,

    /// Set speed in the cluster's units.
    pub set_speed: f64,

    pub lkas_icon: u8,
    pub lfa_icon: u8,

    pub long_tuning: &'a LongTuning,
    pub escc: &'a Escc,
    pub interceptor: &'a AdasDrvInterceptor
}

/// Message scheduler state.
#[derive(Debug, Clone)]
pub struct Scheduler {
    protocol: BusProtocol,
    flags: PlatformFlags,
    long_self_managed: bool,
    ldw_warning_level: u8,
    buses: CanFdBuses,

    /// Tick of the last button batch which moved the latch, `None` if no
    /// batch has been sent yet.
    last_button_frame: Option<u64>,

    /// Acceleration sent in the last ACC control message (CAN FD).
    ///
    /// Units: meters/second^2
    accel_last: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scheduler {
    pub fn new(params: &Params) -> Self {
        Self {
            protocol: params.protocol,
            flags: params.flags,
            long_self_managed: params.long_self_managed,
            ldw_warning_level: params.ldw_warning_level,
            buses: params.canfd_buses(),
            last_button_frame: None,
            accel_last: 0.0
        }
    }

    /// Build the ordered list of messages due on this tick.
    pub fn build(&mut self, tick: &TickCommand) -> Vec<OutboundCommand> {
        let mut sends = Vec::new();

        self.tester_present(tick, &mut sends);

        match self.protocol {
            BusProtocol::Can => self.create_can_msgs(tick, &mut sends),
            BusProtocol::CanFd => self.create_canfd_msgs(tick, &mut sends)
        }

        trace!("Tick {}: {} messages due", tick.frame, sends.len());

        sends
    }

    /// Tick of the last button batch which moved the latch.
    pub fn last_button_frame(&self) -> Option<u64> {
        self.last_button_frame
    }

    /// Acceleration sent in the last ACC control message.
    pub fn accel_last(&self) -> f64 {
        self.accel_last
    }

    /// Number of ticks since the button latch last moved. Saturates when no
    /// batch has been sent yet.
    fn ticks_since_button(&self, frame: u64) -> u64 {
        match self.last_button_frame {
            Some(f) => frame.saturating_sub(f),
            None => u64::MAX
        }
    }

    /// Keep the ECUs this controller stands in for in their diagnostic
    /// session so they stay off the bus.
    fn tester_present(&self, tick: &TickCommand, sends: &mut Vec<OutboundCommand>) {
        if !Cadence::Hz1.is_due(tick.frame) || !self.long_self_managed {
            return;
        }

        // Something else is already standing in for the radar
        if self.flags.camera_scc || tick.escc.enabled() || tick.interceptor.available() {
            return;
        }

        let (addr, bus) = match self.protocol {
            BusProtocol::Can => (RADAR_ADDR, BusId::PT),
            BusProtocol::CanFd => match self.flags.lka_steering {
                true => (ADRV_ADDR, self.buses.ecan),
                false => (RADAR_ADDR, self.buses.ecan)
            }
        };

        sends.push(tester_present_msg(addr, bus));

        if self.flags.enable_blinkers {
            sends.push(tester_present_msg(SPAS_ADDR, self.buses.ecan));
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn tester_present_msg(addr: u32, bus: BusId) -> OutboundCommand {
    OutboundCommand::new(
        bus,
        Cadence::Hz1,
        Payload::TesterPresent {
            addr,
            suppress_response: true
        }
    )
}
