//! # Outbound message descriptors
//!
//! The control core never builds bus frames itself. For every message it
//! decides to send on a tick it emits an `OutboundCommand`, which names the
//! bus, the cadence the message belongs to and the arguments of the message
//! builder. Encoding the payload to bits is the job of the bus encoders.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Legacy CAN message set
pub mod can;

/// Extended CAN FD message set
pub mod canfd;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use crate::bus::BusId;

pub use can::CanPayload;
pub use canfd::CanFdPayload;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A message the core wants transmitted this tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundCommand {
    /// Destination bus
    pub bus: BusId,

    /// The cadence this message is scheduled under
    pub cadence: Cadence,

    /// Builder arguments for the encoders
    pub payload: Payload
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Cadence a message is scheduled under, at the 100 Hz control rate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Every tick (100 Hz)
    EveryTick,

    /// Every 2nd tick (50 Hz)
    Hz50,

    /// Every 5th tick (20 Hz)
    Hz20,

    /// Every 20th tick (5 Hz)
    Hz5,

    /// Every 50th tick (2 Hz)
    Hz2,

    /// Every 100th tick (1 Hz)
    Hz1,

    /// Sent in response to a request, throttled by elapsed time rather than
    /// by a tick modulus
    Event
}

/// Builder arguments of an outbound message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Payload {
    /// Diagnostic tester present, keeps a suppressed ECU in its diagnostic
    /// session so it stays quiet on the bus.
    TesterPresent {
        addr: u32,
        suppress_response: bool
    },

    /// A message from the legacy set
    Can(CanPayload),

    /// A message from the extended set
    CanFd(CanFdPayload)
}

/// Cruise control buttons which can be spoofed on the bus.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buttons {
    None = 0,
    ResAccel = 1,
    SetDecel = 2,
    GapDist = 3,
    Cancel = 4
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Cadence {
    /// The number of ticks between two messages of this cadence, or `None`
    /// for event driven messages.
    pub fn period_ticks(&self) -> Option<u64> {
        match self {
            Cadence::EveryTick => Some(1),
            Cadence::Hz50 => Some(2),
            Cadence::Hz20 => Some(5),
            Cadence::Hz5 => Some(20),
            Cadence::Hz2 => Some(50),
            Cadence::Hz1 => Some(100),
            Cadence::Event => None
        }
    }

    /// Returns true if a message of this cadence is due on the given tick.
    ///
    /// Event driven messages are never due on a modulus.
    pub fn is_due(&self, frame: u64) -> bool {
        match self.period_ticks() {
            Some(p) => frame % p == 0,
            None => false
        }
    }
}

impl OutboundCommand {
    /// Create a new command.
    pub fn new(bus: BusId, cadence: Cadence, payload: Payload) -> Self {
        Self { bus, cadence, payload }
    }

    /// Create a new legacy set command.
    pub fn can(bus: BusId, cadence: Cadence, payload: CanPayload) -> Self {
        Self::new(bus, cadence, Payload::Can(payload))
    }

    /// Create a new extended set command.
    pub fn canfd(bus: BusId, cadence: Cadence, payload: CanFdPayload) -> Self {
        Self::new(bus, cadence, Payload::CanFd(payload))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cadence_due() {
        assert!(Cadence::EveryTick.is_due(7));
        assert!(Cadence::Hz50.is_due(0));
        assert!(!Cadence::Hz50.is_due(3));
        assert!(Cadence::Hz20.is_due(15));
        assert!(!Cadence::Hz5.is_due(30));
        assert!(Cadence::Hz2.is_due(100));
        assert!(Cadence::Hz1.is_due(300));
        assert!(!Cadence::Event.is_due(0));
    }

    #[test]
    fn test_command_serialises() {
        let cmd = OutboundCommand::new(
            BusId(1),
            Cadence::Hz1,
            Payload::TesterPresent { addr: 0x7d0, suppress_response: true }
        );

        let json = serde_json::to_string(&cmd).unwrap();
        let back: OutboundCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
        assert!(json.contains("hz1"));
    }
}
