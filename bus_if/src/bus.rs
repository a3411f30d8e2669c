//! # Bus identifiers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifier of a physical bus the outbound message is transmitted on.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone, Default)]
pub struct BusId(pub u8);

/// Assignment of the logical buses on an extended (CAN FD) platform.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub struct CanFdBuses {
    /// Bus the ADAS ECU and cluster sit on
    pub ecan: BusId,

    /// Bus the camera forwards to the steering ECU
    pub acan: BusId,

    /// Bus towards the camera itself
    pub cam: BusId
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Bus protocol family of the platform.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum BusProtocol {
    /// Legacy classic CAN message set
    Can,

    /// Extended CAN FD message set
    CanFd
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BusId {
    /// The powertrain bus of a legacy platform.
    pub const PT: BusId = BusId(0);
}

impl CanFdBuses {
    /// Build the bus assignment for a CAN FD platform.
    ///
    /// The LKAS camera is on both A-CAN and E-CAN. LKA steering platforms use
    /// a different harness which swaps the two since the steering is done by
    /// a different ECU. `offset` is added to every bus when the harness is
    /// multiplexed behind a second interface.
    pub fn new(lka_steering: bool, offset: u8) -> Self {
        let (a, e) = match lka_steering {
            true => (0, 1),
            false => (1, 0)
        };

        Self {
            ecan: BusId(e + offset),
            acan: BusId(a + offset),
            cam: BusId(2 + offset)
        }
    }
}

impl Default for BusProtocol {
    fn default() -> Self {
        BusProtocol::Can
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_canfd_buses() {
        let lfa = CanFdBuses::new(false, 0);
        assert_eq!(lfa.ecan, BusId(0));
        assert_eq!(lfa.acan, BusId(1));
        assert_eq!(lfa.cam, BusId(2));

        let lka = CanFdBuses::new(true, 4);
        assert_eq!(lka.ecan, BusId(5));
        assert_eq!(lka.acan, BusId(4));
        assert_eq!(lka.cam, BusId(6));
    }
}
