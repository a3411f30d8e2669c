//! # Bus interface crate.
//!
//! Provides the data structures exchanged between the vehicle control core and
//! the outside world: the vehicle state sampled at the start of each tick, the
//! planner's control request, the echoed actuator state and the outbound
//! message descriptors handed to the bus encoders.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Bus identifiers and bus assignment per protocol
pub mod bus;

/// Vehicle state and control request definitions
pub mod car;

/// Outbound message descriptors
pub mod msg;
