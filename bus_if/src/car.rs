//! # Vehicle interface
//!
//! Data sampled from the vehicle at the start of a tick, the control request
//! from the planner, and the actuator state echoed back at the end of a tick.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod control;
pub mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use control::*;
pub use state::*;
