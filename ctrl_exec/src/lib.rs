//! # Car control library.
//!
//! This library allows other crates in the workspace, the benchmarks and the
//! integration tests to access the control core.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Car control module - bounds the planner's steering and longitudinal requests and schedules the
/// bus messages which carry them
pub mod car_ctrl;

/// Vehicle model - single track kinematics used to derive the steering angle limits
pub mod veh_model;
