//! # Auxiliary sub-controllers
//!
//! Optional features which ride along with the main controller. Each exposes
//! a per-tick `update` and a narrow capability query, and silently does
//! nothing when the feature is not fitted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod escc;
mod interceptor;
mod lane_assist;
mod long_tuning;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use escc::Escc;
pub use interceptor::AdasDrvInterceptor;
pub use lane_assist::{LaneAssist, LaneAssistIcon};
pub use long_tuning::LongTuning;
