//! Ideal savings schedules.

pub mod generator;
pub mod types;
pub mod weights;


pub use generator::{MAX_MONTHS, PlanGenerator};
pub use types::{PaceStatus, PlanConfig, PlanScheduleEntry, PlanType};
pub use weights::curve_weights;
