//! Progress tracking against an ideal schedule.

pub mod rebalance;
pub mod reconciler;


pub use reconciler::{LoggedActuals, ProgressReconciler};
