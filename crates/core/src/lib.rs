//! Core planning engine for PennyPlan.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every function is a computation over values handed in by the caller; the
//! only collaborator, the allocation strategy, is injected as a trait object.
//!
//! # Modules
//!
//! - `budget` - Project/category/expense records and consumption roll-ups
//! - `plan` - Month-by-month target schedules per plan type
//! - `progress` - Overlaying logged savings onto a schedule
//! - `allocation` - Splitting a project's unspent remainder into buckets
//! - `chart` - `{name, value}` series for the rendering layer

pub mod allocation;
pub mod budget;
pub mod chart;
pub mod error;
pub mod plan;
pub mod progress;

pub use error::{EngineError, EngineResult};
