//! Allocation strategy backed by a remote HTTP service.
//!
//! The service receives the remainder and the project's plan and answers
//! with a JSON object of bucket name to amount. Whatever it answers is
//! checked again by the core allocator.

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::{HttpAllocationStrategy, parse_buckets};
