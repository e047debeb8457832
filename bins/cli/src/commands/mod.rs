//! Subcommand implementations. Each returns the text to print on stdout.

pub mod plan;
pub mod report;
