//! # agentsize Library
//!
//! This library exposes the agentsize command layer for testing and
//! integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod report;

// Re-export agentsize_core for convenience
pub use agentsize_core;
