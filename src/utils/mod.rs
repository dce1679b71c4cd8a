//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as duration parsing for timeouts.

pub mod duration;

pub use duration::{parse_duration, parse_timeout};
