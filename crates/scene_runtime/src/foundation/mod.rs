//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and operations
//! - Collections and handle types
//! - Time management
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
