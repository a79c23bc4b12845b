//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Typed handles for pooled simulation objects
//! - Frame clock with delta capping
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
