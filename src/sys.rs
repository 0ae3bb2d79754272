//! Utilities for interfacing with OS-specific APIs.

pub mod app;
pub mod geometry;
pub mod screen;
pub mod window;
