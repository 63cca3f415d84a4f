//! Utility functions for the application

pub mod debug;
pub mod file;
