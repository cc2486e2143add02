//! Utility functions for file operations

pub mod atomic;

pub use atomic::*;
