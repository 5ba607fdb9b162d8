//! Shared utility functions.

pub mod date;
