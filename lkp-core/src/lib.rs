//! Core types for the lake preparation toolkit.
//!
//! Shared between the gridding, driver and comparison crates: the error
//! taxonomy, calendar helpers, raw survey/observation records and the run
//! configuration threaded through every entry point.

pub mod bathymetry;
pub mod config;
pub mod dates;
pub mod error;
pub mod observation;

pub use error::{LakeError, Result};
