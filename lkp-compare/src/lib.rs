//! Reconciliation of lake observations with simulator output.
//!
//! Builds the date-by-depth observed matrix, samples the simulated grid at
//! the observed depths, and scores the paired series.

pub mod metrics;
pub mod observed;
pub mod reconcile;
pub mod simulation;
