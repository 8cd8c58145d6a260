//! Depth gridding for lake simulation inputs.
//!
//! Turns irregular, sparse depth-indexed measurements into the
//! uniform-resolution profiles the simulator consumes: the bathymetry grid
//! (depth vs. area) and the per-variable initial-condition profiles.

pub mod bathymetry;
pub mod init_file;
pub mod interpolation;
pub mod profile;
