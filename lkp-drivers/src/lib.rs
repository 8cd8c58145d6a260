//! Daily driver series for the lake simulator.
//!
//! Builds complete, gapless daily meteorological and inflow tables from
//! partial records, and writes the simulator's driver input file.

pub mod daily_table;
pub mod gapfill;
pub mod inflow;
pub mod input_file;
