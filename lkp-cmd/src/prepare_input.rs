//! Daily driver file generation.

use lkp_core::config::RunConfig;
use lkp_drivers::daily_table::load_daily_csv;
use lkp_drivers::gapfill::fill_driver_table;
use lkp_drivers::inflow::{adjust_inflow, load_inflow_csv};
use lkp_drivers::input_file::write_driver_file;
use log::info;
use std::path::Path;

/// Fill the climate table over the simulation span, prepare the inflow
/// series when one is measured, and write the driver file.
pub fn run_prepare_input(
    config: &RunConfig,
    climate_csv: &str,
    inflow_csv: Option<&str>,
    output: &str,
) -> anyhow::Result<()> {
    let raw = load_daily_csv(Path::new(climate_csv))?;
    info!(
        "{}: {} raw climate days, {} columns",
        config.lake_name,
        raw.rows.len(),
        raw.columns.len()
    );
    let meteo = fill_driver_table(raw, config.start_year, config.end_year)?;

    let inflow = match inflow_csv {
        Some(path) => {
            let table = load_inflow_csv(Path::new(path))?;
            Some(adjust_inflow(table, config.start_year, config.end_year)?)
        }
        None => None,
    };

    write_driver_file(
        Path::new(output),
        &meteo,
        inflow.as_ref(),
        config.start_year,
        config.end_year,
    )?;
    Ok(())
}
