//! Initial-condition file generation.

use lkp_core::bathymetry::load_bathymetry_csv;
use lkp_core::config::RunConfig;
use lkp_core::observation::{load_observation_csv, StateVariable};
use lkp_grid::bathymetry::BathymetryGrid;
use lkp_grid::init_file::write_init_file;
use lkp_grid::profile::initial_profile;
use log::info;
use std::path::Path;

/// Grid the bathymetry, build the temperature and oxygen profiles for the
/// initialization date, and write the initial-condition file.
pub fn run_prepare_init(
    config: &RunConfig,
    bathymetry_csv: &str,
    observations_csv: &str,
    output: &str,
) -> anyhow::Result<()> {
    let points = load_bathymetry_csv(Path::new(bathymetry_csv))?;
    let grid = BathymetryGrid::from_points(&points, config.depth_resolution)?;
    info!(
        "{}: {} profile levels down to {} m",
        config.lake_name,
        grid.depths.len(),
        grid.max_depth()
    );

    let records = load_observation_csv(Path::new(observations_csv))?;
    let temperature = initial_profile(
        &grid.depths,
        &records,
        StateVariable::Temperature,
        config.init_date,
    )?;
    let oxygen = initial_profile(
        &grid.depths,
        &records,
        StateVariable::DissolvedOxygen,
        config.init_date,
    )?;

    write_init_file(Path::new(output), &grid, &temperature, &oxygen)?;
    Ok(())
}
