use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default uniform depth resolution for generated profiles, m.
/// Don't change this unless you know what you are doing.
pub const DEFAULT_DEPTH_RESOLUTION: f64 = 1.0;

/// Layer thickness of the simulator's internal grid, m. Finer than the
/// profile resolution; the reconciler indexes simulator output with it.
pub const DEFAULT_LAYER_THICKNESS: f64 = 0.5;

/// Everything a preparation or comparison run needs to know about one lake.
///
/// Threaded explicitly through every entry point; there is no process-wide
/// mutable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Lake name, used to derive artifact file names
    pub lake_name: String,
    /// First simulated calendar year (simulation starts January 1)
    pub start_year: i32,
    /// Last simulated calendar year (simulation ends December 31)
    pub end_year: i32,
    /// Resolution of the generated depth profile, m
    #[serde(default = "default_resolution")]
    pub depth_resolution: f64,
    /// Simulator layer thickness, m
    #[serde(default = "default_layer_thickness")]
    pub layer_thickness: f64,
    /// Observation date supplying the initial-condition profile
    pub init_date: NaiveDate,
    /// Whether measured river inflow drives the input file; otherwise the
    /// fixed default inflow columns are emitted
    #[serde(default)]
    pub river_inflow: bool,
}

fn default_resolution() -> f64 {
    DEFAULT_DEPTH_RESOLUTION
}

fn default_layer_thickness() -> f64 {
    DEFAULT_LAYER_THICKNESS
}

impl RunConfig {
    /// Configuration with the conventional defaults for a 2018-2021 run.
    pub fn new(lake_name: &str) -> Self {
        RunConfig {
            lake_name: lake_name.to_string(),
            start_year: 2018,
            end_year: 2021,
            depth_resolution: DEFAULT_DEPTH_RESOLUTION,
            layer_thickness: DEFAULT_LAYER_THICKNESS,
            init_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            river_inflow: false,
        }
    }
}
