//! Command implementations for the lake preparation CLI.
//!
//! Provides subcommands for generating simulator input files from raw
//! observations and for scoring simulator output against them.

use lkp_core::config::RunConfig;
use lkp_core::dates::parse_date;
use clap::Subcommand;

pub mod compare;
pub mod prepare_init;
pub mod prepare_input;

#[derive(Subcommand)]
pub enum Command {
    /// Build the initial-condition file from bathymetry and observations
    PrepareInit {
        /// Lake name
        #[arg(short, long)]
        lake: String,

        /// Path to the depth/area bathymetry CSV
        #[arg(short, long)]
        bathymetry_csv: String,

        /// Path to the water-quality observation CSV
        #[arg(short, long)]
        observations_csv: String,

        /// Output path for the initial-condition file
        #[arg(long)]
        output: String,

        /// Observation date supplying the initial profiles (YYYY-MM-DD)
        #[arg(long, default_value = "2021-01-01")]
        init_date: String,

        /// Depth resolution of the generated profile, m
        #[arg(long, default_value_t = lkp_core::config::DEFAULT_DEPTH_RESOLUTION)]
        depth_resolution: f64,
    },

    /// Build the daily driver input file from climate (and optional inflow) data
    PrepareInput {
        /// Lake name
        #[arg(short, long)]
        lake: String,

        /// Path to the daily climate CSV
        #[arg(short, long)]
        climate_csv: String,

        /// Path to the measured river inflow CSV; fixed stream defaults
        /// are used when omitted
        #[arg(short, long)]
        inflow_csv: Option<String>,

        /// Output path for the driver file
        #[arg(long)]
        output: String,

        /// First simulated year
        #[arg(long, default_value_t = 2018)]
        start_year: i32,

        /// Last simulated year
        #[arg(long, default_value_t = 2021)]
        end_year: i32,
    },

    /// Score simulator output against the observations
    Compare {
        /// Lake name
        #[arg(short, long)]
        lake: String,

        /// Path to the depth/area bathymetry CSV
        #[arg(short, long)]
        bathymetry_csv: String,

        /// Path to the water-quality observation CSV
        #[arg(short, long)]
        observations_csv: String,

        /// Path to the simulator output grid CSV (layer per row)
        #[arg(short, long)]
        simulation_csv: String,

        /// State variable to compare: T or O2
        #[arg(long, default_value = "T")]
        variable: String,

        /// First simulated year
        #[arg(long, default_value_t = 2018)]
        start_year: i32,

        /// Directory for the comparison artifacts
        #[arg(long)]
        output_dir: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::PrepareInit {
            lake,
            bathymetry_csv,
            observations_csv,
            output,
            init_date,
            depth_resolution,
        } => {
            let mut config = RunConfig::new(&lake);
            config.init_date = parse_date(&init_date)?;
            config.depth_resolution = depth_resolution;
            prepare_init::run_prepare_init(&config, &bathymetry_csv, &observations_csv, &output)
        }
        Command::PrepareInput {
            lake,
            climate_csv,
            inflow_csv,
            output,
            start_year,
            end_year,
        } => {
            let mut config = RunConfig::new(&lake);
            config.start_year = start_year;
            config.end_year = end_year;
            config.river_inflow = inflow_csv.is_some();
            prepare_input::run_prepare_input(&config, &climate_csv, inflow_csv.as_deref(), &output)
        }
        Command::Compare {
            lake,
            bathymetry_csv,
            observations_csv,
            simulation_csv,
            variable,
            start_year,
            output_dir,
        } => {
            let mut config = RunConfig::new(&lake);
            config.start_year = start_year;
            compare::run_compare(
                &config,
                &bathymetry_csv,
                &observations_csv,
                &simulation_csv,
                &variable,
                &output_dir,
            )
        }
    }
}
