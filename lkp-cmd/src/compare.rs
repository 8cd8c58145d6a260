//! Simulator output scoring.
//!
//! Builds the observed matrix, pairs it with the simulated grid, and writes
//! three artifacts into the output directory: the observed matrix CSV, the
//! paired comparison CSV, and a JSON performance report. Scores are reported
//! overall and split into surface and deepwater levels at half the maximum
//! observed depth; a level with too few usable pairs is reported as absent
//! rather than failing the run.
use lkp_compare::metrics::Metrics;
use lkp_compare::observed::ObservedMatrix;
use lkp_compare::reconcile::{reconcile, write_comparison_file, ComparisonRecord};
use lkp_compare::simulation::load_simulation_csv;
use lkp_core::bathymetry::load_bathymetry_csv;
use lkp_core::config::RunConfig;
use lkp_core::observation::{load_observation_csv, StateVariable};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub lake: String,
    pub variable: String,
    pub pairs: usize,
    pub overall: Option<Metrics>,
    pub surface: Option<Metrics>,
    pub deepwater: Option<Metrics>,
}

fn parse_variable(name: &str) -> anyhow::Result<StateVariable> {
    match name {
        "T" => Ok(StateVariable::Temperature),
        "O2" => Ok(StateVariable::DissolvedOxygen),
        other => anyhow::bail!("unknown state variable {other:?}, expected T or O2"),
    }
}

fn score(label: &str, records: &[&ComparisonRecord]) -> Option<Metrics> {
    let observed: Vec<f64> = records.iter().map(|r| r.observed).collect();
    let simulated: Vec<f64> = records.iter().map(|r| r.simulated).collect();
    match Metrics::compute(&observed, &simulated) {
        Ok(metrics) => Some(metrics.rounded()),
        Err(err) => {
            warn!("{label}: not scored ({err})");
            None
        }
    }
}

pub fn run_compare(
    config: &RunConfig,
    bathymetry_csv: &str,
    observations_csv: &str,
    simulation_csv: &str,
    variable: &str,
    output_dir: &str,
) -> anyhow::Result<()> {
    let variable = parse_variable(variable)?;
    let output_dir = Path::new(output_dir);
    std::fs::create_dir_all(output_dir)?;

    let points = load_bathymetry_csv(Path::new(bathymetry_csv))?;
    let max_depth = points.last().map(|p| p.depth).unwrap_or(0.0);

    let records = load_observation_csv(Path::new(observations_csv))?;
    let matrix = ObservedMatrix::from_records(&records, variable, max_depth)?;
    matrix.write_file(output_dir)?;

    let grid = load_simulation_csv(
        Path::new(simulation_csv),
        config.start_year,
        config.layer_thickness,
    )?;
    let pairs = reconcile(&matrix, &grid)?;
    write_comparison_file(
        &output_dir.join(format!("{}_comparisonall.csv", variable.label())),
        &pairs,
    )?;

    let split_depth = matrix.depths.last().unwrap_or(&0.0) / 2.0;
    let all: Vec<&ComparisonRecord> = pairs.iter().collect();
    let surface: Vec<&ComparisonRecord> =
        pairs.iter().filter(|r| r.depth <= split_depth).collect();
    let deepwater: Vec<&ComparisonRecord> =
        pairs.iter().filter(|r| r.depth > split_depth).collect();

    let report = ComparisonReport {
        lake: config.lake_name.clone(),
        variable: variable.label().to_string(),
        pairs: pairs.len(),
        overall: score("overall", &all),
        surface: score("surface", &surface),
        deepwater: score("deepwater", &deepwater),
    };

    let report_path = output_dir.join(format!("{}_performance.json", variable.label()));
    let file = std::fs::File::create(&report_path)?;
    serde_json::to_writer_pretty(file, &report)?;
    info!(
        "{} {}: {} pairs scored, report at {}",
        config.lake_name,
        report.variable,
        report.pairs,
        report_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pair(depth: f64, observed: f64, simulated: f64) -> ComparisonRecord {
        ComparisonRecord {
            date: NaiveDate::from_ymd_opt(2019, 6, 1).unwrap(),
            depth,
            observed,
            simulated,
        }
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_variable("T").unwrap(), StateVariable::Temperature);
        assert_eq!(parse_variable("O2").unwrap(), StateVariable::DissolvedOxygen);
        assert!(parse_variable("Chl").is_err());
    }

    #[test]
    fn test_score_survives_degenerate_level() {
        // a single pair cannot be scored but must not panic
        let records = vec![pair(1.0, 4.0, 4.2)];
        let refs: Vec<&ComparisonRecord> = records.iter().collect();
        assert!(score("surface", &refs).is_none());
    }

    #[test]
    fn test_score_rounds_for_reporting() {
        let records = vec![
            pair(1.0, 4.0, 4.1),
            pair(3.0, 6.0, 5.8),
            pair(5.0, 8.0, 8.4),
        ];
        let refs: Vec<&ComparisonRecord> = records.iter().collect();
        let metrics = score("overall", &refs).unwrap();
        assert_eq!(metrics.sos, (metrics.sos * 1000.0).round() / 1000.0);
    }
}
