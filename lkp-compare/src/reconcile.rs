/// Pairing of observations with simulated values.
///
/// For every simulated day that has an observation row, the grid is sampled
/// at each observed depth and the numeric pairs are emitted. Unit handling
/// happens here: simulator concentrations come back in mg/m3 while the
/// observation tables are mg/L.
use crate::observed::ObservedMatrix;
use crate::simulation::SimulationGrid;
use lkp_core::dates::format_date;
use lkp_core::error::Result;
use chrono::NaiveDate;
use log::info;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub date: NaiveDate,
    pub depth: f64,
    pub observed: f64,
    pub simulated: f64,
}

/// Pair the observed matrix against the simulated grid.
pub fn reconcile(
    observed: &ObservedMatrix,
    grid: &SimulationGrid,
) -> Result<Vec<ComparisonRecord>> {
    let scale = observed.variable.simulated_scale();
    let mut records = Vec::new();
    for day in 0..grid.day_count() {
        let date = grid.date_of(day);
        let row = match observed.rows.get(&date) {
            Some(row) => row,
            None => continue,
        };
        for (i, &depth) in observed.depths.iter().enumerate() {
            let obs = match row[i] {
                Some(v) => v,
                None => continue,
            };
            if let Some(sim) = grid.value_at_depth(day, depth)? {
                records.push(ComparisonRecord {
                    date,
                    depth,
                    observed: obs,
                    simulated: sim * scale,
                });
            }
        }
    }
    info!(
        "{}: {} observation/simulation pairs",
        observed.variable.label(),
        records.len()
    );
    Ok(records)
}

/// Write the paired series as a `Date,Depth,Observations,Simulations` CSV.
pub fn write_comparison_csv<W: Write>(writer: W, records: &[ComparisonRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Date", "Depth", "Observations", "Simulations"])?;
    for record in records {
        wtr.write_record([
            format_date(&record.date),
            record.depth.to_string(),
            record.observed.to_string(),
            record.simulated.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the comparison file to disk.
pub fn write_comparison_file(path: &Path, records: &[ComparisonRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_comparison_csv(file, records)
}
