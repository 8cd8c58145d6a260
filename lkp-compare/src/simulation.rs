/// Simulator output grids.
///
/// The simulator writes one CSV per state variable with one row per layer
/// and one column per simulated day. The grid is held transposed (day-major)
/// since every consumer walks it day by day.
use lkp_core::dates::span_start;
use lkp_core::error::{LakeError, Result};
use lkp_grid::interpolation::find_y_point;
use chrono::{Days, NaiveDate};
use log::debug;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationGrid {
    /// Date of the first simulated day
    pub start_date: NaiveDate,
    /// Layer thickness, m
    pub dt: f64,
    /// values[day][layer]; `None` where the simulator emitted no value
    pub values: Vec<Vec<Option<f64>>>,
}

impl SimulationGrid {
    pub fn day_count(&self) -> usize {
        self.values.len()
    }

    pub fn date_of(&self, day: usize) -> NaiveDate {
        self.start_date + Days::new(day as u64)
    }

    /// Simulated value at an arbitrary depth on a given day.
    ///
    /// Depths below zero or past the half-layer margin under the deepest
    /// layer are undefined (`Ok(None)`). A depth on a layer boundary is an
    /// exact read; anything else interpolates between the two bracketing
    /// layers, skipping the pair when either cell is missing.
    pub fn value_at_depth(&self, day: usize, depth: f64) -> Result<Option<f64>> {
        let row = match self.values.get(day) {
            Some(row) => row,
            None => return Ok(None),
        };
        let limit = row.len() as f64 * self.dt - self.dt / 2.0;
        if depth < 0.0 || depth > limit {
            return Ok(None);
        }

        let steps = depth / self.dt;
        if (steps - steps.round()).abs() < 1e-9 {
            return Ok(row.get(steps.round() as usize).copied().flatten());
        }

        let ia = steps.floor() as usize;
        let ib = ia + 1;
        let xa = ia as f64 * self.dt;
        let xb = xa + self.dt;
        match (
            row.get(ia).copied().flatten(),
            row.get(ib).copied().flatten(),
        ) {
            (Some(ya), Some(yb)) => Ok(Some(find_y_point(xa, ya, xb, yb, depth)?)),
            _ => Ok(None),
        }
    }
}

/// Read a layer-per-row simulator CSV and transpose it into a day-major
/// grid. Non-numeric cells become missing values.
pub fn read_simulation_csv<R: Read>(
    reader: R,
    start_year: i32,
    dt: f64,
) -> Result<SimulationGrid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut layers: Vec<Vec<Option<f64>>> = Vec::new();
    for row in rdr.records() {
        let row = row?;
        layers.push(
            row.iter()
                .map(|cell| cell.trim().parse::<f64>().ok())
                .collect(),
        );
    }
    if layers.is_empty() {
        return Err(LakeError::InvalidFormat(
            "simulation grid file has no rows".to_string(),
        ));
    }
    let days = layers.iter().map(Vec::len).max().unwrap_or(0);

    let values: Vec<Vec<Option<f64>>> = (0..days)
        .map(|day| {
            layers
                .iter()
                .map(|layer| layer.get(day).copied().flatten())
                .collect()
        })
        .collect();
    debug!(
        "simulation grid: {} days x {} layers",
        values.len(),
        layers.len()
    );
    Ok(SimulationGrid {
        start_date: span_start(start_year),
        dt,
        values,
    })
}

/// Load a simulator output grid from disk.
pub fn load_simulation_csv(path: &Path, start_year: i32, dt: f64) -> Result<SimulationGrid> {
    let file = std::fs::File::open(path)?;
    read_simulation_csv(file, start_year, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(row: Vec<Option<f64>>) -> SimulationGrid {
        SimulationGrid {
            start_date: span_start(2018),
            dt: 0.5,
            values: vec![row],
        }
    }

    #[test]
    fn test_exact_layer_read() {
        // layers at 0, 0.5, 1.0, 1.5
        let g = grid(vec![Some(10.0), Some(9.0), Some(8.0), Some(7.0)]);
        assert_eq!(g.value_at_depth(0, 0.0).unwrap(), Some(10.0));
        assert_eq!(g.value_at_depth(0, 0.5).unwrap(), Some(9.0));
        assert_eq!(g.value_at_depth(0, 1.5).unwrap(), Some(7.0));
    }

    #[test]
    fn test_off_layer_interpolation() {
        let g = grid(vec![Some(10.0), Some(9.0), Some(8.0), Some(7.0)]);
        // 0.25 sits between the 0 and 0.5 layers
        assert_eq!(g.value_at_depth(0, 0.25).unwrap(), Some(9.5));
        // 1.2 brackets between 1.0 and 1.5
        let v = g.value_at_depth(0, 1.2).unwrap().unwrap();
        assert!((v - 7.6).abs() < 1e-9);
    }

    #[test]
    fn test_bracketing_honors_layer_thickness() {
        // quarter-meter layers at 0, 0.25, 0.5, 0.75, 1.0
        let g = SimulationGrid {
            start_date: span_start(2018),
            dt: 0.25,
            values: vec![vec![Some(100.0), Some(80.0), Some(60.0), Some(40.0), Some(0.0)]],
        };
        // 0.8 brackets between the 0.75 and 1.0 layers
        let v = g.value_at_depth(0, 0.8).unwrap().unwrap();
        assert!((v - 32.0).abs() < 1e-9);
        assert_eq!(g.value_at_depth(0, 0.75).unwrap(), Some(40.0));
        // both bracketing layers zero: the interpolated value is zero too
        let flat = SimulationGrid {
            start_date: span_start(2018),
            dt: 0.25,
            values: vec![vec![Some(100.0), Some(100.0), Some(100.0), Some(0.0), Some(0.0)]],
        };
        assert_eq!(flat.value_at_depth(0, 0.8).unwrap(), Some(0.0));
    }

    #[test]
    fn test_out_of_range_depths_are_undefined() {
        let g = grid(vec![Some(10.0), Some(9.0), Some(8.0), Some(7.0)]);
        assert_eq!(g.value_at_depth(0, -0.5).unwrap(), None);
        // 4 layers x 0.5 m - quarter-layer margin = 1.75
        assert_eq!(g.value_at_depth(0, 2.0).unwrap(), None);
        assert_eq!(g.value_at_depth(5, 1.0).unwrap(), None);
    }

    #[test]
    fn test_missing_bracket_cell_skips() {
        let g = grid(vec![Some(10.0), None, Some(8.0), Some(7.0)]);
        assert_eq!(g.value_at_depth(0, 0.25).unwrap(), None);
        assert_eq!(g.value_at_depth(0, 0.5).unwrap(), None);
        assert_eq!(g.value_at_depth(0, 1.0).unwrap(), Some(8.0));
    }

    #[test]
    fn test_read_transposes_layer_rows() {
        // two layers, three days
        let csv = "4.0,5.0,6.0\n3.5,None,5.5\n";
        let g = read_simulation_csv(csv.as_bytes(), 2018, 0.5).unwrap();
        assert_eq!(g.day_count(), 3);
        assert_eq!(g.values[0], vec![Some(4.0), Some(3.5)]);
        assert_eq!(g.values[1], vec![Some(5.0), None]);
        assert_eq!(g.date_of(2), NaiveDate::from_ymd_opt(2018, 1, 3).unwrap());
    }
}
