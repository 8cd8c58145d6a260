/// Water-quality observation records and their CSV ingestion.
///
/// The source tables are known to be noisy (mixed sensors, hand-entered
/// cells), so row-level problems are recovered locally: unparseable rows are
/// skipped with a warning and blank cells become missing values. Hard
/// failures are reserved for tables that feed simulator inputs directly
/// (see the bathymetry loader).
use crate::dates::parse_date;
use crate::error::Result;
use chrono::NaiveDate;
use csv::StringRecord;
use log::warn;
use std::io::Read;

/// State variables tracked by the preparation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVariable {
    /// Water temperature, °C
    Temperature,
    /// Dissolved oxygen, mg/L in the observation tables
    DissolvedOxygen,
}

impl StateVariable {
    /// Column name in the observation CSV.
    pub fn column_name(&self) -> &'static str {
        match self {
            StateVariable::Temperature => "Temp",
            StateVariable::DissolvedOxygen => "DO",
        }
    }

    /// Short label used in artifact file names (Observed_T.csv etc).
    pub fn label(&self) -> &'static str {
        match self {
            StateVariable::Temperature => "T",
            StateVariable::DissolvedOxygen => "O2",
        }
    }

    /// Factor applied to the gridded initial profile.
    /// Oxygen observations are mg/L; the simulator wants mg/m3.
    pub fn profile_scale(&self) -> f64 {
        match self {
            StateVariable::Temperature => 1.0,
            StateVariable::DissolvedOxygen => 1000.0,
        }
    }

    /// Factor applied to simulated values when pairing with observations.
    /// The inverse of `profile_scale`: simulator output is mg/m3, the
    /// observation records are mg/L.
    pub fn simulated_scale(&self) -> f64 {
        match self {
            StateVariable::Temperature => 1.0,
            StateVariable::DissolvedOxygen => 0.001,
        }
    }

    pub fn all() -> [StateVariable; 2] {
        [StateVariable::Temperature, StateVariable::DissolvedOxygen]
    }
}

/// One row of the per-lake observation table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    pub depth: f64,
    pub temperature: Option<f64>,
    pub dissolved_oxygen: Option<f64>,
}

impl ObservationRecord {
    pub fn value(&self, variable: StateVariable) -> Option<f64> {
        match variable {
            StateVariable::Temperature => self.temperature,
            StateVariable::DissolvedOxygen => self.dissolved_oxygen,
        }
    }
}

/// Parse one measurement cell. Blank and "None" cells are missing; the
/// below-detection sentinel "<1" is read as 1. Anything else that fails to
/// parse is treated as missing (the source spreadsheets are noisy).
fn parse_measurement(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "None" || trimmed == "NaN" {
        return None;
    }
    if trimmed == "<1" {
        return Some(1.0);
    }
    trimmed.parse::<f64>().ok()
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Read observation records from CSV with a `Date,Depth,...,Temp,DO` header.
/// Rows whose date or depth cannot be parsed are skipped with a warning.
pub fn read_observation_records<R: Read>(reader: R) -> Result<Vec<ObservationRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_idx = column_index(&headers, "Date");
    let depth_idx = column_index(&headers, "Depth");
    let temp_idx = column_index(&headers, "Temp");
    let do_idx = column_index(&headers, "DO");
    let (date_idx, depth_idx) = match (date_idx, depth_idx) {
        (Some(d), Some(z)) => (d, z),
        _ => {
            return Err(crate::error::LakeError::MissingColumn(
                "Date/Depth".to_string(),
            ))
        }
    };

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let date = match row.get(date_idx).map(parse_date) {
            Some(Ok(d)) => d,
            _ => {
                warn!("skipping observation row with unparseable date: {:?}", row.get(date_idx));
                continue;
            }
        };
        let depth = match row.get(depth_idx).and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(z) => z,
            None => {
                warn!("skipping observation row with unparseable depth: {:?}", row.get(depth_idx));
                continue;
            }
        };
        records.push(ObservationRecord {
            date,
            depth,
            temperature: temp_idx.and_then(|i| row.get(i)).and_then(parse_measurement),
            dissolved_oxygen: do_idx.and_then(|i| row.get(i)).and_then(parse_measurement),
        });
    }
    Ok(records)
}

/// Load the per-lake observation table from disk.
pub fn load_observation_csv(path: &std::path::Path) -> Result<Vec<ObservationRecord>> {
    let file = std::fs::File::open(path)?;
    read_observation_records(file)
}

/// Fold negative depths into the valid range by adding the profile maximum
/// depth. Negative depths encode sensors mounted above the reference datum;
/// whether this is a physical convention or a data-entry quirk is an open
/// question, so the transform is named and applied explicitly rather than
/// inlined at the use sites.
pub fn fold_negative_depths(records: &mut [ObservationRecord], max_depth: f64) {
    for record in records.iter_mut() {
        if record.depth < 0.0 {
            record.depth += max_depth;
        }
    }
}
