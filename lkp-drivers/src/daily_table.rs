/// A calendar-day-indexed table of named numeric columns.
///
/// The shared substrate for the meteorological and inflow pipelines:
/// duplicate-day rows are averaged on ingestion, cells are optional until a
/// fill pass runs.
use lkp_core::dates::{parse_date, DateRange};
use lkp_core::error::{LakeError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    /// Column names, fixed order
    pub columns: Vec<String>,
    /// One row per calendar day, cells aligned with `columns`
    pub rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl DailyTable {
    pub fn new(columns: Vec<String>) -> Self {
        DailyTable {
            columns,
            rows: BTreeMap::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Reindex onto every day of `[start, end]`, inserting all-missing rows
    /// for absent days and dropping days outside the span.
    pub fn reindex(&mut self, start: NaiveDate, end: NaiveDate) {
        let width = self.columns.len();
        let mut reindexed = BTreeMap::new();
        for day in DateRange(start, end) {
            let row = self.rows.remove(&day).unwrap_or_else(|| vec![None; width]);
            reindexed.insert(day, row);
        }
        self.rows = reindexed;
    }

    /// A full column, in date order.
    pub fn column(&self, idx: usize) -> Vec<Option<f64>> {
        self.rows.values().map(|row| row[idx]).collect()
    }

    /// True if the column has at least one populated cell.
    pub fn column_has_data(&self, idx: usize) -> bool {
        self.rows.values().any(|row| row[idx].is_some())
    }

    /// Overwrite a full column, in date order.
    pub fn set_column(&mut self, idx: usize, values: Vec<Option<f64>>) {
        for (row, value) in self.rows.values_mut().zip(values) {
            row[idx] = value;
        }
    }

    /// Append a constant-valued column.
    pub fn add_constant_column(&mut self, name: &str, value: Option<f64>) {
        self.columns.push(name.to_string());
        for row in self.rows.values_mut() {
            row.push(value);
        }
    }
}

/// Accumulates raw rows and collapses duplicate calendar days by
/// arithmetic mean. Missing cells don't dilute the mean.
#[derive(Debug)]
pub struct DailyAccumulator {
    columns: Vec<String>,
    sums: BTreeMap<NaiveDate, Vec<(f64, u32)>>,
}

impl DailyAccumulator {
    pub fn new(columns: Vec<String>) -> Self {
        DailyAccumulator {
            columns,
            sums: BTreeMap::new(),
        }
    }

    pub fn push_row(&mut self, date: NaiveDate, cells: Vec<Option<f64>>) {
        let width = self.columns.len();
        let day = self.sums.entry(date).or_insert_with(|| vec![(0.0, 0); width]);
        for (slot, cell) in day.iter_mut().zip(cells) {
            if let Some(v) = cell {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    pub fn into_table(self) -> DailyTable {
        let rows = self
            .sums
            .into_iter()
            .map(|(date, cells)| {
                let row = cells
                    .into_iter()
                    .map(|(sum, n)| if n > 0 { Some(sum / n as f64) } else { None })
                    .collect();
                (date, row)
            })
            .collect();
        DailyTable {
            columns: self.columns,
            rows,
        }
    }
}

/// Read a `Date,<columns...>` CSV into a DailyTable. Duplicate days are
/// averaged; non-numeric cells become missing values.
pub fn read_daily_csv<R: Read>(reader: R) -> Result<DailyTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.trim() == "Date")
        .ok_or_else(|| LakeError::MissingColumn("Date".to_string()))?;
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(_, h)| h.trim().to_string())
        .collect();

    let mut acc = DailyAccumulator::new(columns);
    for row in rdr.records() {
        let row = row?;
        let date = match row.get(date_idx).map(parse_date) {
            Some(Ok(d)) => d,
            _ => continue,
        };
        let cells = (0..headers.len())
            .filter(|i| *i != date_idx)
            .map(|i| row.get(i).and_then(|s| s.trim().parse::<f64>().ok()))
            .collect();
        acc.push_row(date, cells);
    }
    Ok(acc.into_table())
}

/// Load a daily table from disk.
pub fn load_daily_csv(path: &std::path::Path) -> Result<DailyTable> {
    let file = std::fs::File::open(path)?;
    read_daily_csv(file)
}
