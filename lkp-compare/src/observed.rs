/// The date-by-depth observed matrix.
///
/// One row per observation date, one column per distinct measured depth,
/// missing cells marked `None`. The matrix is also an on-disk artifact
/// (`Observed_T.csv`, `Observed_O2.csv`) so it can be rebuilt without
/// re-reading the raw observation table.
use lkp_core::dates::{format_date, parse_date};
use lkp_core::error::{LakeError, Result};
use lkp_core::observation::{fold_negative_depths, ObservationRecord, StateVariable};
use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

const MISSING_MARKER: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub struct ObservedMatrix {
    pub variable: StateVariable,
    /// Distinct measured depths, ascending
    pub depths: Vec<f64>,
    /// One row per observation date, cells aligned with `depths`
    pub rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl ObservedMatrix {
    /// Build the matrix from raw observation records. Negative depths are
    /// folded into the profile before the depth columns are formed; the
    /// first measurement wins when a date/depth pair repeats.
    pub fn from_records(
        records: &[ObservationRecord],
        variable: StateVariable,
        max_depth: f64,
    ) -> Result<Self> {
        let mut records = records.to_vec();
        fold_negative_depths(&mut records, max_depth);

        let depths: Vec<f64> = records
            .iter()
            .map(|r| r.depth)
            .sorted_by(f64::total_cmp)
            .dedup()
            .collect();
        if depths.is_empty() {
            return Err(LakeError::InsufficientData(
                "no observation records to build the matrix from".to_string(),
            ));
        }

        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for record in &records {
            let row = rows
                .entry(record.date)
                .or_insert_with(|| vec![None; depths.len()]);
            let col = depths.iter().position(|&d| d == record.depth).unwrap();
            if row[col].is_none() {
                row[col] = record.value(variable);
            }
        }
        debug!(
            "observed {} matrix: {} dates x {} depths",
            variable.label(),
            rows.len(),
            depths.len()
        );
        Ok(ObservedMatrix {
            variable,
            depths,
            rows,
        })
    }

    /// Write the matrix as CSV: a header of depth columns, then one row per
    /// date with `None` markers for missing cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["NaN".to_string()];
        header.extend(self.depths.iter().map(|d| d.to_string()));
        wtr.write_record(&header)?;
        for (date, row) in &self.rows {
            let mut cells = vec![format_date(date)];
            cells.extend(row.iter().map(|cell| match cell {
                Some(v) => v.to_string(),
                None => MISSING_MARKER.to_string(),
            }));
            wtr.write_record(&cells)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Read a matrix previously written by `write_csv`.
    pub fn read_csv<R: Read>(reader: R, variable: StateVariable) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = rdr.records();
        let header = records
            .next()
            .ok_or_else(|| LakeError::InvalidFormat("empty observed matrix file".to_string()))??;
        let depths = header
            .iter()
            .skip(1)
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| LakeError::NonNumeric {
                    column: "depth header".to_string(),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let mut rows = BTreeMap::new();
        for row in records {
            let row = row?;
            let date = match row.get(0).map(parse_date) {
                Some(Ok(d)) => d,
                _ => continue,
            };
            let cells = (1..=depths.len())
                .map(|i| {
                    row.get(i)
                        .map(str::trim)
                        .filter(|s| !s.is_empty() && *s != MISSING_MARKER)
                        .and_then(|s| s.parse::<f64>().ok())
                })
                .collect();
            rows.insert(date, cells);
        }
        Ok(ObservedMatrix {
            variable,
            depths,
            rows,
        })
    }

    /// Artifact file name for this variable (`Observed_T.csv` etc).
    pub fn file_name(variable: StateVariable) -> String {
        format!("Observed_{}.csv", variable.label())
    }

    pub fn write_file(&self, dir: &Path) -> Result<()> {
        let path = dir.join(Self::file_name(self.variable));
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: NaiveDate, depth: f64, temp: Option<f64>) -> ObservationRecord {
        ObservationRecord {
            date,
            depth,
            temperature: temp,
            dissolved_oxygen: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_matrix_from_records() {
        let records = vec![
            record(date(2021, 6, 1), 5.0, Some(12.0)),
            record(date(2021, 6, 1), 1.0, Some(18.0)),
            record(date(2021, 7, 1), 1.0, Some(20.0)),
        ];
        let matrix =
            ObservedMatrix::from_records(&records, StateVariable::Temperature, 10.0).unwrap();
        assert_eq!(matrix.depths, vec![1.0, 5.0]);
        assert_eq!(matrix.rows[&date(2021, 6, 1)], vec![Some(18.0), Some(12.0)]);
        // july has no 5 m cast
        assert_eq!(matrix.rows[&date(2021, 7, 1)], vec![Some(20.0), None]);
    }

    #[test]
    fn test_negative_depths_fold_into_columns() {
        let records = vec![
            record(date(2021, 6, 1), -3.0, Some(6.0)),
            record(date(2021, 6, 1), 7.0, Some(8.0)),
        ];
        let matrix =
            ObservedMatrix::from_records(&records, StateVariable::Temperature, 10.0).unwrap();
        // -3 folds onto the existing 7 m column; first measurement wins
        assert_eq!(matrix.depths, vec![7.0]);
        assert_eq!(matrix.rows[&date(2021, 6, 1)], vec![Some(6.0)]);
    }

    #[test]
    fn test_csv_round_trip() {
        let records = vec![
            record(date(2021, 6, 1), 1.0, Some(18.5)),
            record(date(2021, 6, 1), 5.0, None),
        ];
        let matrix =
            ObservedMatrix::from_records(&records, StateVariable::Temperature, 10.0).unwrap();
        let mut buffer = Vec::new();
        matrix.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("NaN,1,5\n"));
        assert!(text.contains("2021-06-01,18.5,None"));

        let back =
            ObservedMatrix::read_csv(buffer.as_slice(), StateVariable::Temperature).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn test_empty_records_rejected() {
        let err = ObservedMatrix::from_records(&[], StateVariable::Temperature, 10.0).unwrap_err();
        assert!(matches!(err, LakeError::InsufficientData(_)));
    }
}
