/// Gap filling for daily meteorological driver tables.
///
/// Fill order: short forward persistence (4-day look-back), then day-of-year
/// climatology for whatever remains, then an unlimited forward/backward
/// sweep for residual gaps at the series boundaries.
use crate::daily_table::DailyTable;
use lkp_core::dates::{span_end, span_start};
use lkp_core::error::Result;
use chrono::Datelike;
use log::{debug, info};
use std::collections::BTreeMap;

/// Maximum look-back of the short persistence pass, days.
pub const PERSISTENCE_LIMIT: usize = 4;

/// Default cloud cover fraction when the raw table carries none.
pub const CLOUD_COVER_DEFAULT: f64 = 0.65;

/// Default relative humidity (%) when the raw table carries none.
pub const RELATIVE_HUMIDITY_DEFAULT: f64 = 50.0;

/// Columns the simulator input requires, in no particular order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Precipitation",
    "Global radiation",
    "Relative humidity",
    "Wind speed",
    "Air temperature",
    "Air pressure",
    "Cloud cover",
];

/// Carry the last seen value forward over gaps of at most `limit` days.
/// `None` means no limit.
pub fn forward_fill(values: &mut [Option<f64>], limit: Option<usize>) {
    let mut last: Option<f64> = None;
    let mut age = 0usize;
    for slot in values.iter_mut() {
        match *slot {
            Some(v) => {
                last = Some(v);
                age = 0;
            }
            None => {
                age += 1;
                if let Some(v) = last {
                    if limit.map_or(true, |l| age <= l) {
                        *slot = Some(v);
                    }
                }
            }
        }
    }
}

/// Carry the next seen value backward over leading gaps.
pub fn backward_fill(values: &mut [Option<f64>]) {
    let mut next: Option<f64> = None;
    for slot in values.iter_mut().rev() {
        match *slot {
            Some(v) => next = Some(v),
            None => *slot = next,
        }
    }
}

/// Mean per (month, day) across all years with data, for one column.
fn month_day_climatology(table: &DailyTable, idx: usize) -> BTreeMap<(u32, u32), f64> {
    let mut sums: BTreeMap<(u32, u32), (f64, u32)> = BTreeMap::new();
    for (date, row) in &table.rows {
        if let Some(v) = row[idx] {
            let entry = sums.entry((date.month(), date.day())).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect()
}

/// Produce a complete daily driver table for `[start_year, end_year]`.
///
/// Columns with no data at all are left missing throughout (the writer
/// emits its sentinel for them); required columns absent from the raw table
/// get their fixed defaults, except global radiation which has no sensible
/// constant and is propagated as missing.
pub fn fill_driver_table(
    mut table: DailyTable,
    start_year: i32,
    end_year: i32,
) -> Result<DailyTable> {
    table.reindex(span_start(start_year), span_end(end_year));

    for idx in 0..table.columns.len() {
        if !table.column_has_data(idx) {
            continue;
        }

        let mut values = table.column(idx);
        forward_fill(&mut values, Some(PERSISTENCE_LIMIT));
        table.set_column(idx, values);

        let climatology = month_day_climatology(&table, idx);
        let mut substituted = 0usize;
        for (date, row) in table.rows.iter_mut() {
            if row[idx].is_none() {
                if let Some(&mean) = climatology.get(&(date.month(), date.day())) {
                    row[idx] = Some(mean);
                    substituted += 1;
                }
            }
        }
        if substituted > 0 {
            debug!(
                "{}: {substituted} days filled from day-of-year climatology",
                table.columns[idx]
            );
        }

        // residual boundary gaps (no climatology entry for that month-day)
        let mut values = table.column(idx);
        forward_fill(&mut values, None);
        backward_fill(&mut values);
        table.set_column(idx, values);
    }

    for name in REQUIRED_COLUMNS {
        if table.column_index(name).is_none() {
            let default = match name {
                "Cloud cover" => Some(CLOUD_COVER_DEFAULT),
                "Relative humidity" => Some(RELATIVE_HUMIDITY_DEFAULT),
                _ => None,
            };
            info!("column {name:?} absent from raw table, defaulting to {default:?}");
            table.add_constant_column(name, default);
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily_table::DailyAccumulator;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_forward_fill_respects_limit() {
        let mut values = vec![Some(1.0), None, None, None, None, None, Some(2.0)];
        forward_fill(&mut values, Some(4));
        assert_eq!(
            values,
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(1.0), None, Some(2.0)]
        );
    }

    #[test]
    fn test_backward_fill() {
        let mut values = vec![None, None, Some(3.0), None];
        backward_fill(&mut values);
        assert_eq!(values, vec![Some(3.0), Some(3.0), Some(3.0), None]);
    }

    #[test]
    fn test_filled_table_has_no_gaps() {
        let mut acc = DailyAccumulator::new(vec!["Air temperature".to_string()]);
        // sparse observations in two years, same month-day coverage
        acc.push_row(date(2019, 6, 1), vec![Some(15.0)]);
        acc.push_row(date(2020, 6, 1), vec![Some(17.0)]);
        acc.push_row(date(2020, 7, 1), vec![Some(21.0)]);
        let table = fill_driver_table(acc.into_table(), 2019, 2020).unwrap();
        let idx = table.column_index("Air temperature").unwrap();
        assert!(table.column(idx).iter().all(|v| v.is_some()));
        assert_eq!(table.rows.len(), 365 + 366);
    }

    #[test]
    fn test_climatology_substitution() {
        let mut acc = DailyAccumulator::new(vec!["Air temperature".to_string()]);
        // June 15 known in 2019 and 2021, missing in 2020 and too far from
        // neighbors for the 4-day persistence pass
        acc.push_row(date(2019, 6, 15), vec![Some(10.0)]);
        acc.push_row(date(2021, 6, 15), vec![Some(20.0)]);
        let table = fill_driver_table(acc.into_table(), 2019, 2021).unwrap();
        let idx = table.column_index("Air temperature").unwrap();
        assert_eq!(table.rows[&date(2020, 6, 15)][idx], Some(15.0));
    }

    #[test]
    fn test_gapless_input_round_trips() {
        let mut acc = DailyAccumulator::new(vec!["Wind speed".to_string()]);
        for (i, day) in lkp_core::dates::simulation_days(2020, 2020).iter().enumerate() {
            acc.push_row(*day, vec![Some(i as f64)]);
        }
        let before = acc.into_table();
        let after = fill_driver_table(before.clone(), 2020, 2020).unwrap();
        let idx = after.column_index("Wind speed").unwrap();
        assert_eq!(after.column(idx), before.column(0));
    }

    #[test]
    fn test_absent_columns_get_defaults() {
        let mut acc = DailyAccumulator::new(vec!["Air temperature".to_string()]);
        acc.push_row(date(2020, 1, 1), vec![Some(1.0)]);
        let table = fill_driver_table(acc.into_table(), 2020, 2020).unwrap();

        let cloud = table.column_index("Cloud cover").unwrap();
        assert!(table.column(cloud).iter().all(|v| *v == Some(CLOUD_COVER_DEFAULT)));
        let humidity = table.column_index("Relative humidity").unwrap();
        assert!(table
            .column(humidity)
            .iter()
            .all(|v| *v == Some(RELATIVE_HUMIDITY_DEFAULT)));
        // no sensible constant for radiation: propagated as missing
        let radiation = table.column_index("Global radiation").unwrap();
        assert!(table.column(radiation).iter().all(|v| v.is_none()));
    }
}
