/// Seasonal inflow adjustment.
///
/// Extends a partial inlet series to cover the whole simulation period and
/// applies the ice-season discharge derating. Only rows tagged `inlet` are
/// retained; outlet gauges measure what leaves the lake, not what drives it.
use crate::daily_table::{DailyAccumulator, DailyTable};
use lkp_core::dates::{parse_date, span_end, span_start};
use lkp_core::error::{LakeError, Result};
use chrono::{Datelike, NaiveDate};
use log::info;
use std::io::Read;

/// Discharge column name.
pub const DISCHARGE: &str = "InflowQ";

/// Winter derating window: December 21 through March 20, month-day wise.
fn in_winter_window(date: &NaiveDate) -> bool {
    let (month, day) = (date.month(), date.day());
    match month {
        12 => day >= 21,
        1 | 2 => true,
        3 => day <= 20,
        _ => false,
    }
}

/// Read the inflow CSV, keeping only rows whose `flow` tag is `inlet`.
/// Duplicate days are averaged as in the meteorological reader.
pub fn read_inflow_csv<R: Read>(reader: R) -> Result<DailyTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.trim() == "Date")
        .ok_or_else(|| LakeError::MissingColumn("Date".to_string()))?;
    let flow_idx = headers
        .iter()
        .position(|h| h.trim() == "flow")
        .ok_or_else(|| LakeError::MissingColumn("flow".to_string()))?;

    let value_indices: Vec<usize> = (0..headers.len())
        .filter(|i| *i != date_idx && *i != flow_idx)
        .collect();
    let columns = value_indices
        .iter()
        .map(|&i| headers.get(i).unwrap().trim().to_string())
        .collect();

    let mut acc = DailyAccumulator::new(columns);
    for row in rdr.records() {
        let row = row?;
        if row.get(flow_idx).map(str::trim) != Some("inlet") {
            continue;
        }
        let date = match row.get(date_idx).map(parse_date) {
            Some(Ok(d)) => d,
            _ => continue,
        };
        let cells = value_indices
            .iter()
            .map(|&i| row.get(i).and_then(|s| s.trim().parse::<f64>().ok()))
            .collect();
        acc.push_row(date, cells);
    }
    Ok(acc.into_table())
}

/// Load the inflow table from disk.
pub fn load_inflow_csv(path: &std::path::Path) -> Result<DailyTable> {
    let file = std::fs::File::open(path)?;
    read_inflow_csv(file)
}

/// Linear interpolation across interior gaps, by day offset.
pub fn interpolate_by_index(values: &mut [Option<f64>]) {
    let mut last_known: Option<usize> = None;
    for i in 0..values.len() {
        if values[i].is_none() {
            continue;
        }
        if let Some(j) = last_known {
            if i - j > 1 {
                let ya = values[j].unwrap();
                let yb = values[i].unwrap();
                let span = (i - j) as f64;
                for k in (j + 1)..i {
                    values[k] = Some(ya + (yb - ya) * (k - j) as f64 / span);
                }
            }
        }
        last_known = Some(i);
    }
}

fn shift_rows_by_year(table: &DailyTable, year: i32, offset: i32) -> Vec<(NaiveDate, Vec<Option<f64>>)> {
    table
        .rows
        .iter()
        .filter(|(date, _)| date.year() == year)
        .filter_map(|(date, row)| {
            // Feb 29 has no counterpart in a non-leap target year
            NaiveDate::from_ymd_opt(date.year() + offset, date.month(), date.day())
                .map(|shifted| (shifted, row.clone()))
        })
        .collect()
}

/// Produce a gapless inflow series over the full simulation period.
///
/// Particulate organic phosphorus (`InflowPOP = InflowTP − InflowTDP`) is
/// derived before any temporal extension. A series starting more than a
/// year into the period gets its first available year duplicated one year
/// back; symmetrically at the end. Remaining gaps are interpolated by date
/// index then swept forward/backward. Discharge is halved inside the
/// winter window and DOC converted to simulator units.
pub fn adjust_inflow(mut table: DailyTable, start_year: i32, end_year: i32) -> Result<DailyTable> {
    if table.rows.is_empty() {
        return Err(LakeError::InsufficientData(
            "inflow table has no inlet rows".to_string(),
        ));
    }

    // POP from the phosphorus species, row-wise, before extension
    if let (Some(tp), Some(tdp)) = (table.column_index("InflowTP"), table.column_index("InflowTDP")) {
        let pop: Vec<Option<f64>> = table
            .rows
            .values()
            .map(|row| match (row[tp], row[tdp]) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            })
            .collect();
        table.add_constant_column("InflowPOP", None);
        let idx = table.column_index("InflowPOP").unwrap();
        table.set_column(idx, pop);
    }

    let first_date = *table.rows.keys().next().unwrap();
    let last_date = *table.rows.keys().next_back().unwrap();

    if first_date >= span_start(start_year + 1) {
        let first_year = first_date.year();
        info!("inflow series starts {first_date}; duplicating {first_year} back one year");
        for (date, row) in shift_rows_by_year(&table, first_year, -1) {
            table.rows.entry(date).or_insert(row);
        }
    }
    if last_date <= span_end(end_year - 1) {
        let last_year = last_date.year();
        info!("inflow series ends {last_date}; duplicating {last_year} forward one year");
        for (date, row) in shift_rows_by_year(&table, last_year, 1) {
            table.rows.entry(date).or_insert(row);
        }
    }

    table.reindex(span_start(start_year), span_end(end_year));

    for idx in 0..table.columns.len() {
        let mut values = table.column(idx);
        interpolate_by_index(&mut values);
        crate::gapfill::forward_fill(&mut values, None);
        crate::gapfill::backward_fill(&mut values);
        table.set_column(idx, values);
    }

    if let Some(q) = table.column_index(DISCHARGE) {
        for (date, row) in table.rows.iter_mut() {
            if in_winter_window(date) {
                if let Some(v) = row[q] {
                    row[q] = Some(v / 2.0);
                }
            }
        }
    }

    // DOC mg/L to simulator units
    if let Some(doc) = table.column_index("InflowDOC") {
        for row in table.rows.values_mut() {
            if let Some(v) = row[doc] {
                row[doc] = Some(v * 0.001);
            }
        }
    }

    Ok(table)
}
