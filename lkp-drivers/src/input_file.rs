/// Writer for the simulator's daily driver input file.
///
/// Fixed 33-column tab-separated layout under two header lines. Each column
/// carries its own numeric format; cells still missing after gap filling are
/// written as the sentinel and substituted with `NaN` in the final artifact.
use crate::daily_table::DailyTable;
use lkp_core::dates::simulation_days;
use lkp_core::error::Result;
use chrono::Datelike;
use log::info;
use std::io::Write;
use std::path::Path;

/// Missing-value sentinel, replaced textually before the file is written.
pub const MISSING_SENTINEL: &str = "-99999999";

const HEADER_NOTE: &str = "Lake simulator driver data\tPOC = TP - DOP";
const HEADER_COLUMNS: &str = "Year\tMonth\tDay\tGlobalRadiation\tCloudCover\t\
AirTemperature\tRelativeHumidity\tAirPressure\tWindSpeed\tPrecipitation\t\
InflowQ\tInflowT\tInflowC\tPOC\tInflowTP\tInflowDOP\tInflowChla\tDOC\tDIC\t\
O\tNO3\tNH4\tSO4\tFe2\tCa2\tpH\tCH4\tFe3\tAl3\tSiO4\tSiO2\tdiatom\tPOP";

#[derive(Debug, Clone, Copy)]
enum CellFormat {
    /// Truncating integer
    Int,
    /// 4 significant digits, general notation
    Sig4,
    /// Fixed, 2 decimals
    F2,
    /// Fixed, 3 decimals
    F3,
}

impl CellFormat {
    fn render(self, value: f64) -> String {
        match self {
            CellFormat::Int => format!("{}", value.trunc() as i64),
            CellFormat::Sig4 => format_significant(value, 4),
            CellFormat::F2 => format!("{value:.2}"),
            CellFormat::F3 => format!("{value:.3}"),
        }
    }
}

/// C `%g`-style general format: fixed notation inside a sane exponent
/// range, scientific outside it, trailing zeros trimmed.
fn format_significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits {
        let mantissa = value / 10f64.powi(exponent);
        let body = trim_zeros(format!("{:.*}", (digits - 1) as usize, mantissa));
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{body}e{sign}{:02}", exponent.abs())
    } else {
        let decimals = (digits - 1 - exponent).max(0) as usize;
        trim_zeros(format!("{value:.decimals$}"))
    }
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

enum Source {
    Year,
    Month,
    Day,
    Meteo(&'static str),
    /// Inflow column when river inflow is enabled, fixed value otherwise
    Inflow { column: &'static str, fallback: f64 },
    Constant(f64),
}

struct ColumnSpec {
    source: Source,
    with_inflow: CellFormat,
    without_inflow: CellFormat,
}

fn col(source: Source, with_inflow: CellFormat, without_inflow: CellFormat) -> ColumnSpec {
    ColumnSpec {
        source,
        with_inflow,
        without_inflow,
    }
}

fn column_schema() -> Vec<ColumnSpec> {
    use CellFormat::*;
    use Source::*;
    vec![
        col(Year, Int, Int),
        col(Month, Int, Int),
        col(Day, Int, Int),
        col(Meteo("Global radiation"), Sig4, Sig4),
        col(Meteo("Cloud cover"), F2, F2),
        col(Meteo("Air temperature"), F2, F2),
        col(Meteo("Relative humidity"), Int, Int),
        col(Meteo("Air pressure"), Int, Int),
        col(Meteo("Wind speed"), F2, F2),
        col(Meteo("Precipitation"), F3, F3),
        col(Inflow { column: "InflowQ", fallback: 2000.0 }, F3, Int),
        col(Inflow { column: "InflowTemp", fallback: 10.0 }, F3, Int),
        col(Constant(0.5), F3, F3),   // InflowC
        col(Constant(0.01), F3, F3),  // POC (suspended solids)
        col(Inflow { column: "InflowTP", fallback: 5.0 }, F3, Int),
        col(Constant(1.0), F3, F3),   // InflowDOP
        col(Inflow { column: "InflowChla", fallback: 1.0 }, F3, F3),
        col(Inflow { column: "InflowDOC", fallback: 2000.0 }, F3, Int),
        col(Constant(20000.0), F3, F3), // DIC
        col(Constant(12000.0), F3, F3), // O
        col(Constant(0.0), Int, Int),   // NO3
        col(Constant(0.0), Int, Int),   // NH4
        col(Constant(0.0), Int, Int),   // SO4
        col(Constant(0.0), Int, Int),   // Fe2
        col(Constant(0.0), Int, Int),   // Ca2
        col(Inflow { column: "InflowpH", fallback: 0.0 }, Int, Int),
        col(Constant(0.0), Int, Int),   // CH4
        col(Constant(0.0), Int, Int),   // Fe3
        col(Constant(0.0), Int, Int),   // Al3
        col(Constant(0.0), Int, Int),   // SiO4
        col(Constant(0.0), Int, Int),   // SiO2
        col(Constant(0.0), Int, Int),   // diatom
        col(Inflow { column: "InflowPOP", fallback: 0.0 }, Int, Int),
    ]
}

/// River inflow with no measured chlorophyll gets a lighter default than
/// the no-inflow stream.
const INFLOW_CHLA_DEFAULT: f64 = 0.1;

fn table_cell(table: &DailyTable, day: &chrono::NaiveDate, name: &str) -> Option<f64> {
    let idx = table.column_index(name)?;
    table.rows.get(day).and_then(|row| row[idx])
}

/// Render the full driver table over `[start_year, end_year]`.
pub fn render_driver_table(
    meteo: &DailyTable,
    inflow: Option<&DailyTable>,
    start_year: i32,
    end_year: i32,
) -> Result<String> {
    let schema = column_schema();
    let mut out = String::new();
    out.push_str(HEADER_NOTE);
    out.push('\n');
    out.push_str(HEADER_COLUMNS);
    out.push('\n');

    for day in simulation_days(start_year, end_year) {
        let mut cells = Vec::with_capacity(schema.len());
        for column in &schema {
            let format = if inflow.is_some() {
                column.with_inflow
            } else {
                column.without_inflow
            };
            let value = match &column.source {
                Source::Year => Some(day.year() as f64),
                Source::Month => Some(day.month() as f64),
                Source::Day => Some(day.day() as f64),
                Source::Meteo(name) => table_cell(meteo, &day, name),
                Source::Constant(v) => Some(*v),
                Source::Inflow { column, fallback } => match inflow {
                    Some(table) => table_cell(table, &day, column).or_else(|| {
                        if *column == "InflowChla" {
                            Some(INFLOW_CHLA_DEFAULT)
                        } else {
                            Some(*fallback)
                        }
                    }),
                    None => Some(*fallback),
                },
            };
            match value {
                Some(v) => cells.push(format.render(v)),
                None => cells.push(MISSING_SENTINEL.to_string()),
            }
        }
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }

    Ok(out.replace(MISSING_SENTINEL, "NaN"))
}

/// Write the driver file to disk.
pub fn write_driver_file(
    path: &Path,
    meteo: &DailyTable,
    inflow: Option<&DailyTable>,
    start_year: i32,
    end_year: i32,
) -> Result<()> {
    let table = render_driver_table(meteo, inflow, start_year, end_year)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(table.as_bytes())?;
    info!("driver file written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daily_table::DailyAccumulator;
    use chrono::NaiveDate;

    fn meteo_for(year: i32) -> DailyTable {
        let columns = vec![
            "Global radiation".to_string(),
            "Cloud cover".to_string(),
            "Air temperature".to_string(),
            "Relative humidity".to_string(),
            "Air pressure".to_string(),
            "Wind speed".to_string(),
            "Precipitation".to_string(),
        ];
        let mut acc = DailyAccumulator::new(columns);
        for day in simulation_days(year, year) {
            acc.push_row(
                day,
                vec![
                    Some(250.0),
                    Some(0.65),
                    Some(12.5),
                    Some(72.0),
                    Some(101325.0),
                    Some(3.2),
                    Some(1.5),
                ],
            );
        }
        acc.into_table()
    }

    #[test]
    fn test_layout_and_defaults_without_inflow() {
        let table = render_driver_table(&meteo_for(2020), None, 2020, 2020).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2 + 366);
        assert_eq!(lines[1].split('\t').count(), 33);

        let first: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(first.len(), 33);
        assert_eq!(&first[0..3], &["2020", "1", "1"]);
        assert_eq!(first[3], "250");
        assert_eq!(first[4], "0.65");
        assert_eq!(first[5], "12.50");
        assert_eq!(first[6], "72");
        assert_eq!(first[10], "2000"); // stream discharge default
        assert_eq!(first[11], "10");
        assert_eq!(first[16], "1.000"); // chlorophyll without inflow
        assert_eq!(first[19], "12000.000"); // oxygen
        assert_eq!(first[32], "0"); // POP
    }

    #[test]
    fn test_missing_cells_become_nan() {
        let columns = vec!["Air temperature".to_string()];
        let mut acc = DailyAccumulator::new(columns);
        acc.push_row(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), vec![None]);
        let meteo = acc.into_table();
        let table = render_driver_table(&meteo, None, 2020, 2020).unwrap();
        let first: Vec<&str> = table.lines().nth(2).unwrap().split('\t').collect();
        assert_eq!(first[3], "NaN"); // radiation column absent entirely
        assert_eq!(first[5], "NaN"); // temperature cell missing
        assert!(!table.contains(MISSING_SENTINEL));
    }

    #[test]
    fn test_inflow_columns_come_from_inflow_table() {
        let columns = vec![
            "InflowQ".to_string(),
            "InflowTemp".to_string(),
            "InflowTP".to_string(),
            "InflowDOC".to_string(),
            "InflowpH".to_string(),
            "InflowPOP".to_string(),
        ];
        let mut acc = DailyAccumulator::new(columns);
        for day in simulation_days(2020, 2020) {
            acc.push_row(
                day,
                vec![
                    Some(3.25),
                    Some(8.4),
                    Some(24.0),
                    Some(4.2),
                    Some(7.0),
                    Some(12.6),
                ],
            );
        }
        let inflow = acc.into_table();
        let table = render_driver_table(&meteo_for(2020), Some(&inflow), 2020, 2020).unwrap();
        let first: Vec<&str> = table.lines().nth(2).unwrap().split('\t').collect();
        assert_eq!(first[10], "3.250");
        assert_eq!(first[11], "8.400");
        assert_eq!(first[14], "24.000");
        assert_eq!(first[16], "0.100"); // chlorophyll default under inflow
        assert_eq!(first[17], "4.200");
        assert_eq!(first[25], "7"); // pH, truncating integer
        assert_eq!(first[32], "12"); // POP, truncating integer
    }

    #[test]
    fn test_general_format() {
        assert_eq!(format_significant(250.0, 4), "250");
        assert_eq!(format_significant(123.456, 4), "123.5");
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(12345678.0, 4), "1.235e+07");
        assert_eq!(format_significant(0.00001234, 4), "1.234e-05");
    }
}
