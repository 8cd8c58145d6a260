/// Raw bathymetry survey points (depth vs. cross-sectional area).
///
/// Unlike observation ingestion, problems here are hard failures: a corrupt
/// bathymetry table would silently deform every simulator input built from
/// it.
use crate::error::{LakeError, Result};
use std::io::Read;

/// One surveyed depth/area pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAreaPoint {
    /// Depth below the surface, m
    pub depth: f64,
    /// Cross-sectional area at that depth, m2
    pub area: f64,
}

/// Read survey points from CSV with `Depth` and `Area` columns.
///
/// The raw survey is not guaranteed to arrive depth-sorted; points are
/// sorted here so the downstream bracketing scan never depends on file
/// order.
pub fn read_bathymetry_points<R: Read>(reader: R) -> Result<Vec<DepthAreaPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let depth_idx = headers
        .iter()
        .position(|h| h.trim() == "Depth")
        .ok_or_else(|| LakeError::MissingColumn("Depth".to_string()))?;
    let area_idx = headers
        .iter()
        .position(|h| h.trim() == "Area")
        .ok_or_else(|| LakeError::MissingColumn("Area".to_string()))?;

    let mut points = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let depth = parse_numeric(&row, depth_idx, "Depth")?;
        let area = parse_numeric(&row, area_idx, "Area")?;
        if depth < 0.0 || area < 0.0 {
            return Err(LakeError::InvalidFormat(format!(
                "negative bathymetry entry (depth {depth}, area {area})"
            )));
        }
        points.push(DepthAreaPoint { depth, area });
    }
    if points.is_empty() {
        return Err(LakeError::InvalidFormat(
            "bathymetry table contains no survey points".to_string(),
        ));
    }
    points.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    Ok(points)
}

/// Load the per-lake bathymetry table from disk.
pub fn load_bathymetry_csv(path: &std::path::Path) -> Result<Vec<DepthAreaPoint>> {
    let file = std::fs::File::open(path)?;
    read_bathymetry_points(file)
}

fn parse_numeric(row: &csv::StringRecord, idx: usize, column: &str) -> Result<f64> {
    let cell = row.get(idx).unwrap_or("");
    cell.trim().parse::<f64>().map_err(|_| LakeError::NonNumeric {
        column: column.to_string(),
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_sorts_by_depth() {
        let csv = "Lake,Depth,Area\nBromont,4,0\nBromont,0,100\nBromont,2,40\n";
        let points = read_bathymetry_points(csv.as_bytes()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].depth, 0.0);
        assert_eq!(points[2].area, 0.0);
    }

    #[test]
    fn test_non_numeric_is_hard_error() {
        let csv = "Depth,Area\n0,100\ntwo,40\n";
        let err = read_bathymetry_points(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LakeError::NonNumeric { .. }));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let csv = "Depth,Area\n";
        assert!(read_bathymetry_points(csv.as_bytes()).is_err());
    }
}
