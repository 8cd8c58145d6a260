/// Uniform-resolution bathymetry from raw survey points.
use crate::interpolation::DepthSamples;
use lkp_core::bathymetry::DepthAreaPoint;
use lkp_core::error::Result;
use log::debug;

/// Maximum profile depth from the deepest survey point.
///
/// Exact integers and exact half-steps are kept as-is; anything else is
/// rounded down to the nearest 0.5 boundary.
pub fn round_max_depth(deepest: f64) -> f64 {
    let whole = deepest.floor();
    if deepest == whole || deepest == whole + 0.5 {
        deepest
    } else if deepest > whole + 0.5 {
        whole + 0.5
    } else {
        whole
    }
}

/// A uniform depth axis with the cross-sectional area at each depth.
#[derive(Debug, Clone, PartialEq)]
pub struct BathymetryGrid {
    /// Strictly increasing, starts at 0, fixed step
    pub depths: Vec<f64>,
    /// Area aligned with `depths`
    pub areas: Vec<f64>,
}

impl BathymetryGrid {
    /// Grid raw survey points onto a `0, r, 2r, ..` axis.
    ///
    /// Points are depth-sorted by the loader; exact matches average
    /// duplicate areas, gaps interpolate between the bracketing points, and
    /// depths outside the surveyed range clamp to the boundary area.
    pub fn from_points(points: &[DepthAreaPoint], resolution: f64) -> Result<Self> {
        let samples = DepthSamples::new(points.iter().map(|p| (p.depth, p.area)).collect())?;
        let max_depth = round_max_depth(samples.max_depth());

        // covers 0..=max_depth; a half-step max gets one level past it,
        // clamped to the deepest surveyed area
        let level_count = (max_depth / resolution).ceil() as usize + 1;
        let mut depths = Vec::with_capacity(level_count);
        let mut areas = Vec::with_capacity(level_count);
        for i in 0..level_count {
            let depth = i as f64 * resolution;
            depths.push(depth);
            areas.push(samples.value_at(depth)?);
        }
        debug!(
            "gridded {} survey points onto {} levels (max depth {max_depth} m)",
            points.len(),
            depths.len()
        );
        Ok(BathymetryGrid { depths, areas })
    }

    pub fn max_depth(&self) -> f64 {
        *self.depths.last().unwrap_or(&0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(depth: f64, area: f64) -> DepthAreaPoint {
        DepthAreaPoint { depth, area }
    }

    #[test]
    fn test_round_max_depth_rule() {
        assert_eq!(round_max_depth(7.0), 7.0);
        assert_eq!(round_max_depth(7.5), 7.5);
        assert_eq!(round_max_depth(7.8), 7.5);
        assert_eq!(round_max_depth(7.2), 7.0);
    }

    #[test]
    fn test_gridding_scenario() {
        // raw [(0,100),(2,40),(4,0)] at resolution 1
        let points = [point(0.0, 100.0), point(2.0, 40.0), point(4.0, 0.0)];
        let grid = BathymetryGrid::from_points(&points, 1.0).unwrap();
        assert_eq!(grid.depths, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.areas, vec![100.0, 70.0, 40.0, 20.0, 0.0]);
    }

    #[test]
    fn test_axis_starts_at_zero_and_increases() {
        let points = [point(0.3, 90.0), point(6.8, 5.0)];
        let grid = BathymetryGrid::from_points(&points, 1.0).unwrap();
        assert_eq!(grid.depths[0], 0.0);
        assert!(grid.depths.windows(2).all(|w| w[0] < w[1]));
        // 6.8 rounds down to 6.5; the axis runs one whole level past it
        assert_eq!(grid.max_depth(), 7.0);
        // depth 0 precedes the shallowest survey point, depth 7 follows the
        // deepest: both clamp to the boundary areas
        assert_eq!(grid.areas[0], 90.0);
        assert_eq!(*grid.areas.last().unwrap(), 5.0);
    }

    #[test]
    fn test_duplicate_survey_depths_average() {
        let points = [point(0.0, 100.0), point(1.0, 60.0), point(1.0, 40.0), point(2.0, 10.0)];
        let grid = BathymetryGrid::from_points(&points, 1.0).unwrap();
        assert_eq!(grid.areas[1], 50.0);
    }
}
