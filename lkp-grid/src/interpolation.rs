/// Piecewise-linear interpolation over a sparse depth-to-value relation.
///
/// Every depth axis in the toolkit (bathymetry, initial profiles, simulated
/// layers) goes through the same policy: exact matches return the sample
/// value (duplicates averaged), queries between two known depths are
/// linearly interpolated, and queries outside the known range are clamped
/// to the nearest boundary value. There is no slope-based extrapolation.
use lkp_core::error::{LakeError, Result};

/// Linearly interpolate the value at `xc` between `(xa, ya)` and `(xb, yb)`.
///
/// Coincident bracketing depths are a caller bug and fail loudly instead of
/// propagating NaN into the generated grids.
pub fn find_y_point(xa: f64, ya: f64, xb: f64, yb: f64, xc: f64) -> Result<f64> {
    if xa == xb {
        return Err(LakeError::CoincidentDepths(xa));
    }
    Ok(ya + (xc - xa) * (ya - yb) / (xa - xb))
}

/// A sparse, depth-sorted set of (depth, value) samples.
#[derive(Debug, Clone)]
pub struct DepthSamples {
    samples: Vec<(f64, f64)>,
}

impl DepthSamples {
    /// Build from unsorted samples. Duplicate depths are kept; `value_at`
    /// averages them on exact match.
    pub fn new(mut samples: Vec<(f64, f64)>) -> Result<Self> {
        if samples.is_empty() {
            return Err(LakeError::InsufficientData(
                "no samples to interpolate over".to_string(),
            ));
        }
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(DepthSamples { samples })
    }

    pub fn min_depth(&self) -> f64 {
        self.samples[0].0
    }

    pub fn max_depth(&self) -> f64 {
        self.samples[self.samples.len() - 1].0
    }

    /// Value at `depth` under the exact/interpolate/clamp policy.
    pub fn value_at(&self, depth: f64) -> Result<f64> {
        // exact matches win, averaged across duplicates
        let matches: Vec<f64> = self
            .samples
            .iter()
            .filter(|(d, _)| *d == depth)
            .map(|(_, v)| *v)
            .collect();
        if !matches.is_empty() {
            return Ok(matches.iter().sum::<f64>() / matches.len() as f64);
        }

        // nearest sample below, first sample above
        let mut below: Option<(f64, f64)> = None;
        let mut above: Option<(f64, f64)> = None;
        for &(d, v) in &self.samples {
            if d < depth {
                below = Some((d, v));
            } else {
                above = Some((d, v));
                break;
            }
        }

        match (below, above) {
            // clamp: no extrapolation past the first/last known sample
            (None, _) => Ok(self.samples[0].1),
            (_, None) => Ok(self.samples[self.samples.len() - 1].1),
            (Some((xa, ya)), Some((xb, yb))) => find_y_point(xa, ya, xb, yb, depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_y_point_midpoint() {
        let y = find_y_point(0.0, 100.0, 2.0, 40.0, 1.0).unwrap();
        assert_eq!(y, 70.0);
    }

    #[test]
    fn test_find_y_point_coincident_depths_fail() {
        let err = find_y_point(2.0, 10.0, 2.0, 12.0, 2.0).unwrap_err();
        assert!(matches!(err, LakeError::CoincidentDepths(_)));
    }

    #[test]
    fn test_exact_match_returns_sample_value() {
        let samples = DepthSamples::new(vec![(0.0, 5.0), (2.0, 9.0), (4.0, 1.0)]).unwrap();
        assert_eq!(samples.value_at(2.0).unwrap(), 9.0);
    }

    #[test]
    fn test_duplicate_depths_are_averaged() {
        let samples = DepthSamples::new(vec![(1.0, 4.0), (1.0, 6.0), (3.0, 2.0)]).unwrap();
        assert_eq!(samples.value_at(1.0).unwrap(), 5.0);
    }

    #[test]
    fn test_clamping_below_and_above() {
        let samples = DepthSamples::new(vec![(1.0, 8.0), (5.0, 2.0)]).unwrap();
        assert_eq!(samples.value_at(0.0).unwrap(), 8.0);
        assert_eq!(samples.value_at(9.0).unwrap(), 2.0);
    }

    #[test]
    fn test_interpolates_between_brackets() {
        let samples = DepthSamples::new(vec![(2.0, 40.0), (4.0, 0.0)]).unwrap();
        assert_eq!(samples.value_at(3.0).unwrap(), 20.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let samples = DepthSamples::new(vec![(4.0, 0.0), (0.0, 100.0), (2.0, 40.0)]).unwrap();
        assert_eq!(samples.value_at(1.0).unwrap(), 70.0);
    }

    #[test]
    fn test_empty_samples_rejected() {
        assert!(DepthSamples::new(vec![]).is_err());
    }
}
