/// Goodness-of-fit scores for a paired observation/simulation series.
///
/// Degenerate inputs (fewer than two pairs, flat observations) are rejected
/// up front so every score in a report is a real number.
use lkp_core::error::{LakeError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Root mean square error
    pub rmse: f64,
    /// RMSE over the sample standard deviation of the observations
    pub rsr: f64,
    /// RMSE over the observation range
    pub nrmse: f64,
    /// Nash-Sutcliffe efficiency
    pub nse: f64,
    /// Percent bias
    pub pbias: f64,
    /// Squared Pearson correlation
    pub r_squared: f64,
    /// Sum of squared residuals
    pub sos: f64,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl Metrics {
    /// Score a paired series.
    pub fn compute(observed: &[f64], simulated: &[f64]) -> Result<Metrics> {
        if observed.len() != simulated.len() {
            return Err(LakeError::InvalidFormat(format!(
                "paired series length mismatch: {} observed, {} simulated",
                observed.len(),
                simulated.len()
            )));
        }
        let n = observed.len();
        if n < 2 {
            return Err(LakeError::InsufficientData(format!(
                "{n} pair(s), need at least 2"
            )));
        }

        let mean_obs = observed.iter().sum::<f64>() / n as f64;
        let mean_sim = simulated.iter().sum::<f64>() / n as f64;

        let sos: f64 = observed
            .iter()
            .zip(simulated)
            .map(|(o, s)| (o - s).powi(2))
            .sum();
        let ss_obs: f64 = observed.iter().map(|o| (o - mean_obs).powi(2)).sum();
        let ss_sim: f64 = simulated.iter().map(|s| (s - mean_sim).powi(2)).sum();

        if ss_obs == 0.0 {
            return Err(LakeError::InsufficientData(
                "observations have zero variance".to_string(),
            ));
        }
        let range = observed.iter().copied().fold(f64::MIN, f64::max)
            - observed.iter().copied().fold(f64::MAX, f64::min);
        if range == 0.0 {
            return Err(LakeError::InsufficientData(
                "observations have zero range".to_string(),
            ));
        }
        if ss_sim == 0.0 {
            return Err(LakeError::InsufficientData(
                "simulated values have zero variance".to_string(),
            ));
        }

        let rmse = (sos / n as f64).sqrt();
        let stdev = (ss_obs / (n - 1) as f64).sqrt();

        let sum_obs: f64 = observed.iter().sum();
        let pbias = if sum_obs == 0.0 {
            0.0
        } else {
            observed
                .iter()
                .zip(simulated)
                .map(|(o, s)| o - s)
                .sum::<f64>()
                * 100.0
                / sum_obs
        };

        let covariance: f64 = observed
            .iter()
            .zip(simulated)
            .map(|(o, s)| (o - mean_obs) * (s - mean_sim))
            .sum();
        let r = covariance / (ss_obs.sqrt() * ss_sim.sqrt());

        Ok(Metrics {
            rmse,
            rsr: rmse / stdev,
            nrmse: rmse / range,
            nse: 1.0 - sos / ss_obs,
            pbias,
            r_squared: r * r,
            sos,
        })
    }

    /// Fixed 3-decimal reporting precision.
    pub fn rounded(&self) -> Metrics {
        Metrics {
            rmse: round3(self.rmse),
            rsr: round3(self.rsr),
            nrmse: round3(self.nrmse),
            nse: round3(self.nse),
            pbias: round3(self.pbias),
            r_squared: round3(self.r_squared),
            sos: round3(self.sos),
        }
    }
}
