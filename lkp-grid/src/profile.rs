/// Initial-condition profiles from same-day sparse observations.
use crate::interpolation::DepthSamples;
use lkp_core::error::{LakeError, Result};
use lkp_core::observation::{fold_negative_depths, ObservationRecord, StateVariable};
use chrono::NaiveDate;
use log::info;

/// One value per uniform profile depth for a single variable and date.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableProfile {
    pub variable: StateVariable,
    pub values: Vec<f64>,
}

/// Grid the observations taken on `init_date` onto `depths`.
///
/// Negative observation depths are folded by the profile maximum first.
/// Oxygen is rescaled to simulator units (mg/m3) after gridding. Zero
/// usable observations is a hard failure; silently seeding the simulator
/// with zeros would corrupt the whole run.
pub fn initial_profile(
    depths: &[f64],
    records: &[ObservationRecord],
    variable: StateVariable,
    init_date: NaiveDate,
) -> Result<VariableProfile> {
    let max_depth = *depths.last().unwrap_or(&0.0);
    let mut day_records: Vec<ObservationRecord> = records
        .iter()
        .filter(|r| r.date == init_date)
        .cloned()
        .collect();
    fold_negative_depths(&mut day_records, max_depth);

    let samples: Vec<(f64, f64)> = day_records
        .iter()
        .filter_map(|r| r.value(variable).map(|v| (r.depth, v)))
        .collect();
    if samples.is_empty() {
        return Err(LakeError::NoInitialData {
            variable: variable.column_name().to_string(),
            date: init_date.to_string(),
        });
    }
    info!(
        "{} initial observations for {} on {init_date}",
        samples.len(),
        variable.column_name()
    );

    let samples = DepthSamples::new(samples)?;
    let scale = variable.profile_scale();
    let values = depths
        .iter()
        .map(|&d| samples.value_at(d).map(|v| v * scale))
        .collect::<Result<Vec<f64>>>()?;
    Ok(VariableProfile { variable, values })
}
