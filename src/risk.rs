//! Disease risk scores computed from a sequence of weather observations.
//!
//! All scores are in percent space. Given a [`DiseaseProfile`] with weights `w_h`, `w_t`, and
//! `w_w` the raw score is
//!
//! ```text
//! w_h * H + w_t * T + w_w * W
//! ```
//!
//! where `H` is the mean relative humidity, `T` is 100 times the mean temperature fit of the
//! profile's response curve, and `W` is the leaf wetness proxy: 100 times the fraction of the
//! profile's wetness saturation reached by the accumulated precipitation, capped at 100. The raw
//! score is clamped into `[0, 100]` and classified with [`TierThresholds`].

use crate::{
    disease::{Disease, DiseaseProfile, PhenologicalStage, ProfileRegistry},
    error::{AnalysisError, Result},
    observation::{validate_observations, WeatherObservation},
    tier::{Recommendation, RiskTier, TierThresholds},
    utility::{clamp_score, mean},
};
use chrono::NaiveDateTime;
use metfor::Quantity;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The verdict of the risk engine for one disease over one run of observations.
///
/// Assessments are computed on demand and never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Disease that was assessed.
    pub disease: Disease,
    /// Valid time of the last observation covered by this assessment.
    pub valid_time: NaiveDateTime,
    /// Score in `[0, 100]`.
    pub risk_score: f64,
    /// Tier of `risk_score`.
    pub risk_tier: RiskTier,
    /// Action for `risk_tier`.
    pub recommendation: Recommendation,
}

/// The normalized weather factors behind a score, each in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RiskFactors {
    pub humidity: f64,
    pub temperature: f64,
    pub wetness: f64,
}

impl RiskFactors {
    fn from_observations(observations: &[WeatherObservation], profile: &DiseaseProfile) -> Self {
        let response = profile.temperature_response();

        let humidity = mean(observations.iter().map(|obs| obs.humidity_pct())).unwrap_or(0.0);

        let temperature = mean(
            observations
                .iter()
                .map(|obs| response.fit(obs.temperature())),
        )
        .unwrap_or(0.0)
            * 100.0;

        let total_precip: f64 = observations
            .iter()
            .map(|obs| obs.precipitation().unpack())
            .sum();
        let wetness = (total_precip / profile.wetness_saturation().unpack()).min(1.0) * 100.0;

        RiskFactors {
            humidity,
            temperature,
            wetness,
        }
    }

    fn weighted_sum(&self, profile: &DiseaseProfile) -> f64 {
        profile.humidity_weight() * self.humidity
            + profile.temperature_weight() * self.temperature
            + profile.wetness_weight() * self.wetness
    }
}

/// Compute the risk of `profile`'s disease given `observations`.
///
/// The observations must be non-empty, chronological with no duplicate times, and every value
/// must be in range, otherwise `InvalidInput` is returned. An inconsistent profile or tier policy
/// returns `ConfigurationError`, as does a profile whose weights overflow the raw score. No score
/// is ever clamped from a value that is not a number.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use metfor::{Celsius, Mm};
/// use crop_protection_analysis::{
///     compute_disease_risk, DiseaseProfile, RiskTier, TierThresholds, WeatherObservation,
/// };
///
/// let obs = [
///     WeatherObservation::daily(NaiveDate::from_ymd(2025, 7, 15))
///         .with_temperature(Celsius(20.0))
///         .with_humidity(95.0)
///         .with_precipitation(Mm(12.0)),
/// ];
///
/// let anal =
///     compute_disease_risk(&obs, &DiseaseProfile::downy_mildew(), &TierThresholds::default())
///         .unwrap();
///
/// assert_eq!(anal.risk_tier, RiskTier::High);
/// ```
pub fn compute_disease_risk(
    observations: &[WeatherObservation],
    profile: &DiseaseProfile,
    tiers: &TierThresholds,
) -> Result<RiskAssessment> {
    validate_inputs(observations, profile, tiers)?;
    let assessment = assess_validated(observations, profile, tiers, 1.0)?;

    debug!(
        disease = %assessment.disease,
        observations = observations.len(),
        score = assessment.risk_score,
        tier = %assessment.risk_tier,
        "computed disease risk"
    );

    Ok(assessment)
}

/// Same as [`compute_disease_risk`], but the raw score is scaled by the vine's susceptibility at
/// `stage` before it is clamped.
pub fn compute_disease_risk_at_stage(
    observations: &[WeatherObservation],
    profile: &DiseaseProfile,
    tiers: &TierThresholds,
    stage: PhenologicalStage,
) -> Result<RiskAssessment> {
    validate_inputs(observations, profile, tiers)?;

    let susceptibility = profile.stage_susceptibility(stage);
    let assessment = assess_validated(observations, profile, tiers, susceptibility)?;

    debug!(
        disease = %assessment.disease,
        stage = stage.as_ref(),
        susceptibility,
        score = assessment.risk_score,
        tier = %assessment.risk_tier,
        "computed disease risk at phenological stage"
    );

    Ok(assessment)
}

/// Look up the profile for `disease` in `registry` and compute its risk.
///
/// Returns `UnknownDisease` if the registry has neither a profile for `disease` nor a default
/// profile.
pub fn assess_disease(
    observations: &[WeatherObservation],
    disease: Disease,
    registry: &ProfileRegistry,
    tiers: &TierThresholds,
) -> Result<RiskAssessment> {
    let profile = registry.resolve(disease)?;
    compute_disease_risk(observations, &profile, tiers)
}

/// Assess every disease with a registered profile, in disease order.
pub fn assess_all(
    observations: &[WeatherObservation],
    registry: &ProfileRegistry,
    tiers: &TierThresholds,
) -> Result<Vec<RiskAssessment>> {
    registry
        .diseases()
        .map(|disease| assess_disease(observations, disease, registry, tiers))
        .collect()
}

/// A risk curve: one assessment per observation, each over the trailing `window` observations
/// ending there. Windows at the start of the series are partial.
pub fn risk_curve(
    observations: &[WeatherObservation],
    profile: &DiseaseProfile,
    tiers: &TierThresholds,
    window: usize,
) -> Result<Vec<RiskAssessment>> {
    if window == 0 {
        return Err(AnalysisError::configuration(
            "risk curve window must cover at least one observation",
        ));
    }
    validate_inputs(observations, profile, tiers)?;

    let curve: Vec<RiskAssessment> = (0..observations.len())
        // Trailing window ending at each observation
        .map(|end| &observations[(end + 1).saturating_sub(window)..=end])
        .map(|slice| {
            let assessment = assess_validated(slice, profile, tiers, 1.0)?;
            trace!(
                valid_time = %assessment.valid_time,
                span = slice.len(),
                score = assessment.risk_score,
                "risk curve point"
            );
            Ok(assessment)
        })
        .collect::<Result<_>>()?;

    debug!(
        disease = %profile.disease(),
        points = curve.len(),
        window,
        "computed risk curve"
    );

    Ok(curve)
}

fn validate_inputs(
    observations: &[WeatherObservation],
    profile: &DiseaseProfile,
    tiers: &TierThresholds,
) -> Result<()> {
    validate_observations(observations)?;
    profile.validate()?;
    tiers.validate()
}

// Inputs must be validated, so observations are non-empty. Finite weights can still overflow, so
// the raw score is checked before it is clamped.
fn assess_validated(
    observations: &[WeatherObservation],
    profile: &DiseaseProfile,
    tiers: &TierThresholds,
    scale: f64,
) -> Result<RiskAssessment> {
    debug_assert!(!observations.is_empty());

    let factors = RiskFactors::from_observations(observations, profile);
    let raw = factors.weighted_sum(profile) * scale;
    if !raw.is_finite() {
        return Err(AnalysisError::configuration(format!(
            "{} profile produced a raw score of {} (weights {} / {} / {}, scale {})",
            profile.disease(),
            raw,
            profile.humidity_weight(),
            profile.temperature_weight(),
            profile.wetness_weight(),
            scale
        )));
    }

    let risk_score = clamp_score(raw);
    let risk_tier = tiers.classify(risk_score);

    Ok(RiskAssessment {
        disease: profile.disease(),
        valid_time: observations[observations.len() - 1].valid_time(),
        risk_score,
        risk_tier,
        recommendation: risk_tier.recommendation(),
    })
}
