//! A single bundle of every tunable the engine uses, loadable from JSON.

use crate::{
    disease::{Disease, DiseaseProfile, ProfileRegistry},
    error::{AnalysisError, Result},
    observation::WeatherObservation,
    risk::{self, RiskAssessment},
    spray::SprayThresholds,
    tier::TierThresholds,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engine configuration. Every field has a documented default, so an empty JSON object is a
/// valid configuration.
///
/// # Examples
///
/// ```rust
/// use crop_protection_analysis::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "spray": { "wind_max_kph": 12.0 } }"#).unwrap();
///
/// assert_eq!(config.spray.wind_max_kph, 12.0);
/// assert_eq!(config.spray.rain_max_pct, 20.0);
/// assert_eq!(config.tiers.medium, 33.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tier boundaries.
    pub tiers: TierThresholds,
    /// Spray window limits.
    pub spray: SprayThresholds,
    /// Number of trailing observations in each point of [`EngineConfig::risk_curve`]. Default 3.
    pub risk_window: usize,
    /// Profiles added to, or replacing, the built in profiles.
    pub profiles: Vec<DiseaseProfile>,
    /// Fallback profile for diseases with no registered profile. Default none.
    pub default_profile: Option<DiseaseProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tiers: TierThresholds::default(),
            spray: SprayThresholds::default(),
            risk_window: 3,
            profiles: vec![],
            default_profile: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;

        debug!(
            profiles = config.profiles.len(),
            default_profile = config.default_profile.is_some(),
            "loaded engine configuration"
        );

        Ok(config)
    }

    /// Check every part of the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        self.tiers.validate()?;
        self.spray.validate()?;

        if self.risk_window == 0 {
            return Err(AnalysisError::configuration(
                "risk window must cover at least one observation",
            ));
        }

        let mut seen: Vec<Disease> = Vec::with_capacity(self.profiles.len());
        for profile in &self.profiles {
            if seen.contains(&profile.disease()) {
                return Err(AnalysisError::configuration(format!(
                    "more than one profile configured for {}",
                    profile.disease()
                )));
            }
            seen.push(profile.disease());
        }

        self.registry().validate()
    }

    /// The built in profiles, overridden and extended by the configured ones.
    pub fn registry(&self) -> ProfileRegistry {
        self.profiles
            .iter()
            .cloned()
            .fold(ProfileRegistry::default(), ProfileRegistry::with_profile)
            .with_default_profile(self.default_profile.clone())
    }

    /// Risk curve for `disease` using the configured profiles, tiers, and `risk_window`.
    pub fn risk_curve(
        &self,
        observations: &[WeatherObservation],
        disease: Disease,
    ) -> Result<Vec<RiskAssessment>> {
        let profile = self.registry().resolve(disease)?;
        risk::risk_curve(observations, &profile, &self.tiers, self.risk_window)
    }
}
