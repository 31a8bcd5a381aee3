//! Diseases, their weather sensitivity profiles, and the registry used to look profiles up.
//!
//! A [`DiseaseProfile`] is a plain parameter object. The risk scoring routines never
//! branch on which disease they are scoring, everything disease specific is carried by the
//! profile's coefficients. Registering a new disease is a matter of building a new profile.

use crate::{
    error::{AnalysisError, Result},
    interpolation::linear_interp,
};
use metfor::{Celsius, Mm, Quantity};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Grapevine diseases the engine knows how to name.
///
/// Only some have a built in profile, see [`ProfileRegistry::default`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    /// Downy mildew, *Plasmopara viticola*. Favors high humidity and moderate temperatures.
    DownyMildew,
    /// Powdery mildew, *Erysiphe necator*. Favors warm, relatively dry weather.
    PowderyMildew,
    /// Botrytis bunch rot, *Botrytis cinerea*. Favors cool, wet weather.
    Botrytis,
    /// Anthracnose, *Elsinoë ampelina*. No built in profile.
    Anthracnose,
}

impl Disease {
    /// Parse a disease from its snake case name, e.g. `"downy_mildew"`.
    pub fn from_name(name: &str) -> Result<Self> {
        Disease::from_str(name.trim())
            .map_err(|_| AnalysisError::UnknownDisease(name.to_owned()))
    }
}

impl Display for Disease {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.as_ref())
    }
}

/// Growth stages of the vine. Susceptibility to infection varies by stage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PhenologicalStage {
    Dormancy,
    BudBreak,
    Flowering,
    FruitSet,
    Veraison,
    Ripening,
}

impl PhenologicalStage {
    /// Multiplier applied to a risk score when no profile specific override exists.
    pub fn default_susceptibility(self) -> f64 {
        use PhenologicalStage::*;

        match self {
            Dormancy => 0.2,
            BudBreak => 0.8,
            Flowering => 1.2,
            FruitSet => 1.1,
            Veraison => 0.9,
            Ripening => 0.7,
        }
    }
}

/// Trapezoidal temperature response: zero outside `(min, max)`, one inside
/// `[optimum_low, optimum_high]`, and linear in between.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponse {
    /// Below this temperature the pathogen does not develop.
    #[serde(with = "crate::units::celsius")]
    pub min: Celsius,
    /// Lower edge of the optimal range.
    #[serde(with = "crate::units::celsius")]
    pub optimum_low: Celsius,
    /// Upper edge of the optimal range.
    #[serde(with = "crate::units::celsius")]
    pub optimum_high: Celsius,
    /// Above this temperature the pathogen does not develop.
    #[serde(with = "crate::units::celsius")]
    pub max: Celsius,
}

impl TemperatureResponse {
    /// Suitability of `temperature` for the pathogen, in `[0, 1]`.
    pub fn fit(&self, temperature: Celsius) -> f64 {
        let t = temperature.unpack();
        let (min, lo, hi, max) = (
            self.min.unpack(),
            self.optimum_low.unpack(),
            self.optimum_high.unpack(),
            self.max.unpack(),
        );

        if t <= min || t >= max {
            0.0
        } else if t < lo {
            linear_interp(t, min, lo, 0.0, 1.0)
        } else if t <= hi {
            1.0
        } else {
            linear_interp(t, hi, max, 1.0, 0.0)
        }
    }

    fn validate(&self) -> Result<()> {
        let (min, lo, hi, max) = (
            self.min.unpack(),
            self.optimum_low.unpack(),
            self.optimum_high.unpack(),
            self.max.unpack(),
        );

        if ![min, lo, hi, max].iter().all(|v| v.is_finite()) {
            return Err(AnalysisError::configuration(
                "temperature response contains a value that is not a number",
            ));
        }

        if !(min < lo && lo <= hi && hi < max) {
            return Err(AnalysisError::configuration(format!(
                "temperature response must satisfy min < optimum_low <= optimum_high < max, got \
                 {} / {} / {} / {}",
                min, lo, hi, max
            )));
        }

        Ok(())
    }
}

/// Weather sensitivity coefficients for one disease.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseaseProfile {
    disease: Disease,
    humidity_weight: f64,
    temperature_weight: f64,
    wetness_weight: f64,
    temperature_response: TemperatureResponse,
    #[serde(with = "crate::units::mm")]
    wetness_saturation: Mm,
    #[serde(default)]
    stage_susceptibility: BTreeMap<PhenologicalStage, f64>,
}

impl DiseaseProfile {
    /// Create a new profile.
    ///
    /// Weights apply to mean humidity (percent), temperature fit (percent), and the leaf wetness
    /// proxy (percent of `wetness_saturation` reached by accumulated precipitation). A negative
    /// weight means the factor suppresses the disease.
    pub fn new(
        disease: Disease,
        humidity_weight: f64,
        temperature_weight: f64,
        wetness_weight: f64,
        temperature_response: TemperatureResponse,
        wetness_saturation: Mm,
    ) -> Self {
        DiseaseProfile {
            disease,
            humidity_weight,
            temperature_weight,
            wetness_weight,
            temperature_response,
            wetness_saturation,
            stage_susceptibility: BTreeMap::new(),
        }
    }

    /// Built in profile for downy mildew.
    pub fn downy_mildew() -> Self {
        Self::new(
            Disease::DownyMildew,
            0.40,
            0.30,
            0.30,
            TemperatureResponse {
                min: Celsius(10.0),
                optimum_low: Celsius(18.0),
                optimum_high: Celsius(24.0),
                max: Celsius(30.0),
            },
            Mm(10.0),
        )
    }

    /// Built in profile for powdery mildew. Rain washes spores off, so wetness counts against it.
    pub fn powdery_mildew() -> Self {
        Self::new(
            Disease::PowderyMildew,
            0.25,
            0.75,
            -0.20,
            TemperatureResponse {
                min: Celsius(15.0),
                optimum_low: Celsius(21.0),
                optimum_high: Celsius(30.0),
                max: Celsius(35.0),
            },
            Mm(10.0),
        )
    }

    /// Built in profile for botrytis bunch rot.
    pub fn botrytis() -> Self {
        Self::new(
            Disease::Botrytis,
            0.45,
            0.25,
            0.30,
            TemperatureResponse {
                min: Celsius(10.0),
                optimum_low: Celsius(15.0),
                optimum_high: Celsius(22.0),
                max: Celsius(30.0),
            },
            Mm(8.0),
        )
    }

    /// Retarget this profile at another disease, keeping every coefficient.
    pub fn with_disease(self, disease: Disease) -> Self {
        Self { disease, ..self }
    }

    /// Override the susceptibility multiplier for one phenological stage.
    pub fn with_stage_susceptibility(mut self, stage: PhenologicalStage, factor: f64) -> Self {
        self.stage_susceptibility.insert(stage, factor);
        self
    }

    /// The disease this profile scores.
    #[inline]
    pub fn disease(&self) -> Disease {
        self.disease
    }

    /// Weight applied to mean humidity.
    #[inline]
    pub fn humidity_weight(&self) -> f64 {
        self.humidity_weight
    }

    /// Weight applied to the temperature fit.
    #[inline]
    pub fn temperature_weight(&self) -> f64 {
        self.temperature_weight
    }

    /// Weight applied to the leaf wetness proxy.
    #[inline]
    pub fn wetness_weight(&self) -> f64 {
        self.wetness_weight
    }

    /// The temperature response curve.
    #[inline]
    pub fn temperature_response(&self) -> &TemperatureResponse {
        &self.temperature_response
    }

    /// Precipitation treated as full leaf wetness.
    #[inline]
    pub fn wetness_saturation(&self) -> Mm {
        self.wetness_saturation
    }

    /// Susceptibility multiplier for `stage`, falling back to the stage default.
    pub fn stage_susceptibility(&self, stage: PhenologicalStage) -> f64 {
        self.stage_susceptibility
            .get(&stage)
            .copied()
            .unwrap_or_else(|| stage.default_susceptibility())
    }

    /// Check the profile is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.humidity_weight,
            self.temperature_weight,
            self.wetness_weight,
        ];

        if !weights.iter().all(|w| w.is_finite()) {
            return Err(AnalysisError::configuration(format!(
                "{} profile has a weight that is not a number",
                self.disease
            )));
        }

        if weights.iter().all(|&w| w == 0.0) {
            return Err(AnalysisError::configuration(format!(
                "{} profile has all weights zero",
                self.disease
            )));
        }

        self.temperature_response.validate()?;

        let saturation = self.wetness_saturation.unpack();
        if !saturation.is_finite() || saturation <= 0.0 {
            return Err(AnalysisError::configuration(format!(
                "{} profile wetness saturation must be positive, got {}",
                self.disease, saturation
            )));
        }

        if let Some((stage, factor)) = self
            .stage_susceptibility
            .iter()
            .find(|(_, f)| !f.is_finite() || **f < 0.0)
        {
            return Err(AnalysisError::configuration(format!(
                "{} profile susceptibility for {} must be non-negative, got {}",
                self.disease,
                stage.as_ref(),
                factor
            )));
        }

        Ok(())
    }
}

/// Lookup table from disease to profile, with an optional fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileRegistry {
    profiles: BTreeMap<Disease, DiseaseProfile>,
    default_profile: Option<DiseaseProfile>,
}

impl Default for ProfileRegistry {
    /// The built in downy mildew, powdery mildew, and botrytis profiles with no default profile.
    fn default() -> Self {
        ProfileRegistry::empty()
            .with_profile(DiseaseProfile::downy_mildew())
            .with_profile(DiseaseProfile::powdery_mildew())
            .with_profile(DiseaseProfile::botrytis())
    }
}

impl ProfileRegistry {
    /// A registry with no profiles at all.
    pub fn empty() -> Self {
        ProfileRegistry {
            profiles: BTreeMap::new(),
            default_profile: None,
        }
    }

    /// Builder method to register a profile, replacing any existing profile for its disease.
    pub fn with_profile(mut self, profile: DiseaseProfile) -> Self {
        self.profiles.insert(profile.disease(), profile);
        self
    }

    /// Builder method to set, or clear, the fallback used for unregistered diseases.
    pub fn with_default_profile<T>(mut self, profile: T) -> Self
    where
        Option<DiseaseProfile>: From<T>,
    {
        self.default_profile = Option::from(profile);
        self
    }

    /// Diseases with a registered profile.
    pub fn diseases(&self) -> impl Iterator<Item = Disease> + '_ {
        self.profiles.keys().copied()
    }

    /// Find the profile for `disease`.
    ///
    /// Falls back to the default profile, retargeted at `disease`, when none is registered.
    pub fn resolve(&self, disease: Disease) -> Result<DiseaseProfile> {
        if let Some(profile) = self.profiles.get(&disease) {
            return Ok(profile.clone());
        }

        self.default_profile
            .as_ref()
            .map(|profile| profile.clone().with_disease(disease))
            .ok_or_else(|| AnalysisError::UnknownDisease(disease.to_string()))
    }

    /// Find the profile for a disease given by name.
    pub fn resolve_name(&self, name: &str) -> Result<DiseaseProfile> {
        Disease::from_name(name).and_then(|disease| self.resolve(disease))
    }

    /// Validate every profile held by the registry.
    pub fn validate(&self) -> Result<()> {
        self.profiles
            .values()
            .chain(self.default_profile.iter())
            .try_for_each(DiseaseProfile::validate)
    }
}
