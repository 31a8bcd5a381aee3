//! Classification of continuous risk scores into tiers, and the actions attached to each tier.

use crate::{
    error::{AnalysisError, Result},
    utility::{in_closed_range, MAX_SCORE, MIN_SCORE},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use strum_macros::{AsRefStr, EnumIter};

/// Discrete level of disease outbreak likelihood.
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
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Upper case name, as shown on the dashboard.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    /// The action recommended at this tier.
    pub fn recommendation(self) -> Recommendation {
        match self {
            RiskTier::Low => Recommendation::NoAction,
            RiskTier::Medium => Recommendation::Monitor,
            RiskTier::High => Recommendation::ApplyNow,
        }
    }
}

impl Display for RiskTier {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Action code attached to a risk assessment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// No action required.
    NoAction,
    /// Monitor closely, prepare to apply.
    Monitor,
    /// Apply protective treatment now.
    ApplyNow,
}

impl Recommendation {
    /// Machine readable action code, e.g. `"apply_now"`.
    pub fn code(self) -> &'static str {
        match self {
            Recommendation::NoAction => "no_action",
            Recommendation::Monitor => "monitor",
            Recommendation::ApplyNow => "apply_now",
        }
    }

    /// Human readable recommendation.
    pub fn text(self) -> &'static str {
        match self {
            Recommendation::NoAction => "no action required",
            Recommendation::Monitor => "monitor closely, prepare to apply",
            Recommendation::ApplyNow => "apply protective treatment now",
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.text())
    }
}

/// Tier boundaries. Both bounds are closed on the lower side: a score equal to `medium` is
/// `Medium`, a score equal to `high` is `High`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Lowest score classified as `Medium`. Default 33.
    pub medium: f64,
    /// Lowest score classified as `High`. Default 66.
    pub high: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            medium: 33.0,
            high: 66.0,
        }
    }
}

impl TierThresholds {
    /// Check that `MIN_SCORE <= medium < high <= MAX_SCORE`.
    pub fn validate(&self) -> Result<()> {
        if !in_closed_range(self.medium, MIN_SCORE, MAX_SCORE)
            || !in_closed_range(self.high, MIN_SCORE, MAX_SCORE)
        {
            return Err(AnalysisError::configuration(format!(
                "tier boundaries must lie in [{}, {}], got medium = {} and high = {}",
                MIN_SCORE, MAX_SCORE, self.medium, self.high
            )));
        }

        if self.medium >= self.high {
            return Err(AnalysisError::configuration(format!(
                "tier boundaries must increase, got medium = {} and high = {}",
                self.medium, self.high
            )));
        }

        Ok(())
    }

    /// Classify a score. Assumes the thresholds have been validated.
    #[inline]
    pub fn classify(&self, score: f64) -> RiskTier {
        if score >= self.high {
            RiskTier::High
        } else if score >= self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Overall phytosanitary status shown for a field: stable, attention, or urgent action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FieldStatus {
    Stable,
    Attention,
    UrgentAction,
}

impl FieldStatus {
    /// The status for a tier. High risk still covered by a product's residual period is
    /// `Attention` rather than `UrgentAction`.
    pub fn from_tier(tier: RiskTier, protected: bool) -> Self {
        match (tier, protected) {
            (RiskTier::High, false) => FieldStatus::UrgentAction,
            (RiskTier::High, true) | (RiskTier::Medium, _) => FieldStatus::Attention,
            (RiskTier::Low, _) => FieldStatus::Stable,
        }
    }
}

/// Kind of product suited to the situation in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductMode {
    /// Contact product that shields tissue ahead of infection.
    Protective,
    /// Product taken up by the vine that also acts on infections already under way.
    Systemic,
}

impl ProductMode {
    /// The type of product to reach for, `None` when nothing needs applying.
    ///
    /// Unprotected high risk calls for a systemic product. Medium risk, or high risk still inside a
    /// residual period, calls for a protective one.
    pub fn suggest(tier: RiskTier, protected: bool) -> Option<Self> {
        match (tier, protected) {
            (RiskTier::High, false) => Some(ProductMode::Systemic),
            (RiskTier::High, true) | (RiskTier::Medium, _) => Some(ProductMode::Protective),
            (RiskTier::Low, _) => None,
        }
    }
}
