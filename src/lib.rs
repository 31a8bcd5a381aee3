#![deny(missing_docs)]
/*!
Types and functions for vineyard crop-protection decisions.

Weather observations and disease sensitivity profiles go in; disease risk scores, risk tiers,
recommendations, spray window suitability, and application efficacy summaries come out. Every
operation is a pure function of its explicit arguments. There is no hidden state, no clock, and no
I/O, so any function may be called concurrently from any number of threads.

Disease specific behavior is carried entirely by [`DiseaseProfile`] values, and every threshold
lives in a configuration struct with a documented default, see [`EngineConfig`].

Errors are reported as [`AnalysisError`] values before any computation is done. No default is
ever silently substituted for bad input.
*/

//
// API
//
pub use crate::{
    application::{
        days_since_last_application, summarize_application_efficacy,
        summarize_efficacy_by_disease, ApplicationRecord,
    },
    config::EngineConfig,
    disease::{Disease, DiseaseProfile, PhenologicalStage, ProfileRegistry, TemperatureResponse},
    error::{AnalysisError, Result},
    interpolation::linear_interp,
    observation::{validate_observations, WeatherObservation},
    overview::{field_overview, FieldOverview},
    risk::{
        assess_all, assess_disease, compute_disease_risk, compute_disease_risk_at_stage,
        risk_curve, RiskAssessment,
    },
    spray::{
        evaluate_spray_window, SprayThresholds, SprayWindow, SprayWindowEvaluation,
        SprayWindowSlot,
    },
    tier::{FieldStatus, ProductMode, Recommendation, RiskTier, TierThresholds},
    utility::{MAX_SCORE, MIN_SCORE},
};

//
// Internal use only
//

// Modules
mod application;
mod config;
mod disease;
mod error;
mod interpolation;
mod observation;
mod overview;
mod risk;
mod spray;
mod tier;
mod units;
mod utility;

#[cfg(test)]
mod test_data;
