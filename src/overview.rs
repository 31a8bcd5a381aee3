//! Data type for the combined phytosanitary overview of a field.
//!
//! Combines the current risk assessments with the application history into the single status
//! shown on a dashboard. The assessments themselves are never altered.

use crate::{
    application::{days_since_last_application, ApplicationRecord},
    error::{AnalysisError, Result},
    risk::RiskAssessment,
    tier::{FieldStatus, ProductMode},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Convenient package for the field level verdict.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldOverview {
    /// The most severe assessment: highest tier, then highest score.
    pub worst: RiskAssessment,
    /// Days since the last application of any product, `None` if nothing has been applied.
    pub days_since_last_application: Option<i64>,
    /// True if an application against the worst disease is still in its residual period.
    pub protected: bool,
    /// Overall status.
    pub status: FieldStatus,
    /// Type of product suited to the worst disease, `None` when nothing needs applying.
    pub product_mode: Option<ProductMode>,
}

/// Build the overview for a field on `today`.
///
/// `assessments` must not be empty and every record must be dated on or before `today`.
pub fn field_overview(
    assessments: &[RiskAssessment],
    records: &[ApplicationRecord],
    today: NaiveDate,
) -> Result<FieldOverview> {
    let days_since_last_application = days_since_last_application(records, None, today)?;

    let worst = *assessments
        .iter()
        // Keep the first of equally severe assessments
        .fold(None, |worst: Option<&RiskAssessment>, next| match worst {
            Some(w) if severity(w, next) != Ordering::Less => Some(w),
            _ => Some(next),
        })
        .ok_or_else(|| AnalysisError::invalid_input("no assessments supplied"))?;

    let protected = records
        .iter()
        .filter(|rec| rec.target_disease() == worst.disease)
        .any(|rec| rec.protects_on(today));

    let status = FieldStatus::from_tier(worst.risk_tier, protected);
    let product_mode = ProductMode::suggest(worst.risk_tier, protected);

    debug!(
        worst = %worst.disease,
        tier = %worst.risk_tier,
        protected,
        status = status.as_ref(),
        product_mode = ?product_mode,
        "built field overview"
    );

    Ok(FieldOverview {
        worst,
        days_since_last_application,
        protected,
        status,
        product_mode,
    })
}

fn severity(a: &RiskAssessment, b: &RiskAssessment) -> Ordering {
    a.risk_tier.cmp(&b.risk_tier).then_with(|| {
        a.risk_score
            .partial_cmp(&b.risk_score)
            .unwrap_or(Ordering::Equal)
    })
}
