//! Records of past pesticide applications and summaries over them.

use crate::{
    disease::Disease,
    error::{AnalysisError, Result},
    utility::in_closed_range,
};
use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One application of a product against a target disease.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    date: NaiveDate,
    product: String,
    target_disease: Disease,
    #[serde(default)]
    efficacy_pct: Option<f64>,
    #[serde(default)]
    residual_days: Option<u32>,
}

impl ApplicationRecord {
    /// Create a new record with no efficacy evaluation and no known residual period.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use crop_protection_analysis::{ApplicationRecord, Disease};
    ///
    /// let date = NaiveDate::from_ymd(2025, 7, 2);
    /// let rec = ApplicationRecord::new(date, "Cobre", Disease::PowderyMildew)
    ///     .with_efficacy(Some(75.0))
    ///     .with_residual_days(Some(10));
    ///
    /// assert_eq!(rec.efficacy_pct().unwrap(), 75.0);
    ///
    /// let rec = rec.with_efficacy(None);
    /// assert!(rec.efficacy_pct().is_none());
    /// ```
    pub fn new<S: Into<String>>(date: NaiveDate, product: S, target_disease: Disease) -> Self {
        ApplicationRecord {
            date,
            product: product.into(),
            target_disease,
            efficacy_pct: None,
            residual_days: None,
        }
    }

    /// Builder method for the evaluated efficacy, or `None` if not yet evaluated.
    ///
    /// The value is checked by the summaries, not here.
    pub fn with_efficacy(mut self, efficacy_pct: Option<f64>) -> Self {
        self.efficacy_pct = efficacy_pct;
        self
    }

    /// Builder method for the number of days the product keeps protecting after application.
    pub fn with_residual_days(mut self, days: Option<u32>) -> Self {
        self.residual_days = days;
        self
    }

    /// Date of the application.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Product identifier.
    #[inline]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Disease the application targeted.
    #[inline]
    pub fn target_disease(&self) -> Disease {
        self.target_disease
    }

    /// Observed efficacy in percent, if evaluated.
    #[inline]
    pub fn efficacy_pct(&self) -> Option<f64> {
        self.efficacy_pct
    }

    /// Residual protection period in days, if known.
    #[inline]
    pub fn residual_days(&self) -> Option<u32> {
        self.residual_days
    }

    /// True if the residual period still covers `today`.
    ///
    /// A residual period running past the last representable date covers every later day.
    pub fn protects_on(&self, today: NaiveDate) -> bool {
        match self.residual_days {
            Some(days) if self.date <= today => self
                .date
                .checked_add_signed(Duration::days(i64::from(days)))
                .map_or(true, |last| last >= today),
            _ => false,
        }
    }

    fn validate_efficacy(&self) -> Result<()> {
        match self.efficacy_pct {
            Some(pct) if !in_closed_range(pct, 0.0, 100.0) => {
                Err(AnalysisError::invalid_input(format!(
                    "efficacy {} of {} on {} is outside [0, 100]",
                    pct, self.product, self.date
                )))
            }
            _ => Ok(()),
        }
    }

    fn validate_date(&self, today: NaiveDate) -> Result<()> {
        if self.date > today {
            Err(AnalysisError::invalid_input(format!(
                "application of {} is dated {}, after {}",
                self.product, self.date, today
            )))
        } else {
            Ok(())
        }
    }
}

/// Mean evaluated efficacy per product.
///
/// Records without an efficacy evaluation are left out of both the sum and the count, and a
/// product with no evaluated record is left out of the result entirely.
pub fn summarize_application_efficacy(
    records: &[ApplicationRecord],
) -> Result<BTreeMap<String, f64>> {
    let summary = summarize_by(records, |rec| rec.product.clone())?;

    debug!(
        records = records.len(),
        products = summary.len(),
        "summarized application efficacy by product"
    );

    Ok(summary)
}

/// Mean evaluated efficacy per target disease, with the same exclusion rules as
/// [`summarize_application_efficacy`].
pub fn summarize_efficacy_by_disease(
    records: &[ApplicationRecord],
) -> Result<BTreeMap<Disease, f64>> {
    let summary = summarize_by(records, |rec| rec.target_disease)?;

    debug!(
        records = records.len(),
        diseases = summary.len(),
        "summarized application efficacy by disease"
    );

    Ok(summary)
}

fn summarize_by<K, F>(records: &[ApplicationRecord], key: F) -> Result<BTreeMap<K, f64>>
where
    K: Ord + std::hash::Hash + Eq,
    F: Fn(&ApplicationRecord) -> K,
{
    for rec in records {
        rec.validate_efficacy()?;
    }

    Ok(records
        .iter()
        // Only evaluated records count
        .filter_map(|rec| rec.efficacy_pct.map(|pct| (key(rec), pct)))
        .into_group_map()
        .into_iter()
        .map(|(k, vals)| {
            let mean = vals.iter().sum::<f64>() / vals.len() as f64;
            (k, mean)
        })
        .collect())
}

/// Whole days since the most recent application, optionally only counting applications against
/// `disease`. `None` if there is no matching application.
///
/// Every record must be dated on or before `today`.
pub fn days_since_last_application(
    records: &[ApplicationRecord],
    disease: Option<Disease>,
    today: NaiveDate,
) -> Result<Option<i64>> {
    for rec in records {
        rec.validate_date(today)?;
    }

    Ok(records
        .iter()
        .filter(|rec| disease.map_or(true, |d| rec.target_disease == d))
        .map(|rec| rec.date)
        .max()
        .map(|last| (today - last).num_days()))
}
