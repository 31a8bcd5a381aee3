//! Spray window suitability from wind and rain probability forecasts.

use crate::{
    error::{AnalysisError, Result},
    utility::in_closed_range,
};
use chrono::NaiveTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One forecast slot, annotated with whether it is suitable for spraying.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SprayWindowSlot {
    /// Start of the slot.
    pub time_of_day: NaiveTime,
    /// Forecast wind speed in km/h.
    pub wind_kph: f64,
    /// Forecast probability of rain in percent.
    pub rain_probability_pct: f64,
    /// Derived by [`evaluate_spray_window`]. Ignored on input.
    #[serde(default)]
    pub suitable: bool,
}

impl SprayWindowSlot {
    /// Create a new, not yet evaluated, slot.
    #[inline]
    pub fn new(time_of_day: NaiveTime, wind_kph: f64, rain_probability_pct: f64) -> Self {
        SprayWindowSlot {
            time_of_day,
            wind_kph,
            rain_probability_pct,
            suitable: false,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.wind_kph.is_finite() || self.wind_kph < 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "wind {} at {} is negative or not a number",
                self.wind_kph, self.time_of_day
            )));
        }

        if !in_closed_range(self.rain_probability_pct, 0.0, 100.0) {
            return Err(AnalysisError::invalid_input(format!(
                "rain probability {} at {} is outside [0, 100]",
                self.rain_probability_pct, self.time_of_day
            )));
        }

        Ok(())
    }
}

/// Limits a slot must stay within to be suitable. Tune per product label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprayThresholds {
    /// Maximum wind speed in km/h, inclusive. Default 10.
    pub wind_max_kph: f64,
    /// Maximum rain probability in percent, inclusive. Default 20.
    pub rain_max_pct: f64,
}

impl Default for SprayThresholds {
    fn default() -> Self {
        SprayThresholds {
            wind_max_kph: 10.0,
            rain_max_pct: 20.0,
        }
    }
}

impl SprayThresholds {
    /// Check the limits are non-negative, and the rain limit is a percentage.
    pub fn validate(&self) -> Result<()> {
        if !self.wind_max_kph.is_finite() || self.wind_max_kph < 0.0 {
            return Err(AnalysisError::configuration(format!(
                "wind threshold must be non-negative, got {}",
                self.wind_max_kph
            )));
        }

        if !in_closed_range(self.rain_max_pct, 0.0, 100.0) {
            return Err(AnalysisError::configuration(format!(
                "rain threshold must lie in [0, 100], got {}",
                self.rain_max_pct
            )));
        }

        Ok(())
    }

    #[inline]
    fn is_suitable(&self, slot: &SprayWindowSlot) -> bool {
        slot.wind_kph <= self.wind_max_kph && slot.rain_probability_pct <= self.rain_max_pct
    }
}

/// A contiguous run of suitable slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprayWindow {
    /// Index of the first slot in the run.
    pub start_index: usize,
    /// Number of slots in the run, at least 1.
    pub len: usize,
    /// Start time of the first slot.
    pub start: NaiveTime,
    /// Start time of the last slot.
    pub end: NaiveTime,
}

/// Result of [`evaluate_spray_window`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SprayWindowEvaluation {
    /// The input slots, in input order, with `suitable` filled in.
    pub slots: Vec<SprayWindowSlot>,
    /// Longest run of suitable slots, the earliest one on ties. `None` if no slot is suitable.
    pub best_window: Option<SprayWindow>,
}

impl SprayWindowEvaluation {
    /// Suitability of each slot, in order.
    pub fn suitability(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.suitable).collect()
    }
}

/// Mark each slot as suitable or not for spraying, and find the best contiguous window.
///
/// A slot is suitable iff its wind is at most `wind_max_kph` and its rain probability is at most
/// `rain_max_pct`. Slots are taken in the order given.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveTime;
/// use crop_protection_analysis::{evaluate_spray_window, SprayThresholds, SprayWindowSlot};
///
/// let slots = [
///     SprayWindowSlot::new(NaiveTime::from_hms(8, 0, 0), 5.0, 10.0),
///     SprayWindowSlot::new(NaiveTime::from_hms(9, 0, 0), 15.0, 5.0),
///     SprayWindowSlot::new(NaiveTime::from_hms(10, 0, 0), 4.0, 8.0),
/// ];
///
/// let eval = evaluate_spray_window(&slots, &SprayThresholds::default()).unwrap();
///
/// assert_eq!(eval.suitability(), vec![true, false, true]);
/// assert_eq!(eval.best_window.unwrap().len, 1);
/// ```
pub fn evaluate_spray_window(
    slots: &[SprayWindowSlot],
    thresholds: &SprayThresholds,
) -> Result<SprayWindowEvaluation> {
    thresholds.validate()?;
    for slot in slots {
        slot.validate()?;
    }

    let slots: Vec<SprayWindowSlot> = slots
        .iter()
        .map(|slot| SprayWindowSlot {
            suitable: thresholds.is_suitable(slot),
            ..*slot
        })
        .collect();

    let best_window = best_window(&slots);

    debug!(
        slots = slots.len(),
        suitable = slots.iter().filter(|slot| slot.suitable).count(),
        best_len = best_window.map(|w| w.len).unwrap_or(0),
        "evaluated spray window"
    );

    Ok(SprayWindowEvaluation { slots, best_window })
}

fn best_window(slots: &[SprayWindowSlot]) -> Option<SprayWindow> {
    let runs = slots.iter().enumerate().group_by(|(_, slot)| slot.suitable);

    runs.into_iter()
        // Only runs of suitable slots
        .filter(|(suitable, _)| *suitable)
        // Reduce each run to (start index, length)
        .filter_map(|(_, mut run)| {
            run.next()
                .map(|(start, _)| (start, 1 + run.count()))
        })
        // Longest wins, strictly longer is required to replace so the earliest wins ties
        .fold(None, |best: Option<(usize, usize)>, (start, len)| match best {
            Some((_, best_len)) if best_len >= len => best,
            _ => Some((start, len)),
        })
        .map(|(start_index, len)| SprayWindow {
            start_index,
            len,
            start: slots[start_index].time_of_day,
            end: slots[start_index + len - 1].time_of_day,
        })
}
