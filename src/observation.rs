//! Data type and validation for weather observations fed to the risk engine.

use crate::{
    error::{AnalysisError, Result},
    utility::in_closed_range,
};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use metfor::{Celsius, Mm, Quantity};
use serde::{Deserialize, Serialize};

/// A single weather observation or forecast, for one day or one hourly slot.
///
/// Daily observations are stored at midnight of their date.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    valid_time: NaiveDateTime,
    #[serde(rename = "precipitation_mm", with = "crate::units::mm")]
    precipitation: Mm,
    #[serde(rename = "temperature_c", with = "crate::units::celsius")]
    temperature: Celsius,
    humidity_pct: f64,
    wind_kph: f64,
}

impl WeatherObservation {
    /// Create a new observation valid at `valid_time` with everything else zeroed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use metfor::{Celsius, Mm};
    /// use crop_protection_analysis::WeatherObservation;
    ///
    /// let obs = WeatherObservation::new(NaiveDate::from_ymd(2025, 7, 15).and_hms(6, 0, 0))
    ///     .with_temperature(Celsius(19.5))
    ///     .with_humidity(88.0)
    ///     .with_precipitation(Mm(2.0))
    ///     .with_wind(6.0);
    ///
    /// assert_eq!(obs.humidity_pct(), 88.0);
    /// ```
    #[inline]
    pub fn new(valid_time: NaiveDateTime) -> Self {
        WeatherObservation {
            valid_time,
            precipitation: Mm(0.0),
            temperature: Celsius(0.0),
            humidity_pct: 0.0,
            wind_kph: 0.0,
        }
    }

    /// Create a new daily observation, valid at midnight of `date`.
    #[inline]
    pub fn daily(date: NaiveDate) -> Self {
        Self::new(date.and_hms(0, 0, 0))
    }

    /// Builder method for the air temperature.
    #[inline]
    pub fn with_temperature(self, temperature: Celsius) -> Self {
        Self {
            temperature,
            ..self
        }
    }

    /// Builder method for the accumulated precipitation.
    #[inline]
    pub fn with_precipitation(self, precipitation: Mm) -> Self {
        Self {
            precipitation,
            ..self
        }
    }

    /// Builder method for the relative humidity in percent.
    #[inline]
    pub fn with_humidity(self, humidity_pct: f64) -> Self {
        Self {
            humidity_pct,
            ..self
        }
    }

    /// Builder method for the wind speed in km/h.
    #[inline]
    pub fn with_wind(self, wind_kph: f64) -> Self {
        Self { wind_kph, ..self }
    }

    /// Time this observation is valid for.
    #[inline]
    pub fn valid_time(&self) -> NaiveDateTime {
        self.valid_time
    }

    /// Air temperature.
    #[inline]
    pub fn temperature(&self) -> Celsius {
        self.temperature
    }

    /// Accumulated precipitation.
    #[inline]
    pub fn precipitation(&self) -> Mm {
        self.precipitation
    }

    /// Relative humidity in percent.
    #[inline]
    pub fn humidity_pct(&self) -> f64 {
        self.humidity_pct
    }

    /// Wind speed in km/h.
    #[inline]
    pub fn wind_kph(&self) -> f64 {
        self.wind_kph
    }

    /// Check the value invariants of a single observation.
    pub fn validate(&self) -> Result<()> {
        if !in_closed_range(self.humidity_pct, 0.0, 100.0) {
            return Err(AnalysisError::invalid_input(format!(
                "humidity {} at {} is outside [0, 100]",
                self.humidity_pct, self.valid_time
            )));
        }

        if !self.temperature.unpack().is_finite() {
            return Err(AnalysisError::invalid_input(format!(
                "temperature at {} is not a number",
                self.valid_time
            )));
        }

        let precip = self.precipitation.unpack();
        if !precip.is_finite() || precip < 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "precipitation {} at {} is negative or not a number",
                precip, self.valid_time
            )));
        }

        if !self.wind_kph.is_finite() || self.wind_kph < 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "wind {} at {} is negative or not a number",
                self.wind_kph, self.valid_time
            )));
        }

        Ok(())
    }
}

/// Validate a sequence of observations before it is used in any analysis.
///
/// The sequence must be non-empty, every observation must be valid, and valid times must be
/// strictly increasing (chronological with no duplicates).
pub fn validate_observations(observations: &[WeatherObservation]) -> Result<()> {
    if observations.is_empty() {
        return Err(AnalysisError::invalid_input("no observations supplied"));
    }

    for obs in observations {
        obs.validate()?;
    }

    if let Some((prev, next)) = observations
        .iter()
        .tuple_windows::<(_, _)>()
        .find(|(prev, next)| prev.valid_time >= next.valid_time)
    {
        return Err(AnalysisError::invalid_input(format!(
            "observations out of order or duplicated: {} followed by {}",
            prev.valid_time, next.valid_time
        )));
    }

    Ok(())
}
