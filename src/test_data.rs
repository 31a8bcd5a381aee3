//! Data used in tests.
//!
//! These mirror the `wet_week.csv` and `dry_heat.csv` scenarios under `test_data/`.

use crate::{application::ApplicationRecord, disease::Disease, observation::WeatherObservation};
use chrono::NaiveDate;
use metfor::{Celsius, Mm};

/// A day in July 2025.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd(2025, 7, d)
}

/// A daily observation on `day(d)`.
pub fn obs_on(d: u32, t_c: f64, rh: f64, precip_mm: f64, wind_kph: f64) -> WeatherObservation {
    WeatherObservation::daily(day(d))
        .with_temperature(Celsius(t_c))
        .with_humidity(rh)
        .with_precipitation(Mm(precip_mm))
        .with_wind(wind_kph)
}

/// Mild, humid, and rainy. Downy mildew weather.
pub fn wet_week() -> Vec<WeatherObservation> {
    vec![
        obs_on(15, 20.0, 90.0, 4.0, 5.0),
        obs_on(16, 22.0, 94.0, 6.0, 8.0),
        obs_on(17, 19.0, 86.0, 2.0, 3.0),
    ]
}

/// Hot and dry. Powdery mildew weather.
pub fn dry_heat() -> Vec<WeatherObservation> {
    vec![
        obs_on(15, 28.0, 45.0, 0.0, 12.0),
        obs_on(16, 31.0, 40.0, 0.0, 9.0),
        obs_on(17, 27.0, 50.0, 0.0, 14.0),
    ]
}

/// Early July application log.
pub fn application_log() -> Vec<ApplicationRecord> {
    vec![
        ApplicationRecord::new(day(1), "Trichoderma", Disease::DownyMildew)
            .with_residual_days(Some(7)),
        ApplicationRecord::new(day(2), "Cobre", Disease::PowderyMildew)
            .with_efficacy(Some(75.0))
            .with_residual_days(Some(10)),
        ApplicationRecord::new(day(3), "Isaria", Disease::Botrytis).with_efficacy(Some(88.0)),
        ApplicationRecord::new(day(4), "Bacillus", Disease::DownyMildew)
            .with_efficacy(Some(62.0))
            .with_residual_days(Some(5)),
        ApplicationRecord::new(day(5), "Mancozeb", Disease::PowderyMildew)
            .with_residual_days(Some(7)),
        ApplicationRecord::new(day(6), "Cobre", Disease::DownyMildew)
            .with_efficacy(Some(81.0))
            .with_residual_days(Some(7)),
    ]
}
