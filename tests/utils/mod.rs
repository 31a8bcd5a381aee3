use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use crop_protection_analysis::{ApplicationRecord, Disease, SprayWindowSlot, WeatherObservation};
use metfor::{Celsius, Mm};

pub mod risk_tests;
pub mod spray_tests;

/// Everything loaded from one scenario file.
pub struct Scenario {
    pub observations: Vec<WeatherObservation>,
    pub slots: Vec<SprayWindowSlot>,
    pub applications: Vec<ApplicationRecord>,
    pub expected: HashMap<String, Vec<String>>,
}

impl Scenario {
    #[allow(dead_code)] // False alarm - lint is done before macro expansion.
    pub fn expected(&self, key: &str) -> &[String] {
        self.expected
            .get(key)
            .unwrap_or_else(|| panic!("missing expected key: {}", key))
    }

    #[allow(dead_code)] // False alarm - lint is done before macro expansion.
    pub fn expected_f64(&self, key: &str) -> f64 {
        let vals = self.expected(key);
        assert_eq!(vals.len(), 1, "{}", key);
        f64::from_str(&vals[0]).unwrap_or_else(|_| panic!("bad float for {}", key))
    }

    #[allow(dead_code)] // False alarm - lint is done before macro expansion.
    pub fn expected_str(&self, key: &str) -> &str {
        let vals = self.expected(key);
        assert_eq!(vals.len(), 1, "{}", key);
        &vals[0]
    }

    #[allow(dead_code)] // False alarm - lint is done before macro expansion.
    pub fn today(&self) -> NaiveDate {
        NaiveDate::parse_from_str(self.expected_str("today"), "%Y-%m-%d")
            .expect("bad date for today")
    }
}

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {
            use crate::utils::{self, Scenario};

            fn load_data() -> Scenario {
                utils::load_test_file($fname)
            }

            mod risk {
                use super::load_data;
                use crate::utils::risk_tests;
                use crop_protection_analysis::Disease;

                #[test]
                fn downy_mildew() {
                    risk_tests::test_disease_risk(&load_data(), Disease::DownyMildew);
                }

                #[test]
                fn powdery_mildew() {
                    risk_tests::test_disease_risk(&load_data(), Disease::PowderyMildew);
                }

                #[test]
                fn botrytis() {
                    risk_tests::test_disease_risk(&load_data(), Disease::Botrytis);
                }

                #[test]
                fn assess_all_matches_single() {
                    risk_tests::test_assess_all(&load_data());
                }

                #[test]
                fn risk_curve_ends_at_full_window() {
                    risk_tests::test_risk_curve(&load_data());
                }
            }

            mod spray {
                use super::load_data;
                use crate::utils::spray_tests;

                #[test]
                fn suitability() {
                    spray_tests::test_suitability(&load_data());
                }

                #[test]
                fn best_window() {
                    spray_tests::test_best_window(&load_data());
                }
            }

            mod records {
                use super::load_data;
                use crate::utils::record_tests;

                #[test]
                fn efficacy_summary() {
                    record_tests::test_efficacy_summary(&load_data());
                }

                #[test]
                fn days_since_last_application() {
                    record_tests::test_days_since_last_application(&load_data());
                }

                #[test]
                fn field_overview() {
                    record_tests::test_field_overview(&load_data());
                }
            }
        }
    };
}

pub fn load_test_file(fname: &str) -> Scenario {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv_scenario(&test_path)
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    (tgt - guess).abs() <= tol
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Observations,
    SpraySlots,
    Applications,
    Expected,
}

fn load_test_csv_scenario(location: &PathBuf) -> Scenario {
    let mut f =
        File::open(location).unwrap_or_else(|_| panic!("Error opening file: {:#?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .unwrap_or_else(|_| panic!("Error reading file: {:#?}", location));

    let mut observations = vec![];
    let mut slots = vec![];
    let mut applications = vec![];
    let mut expected = HashMap::new();

    let mut section = Section::Preamble;
    for line in contents.lines().map(str::trim) {
        section = match line {
            "### Observations ###" => Section::Observations,
            "### Spray Slots ###" => Section::SpraySlots,
            "### Applications ###" => Section::Applications,
            "### Expected ###" => Section::Expected,
            _ => section,
        };
        if line.starts_with("###") || line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();

        match section {
            Section::Preamble => {}
            Section::Observations => {
                if let Some(obs) = parse_observation(&tokens) {
                    observations.push(obs);
                }
            }
            Section::SpraySlots => {
                if let Some(slot) = parse_slot(&tokens) {
                    slots.push(slot);
                }
            }
            Section::Applications => {
                if let Some(rec) = parse_application(&tokens) {
                    applications.push(rec);
                }
            }
            Section::Expected => {
                let key = tokens[0].to_owned();
                let values = tokens[1..]
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*v).to_owned())
                    .collect();
                expected.insert(key, values);
            }
        }
    }

    Scenario {
        observations,
        slots,
        applications,
        expected,
    }
}

// Header rows fail to parse and are skipped.
fn parse_observation(tokens: &[&str]) -> Option<WeatherObservation> {
    if tokens.len() < 5 {
        return None;
    }

    let date = NaiveDate::parse_from_str(tokens[0], "%Y-%m-%d").ok()?;
    let t_c = f64::from_str(tokens[1]).ok()?;
    let rh = f64::from_str(tokens[2]).ok()?;
    let precip = f64::from_str(tokens[3]).ok()?;
    let wind = f64::from_str(tokens[4]).ok()?;

    Some(
        WeatherObservation::daily(date)
            .with_temperature(Celsius(t_c))
            .with_humidity(rh)
            .with_precipitation(Mm(precip))
            .with_wind(wind),
    )
}

fn parse_slot(tokens: &[&str]) -> Option<SprayWindowSlot> {
    if tokens.len() < 3 {
        return None;
    }

    let time = NaiveTime::parse_from_str(tokens[0], "%H:%M").ok()?;
    let wind = f64::from_str(tokens[1]).ok()?;
    let rain = f64::from_str(tokens[2]).ok()?;

    Some(SprayWindowSlot::new(time, wind, rain))
}

fn parse_application(tokens: &[&str]) -> Option<ApplicationRecord> {
    if tokens.len() < 5 {
        return None;
    }

    let date = NaiveDate::parse_from_str(tokens[0], "%Y-%m-%d").ok()?;
    let disease = Disease::from_name(tokens[2]).ok()?;

    Some(
        ApplicationRecord::new(date, tokens[1], disease)
            .with_efficacy(f64::from_str(tokens[3]).ok())
            .with_residual_days(u32::from_str(tokens[4]).ok()),
    )
}
