use super::*;
use crop_protection_analysis::{evaluate_spray_window, SprayThresholds};

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_suitability(scenario: &Scenario) {
    let eval = evaluate_spray_window(&scenario.slots, &SprayThresholds::default()).unwrap();

    let target: Vec<bool> = scenario
        .expected("suitable")
        .iter()
        .map(|v| v == "1")
        .collect();

    assert_eq!(eval.suitability(), target);

    // Input order and values are kept
    for (out, inp) in eval.slots.iter().zip(&scenario.slots) {
        assert_eq!(out.time_of_day, inp.time_of_day);
        assert_eq!(out.wind_kph, inp.wind_kph);
        assert_eq!(out.rain_probability_pct, inp.rain_probability_pct);
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_best_window(scenario: &Scenario) {
    let eval = evaluate_spray_window(&scenario.slots, &SprayThresholds::default()).unwrap();
    let target = scenario.expected("best window");

    if target.len() == 1 && target[0] == "none" {
        assert!(eval.best_window.is_none());
        return;
    }

    assert_eq!(target.len(), 2);
    let start = usize::from_str(&target[0]).unwrap();
    let len = usize::from_str(&target[1]).unwrap();

    let window = eval.best_window.expect("no best window found");
    assert_eq!(window.start_index, start);
    assert_eq!(window.len, len);
    assert_eq!(window.start, scenario.slots[start].time_of_day);
    assert_eq!(window.end, scenario.slots[start + len - 1].time_of_day);
}
