use super::*;
use crop_protection_analysis::{
    assess_all, compute_disease_risk, risk_curve, ProfileRegistry, TierThresholds,
};

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_disease_risk(scenario: &Scenario, disease: Disease) {
    let profile = ProfileRegistry::default().resolve(disease).unwrap();
    let anal =
        compute_disease_risk(&scenario.observations, &profile, &TierThresholds::default()).unwrap();

    let score_key = format!("{} score", disease.as_ref());
    let target_score = scenario.expected_f64(&score_key);
    assert!(
        approx_equal(anal.risk_score, target_score, 1.0e-3),
        "{}: {} != {}",
        score_key,
        anal.risk_score,
        target_score
    );

    let tier_key = format!("{} tier", disease.as_ref());
    assert_eq!(anal.risk_tier.as_str(), scenario.expected_str(&tier_key));
    assert_eq!(anal.recommendation, anal.risk_tier.recommendation());
    assert_eq!(anal.disease, disease);

    let last = scenario.observations.last().unwrap();
    assert_eq!(anal.valid_time, last.valid_time());
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_assess_all(scenario: &Scenario) {
    let registry = ProfileRegistry::default();
    let tiers = TierThresholds::default();

    let all = assess_all(&scenario.observations, &registry, &tiers).unwrap();
    assert_eq!(all.len(), registry.diseases().count());

    for (anal, disease) in all.iter().zip(registry.diseases()) {
        let profile = registry.resolve(disease).unwrap();
        let single = compute_disease_risk(&scenario.observations, &profile, &tiers).unwrap();
        assert_eq!(*anal, single);
    }
}

#[allow(dead_code)] // False alarm - lint is done before macro expansion.
pub fn test_risk_curve(scenario: &Scenario) {
    let tiers = TierThresholds::default();
    let window = scenario.observations.len();

    for disease in ProfileRegistry::default().diseases() {
        let profile = ProfileRegistry::default().resolve(disease).unwrap();
        let curve = risk_curve(&scenario.observations, &profile, &tiers, window).unwrap();
        assert_eq!(curve.len(), scenario.observations.len());

        let whole = compute_disease_risk(&scenario.observations, &profile, &tiers).unwrap();
        assert_eq!(curve.last(), Some(&whole));

        for (point, obs) in curve.iter().zip(&scenario.observations) {
            assert_eq!(point.valid_time, obs.valid_time());
            assert_eq!(point.risk_tier, tiers.classify(point.risk_score));
        }
    }
}
