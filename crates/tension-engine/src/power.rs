//! Faction power scoring, used by the conflict evaluator's power-imbalance
//! and named-faction requirements.

use tension_types::HiddenAttributes;

/// Weighted composite of a faction's six hidden attributes. Missing
/// attributes default to `5.0` (handled by [`HiddenAttributes::default`]).
/// Rounded to two decimal places to match the original formula's output
/// granularity.
pub fn calculate_faction_power_score(attrs: &HiddenAttributes) -> f64 {
    let raw = attrs.ambition * 0.25
        + attrs.discipline * 0.2
        + attrs.pragmatism * 0.2
        + attrs.resilience * 0.2
        + attrs.integrity * 0.1
        + (10.0 - attrs.impulsivity) * 0.05;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attributes_yield_expected_score() {
        let score = calculate_faction_power_score(&HiddenAttributes::default());
        // all attributes at 5: 5*0.25+5*0.2+5*0.2+5*0.2+5*0.1+(10-5)*0.05
        // = 1.25+1.0+1.0+1.0+0.5+0.25 = 5.0
        assert_eq!(score, 5.0);
    }

    #[test]
    fn high_impulsivity_lowers_score() {
        let mut attrs = HiddenAttributes::default();
        attrs.impulsivity = 10.0;
        let score = calculate_faction_power_score(&attrs);
        assert_eq!(score, 4.75);
    }

    #[test]
    fn score_rounds_to_two_decimals() {
        let mut attrs = HiddenAttributes::default();
        attrs.ambition = 7.333;
        let score = calculate_faction_power_score(&attrs);
        assert_eq!((score * 100.0).round(), score * 100.0);
    }
}
