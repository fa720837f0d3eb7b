//! Marine hazard classification and the bite-score penalty it implies
//! (§4.10's "deduct a configured penalty inside the forecast window
//! builder" rule, §7g).

use bayscan_core::config::MarineConfig;
use bayscan_core::SafetyLevel;

/// A coarse marine-safety score, 0-100: wave height dominates, a hazard
/// narrative (small craft advisory etc.) knocks off an extra 20 points.
fn safety_score(wave_height_ft: f64, hazard_text: Option<&str>) -> f64 {
    let mut score = 100.0 - wave_height_ft * 15.0;
    if hazard_text.is_some() {
        score -= 20.0;
    }
    score.max(0.0)
}

/// Classify marine conditions into a [`SafetyLevel`] using the configured
/// thresholds.
pub fn classify(wave_height_ft: f64, hazard_text: Option<&str>, config: &MarineConfig) -> SafetyLevel {
    let score = safety_score(wave_height_ft, hazard_text);
    let unsafe_threshold = *config.safety_thresholds.get("UNSAFE").unwrap_or(&30) as f64;
    let caution_threshold = *config.safety_thresholds.get("CAUTION").unwrap_or(&60) as f64;

    if score <= unsafe_threshold {
        SafetyLevel::Unsafe
    } else if score <= caution_threshold {
        SafetyLevel::Caution
    } else {
        SafetyLevel::Safe
    }
}

/// The bite-score penalty a safety level deducts, per the configured table.
pub fn bite_score_penalty(level: SafetyLevel, config: &MarineConfig) -> f64 {
    match level {
        SafetyLevel::Safe => 0.0,
        SafetyLevel::Caution => *config.bite_score_penalties.get("CAUTION").unwrap_or(&0) as f64,
        SafetyLevel::Unsafe => *config.bite_score_penalties.get("UNSAFE").unwrap_or(&0) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_seas_are_safe() {
        let config = MarineConfig::default();
        assert_eq!(classify(1.0, None, &config), SafetyLevel::Safe);
    }

    #[test]
    fn large_swell_with_hazard_text_is_unsafe() {
        let config = MarineConfig::default();
        assert_eq!(classify(6.0, Some("Small Craft Advisory"), &config), SafetyLevel::Unsafe);
    }

    #[test]
    fn unsafe_penalty_exceeds_caution_penalty() {
        let config = MarineConfig::default();
        assert!(
            bite_score_penalty(SafetyLevel::Unsafe, &config) > bite_score_penalty(SafetyLevel::Caution, &config)
        );
    }
}
