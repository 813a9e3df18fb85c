//! # Recommendation Rules
//!
//! Fixed advice strings gated by threshold rules over the survey features
//! and the assessed score. Selection is pure and ordered: rules are checked
//! in a fixed sequence and matching ones append their text, so equal inputs
//! always produce the identical list.

use crate::answers::{FeatureSet, RelaxationFrequency, WorkLifeBalance};

/// Included in every successful assessment, independent of feature values.
pub const BASELINE: &str = "Practice deep breathing for 5 minutes each day to activate your parasympathetic nervous system.";

/// Included when the assessed score exceeds [`HIGH_STRESS_SCORE`].
pub const HIGH_STRESS: &str = "Your stress levels are high. Consider talking to a mental health professional for personalized support.";

/// Included when weekly exercise falls below [`LOW_EXERCISE_DAYS`].
pub const EXERCISE: &str = "Regular physical activity helps reduce stress. Aim for at least 3 days of exercise per week, even if it's just a 30-minute walk.";

/// Included when work-life balance is rated Poor or Fair.
pub const WORK_LIFE_BALANCE: &str = "Improve your work-life balance by setting boundaries. Consider scheduling dedicated time for relaxation and non-work activities.";

/// Included when relaxation techniques are practiced Never or Rarely.
pub const RELAXATION: &str = "Start incorporating relaxation techniques into your routine. Try meditation, progressive muscle relaxation, or guided imagery for 10 minutes daily.";

/// Sole recommendation of the degraded failure payload.
pub const FALLBACK: &str = "General stress management recommendation as fallback.";

/// Scores strictly above this are treated as high stress.
pub const HIGH_STRESS_SCORE: u8 = 60;
/// Nightly sleep strictly below this many hours triggers the sleep advice.
pub const LOW_SLEEP_HOURS: f64 = 7.0;
/// Weekly exercise strictly below this many days triggers the exercise advice.
pub const LOW_EXERCISE_DAYS: i64 = 3;

/// The sleep advice, with the reported hours embedded in the text. Whole
/// hours keep a trailing ".0" ("4.0 hours"); fractional hours print as-is.
pub fn sleep_recommendation(sleep_hours: f64) -> String {
    let hours = if sleep_hours.fract() == 0.0 {
        format!("{sleep_hours:.1}")
    } else {
        format!("{sleep_hours}")
    };
    format!(
        "You're getting {hours} hours of sleep. Try to increase your sleep to 7-8 hours per night for better stress management."
    )
}

/// Selects recommendations for one assessment, in fixed rule order.
pub fn recommendations_for(features: &FeatureSet, score: u8) -> Vec<String> {
    let mut recommendations = vec![BASELINE.to_string()];
    if score > HIGH_STRESS_SCORE {
        recommendations.push(HIGH_STRESS.to_string());
    }
    if features.sleep_hours < LOW_SLEEP_HOURS {
        recommendations.push(sleep_recommendation(features.sleep_hours));
    }
    if features.exercise_days < LOW_EXERCISE_DAYS {
        recommendations.push(EXERCISE.to_string());
    }
    if matches!(
        features.work_life_balance,
        WorkLifeBalance::Poor | WorkLifeBalance::Fair
    ) {
        recommendations.push(WORK_LIFE_BALANCE.to_string());
    }
    if matches!(
        features.relaxation,
        RelaxationFrequency::Never | RelaxationFrequency::Rarely
    ) {
        recommendations.push(RELAXATION.to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_features() -> FeatureSet {
        FeatureSet {
            stress_level: 2.0,
            sleep_hours: 8.0,
            exercise_days: 5,
            work_life_balance: WorkLifeBalance::Excellent,
            relaxation: RelaxationFrequency::Daily,
        }
    }

    #[test]
    fn settled_features_get_only_the_baseline() {
        let recommendations = recommendations_for(&settled_features(), 20);
        assert_eq!(recommendations, vec![BASELINE.to_string()]);
    }

    #[test]
    fn every_rule_fires_in_fixed_order() {
        let features = FeatureSet {
            stress_level: 9.0,
            sleep_hours: 4.0,
            exercise_days: 0,
            work_life_balance: WorkLifeBalance::Poor,
            relaxation: RelaxationFrequency::Never,
        };
        let recommendations = recommendations_for(&features, 85);
        assert_eq!(
            recommendations,
            vec![
                BASELINE.to_string(),
                HIGH_STRESS.to_string(),
                sleep_recommendation(4.0),
                EXERCISE.to_string(),
                WORK_LIFE_BALANCE.to_string(),
                RELAXATION.to_string(),
            ]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        // Exactly at each threshold, the rule must not fire.
        let features = FeatureSet {
            sleep_hours: 7.0,
            exercise_days: 3,
            ..settled_features()
        };
        let recommendations = recommendations_for(&features, 60);
        assert_eq!(recommendations, vec![BASELINE.to_string()]);

        // Just past each threshold, it must.
        let past = FeatureSet {
            sleep_hours: 6.9,
            exercise_days: 2,
            ..settled_features()
        };
        let fired = recommendations_for(&past, 61);
        assert!(fired.contains(&HIGH_STRESS.to_string()));
        assert!(fired.contains(&sleep_recommendation(6.9)));
        assert!(fired.contains(&EXERCISE.to_string()));
    }

    #[test]
    fn fair_balance_and_rare_relaxation_also_fire() {
        let features = FeatureSet {
            work_life_balance: WorkLifeBalance::Fair,
            relaxation: RelaxationFrequency::Rarely,
            ..settled_features()
        };
        let recommendations = recommendations_for(&features, 10);
        assert_eq!(
            recommendations,
            vec![
                BASELINE.to_string(),
                WORK_LIFE_BALANCE.to_string(),
                RELAXATION.to_string(),
            ]
        );
    }

    #[test]
    fn good_balance_and_often_relaxation_stay_quiet() {
        let features = FeatureSet {
            work_life_balance: WorkLifeBalance::Good,
            relaxation: RelaxationFrequency::Often,
            ..settled_features()
        };
        let recommendations = recommendations_for(&features, 10);
        assert_eq!(recommendations, vec![BASELINE.to_string()]);
    }

    #[test]
    fn sleep_recommendation_reports_the_submitted_hours() {
        assert!(sleep_recommendation(5.5).starts_with("You're getting 5.5 hours of sleep."));
        assert!(sleep_recommendation(4.0).starts_with("You're getting 4.0 hours of sleep."));
    }
}
