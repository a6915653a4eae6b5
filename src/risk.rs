/// Rainfall-window flood risk scoring.
///
/// `score` is the decision core of the service: it turns an hourly
/// rainfall series into a numeric score, a three-level classification,
/// a human-readable reason, and zero or more alert strings. It is a pure
/// function — no I/O, no state, fully reproducible from the same series.
///
/// The coefficients and thresholds below are hand-tuned operational
/// constants; they are kept exactly as calibrated.

use crate::model::{HourlyRainSample, RainSignals, RiskAssessment, RiskLevel};

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

/// Weight of the 3-hour rainfall window in the score.
pub const RAIN_3H_WEIGHT: f64 = 2.0;

/// Weight of the 24-hour rainfall window in the score.
pub const RAIN_24H_WEIGHT: f64 = 1.2;

/// Scores strictly above this classify as High.
pub const HIGH_SCORE_THRESHOLD: i64 = 100;

/// Scores strictly above this (and not High) classify as Moderate.
pub const MODERATE_SCORE_THRESHOLD: i64 = 40;

/// 3-hour rainfall strictly above this raises the short-term alert.
pub const HEAVY_RAIN_3H_MM: f64 = 15.0;

/// 24-hour rainfall strictly above this raises the sustained-rain alert.
pub const SUSTAINED_RAIN_24H_MM: f64 = 50.0;

pub const HEAVY_RAIN_ALERT: &str = "Heavy rainfall expected soon.";
pub const SUSTAINED_RAIN_ALERT: &str = "Sustained heavy rain in last 24h.";

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Sum of rainfall over the leading `hours` elements of the series.
/// Shorter series are summed as-is; there is no padding.
fn leading_sum(hourly: &[HourlyRainSample], hours: usize) -> f64 {
    hourly.iter().take(hours).map(|h| h.rain_mm).sum()
}

/// Classify a score into a risk level. First match wins, strictly-greater
/// comparisons.
pub fn level_for_score(score: i64) -> RiskLevel {
    if score > HIGH_SCORE_THRESHOLD {
        RiskLevel::High
    } else if score > MODERATE_SCORE_THRESHOLD {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Compute a complete risk assessment from an hourly rainfall series.
///
/// `rain_1h` is the first hour's rainfall (0 for an empty series). It is
/// reported in the signals but does not participate in the score — the
/// score is `trunc(rain_3h * 2 + rain_24h * 1.2)` over the leading 3- and
/// 24-hour windows.
///
/// The two alerts are evaluated independently of the level and of each
/// other; both, either, or neither may be present.
pub fn score(hourly: &[HourlyRainSample]) -> RiskAssessment {
    let rain_1h = hourly.first().map(|h| h.rain_mm).unwrap_or(0.0);
    let rain_3h = leading_sum(hourly, 3);
    let rain_24h = leading_sum(hourly, 24);

    let score = (rain_3h * RAIN_3H_WEIGHT + rain_24h * RAIN_24H_WEIGHT) as i64;
    let level = level_for_score(score);

    let mut alerts = Vec::new();
    if rain_3h > HEAVY_RAIN_3H_MM {
        alerts.push(HEAVY_RAIN_ALERT.to_string());
    }
    if rain_24h > SUSTAINED_RAIN_24H_MM {
        alerts.push(SUSTAINED_RAIN_ALERT.to_string());
    }

    RiskAssessment {
        level,
        score,
        reason: format!("Rain 3h={}mm, 24h={}mm", rain_3h, rain_24h),
        signals: RainSignals {
            rain_1h_mm: rain_1h,
            rain_3h_mm: rain_3h,
            rain_24h_mm: rain_24h,
        },
        alerts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn series(rain: &[f64]) -> Vec<HourlyRainSample> {
        rain.iter().map(|&rain_mm| HourlyRainSample { rain_mm }).collect()
    }

    // --- Window sums --------------------------------------------------------

    #[test]
    fn test_rain_3h_sums_leading_three_hours() {
        let hourly = series(&[1.0, 2.0, 3.0, 100.0, 100.0]);
        let assessment = score(&hourly);
        assert!(
            (assessment.signals.rain_3h_mm - 6.0).abs() < 1e-9,
            "rain_3h must sum only the first 3 hours, got {}",
            assessment.signals.rain_3h_mm
        );
    }

    #[test]
    fn test_rain_24h_sums_leading_twenty_four_hours() {
        // 30 hours of 1 mm each: the 24h window must stop at 24.
        let hourly = series(&[1.0; 30]);
        let assessment = score(&hourly);
        assert!((assessment.signals.rain_24h_mm - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_sums_without_padding() {
        let hourly = series(&[4.0, 5.0]);
        let assessment = score(&hourly);
        assert!(
            (assessment.signals.rain_3h_mm - 9.0).abs() < 1e-9,
            "a 2-hour series sums 2 hours into the 3h window"
        );
        assert!(
            (assessment.signals.rain_24h_mm - 9.0).abs() < 1e-9,
            "a 2-hour series sums 2 hours into the 24h window"
        );
    }

    #[test]
    fn test_empty_series_scores_zero_and_low() {
        let assessment = score(&[]);
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert_eq!(assessment.signals.rain_1h_mm, 0.0);
        assert_eq!(assessment.signals.rain_3h_mm, 0.0);
        assert_eq!(assessment.signals.rain_24h_mm, 0.0);
        assert!(assessment.alerts.is_empty());
    }

    #[test]
    fn test_rain_1h_is_first_hour() {
        let hourly = series(&[2.5, 9.0, 9.0]);
        let assessment = score(&hourly);
        assert!((assessment.signals.rain_1h_mm - 2.5).abs() < 1e-9);
    }

    // --- Classification boundaries ------------------------------------------

    #[test]
    fn test_level_boundaries_are_strictly_greater() {
        assert_eq!(level_for_score(101), RiskLevel::High);
        assert_eq!(level_for_score(100), RiskLevel::Moderate, "100 is not > 100");
        assert_eq!(level_for_score(41), RiskLevel::Moderate);
        assert_eq!(level_for_score(40), RiskLevel::Low, "40 is not > 40");
        assert_eq!(level_for_score(0), RiskLevel::Low);
    }

    #[test]
    fn test_score_truncates_toward_zero() {
        // rain_3h = 16, rain_24h = 16 → 16*2 + 16*1.2 = 51.2 → 51
        let hourly = series(&[5.0, 6.0, 5.0]);
        let assessment = score(&hourly);
        assert_eq!(assessment.score, 51, "51.2 truncates to 51");
    }

    // --- Alerts -------------------------------------------------------------

    #[test]
    fn test_heavy_rain_alert_boundary() {
        // Exactly 15 mm in 3h: no alert (strictly greater).
        let at_threshold = score(&series(&[15.0]));
        assert!(
            at_threshold.alerts.is_empty(),
            "rain_3h=15 must not alert, got {:?}",
            at_threshold.alerts
        );

        let above_threshold = score(&series(&[15.01]));
        assert_eq!(above_threshold.alerts, vec![HEAVY_RAIN_ALERT.to_string()]);
    }

    #[test]
    fn test_sustained_rain_alert_boundary() {
        // Rain falls outside the 3h window so only the 24h alert is in
        // play. 20 hours of 2.5 mm total exactly 50 mm: no alert.
        let mut rain = vec![0.0, 0.0, 0.0];
        rain.extend(std::iter::repeat(2.5).take(20));
        let at_threshold = score(&series(&rain));
        assert_eq!(
            at_threshold.signals.rain_24h_mm, 50.0,
            "precondition: series must total 50 mm over 24h"
        );
        assert!(at_threshold.alerts.is_empty(), "rain_24h=50 must not alert");

        // One extra damp hour tips it strictly over the threshold.
        rain.push(0.5);
        let above = score(&series(&rain));
        assert_eq!(above.alerts, vec![SUSTAINED_RAIN_ALERT.to_string()]);
    }

    #[test]
    fn test_both_alerts_can_cooccur() {
        // 20 mm in each of the first 3 hours: rain_3h=60 > 15 and
        // rain_24h=60 > 50.
        let assessment = score(&series(&[20.0, 20.0, 20.0]));
        assert_eq!(
            assessment.alerts,
            vec![HEAVY_RAIN_ALERT.to_string(), SUSTAINED_RAIN_ALERT.to_string()],
            "alerts are independent and ordered short-term first"
        );
    }

    // --- End-to-end example -------------------------------------------------

    #[test]
    fn test_moderate_risk_example() {
        // [5, 6, 5] then 21 dry hours: rain_3h=16, rain_24h=16,
        // score = trunc(16*2 + 16*1.2) = trunc(51.2) = 51 → Moderate,
        // with only the short-term alert raised.
        let mut rain = vec![5.0, 6.0, 5.0];
        rain.extend(std::iter::repeat(0.0).take(21));
        let assessment = score(&series(&rain));

        assert_eq!(assessment.score, 51);
        assert_eq!(assessment.level, RiskLevel::Moderate);
        assert!((assessment.signals.rain_3h_mm - 16.0).abs() < 1e-9);
        assert!((assessment.signals.rain_24h_mm - 16.0).abs() < 1e-9);
        assert_eq!(assessment.alerts, vec![HEAVY_RAIN_ALERT.to_string()]);
        assert_eq!(assessment.reason, "Rain 3h=16mm, 24h=16mm");
    }

    // --- Purity -------------------------------------------------------------

    #[test]
    fn test_scoring_is_idempotent() {
        let hourly = series(&[3.0, 0.5, 12.25, 7.0, 0.0, 1.1]);
        let first = score(&hourly);
        let second = score(&hourly);
        assert_eq!(first, second, "identical input must yield identical output");
    }
}
