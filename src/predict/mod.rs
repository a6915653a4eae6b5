/// River level prediction from current rainfall.
///
/// A single-feature ordinary-least-squares line, fitted offline from
/// historical rainfall and river level series (see `training`), maps the
/// last hour's rainfall to a predicted river level in meters. Levels
/// strictly above the fixed flood stage classify as FLOOD WARNING.
///
/// Training happens once at startup, never on the request path. When the
/// historical data is unavailable the predictor simply does not exist —
/// callers hold an `Option<FittedLine>` and the risk-scoring path does
/// not depend on it.

pub mod training;

use crate::model::{FloodPrediction, FloodStatus};

/// Flood stage threshold, in meters. Predicted levels strictly above
/// this classify as FLOOD WARNING.
pub const FLOOD_STAGE_M: f64 = 1.5;

// ---------------------------------------------------------------------------
// Fitted model
// ---------------------------------------------------------------------------

/// A fitted least-squares line: level = slope * rainfall + intercept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedLine {
    pub slope: f64,
    pub intercept: f64,
}

impl FittedLine {
    /// Predicted river level in meters for the given 1-hour rainfall in
    /// millimeters.
    pub fn predict(&self, rain_1h_mm: f64) -> f64 {
        self.slope * rain_1h_mm + self.intercept
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a predicted level against the fixed flood stage.
pub fn classify(predicted_level_m: f64) -> FloodStatus {
    if predicted_level_m > FLOOD_STAGE_M {
        FloodStatus::FloodWarning
    } else {
        FloodStatus::Safe
    }
}

/// Run the full prediction step: predict a level from rainfall and
/// classify it.
pub fn predict_level(line: &FittedLine, rain_1h_mm: f64) -> FloodPrediction {
    let predicted_level_m = line.predict(rain_1h_mm);
    FloodPrediction {
        predicted_level_m,
        status: classify(predicted_level_m),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_is_linear() {
        let line = FittedLine { slope: 0.1, intercept: 0.4 };
        assert!((line.predict(0.0) - 0.4).abs() < 1e-12);
        assert!((line.predict(10.0) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_flood_stage_boundary_is_strictly_greater() {
        assert_eq!(classify(1.5), FloodStatus::Safe, "exactly 1.5 m is not a warning");
        assert_eq!(classify(1.51), FloodStatus::FloodWarning);
        assert_eq!(classify(0.0), FloodStatus::Safe);
        assert_eq!(classify(4.2), FloodStatus::FloodWarning);
    }

    #[test]
    fn test_predict_level_combines_prediction_and_status() {
        // slope 0.1, intercept 0.4: 12 mm of rain predicts 1.6 m.
        let line = FittedLine { slope: 0.1, intercept: 0.4 };
        let prediction = predict_level(&line, 12.0);
        assert!((prediction.predicted_level_m - 1.6).abs() < 1e-9);
        assert_eq!(prediction.status, FloodStatus::FloodWarning);

        let dry = predict_level(&line, 0.0);
        assert_eq!(dry.status, FloodStatus::Safe);
    }
}
