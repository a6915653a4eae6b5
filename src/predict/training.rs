/// Offline training for the river level regression.
///
/// Loads two historical hourly CSV series — cumulative rainfall and river
/// level — merges them with an outer join on the timestamp column
/// (missing values fill with 0), holds out a 20% test partition, and fits
/// an ordinary-least-squares line on the training partition.
///
/// Columns are located by header name, so column order in the exported
/// CSVs does not matter. Header names match the water authority exports
/// the series come from.

use super::FittedLine;
use std::collections::HashMap;
use std::fs;

/// Header of the timestamp column shared by both exports.
pub const TIMESTAMP_COLUMN: &str = "Date/Time";

/// Header of the rainfall value column in the rainfall export.
pub const RAINFALL_COLUMN: &str = "Cumulative rainfall (mm)";

/// Header of the level value column in the river level export.
pub const RIVER_LEVEL_COLUMN: &str = "Level (m)";

/// Fraction of joined rows held out for testing: every fifth row.
const TEST_HOLDOUT_STRIDE: usize = 5;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while training the level regression.
///
/// All of them make the predictor unavailable rather than failing the
/// service — training problems are reported through the capability
/// registry at startup.
#[derive(Debug, PartialEq)]
pub enum TrainingError {
    /// A training CSV could not be read from disk.
    MissingFile(String),
    /// A training CSV had no usable header or rows.
    MalformedCsv(String),
    /// The joined data cannot support a least-squares fit
    /// (fewer than two rows, or zero rainfall variance).
    InsufficientData(String),
}

impl std::fmt::Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingError::MissingFile(msg) => write!(f, "Training file missing: {}", msg),
            TrainingError::MalformedCsv(msg) => write!(f, "Malformed training CSV: {}", msg),
            TrainingError::InsufficientData(msg) => write!(f, "Insufficient training data: {}", msg),
        }
    }
}

impl std::error::Error for TrainingError {}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parses one export into (timestamp, value) pairs, preserving row order.
///
/// The header row locates both the timestamp column and `value_column`.
/// Rows with a blank or unparseable value are skipped rather than
/// aborting the whole series — sensor exports routinely contain gaps.
pub fn parse_series(csv: &str, value_column: &str) -> Result<Vec<(String, f64)>, TrainingError> {
    let mut lines = csv.lines();

    let header = lines
        .next()
        .ok_or_else(|| TrainingError::MalformedCsv("empty file".to_string()))?;
    let columns: Vec<&str> = header.split(',').map(|c| c.trim()).collect();

    let ts_index = columns
        .iter()
        .position(|c| *c == TIMESTAMP_COLUMN)
        .ok_or_else(|| {
            TrainingError::MalformedCsv(format!("missing column '{}'", TIMESTAMP_COLUMN))
        })?;
    let value_index = columns
        .iter()
        .position(|c| *c == value_column)
        .ok_or_else(|| TrainingError::MalformedCsv(format!("missing column '{}'", value_column)))?;

    let mut series = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= ts_index.max(value_index) {
            continue;
        }

        let timestamp = fields[ts_index].trim();
        if timestamp.is_empty() {
            continue;
        }

        // Gaps in the export parse as missing, not as errors.
        if let Ok(value) = fields[value_index].trim().parse::<f64>() {
            series.push((timestamp.to_string(), value));
        }
    }

    if series.is_empty() {
        return Err(TrainingError::MalformedCsv(format!(
            "no usable rows for column '{}'",
            value_column
        )));
    }

    Ok(series)
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Outer-joins the two series on timestamp into (rainfall, level) rows.
///
/// Timestamps present in either series are kept; a value missing from the
/// other series fills with 0. Row order is the rainfall series' order
/// followed by unmatched level timestamps in their own order, which keeps
/// the merge deterministic.
pub fn merge_outer(rain: &[(String, f64)], level: &[(String, f64)]) -> Vec<(f64, f64)> {
    let level_by_ts: HashMap<&str, f64> = level
        .iter()
        .map(|(ts, value)| (ts.as_str(), *value))
        .collect();
    let rain_ts: std::collections::HashSet<&str> =
        rain.iter().map(|(ts, _)| ts.as_str()).collect();

    let mut rows = Vec::with_capacity(rain.len() + level.len());

    for (ts, rain_mm) in rain {
        let level_m = level_by_ts.get(ts.as_str()).copied().unwrap_or(0.0);
        rows.push((*rain_mm, level_m));
    }

    for (ts, level_m) in level {
        if !rain_ts.contains(ts.as_str()) {
            rows.push((0.0, *level_m));
        }
    }

    rows
}

// ---------------------------------------------------------------------------
// Train/test split and fitting
// ---------------------------------------------------------------------------

/// Deterministic 80/20 split: every fifth row is held out for testing.
pub fn train_test_split(rows: &[(f64, f64)]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if (i + 1) % TEST_HOLDOUT_STRIDE == 0 {
            test.push(*row);
        } else {
            train.push(*row);
        }
    }

    (train, test)
}

/// Ordinary least squares fit of level on rainfall.
pub fn fit_ols(rows: &[(f64, f64)]) -> Result<FittedLine, TrainingError> {
    if rows.len() < 2 {
        return Err(TrainingError::InsufficientData(format!(
            "need at least 2 rows, have {}",
            rows.len()
        )));
    }

    let n = rows.len() as f64;
    let mean_x: f64 = rows.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y: f64 = rows.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (x, y) in rows {
        covariance += (x - mean_x) * (y - mean_y);
        variance += (x - mean_x) * (x - mean_x);
    }

    if variance == 0.0 {
        return Err(TrainingError::InsufficientData(
            "rainfall series has zero variance".to_string(),
        ));
    }

    let slope = covariance / variance;
    let intercept = mean_y - slope * mean_x;

    Ok(FittedLine { slope, intercept })
}

// ---------------------------------------------------------------------------
// End-to-end training
// ---------------------------------------------------------------------------

/// Train the level regression from the two configured CSV exports.
pub fn train_from_files(
    rainfall_path: &str,
    river_level_path: &str,
) -> Result<FittedLine, TrainingError> {
    let rain_csv = fs::read_to_string(rainfall_path)
        .map_err(|e| TrainingError::MissingFile(format!("{}: {}", rainfall_path, e)))?;
    let level_csv = fs::read_to_string(river_level_path)
        .map_err(|e| TrainingError::MissingFile(format!("{}: {}", river_level_path, e)))?;

    train_from_csv(&rain_csv, &level_csv)
}

/// Train from in-memory CSV contents: parse, outer-join, split, fit.
pub fn train_from_csv(rain_csv: &str, level_csv: &str) -> Result<FittedLine, TrainingError> {
    let rain = parse_series(rain_csv, RAINFALL_COLUMN)?;
    let level = parse_series(level_csv, RIVER_LEVEL_COLUMN)?;

    let rows = merge_outer(&rain, &level);
    let (train, _test) = train_test_split(&rows);

    fit_ols(&train)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RAIN_CSV: &str = "\
Date/Time,Current rainfall (mm),Cumulative rainfall (mm)
2023-10-06 00:00,0.2,0.2
2023-10-06 01:00,0.8,1.0
2023-10-06 02:00,1.0,2.0
2023-10-06 03:00,2.0,4.0
2023-10-06 04:00,4.0,8.0
2023-10-06 05:00,2.0,10.0
";

    const LEVEL_CSV: &str = "\
Date/Time,Level (m)
2023-10-06 00:00,0.42
2023-10-06 01:00,0.50
2023-10-06 02:00,0.60
2023-10-06 03:00,0.80
2023-10-06 04:00,1.20
2023-10-06 06:00,1.10
";

    // --- CSV parsing --------------------------------------------------------

    #[test]
    fn test_parse_series_locates_column_by_header() {
        let series = parse_series(RAIN_CSV, RAINFALL_COLUMN).expect("valid CSV should parse");
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].0, "2023-10-06 00:00");
        assert!(
            (series[4].1 - 8.0).abs() < 1e-9,
            "must read the cumulative column, not the current one"
        );
    }

    #[test]
    fn test_parse_series_skips_gap_rows() {
        let csv = "\
Date/Time,Level (m)
2023-10-06 00:00,0.42
2023-10-06 01:00,
2023-10-06 02:00,0.60
";
        let series = parse_series(csv, RIVER_LEVEL_COLUMN).expect("should parse around gaps");
        assert_eq!(series.len(), 2, "blank value rows are skipped, not fatal");
    }

    #[test]
    fn test_parse_series_missing_column_is_malformed() {
        let result = parse_series(LEVEL_CSV, RAINFALL_COLUMN);
        assert!(
            matches!(result, Err(TrainingError::MalformedCsv(_))),
            "wrong export should be reported as malformed, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_series_empty_file_is_malformed() {
        assert!(matches!(
            parse_series("", RAINFALL_COLUMN),
            Err(TrainingError::MalformedCsv(_))
        ));
    }

    // --- Merging ------------------------------------------------------------

    #[test]
    fn test_merge_outer_keeps_timestamps_from_either_series() {
        let rain = parse_series(RAIN_CSV, RAINFALL_COLUMN).unwrap();
        let level = parse_series(LEVEL_CSV, RIVER_LEVEL_COLUMN).unwrap();
        let rows = merge_outer(&rain, &level);

        // 6 rain timestamps plus the 06:00 level-only timestamp.
        assert_eq!(rows.len(), 7, "outer join keeps rows from both series");
    }

    #[test]
    fn test_merge_outer_fills_missing_values_with_zero() {
        let rain = parse_series(RAIN_CSV, RAINFALL_COLUMN).unwrap();
        let level = parse_series(LEVEL_CSV, RIVER_LEVEL_COLUMN).unwrap();
        let rows = merge_outer(&rain, &level);

        // 05:00 exists only in the rain series → level fills with 0.
        assert_eq!(rows[5], (10.0, 0.0));
        // 06:00 exists only in the level series → rain fills with 0.
        assert_eq!(rows[6], (0.0, 1.10));
    }

    // --- Split --------------------------------------------------------------

    #[test]
    fn test_split_holds_out_one_in_five() {
        let rows: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, i as f64)).collect();
        let (train, test) = train_test_split(&rows);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);
        assert_eq!(test[0], (4.0, 4.0), "every fifth row is held out");
        assert_eq!(test[1], (9.0, 9.0));
    }

    #[test]
    fn test_split_is_deterministic() {
        let rows: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, 0.0)).collect();
        assert_eq!(train_test_split(&rows), train_test_split(&rows));
    }

    // --- Fitting ------------------------------------------------------------

    #[test]
    fn test_fit_recovers_exact_line_from_collinear_data() {
        // y = 0.1x + 0.4 exactly.
        let rows: Vec<(f64, f64)> = [0.0, 1.0, 2.0, 5.0, 10.0]
            .iter()
            .map(|&x| (x, 0.1 * x + 0.4))
            .collect();
        let line = fit_ols(&rows).expect("collinear data must fit");
        assert!((line.slope - 0.1).abs() < 1e-12, "slope should be 0.1, got {}", line.slope);
        assert!((line.intercept - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_single_row() {
        let result = fit_ols(&[(1.0, 2.0)]);
        assert!(matches!(result, Err(TrainingError::InsufficientData(_))));
    }

    #[test]
    fn test_fit_rejects_zero_variance_rainfall() {
        let result = fit_ols(&[(3.0, 1.0), (3.0, 2.0), (3.0, 3.0)]);
        assert!(
            matches!(result, Err(TrainingError::InsufficientData(_))),
            "constant rainfall cannot determine a slope"
        );
    }

    // --- End-to-end ---------------------------------------------------------

    #[test]
    fn test_train_from_csv_produces_rising_line() {
        // Fully aligned series so the toy fit reflects the trend rather
        // than join fill values.
        let level_csv = "\
Date/Time,Level (m)
2023-10-06 00:00,0.42
2023-10-06 01:00,0.50
2023-10-06 02:00,0.60
2023-10-06 03:00,0.80
2023-10-06 04:00,1.20
2023-10-06 05:00,1.40
";
        let line = train_from_csv(RAIN_CSV, level_csv).expect("sample data should train");
        assert!(
            line.slope > 0.0,
            "more rain should predict higher water, got slope {}",
            line.slope
        );
    }

    #[test]
    fn test_train_from_shipped_exports() {
        // The sample exports under data/ must train end to end with a
        // rising line and a sane dry-weather intercept.
        let line = train_from_files(
            "data/hoppers-crossing-hourly-rainfall.csv",
            "data/hoppers-crossing-hourly-river-level.csv",
        )
        .expect("shipped sample data should train");

        assert!(line.slope > 0.0, "got slope {}", line.slope);
        assert!(
            line.intercept > 0.0 && line.intercept < 1.5,
            "dry-weather level should sit below flood stage, got {}",
            line.intercept
        );
    }

    #[test]
    fn test_train_from_missing_files_reports_missing() {
        let result = train_from_files("no/such/rain.csv", "no/such/level.csv");
        assert!(
            matches!(result, Err(TrainingError::MissingFile(_))),
            "missing data makes the predictor unavailable, got {:?}",
            result
        );
    }
}
