//! Windowing and tensor-shaping integration tests.
//!
//! Covers the interplay of the supervised framing, the reshaper's padding,
//! and the validator's truncate-or-fail contract across realistic parameter
//! combinations.

use chrono::NaiveDate;
use demand_forecast::{
    timesteps_for, to_model_tensor, to_supervised, SalesRecord, ShapeValidator,
};

fn series(n: usize) -> Vec<SalesRecord> {
    let start = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
    (0..n)
        .map(|i| SalesRecord {
            item: "A".to_string(),
            store: "1".to_string(),
            date: start.checked_add_days(chrono::Days::new(i as u64)).unwrap(),
            sales: (i + 1) as f64,
        })
        .collect()
}

#[test]
fn test_ten_rows_window_two_lag_one_yields_seven() {
    let records = series(10);
    let (frame, targets) = to_supervised(&records, 2, 1, true).unwrap();

    assert_eq!(frame.n_rows(), 7);
    assert_eq!(targets.len(), 7);

    // Each row: two lookback values, the current value, one target.
    assert_eq!(frame.n_features(), 3);
    assert_eq!(frame.rows()[0], vec![1.0, 2.0, 3.0]);
    assert_eq!(targets[0], 4.0);
    assert_eq!(frame.rows()[6], vec![7.0, 8.0, 9.0]);
    assert_eq!(targets[6], 10.0);
}

#[test]
fn test_row_count_property_across_windows_and_lags() {
    let records = series(50);
    for window in [0usize, 1, 2, 5, 10] {
        for lag in [1usize, 2, 7] {
            let (frame, targets) = to_supervised(&records, window, lag, true).unwrap();
            assert_eq!(frame.n_rows(), 50 - (window + lag), "window={window} lag={lag}");
            assert_eq!(targets.len(), frame.n_rows());
            // No survivor carries a missing value.
            for (row, target) in frame.rows().iter().zip(&targets) {
                assert!(row.iter().all(|v| !v.is_nan()));
                assert!(!target.is_nan());
            }
        }
    }
}

#[test]
fn test_130_features_split_into_65_timesteps_without_padding() {
    // window=129 -> 130 features; sub_size=2 divides exactly.
    let records = series(140);
    let (frame, _) = to_supervised(&records, 129, 1, true).unwrap();
    assert_eq!(frame.n_features(), 130);

    let tensor = to_model_tensor(&frame, 2).unwrap();
    assert_eq!(tensor.dim(), (10, 2, 65, 1));

    // Exact division: the final slot holds a real feature, not padding.
    assert_eq!(tensor[[0, 1, 64, 0]], frame.rows()[0][129]);
}

#[test]
fn test_odd_feature_count_pads_with_exact_zeros() {
    // window=4 -> 5 features; sub_size=2 -> 6 slots, one zero pad.
    let records = series(12);
    let (frame, _) = to_supervised(&records, 4, 1, true).unwrap();
    assert_eq!(frame.n_features(), 5);

    let tensor = to_model_tensor(&frame, 2).unwrap();
    assert_eq!(tensor.dim(), (7, 2, 3, 1));
    assert_eq!(timesteps_for(5, 2), 3);

    // Every row's final slot is the zero pad.
    for row in 0..7 {
        assert_eq!(tensor[[row, 1, 2, 0]], 0.0);
    }
}

#[test]
fn test_pad_then_truncate_round_trip_preserves_leading_features() {
    // Pipeline produces 4 timesteps; the model wants 3: the validator drops
    // only the trailing (most padded) slice.
    let records = series(12);
    let (frame, _) = to_supervised(&records, 6, 1, true).unwrap(); // 7 features
    let tensor = to_model_tensor(&frame, 2).unwrap(); // (5, 2, 4, 1)

    let validator = ShapeValidator::new((2, 3, 1));
    let enforced = validator.enforce(tensor.clone()).unwrap();

    assert_eq!(enforced.dim(), (5, 2, 3, 1));
    for row in 0..5 {
        for sub in 0..2 {
            for step in 0..3 {
                assert_eq!(enforced[[row, sub, step, 0]], tensor[[row, sub, step, 0]]);
            }
        }
    }
}

#[test]
fn test_enforce_twice_equals_enforce_once() {
    let records = series(20);
    let (frame, _) = to_supervised(&records, 5, 1, true).unwrap();
    let tensor = to_model_tensor(&frame, 2).unwrap();

    let validator = ShapeValidator::new((2, 3, 1));
    let once = validator.enforce(tensor).unwrap();
    let twice = validator.enforce(once.clone()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_window_zero_still_produces_a_usable_tensor() {
    let records = series(10);
    let (frame, targets) = to_supervised(&records, 0, 1, true).unwrap();

    assert_eq!(frame.n_rows(), 9);
    assert_eq!(targets.len(), 9);

    // One feature per row: sub_size 1 x 1 timestep.
    let tensor = to_model_tensor(&frame, 1).unwrap();
    assert_eq!(tensor.dim(), (9, 1, 1, 1));
    assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
}
