//! End-to-end pipeline integration tests.
//!
//! These exercise the full serving path, CSV bytes in and forecast response
//! out, with a fake model behind the `SequenceModel` boundary.

use chrono::NaiveDate;
use demand_forecast::{
    read_sales_from_reader, CategoryVocabulary, DateRange, ForecastError, ForecastRequest,
    Forecaster, Frequency, PipelineConfig, Result, SalesRecord, SequenceModel, TensorConfig,
    WindowConfig,
};
use ndarray::{Array1, Array4};
use std::fmt::Write as _;
use std::sync::Arc;

/// Fake model: declares `(2, 3, 1)` input and predicts the sample mean.
struct MeanModel;

impl SequenceModel for MeanModel {
    fn input_shape(&self) -> (usize, usize, usize) {
        (2, 3, 1)
    }

    fn predict(&self, input: &Array4<f64>) -> Result<Array1<f64>> {
        let n = input.dim().0;
        let per_sample = (input.len() / n.max(1)) as f64;
        Ok(Array1::from_iter(
            input.outer_iter().map(|sample| sample.sum() / per_sample),
        ))
    }
}

fn small_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_window(WindowConfig {
            window: 5,
            lag: 1,
            drop_incomplete: true,
        })
        .with_tensor(TensorConfig {
            sub_size: 2,
            expected_timesteps: 3,
        })
}

fn sales_csv(item: &str, days: usize) -> String {
    let mut csv = String::from("item,store,date,sales\n");
    let start = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
    for i in 0..days {
        let date = start.checked_add_days(chrono::Days::new(i as u64)).unwrap();
        writeln!(csv, "{item},1,{date},{}", (i + 1) as f64).unwrap();
    }
    csv
}

fn february_week() -> DateRange {
    DateRange {
        start: NaiveDate::from_ymd_opt(2013, 2, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2013, 2, 7).unwrap(),
        frequency: Frequency::Daily,
    }
}

fn build_forecaster(history: Vec<SalesRecord>, classes: &[&str]) -> Forecaster {
    Forecaster::new(
        small_config(),
        history,
        CategoryVocabulary::from_classes(classes.iter().copied()),
        Arc::new(MeanModel),
    )
    .expect("valid configuration")
}

#[test]
fn test_csv_to_forecast_end_to_end() {
    let history = read_sales_from_reader(sales_csv("beauty", 30).as_bytes()).unwrap();
    let forecaster = build_forecaster(history, &["BEAUTY", "GROCERY"]);

    let mut request = ForecastRequest::new(" Beauty ");
    request.date_range = Some(february_week());

    let response = forecaster.predict(&request).unwrap();

    assert_eq!(response.category, "BEAUTY");
    assert_eq!(response.resolved_label, 0);
    assert_eq!(response.forecast.len(), 7);
    assert!(response.warnings.is_empty());

    // Dates come back formatted and in order.
    assert_eq!(response.forecast[0].date, "2013-02-01");
    assert_eq!(response.forecast[6].date, "2013-02-07");

    // The mean model sees a rising series, so predictions rise too.
    assert!(response.forecast[6].value > response.forecast[0].value);
}

#[test]
fn test_unseen_category_resolves_to_unknown_with_warning() {
    let history = read_sales_from_reader(sales_csv("seafood", 30).as_bytes()).unwrap();
    let forecaster = build_forecaster(
        history,
        &["BEAUTY", "GROCERY", "CLEANING", "DAIRY", "FROZEN"],
    );

    let mut request = ForecastRequest::new("SEAFOOD");
    request.date_range = Some(february_week());

    let response = forecaster.predict(&request).unwrap();

    // UNKNOWN is appended after the five fitted classes.
    assert_eq!(response.resolved_label, 5);
    assert!(response.warnings.iter().any(|w| w.contains("SEAFOOD")));
    assert!(!response.forecast.is_empty());

    // The vocabulary grew by exactly the sentinel.
    let snapshot = forecaster.resolver().snapshot();
    assert_eq!(snapshot.len(), 6);
    assert!(snapshot.contains("UNKNOWN"));
}

#[test]
fn test_no_data_for_category_is_an_error_not_an_empty_forecast() {
    let history = read_sales_from_reader(sales_csv("beauty", 30).as_bytes()).unwrap();
    let forecaster = build_forecaster(history, &["BEAUTY"]);

    let err = forecaster
        .predict(&ForecastRequest::new("NON_EXISTENT"))
        .unwrap_err();

    assert!(matches!(err, ForecastError::NoDataForCategory { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn test_missing_values_are_filled_with_zero_and_warned() {
    let mut csv = sales_csv("beauty", 30);
    // Corrupt two sales cells so coercion fails.
    csv = csv.replacen("1,2013-01-05,5", "1,2013-01-05,n/a", 1);
    csv = csv.replacen("1,2013-01-09,9", "1,2013-01-09,??", 1);

    let history = read_sales_from_reader(csv.as_bytes()).unwrap();
    let forecaster = build_forecaster(history, &["BEAUTY"]);

    let mut request = ForecastRequest::new("BEAUTY");
    request.date_range = Some(february_week());

    let response = forecaster.predict(&request).unwrap();

    assert!(response
        .warnings
        .iter()
        .any(|w| w.contains("2 missing sales value(s)")));
    assert!(response.forecast.iter().all(|p| p.value.is_finite()));
}

#[test]
fn test_history_too_short_for_window_is_an_error() {
    let history = read_sales_from_reader(sales_csv("beauty", 4).as_bytes()).unwrap();
    let forecaster = build_forecaster(history, &["BEAUTY"]);

    // 4 rows cannot produce any complete (window=5, lag=1) example.
    let result = forecaster.predict(&ForecastRequest::new("BEAUTY"));
    assert!(result.is_err());
}

#[test]
fn test_predictions_capped_by_available_history() {
    // 10 records with window 5, lag 1 -> 4 supervised rows; a 7-day horizon
    // can only be filled for the first 4 dates.
    let history = read_sales_from_reader(sales_csv("beauty", 10).as_bytes()).unwrap();
    let forecaster = build_forecaster(history, &["BEAUTY"]);

    let mut request = ForecastRequest::new("BEAUTY");
    request.date_range = Some(february_week());

    let response = forecaster.predict(&request).unwrap();
    assert_eq!(response.forecast.len(), 4);
}

#[test]
fn test_mismatched_model_shape_rejected_per_request() {
    struct WideModel;

    impl SequenceModel for WideModel {
        fn input_shape(&self) -> (usize, usize, usize) {
            (4, 3, 1) // four subsequences; the pipeline produces two
        }

        fn predict(&self, input: &Array4<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(input.dim().0))
        }
    }

    let history = read_sales_from_reader(sales_csv("beauty", 30).as_bytes()).unwrap();
    let forecaster = Forecaster::new(
        small_config(),
        history,
        CategoryVocabulary::from_classes(["BEAUTY"]),
        Arc::new(WideModel),
    )
    .unwrap();

    let err = forecaster.predict(&ForecastRequest::new("BEAUTY")).unwrap_err();
    assert!(matches!(err, ForecastError::ShapeMismatch { .. }));
}

#[test]
fn test_concurrent_requests_share_one_forecaster() {
    let mut csv = sales_csv("beauty", 30);
    let grocery = sales_csv("grocery", 30);
    let (_, grocery_rows) = grocery.split_once('\n').expect("header line present");
    csv.push_str(grocery_rows);

    let history = read_sales_from_reader(csv.as_bytes()).unwrap();
    let forecaster = Arc::new(build_forecaster(history, &["BEAUTY", "GROCERY"]));

    let handles: Vec<_> = ["BEAUTY", "GROCERY", "BEAUTY", "GROCERY"]
        .iter()
        .map(|category| {
            let forecaster = Arc::clone(&forecaster);
            let category = category.to_string();
            std::thread::spawn(move || {
                let mut request = ForecastRequest::new(category);
                request.date_range = Some(february_week());
                forecaster.predict(&request)
            })
        })
        .collect();

    for handle in handles {
        let response = handle.join().expect("thread panicked").unwrap();
        assert_eq!(response.forecast.len(), 7);
    }
}
