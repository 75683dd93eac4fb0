//! End-to-end pipeline on a linear weekly series

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use engine::{EngineConfig, EngineError, ForecastSession, Scenario, SessionReport, TimeSeriesPoint};

const PERIODS: usize = 58;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 10, 3).unwrap()
}

fn linear_points() -> Vec<TimeSeriesPoint> {
    (0..PERIODS)
        .map(|i| {
            TimeSeriesPoint::new(
                start() + Duration::weeks(i as i64),
                1_000_000.0 + 10_000.0 * i as f64,
            )
        })
        .collect()
}

fn run_default() -> SessionReport {
    let session = ForecastSession::new(EngineConfig::default(), linear_points()).unwrap();
    session.run(&Scenario::baseline()).unwrap()
}

#[test]
fn test_holdout_tracks_linear_continuation() {
    let report = run_default();
    let evaluation = report.evaluation.report().expect("evaluation computed");

    assert_eq!(evaluation.train_periods, 46);
    assert_eq!(evaluation.test_periods, 12);
    assert_eq!(
        evaluation.predictions[0].period_start,
        start() + Duration::weeks(46)
    );

    let mape = evaluation.test.mape.expect("nonzero actuals");
    assert!(mape < 5.0, "hold-out MAPE {:.2}%", mape);
    let accuracy = evaluation.accuracy().expect("accuracy defined");
    assert!(accuracy > 90.0, "hold-out accuracy {:.2}%", accuracy);
    assert!(evaluation.cross_validation.is_some());
}

#[test]
fn test_forecast_continues_history() {
    let report = run_default();
    let last = start() + Duration::weeks(PERIODS as i64 - 1);

    assert_eq!(report.forecast.len(), 26);
    assert_eq!(report.forecast[0].period_start, last + Duration::weeks(1));
    assert_eq!(report.forecast[25].period_start, last + Duration::weeks(26));
    assert!(report
        .forecast
        .windows(2)
        .all(|w| w[0].period_start < w[1].period_start));
    assert!(report.forecast.iter().all(|p| p.predicted_value >= 0.0));
    assert!(report
        .forecast
        .iter()
        .all(|p| p.interval.map_or(false, |i| i.contains(p.predicted_value))));

    assert_eq!(report.history.periods, PERIODS);
    assert_eq!(report.history.last_period, last);
    let total: f64 = report.period_totals.iter().map(|t| t.total).sum();
    let points: f64 = report.forecast.iter().map(|p| p.predicted_value).sum();
    assert_relative_eq!(total, points, max_relative = 1e-9);
}

#[test]
fn test_importance_is_normalized_and_ranked() {
    let report = run_default();
    let sum: f64 = report.feature_importance.iter().map(|f| f.importance).sum();
    assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
    assert!(report
        .feature_importance
        .windows(2)
        .all(|w| w[0].importance >= w[1].importance));

    let group_sum: f64 = report.group_importance.iter().map(|g| g.importance).sum();
    assert_relative_eq!(group_sum, 1.0, epsilon = 1e-6);
}

#[test]
fn test_runs_are_deterministic() {
    assert_eq!(run_default(), run_default());
}

#[test]
fn test_recursive_mode_matches_first_flat_step() {
    let config = EngineConfig {
        recursive_forecast: true,
        forecast_horizon: 6,
        ..Default::default()
    };
    let session = ForecastSession::new(config, linear_points()).unwrap();
    let recursive = session.forecast(&Scenario::baseline(), None).unwrap();

    let flat = ForecastSession::new(
        EngineConfig {
            forecast_horizon: 6,
            ..Default::default()
        },
        linear_points(),
    )
    .unwrap()
    .forecast(&Scenario::baseline(), None)
    .unwrap();

    assert_eq!(recursive.points.len(), 6);
    assert_relative_eq!(
        recursive.points[0].predicted_value,
        flat.points[0].predicted_value,
        epsilon = 1e-9
    );
}

#[test]
fn test_duplicate_period_rejected_before_training() {
    let mut points = linear_points();
    points[10].period_start = points[9].period_start;
    match ForecastSession::new(EngineConfig::default(), points) {
        Err(EngineError::InvalidInput { periods, .. }) => {
            assert_eq!(periods, vec![start() + Duration::weeks(9)]);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
