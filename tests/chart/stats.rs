use envdash::core::RawDataset;
use envdash::{ChartKind, ChartStats, aggregate};

use crate::common::assert_close;

#[test]
fn empty_input_has_no_stats() {
    assert_eq!(aggregate(&[]), None);
    assert_eq!(aggregate(&[None, Some(f64::NAN)]), None);
}

#[test]
fn invalid_values_are_filtered() {
    let s = aggregate(&[None, Some(f64::NAN), Some(10.0), Some(20.0)]).unwrap();
    assert_close(s.min, 10.0);
    assert_close(s.max, 20.0);
    assert_close(s.avg, 15.0);
}

#[test]
fn single_value() {
    let s = aggregate(&[Some(-3.5)]).unwrap();
    assert_close(s.min, -3.5);
    assert_close(s.max, -3.5);
    assert_close(s.avg, -3.5);
}

fn ds(data: &[Option<f64>]) -> RawDataset {
    RawDataset {
        label: String::new(),
        data: data.to_vec(),
    }
}

#[test]
fn each_series_is_aggregated_independently() {
    let stats = ChartStats::compute(
        ChartKind::TemperatureHumidity,
        &[ds(&[Some(20.0), Some(24.0)]), ds(&[None, None])],
    );
    match stats {
        ChartStats::TemperatureHumidity {
            temperature,
            humidity,
        } => {
            let t = temperature.unwrap();
            assert_close(t.avg, 22.0);
            assert_eq!(humidity, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_dataset_means_missing_stats() {
    let stats = ChartStats::compute(ChartKind::VocNox, &[ds(&[Some(100.0)])]);
    match stats {
        ChartStats::VocNox { voc, nox } => {
            assert_close(voc.unwrap().max, 100.0);
            assert_eq!(nox, None);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(
        ChartStats::compute(ChartKind::Co2, &[]),
        ChartStats::Co2 { co2: None }
    );
}
