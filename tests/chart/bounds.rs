use envdash::{AxisBounds, FixedRanges, MetricFamily, RangeMode, compute_bounds};

use crate::common::assert_close;

fn bounds(metric: MetricFamily, values: &[f64]) -> AxisBounds {
    let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    compute_bounds(metric, &values).expect("bounds for non-empty data")
}

#[test]
fn pads_ten_percent_of_range() {
    let b = bounds(MetricFamily::Co2, &[500.0, 900.0, 700.0]);
    assert_close(b.min, 460.0);
    assert_close(b.max, 940.0);
}

#[test]
fn clamps_to_physical_envelope() {
    let b = bounds(MetricFamily::Co2, &[310.0, 4900.0]);
    assert_close(b.min, 300.0);
    assert_close(b.max, 5000.0);

    let b = bounds(MetricFamily::Humidity, &[2.0, 99.0]);
    assert_close(b.min, 0.0);
    assert_close(b.max, 100.0);

    let b = bounds(MetricFamily::Temperature, &[-9.5, 20.0]);
    assert_close(b.min, -10.0);
    assert_close(b.max, 22.95);
}

#[test]
fn zero_range_gets_symmetric_pad() {
    let b = bounds(MetricFamily::Co2, &[500.0, 500.0, 500.0]);
    assert_close(b.min, 450.0);
    assert_close(b.max, 550.0);
    assert!(b.min < b.max);
}

#[test]
fn zero_range_at_zero_uses_unit_pad() {
    let b = bounds(MetricFamily::Nox, &[0.0, 0.0]);
    assert_close(b.min, 0.0);
    assert_close(b.max, 1.0);
}

#[test]
fn zero_range_on_envelope_edge_stays_ordered() {
    let b = bounds(MetricFamily::Humidity, &[100.0]);
    assert_close(b.min, 90.0);
    assert_close(b.max, 100.0);
}

#[test]
fn data_above_envelope_hugs_ceiling() {
    let b = bounds(MetricFamily::Co2, &[6000.0, 6000.0]);
    assert_close(b.min, 4400.0);
    assert_close(b.max, 5000.0);
}

#[test]
fn data_below_envelope_hugs_floor() {
    let b = bounds(MetricFamily::Temperature, &[-20.0, -15.0]);
    assert_close(b.min, -10.0);
    assert_close(b.max, -9.5);
}

#[test]
fn voc_and_nox_have_their_own_envelope() {
    let b = bounds(MetricFamily::Voc, &[100.0, 200.0]);
    assert_close(b.min, 90.0);
    assert_close(b.max, 210.0);

    let b = bounds(MetricFamily::Nox, &[1.0, 480.0]);
    assert_close(b.min, 0.0);
    assert_close(b.max, 500.0);
}

#[test]
fn invalid_samples_are_ignored() {
    let b = compute_bounds(
        MetricFamily::Temperature,
        &[None, Some(f64::NAN), Some(20.0), Some(f64::INFINITY), Some(30.0)],
    )
    .unwrap();
    assert_close(b.min, 19.0);
    assert_close(b.max, 31.0);
}

#[test]
fn no_valid_samples_means_no_bounds() {
    assert_eq!(compute_bounds(MetricFamily::Co2, &[]), None);
    assert_eq!(compute_bounds(MetricFamily::Co2, &[None, Some(f64::NAN)]), None);
}

#[test]
fn bounds_always_ordered_and_inside_envelope() {
    let samples: [&[f64]; 6] = [
        &[0.0],
        &[-50.0],
        &[1e6],
        &[299.0, 301.0],
        &[59.9, 60.0],
        &[-3.0, 42.0],
    ];
    for metric in MetricFamily::ALL {
        let env = metric.envelope();
        for values in samples {
            let b = bounds(metric, values);
            assert!(b.min < b.max, "{metric} {values:?} -> {b:?}");
            assert!(b.min >= env.min && b.max <= env.max, "{metric} {values:?} -> {b:?}");
        }
    }
}

#[test]
fn fixed_mode_uses_table_regardless_of_data() {
    let mode = RangeMode::Fixed(FixedRanges::default());
    assert_eq!(
        mode.bounds(MetricFamily::Co2, &[Some(5000.0)]),
        Some(AxisBounds::new(400.0, 1600.0))
    );
    assert_eq!(
        mode.bounds(MetricFamily::Humidity, &[]),
        Some(AxisBounds::new(10.0, 90.0))
    );
    assert_eq!(
        mode.bounds(MetricFamily::Voc, &[]),
        Some(AxisBounds::new(0.0, 500.0))
    );
}

#[test]
fn fixed_table_can_be_overridden_per_metric() {
    let table = FixedRanges::default().with(MetricFamily::Temperature, AxisBounds::new(15.0, 30.0));
    assert_eq!(table.get(MetricFamily::Temperature), AxisBounds::new(15.0, 30.0));
    assert_eq!(table.get(MetricFamily::Co2), AxisBounds::new(400.0, 1600.0));
}

#[test]
fn adaptive_mode_delegates_to_compute_bounds() {
    let values = [Some(420.0), Some(480.0)];
    assert_eq!(
        RangeMode::Adaptive.bounds(MetricFamily::Co2, &values),
        compute_bounds(MetricFamily::Co2, &values)
    );
    assert_eq!(RangeMode::Adaptive.bounds(MetricFamily::Co2, &[]), None);
}
