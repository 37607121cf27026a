//! Conversion of chart labels into time-stamped points.
//!
//! Chart endpoints send wall-clock labels rather than instants: `"HH:mm"` for windows
//! of up to a day and `"MM-DD HH:mm"` beyond that. Both are resolved against a
//! reference instant in the server's timezone. A label that cannot be resolved gets a
//! synthetic instant spread evenly across the requested window, so one bad label
//! never drops its sample or the batch.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::core::models::{NamedSeries, RawDataset, TimeSeriesPoint};

/// How the labels of a chart window are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// `"HH:mm"` on the reference day, or the day before if that would be in the future.
    TimeOfDay,
    /// `"MM-DD HH:mm"` in the reference year.
    MonthDayTime,
}

impl LabelFormat {
    /// The format the server uses for a window of `hours`.
    #[must_use]
    pub const fn for_window(hours: u32) -> Self {
        if hours <= 24 {
            Self::TimeOfDay
        } else {
            Self::MonthDayTime
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Parsed {
        local: NaiveDateTime,
        at: DateTime<Utc>,
    },
    Synthetic(DateTime<Utc>),
}

impl Slot {
    const fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Parsed { at, .. } | Self::Synthetic(at) => *at,
        }
    }
}

/// Pairs each dataset with the resolved label instants.
///
/// A dataset shorter than the labels yields only the overlapping prefix; values are
/// carried through unchanged, including `None` for missing readings.
pub fn normalize<L, Tz>(
    labels: &[L],
    datasets: &[RawDataset],
    window_hours: u32,
    reference_now: &DateTime<Tz>,
) -> Vec<NamedSeries>
where
    L: AsRef<str>,
    Tz: TimeZone,
{
    let stamps = label_timestamps(labels, window_hours, reference_now);
    datasets
        .iter()
        .map(|ds| NamedSeries {
            label: ds.label.clone(),
            points: stamps
                .iter()
                .zip(&ds.data)
                .map(|(ts, v)| TimeSeriesPoint {
                    timestamp: *ts,
                    value: *v,
                })
                .collect(),
        })
        .collect()
}

/// Resolves every label to an instant, in non-decreasing order.
pub fn label_timestamps<L, Tz>(
    labels: &[L],
    window_hours: u32,
    reference_now: &DateTime<Tz>,
) -> Vec<DateTime<Utc>>
where
    L: AsRef<str>,
    Tz: TimeZone,
{
    let format = LabelFormat::for_window(window_hours);
    let total = labels.len();
    let mut slots: Vec<Slot> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            resolve_label(label.as_ref(), format, reference_now).map_or_else(
                || {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(label = label.as_ref(), index = i, "unparseable chart label, using synthetic time");
                    Slot::Synthetic(synthetic_instant(i, total, window_hours, reference_now))
                },
                |(local, at)| Slot::Parsed { local, at },
            )
        })
        .collect();

    order_parsed(&mut slots, format, &reference_now.timezone());
    order_synthetic(&mut slots);
    slots.iter().map(Slot::at).collect()
}

/// Parses one label and places it on the time axis relative to `reference_now`.
fn resolve_label<Tz: TimeZone>(
    label: &str,
    format: LabelFormat,
    reference_now: &DateTime<Tz>,
) -> Option<(NaiveDateTime, DateTime<Utc>)> {
    let tz = reference_now.timezone();
    let now = reference_now.with_timezone(&Utc);
    match format {
        LabelFormat::TimeOfDay => {
            let time = parse_hh_mm(label)?;
            let local = reference_now.date_naive().and_time(time);
            let at = to_utc(&tz, &local)?;
            if at > now {
                let earlier = local.checked_sub_days(Days::new(1))?;
                Some((earlier, to_utc(&tz, &earlier)?))
            } else {
                Some((local, at))
            }
        }
        LabelFormat::MonthDayTime => {
            let (date, time) = label.trim().split_once(' ')?;
            let (month, day) = date.split_once('-')?;
            let date = NaiveDate::from_ymd_opt(
                reference_now.year(),
                month.trim().parse().ok()?,
                day.trim().parse().ok()?,
            )?;
            let local = date.and_time(parse_hh_mm(time)?);
            Some((local, to_utc(&tz, &local)?))
        }
    }
}

fn parse_hh_mm(s: &str) -> Option<NaiveTime> {
    let (h, m) = s.trim().split_once(':')?;
    NaiveTime::from_hms_opt(h.trim().parse().ok()?, m.trim().parse().ok()?, 0)
}

/// Local wall time to UTC; the earlier instant wins across a DST fold, and a time
/// that falls in a DST gap does not exist.
fn to_utc<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `reference_now` minus `(total - index - 1)` evenly sized steps of the window,
/// rounded to the millisecond. An offset past the representable range saturates at
/// the earliest instant.
fn synthetic_instant<Tz: TimeZone>(
    index: usize,
    total: usize,
    window_hours: u32,
    reference_now: &DateTime<Tz>,
) -> DateTime<Utc> {
    let window_ms = u128::from(window_hours) * 3_600_000;
    let steps_back = (total - index - 1) as u128;
    let total = total as u128;
    let offset_ms = (2 * steps_back * window_ms + total) / (2 * total);

    i64::try_from(offset_ms)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .and_then(|offset| reference_now.with_timezone(&Utc).checked_sub_signed(offset))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Label order is time order. Walking back from the newest parsed label, any label
/// later than its successor is moved back one period (a day or a year, depending on
/// the format); if that still does not fit it is pinned to its successor.
fn order_parsed<Tz: TimeZone>(slots: &mut [Slot], format: LabelFormat, tz: &Tz) {
    let mut next: Option<DateTime<Utc>> = None;
    for slot in slots.iter_mut().rev() {
        let Slot::Parsed { local, at } = slot else {
            continue;
        };
        if let Some(bound) = next
            && *at > bound
        {
            let shifted = match format {
                LabelFormat::TimeOfDay => local.checked_sub_days(Days::new(1)),
                LabelFormat::MonthDayTime => local.with_year(local.year() - 1),
            };
            match shifted.and_then(|l| to_utc(tz, &l).map(|a| (l, a))) {
                Some((l, a)) if a <= bound => {
                    *local = l;
                    *at = a;
                }
                _ => *at = bound,
            }
        }
        next = Some(*at);
    }
}

/// Synthetic instants are squeezed between their neighbours.
fn order_synthetic(slots: &mut [Slot]) {
    let mut next_parsed: Vec<Option<DateTime<Utc>>> = vec![None; slots.len()];
    let mut upcoming = None;
    for (i, slot) in slots.iter().enumerate().rev() {
        next_parsed[i] = upcoming;
        if let Slot::Parsed { at, .. } = slot {
            upcoming = Some(*at);
        }
    }

    let mut prev: Option<DateTime<Utc>> = None;
    for (slot, hi) in slots.iter_mut().zip(next_parsed) {
        if let Slot::Synthetic(at) = slot {
            if let Some(hi) = hi {
                *at = (*at).min(hi);
            }
            if let Some(lo) = prev {
                *at = (*at).max(lo);
            }
        }
        prev = Some(slot.at());
    }
}
