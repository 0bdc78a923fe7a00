//! Collapses a price series into daily, weekly or monthly bars and annotates
//! each bar with its change versus the preceding calendar period.

use crate::data::PricePoint;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Aggregation granularity.
///
/// Parsing is strict: anything outside the three recognized names is an
/// error, never a fallback to `Daily`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized interval '{0}' (expected Daily, Weekly or Monthly)")]
pub struct UnrecognizedInterval(pub String);

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Daily, Interval::Weekly, Interval::Monthly];

    pub fn label(self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
        }
    }

    /// Cycle to the next granularity (UI shortcut).
    pub fn next(self) -> Self {
        match self {
            Interval::Daily => Interval::Weekly,
            Interval::Weekly => Interval::Monthly,
            Interval::Monthly => Interval::Daily,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Interval {
    type Err = UnrecognizedInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Daily" | "daily" => Ok(Interval::Daily),
            "Weekly" | "weekly" => Ok(Interval::Weekly),
            "Monthly" | "monthly" => Ok(Interval::Monthly),
            other => Err(UnrecognizedInterval(other.to_string())),
        }
    }
}

/// One aggregated bucket, plus its change versus the preceding period.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volumefrom: Decimal,
    pub volumeto: Decimal,
    /// Percentage change of `high` versus the previous calendar period.
    /// `None` when there is no previous period or its high was zero.
    pub high_change: Option<Decimal>,
    pub low_change: Option<Decimal>,
}

/// Collapse `points` into bars at the requested granularity, newest first.
///
/// `Daily` is the identity transform: one bar per point, values untouched.
/// Weekly buckets run Monday through Sunday and are labeled by the closing
/// Sunday; monthly buckets are labeled by the last day of the month. The
/// input is re-sorted chronologically before bucketing, so open/close come
/// from the first/last points in time no matter what order the caller
/// supplies.
pub fn resample(points: &[PricePoint], interval: Interval) -> Vec<Bar> {
    let mut bars = match interval {
        Interval::Daily => {
            let mut bars: Vec<Bar> = points.iter().map(bar_from_point).collect();
            bars.sort_by(|a, b| b.time.cmp(&a.time));
            bars
        }
        Interval::Weekly | Interval::Monthly => bucketed(points, interval),
    };
    annotate_changes(&mut bars);
    bars
}

fn bar_from_point(point: &PricePoint) -> Bar {
    Bar {
        time: point.time,
        open: point.open,
        high: point.high,
        low: point.low,
        close: point.close,
        volumefrom: point.volumefrom,
        volumeto: point.volumeto,
        high_change: None,
        low_change: None,
    }
}

fn bucketed(points: &[PricePoint], interval: Interval) -> Vec<Bar> {
    let mut ordered: Vec<&PricePoint> = points.iter().collect();
    // Chronological order decides which point opens and closes a bucket.
    ordered.sort_by_key(|p| p.time);

    let mut buckets: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    for point in ordered {
        let label = bucket_label(point.time.date_naive(), interval);
        match buckets.get_mut(&label) {
            None => {
                let mut bar = bar_from_point(point);
                bar.time = label.and_time(NaiveTime::MIN).and_utc();
                buckets.insert(label, bar);
            }
            Some(bar) => {
                bar.high = bar.high.max(point.high);
                bar.low = bar.low.min(point.low);
                bar.close = point.close;
                bar.volumefrom += point.volumefrom;
                bar.volumeto += point.volumeto;
            }
        }
    }

    // BTreeMap iterates oldest to newest; the caller wants newest first.
    buckets.into_values().rev().collect()
}

fn bucket_label(date: NaiveDate, interval: Interval) -> NaiveDate {
    match interval {
        Interval::Daily => date,
        // Monday-through-Sunday weeks, labeled by the closing Sunday.
        Interval::Weekly => {
            let to_sunday = 6 - i64::from(date.weekday().num_days_from_monday());
            date + Duration::days(to_sunday)
        }
        // Last calendar day of the month.
        Interval::Monthly => {
            let first = date.with_day(1).unwrap();
            first + Months::new(1) - Duration::days(1)
        }
    }
}

/// Percentage change of each bar's high/low against the next-older bar.
/// The oldest bar has no reference; a zero reference is undefined, not 0.
fn annotate_changes(bars: &mut [Bar]) {
    for i in 0..bars.len() {
        let (high_change, low_change) = match bars.get(i + 1) {
            Some(prev) => (
                pct_change(bars[i].high, prev.high),
                pct_change(bars[i].low, prev.low),
            ),
            None => (None, None),
        };
        bars[i].high_change = high_change;
        bars[i].low_change = low_change;
    }
}

fn pct_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    (current - previous)
        .checked_div(previous)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn utc(text: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn point(time: &str, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> PricePoint {
        PricePoint {
            time: utc(time),
            open,
            high,
            low,
            close,
            volumefrom: dec!(1),
            volumeto: dec!(10),
        }
    }

    #[test]
    fn daily_is_the_identity_transform() {
        let points = vec![
            point("2021-01-03 00:00:00", dec!(3), dec!(3.5), dec!(2.5), dec!(3.2)),
            point("2021-01-02 00:00:00", dec!(2), dec!(2.5), dec!(1.5), dec!(2.2)),
            point("2021-01-01 00:00:00", dec!(1), dec!(1.5), dec!(0.5), dec!(1.2)),
        ];

        let bars = resample(&points, Interval::Daily);

        assert_eq!(bars.len(), points.len());
        for (bar, p) in bars.iter().zip(&points) {
            assert_eq!(bar.time, p.time);
            assert_eq!(bar.open, p.open);
            assert_eq!(bar.high, p.high);
            assert_eq!(bar.low, p.low);
            assert_eq!(bar.close, p.close);
            assert_eq!(bar.volumefrom, p.volumefrom);
            assert_eq!(bar.volumeto, p.volumeto);
        }
    }

    #[test]
    fn open_and_close_are_chronological_regardless_of_input_order() {
        // Three points inside one Monday-to-Sunday week (2021-01-04..10).
        let t1 = point("2021-01-04 00:00:00", dec!(10), dec!(12), dec!(9), dec!(11));
        let t2 = point("2021-01-06 00:00:00", dec!(11), dec!(13), dec!(10), dec!(12));
        let t3 = point("2021-01-08 00:00:00", dec!(12), dec!(14), dec!(11), dec!(13));

        let descending = vec![t3.clone(), t2.clone(), t1.clone()];
        let scrambled = vec![t2.clone(), t3.clone(), t1.clone()];

        for input in [descending, scrambled] {
            let bars = resample(&input, Interval::Weekly);
            assert_eq!(bars.len(), 1);
            assert_eq!(bars[0].open, t1.open);
            assert_eq!(bars[0].close, t3.close);
        }
    }

    #[test]
    fn buckets_aggregate_max_min_and_sums() {
        let points = vec![
            point("2021-01-04 00:00:00", dec!(10), dec!(100), dec!(8), dec!(11)),
            point("2021-01-05 00:00:00", dec!(11), dec!(105), dec!(9), dec!(12)),
            point("2021-01-06 00:00:00", dec!(12), dec!(98), dec!(7), dec!(13)),
        ];

        let bars = resample(&points, Interval::Weekly);

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, dec!(105));
        assert_eq!(bars[0].low, dec!(7));
        assert_eq!(bars[0].volumefrom, dec!(3));
        assert_eq!(bars[0].volumeto, dec!(30));
    }

    #[test]
    fn weekly_bar_count_equals_distinct_weeks() {
        // Sunday 2021-01-03 closes one week; Monday 2021-01-04 opens the next.
        let points = vec![
            point("2021-01-03 00:00:00", dec!(1), dec!(2), dec!(1), dec!(2)),
            point("2021-01-04 00:00:00", dec!(2), dec!(3), dec!(2), dec!(3)),
            point("2021-01-05 00:00:00", dec!(3), dec!(4), dec!(3), dec!(4)),
        ];

        let bars = resample(&points, Interval::Weekly);

        assert_eq!(bars.len(), 2);
        assert!(bars.len() <= points.len());
    }

    #[test]
    fn weekly_bars_are_labeled_by_the_closing_sunday() {
        let points = vec![point(
            "2021-01-06 00:00:00",
            dec!(1),
            dec!(2),
            dec!(1),
            dec!(2),
        )];

        let bars = resample(&points, Interval::Weekly);

        assert_eq!(bars[0].time, utc("2021-01-10 00:00:00"));
    }

    #[test]
    fn monthly_bars_are_labeled_by_the_month_end() {
        let points = vec![
            point("2021-02-10 00:00:00", dec!(1), dec!(2), dec!(1), dec!(2)),
            point("2020-02-10 00:00:00", dec!(1), dec!(2), dec!(1), dec!(2)),
        ];

        let bars = resample(&points, Interval::Monthly);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].time, utc("2021-02-28 00:00:00"));
        assert_eq!(bars[1].time, utc("2020-02-29 00:00:00"));
    }

    #[test]
    fn bars_come_out_newest_first() {
        let points = vec![
            point("2021-01-04 00:00:00", dec!(1), dec!(2), dec!(1), dec!(2)),
            point("2021-02-04 00:00:00", dec!(2), dec!(3), dec!(2), dec!(3)),
            point("2021-03-04 00:00:00", dec!(3), dec!(4), dec!(3), dec!(4)),
        ];

        let bars = resample(&points, Interval::Monthly);

        assert_eq!(bars.len(), 3);
        assert!(bars[0].time > bars[1].time);
        assert!(bars[1].time > bars[2].time);
    }

    #[test]
    fn change_is_measured_against_the_next_older_bar() {
        let points = vec![
            point("2021-01-02 00:00:00", dec!(1), dec!(110), dec!(55), dec!(1)),
            point("2021-01-01 00:00:00", dec!(1), dec!(100), dec!(50), dec!(1)),
        ];

        let bars = resample(&points, Interval::Daily);

        assert_eq!(bars[0].high_change, Some(dec!(10)));
        assert_eq!(bars[0].low_change, Some(dec!(10)));
        assert_eq!(bars[1].high_change, None);
        assert_eq!(bars[1].low_change, None);
    }

    #[test]
    fn zero_reference_yields_an_undefined_change() {
        let points = vec![
            point("2021-01-02 00:00:00", dec!(1), dec!(50), dec!(5), dec!(1)),
            point("2021-01-01 00:00:00", dec!(1), dec!(0), dec!(0), dec!(1)),
        ];

        let bars = resample(&points, Interval::Daily);

        assert_eq!(bars[0].high_change, None);
        assert_eq!(bars[0].low_change, None);
    }

    #[test]
    fn empty_series_resamples_to_no_bars() {
        assert!(resample(&[], Interval::Weekly).is_empty());
    }

    #[test]
    fn interval_parsing_is_strict() {
        assert_eq!("Daily".parse::<Interval>().unwrap(), Interval::Daily);
        assert_eq!("weekly".parse::<Interval>().unwrap(), Interval::Weekly);
        assert_eq!("Monthly".parse::<Interval>().unwrap(), Interval::Monthly);

        let err = "Hourly".parse::<Interval>().unwrap_err();
        assert_eq!(err, UnrecognizedInterval("Hourly".to_string()));
    }
}
