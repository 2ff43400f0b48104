use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use crate::domain::Reading;

/// Per-day consumption as two parallel sequences, ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyUsage {
    pub dates: Vec<Date>,
    pub usage: Vec<f64>,
}

impl DailyUsage {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Aggregate consecutive meter deltas into calendar-day buckets.
///
/// Each delta is attributed to the UTC date of the later reading. Negative
/// deltas are dropped. Sums are rounded to 2 decimals after bucketing.
pub fn daily_usage(series: &[Reading]) -> DailyUsage {
    if series.len() < 2 {
        return DailyUsage::default();
    }

    let mut buckets: BTreeMap<Date, f64> = BTreeMap::new();
    for pair in series.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let usage = current.reading - previous.reading;
        if usage >= 0.0 {
            let day = current.timestamp.to_offset(UtcOffset::UTC).date();
            *buckets.entry(day).or_insert(0.0) += usage;
        }
    }

    let (dates, usage) = buckets
        .into_iter()
        .map(|(day, total)| (day, round_cents(total)))
        .unzip();

    DailyUsage { dates, usage }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn same_day_readings_share_a_bucket() {
        let series = vec![
            Reading::new(datetime!(2024-05-01 08:00 UTC), 10.0),
            Reading::new(datetime!(2024-05-02 08:00 UTC), 15.0),
            Reading::new(datetime!(2024-05-02 20:00 UTC), 20.0),
        ];

        let daily = daily_usage(&series);
        assert_eq!(daily.dates, vec![date!(2024-05-02)]);
        assert_eq!(daily.usage, vec![10.0]);
    }

    #[test]
    fn delta_is_bucketed_by_later_reading() {
        let series = vec![
            Reading::new(datetime!(2024-05-01 23:00 UTC), 100.0),
            Reading::new(datetime!(2024-05-03 01:00 UTC), 104.25),
            Reading::new(datetime!(2024-05-04 01:00 UTC), 110.0),
        ];

        let daily = daily_usage(&series);
        assert_eq!(daily.dates, vec![date!(2024-05-03), date!(2024-05-04)]);
        assert_eq!(daily.usage, vec![4.25, 5.75]);
    }

    #[test]
    fn negative_deltas_are_skipped() {
        let series = vec![
            Reading::new(datetime!(2024-05-01 00:00 UTC), 500.0),
            Reading::new(datetime!(2024-05-02 00:00 UTC), 2.0),
            Reading::new(datetime!(2024-05-03 00:00 UTC), 5.0),
        ];

        let daily = daily_usage(&series);
        assert_eq!(daily.dates, vec![date!(2024-05-03)]);
        assert_eq!(daily.usage, vec![3.0]);
    }

    #[test]
    fn local_timestamps_bucket_on_utc_date() {
        let series = vec![
            Reading::new(datetime!(2024-05-01 12:00 +08:00), 1.0),
            Reading::new(datetime!(2024-05-02 07:00 +08:00), 2.0),
        ];

        assert_eq!(daily_usage(&series).dates, vec![date!(2024-05-01)]);
    }

    #[test]
    fn sums_are_rounded_to_cents() {
        let series = vec![
            Reading::new(datetime!(2024-05-01 00:00 UTC), 0.1),
            Reading::new(datetime!(2024-05-02 00:00 UTC), 0.2),
            Reading::new(datetime!(2024-05-02 01:00 UTC), 0.3333),
        ];

        assert_eq!(daily_usage(&series).usage, vec![0.23]);
    }

    #[test]
    fn fewer_than_two_readings_yield_nothing() {
        assert!(daily_usage(&[]).is_empty());
        let one = [Reading::new(datetime!(2024-05-01 00:00 UTC), 1.0)];
        let daily = daily_usage(&one);
        assert!(daily.dates.is_empty() && daily.usage.is_empty());
    }
}
