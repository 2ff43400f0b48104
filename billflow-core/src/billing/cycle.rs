use serde::Serialize;
use time::{util::days_in_year_month, Date, OffsetDateTime};

use crate::domain::{Dataset, Reading, ResourceKind};

/// Cost of one resource over the current billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceCost {
    pub kind: ResourceKind,
    pub usage: f64,
    pub unit_price: f64,
    pub cost: f64,
}

/// Per-resource breakdown of the current billing cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    #[serde(with = "time::serde::rfc3339")]
    pub cycle_start: OffsetDateTime,
    pub resources: Vec<ResourceCost>,
    pub total: f64,
}

/// Most recent settlement date on or before `today`.
///
/// Today is compared against the settlement day as configured. Only the
/// previous month's date is clamped to that month's last day, so with day 31
/// the cycle on 2026-04-30 still starts on 2026-03-31.
pub fn settlement_boundary(today: Date, settlement_day: u8) -> Date {
    let day = settlement_day.max(1);
    if today.day() >= day {
        return today.replace_day(day).unwrap_or(today);
    }

    // Last day of the previous month; crosses into December of the prior year
    // from January. Only `Date::MIN` has no predecessor.
    let prev_month = match today.replace_day(1).ok().and_then(Date::previous_day) {
        Some(d) => d,
        None => return today,
    };
    let day = clamp_day(prev_month, day);
    prev_month.replace_day(day).unwrap_or(prev_month)
}

fn clamp_day(in_month: Date, day: u8) -> u8 {
    day.clamp(1, days_in_year_month(in_month.year(), in_month.month()))
}

/// Start of the billing cycle containing `now`: midnight of the settlement
/// date, in `now`'s offset.
pub fn cycle_start(now: OffsetDateTime, settlement_day: u8) -> OffsetDateTime {
    settlement_boundary(now.date(), settlement_day)
        .midnight()
        .assume_offset(now.offset())
}

/// Raw meter delta between the first and last readings taken at or after
/// `since`. Series order is trusted as given.
///
/// Zero when fewer than two readings fall in the window. May be negative
/// after a meter reset.
pub fn usage_since(series: &[Reading], since: OffsetDateTime) -> f64 {
    let mut in_cycle = series.iter().filter(|r| r.timestamp >= since);
    let Some(first) = in_cycle.next() else {
        return 0.0;
    };
    let last = in_cycle.last().unwrap_or(first);
    last.reading - first.reading
}

pub fn cycle_breakdown(dataset: &Dataset, now: OffsetDateTime) -> CycleSummary {
    let start = cycle_start(now, dataset.settlement_day);
    let mut total = 0.0;
    let mut resources = Vec::with_capacity(ResourceKind::ALL.len());

    for kind in ResourceKind::ALL {
        let delta = usage_since(dataset.series(kind), start);
        let unit_price = dataset.prices.unit_price(kind);

        // Negative deltas (meter resets) and empty windows contribute nothing.
        let (usage, cost) = if delta > 0.0 {
            (delta, delta * unit_price)
        } else {
            (0.0, 0.0)
        };
        total += cost;

        resources.push(ResourceCost {
            kind,
            usage,
            unit_price,
            cost,
        });
    }

    CycleSummary {
        cycle_start: start,
        resources,
        total,
    }
}

/// Total cost of all resources since the last settlement day. Not rounded.
pub fn total_cost(dataset: &Dataset, now: OffsetDateTime) -> f64 {
    cycle_breakdown(dataset, now).total
}
