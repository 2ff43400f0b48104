//! Billing-cycle cost and chart aggregation over a [`Dataset`](crate::domain::Dataset).
//!
//! Everything here is pure: the caller supplies "now" and the dataset.

pub mod cycle;
pub mod daily;

pub use cycle::{
    cycle_breakdown, cycle_start, settlement_boundary, total_cost, usage_since, CycleSummary,
    ResourceCost,
};
pub use daily::{daily_usage, DailyUsage};
