use billflow_core::{
    billing::{CycleSummary, DailyUsage},
    domain::{Dataset, Prices, Reading, ResourceKind},
};
use serde::{Deserialize, Serialize};

use crate::validation::{self, InputError};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

/// Body of `GET /login`: how to sign in.
#[derive(Debug, Serialize)]
pub struct LoginPrompt {
    pub method: &'static str,
    pub action: &'static str,
    pub fields: [&'static str; 1],
}

impl Default for LoginPrompt {
    fn default() -> Self {
        Self {
            method: "POST",
            action: "/login",
            fields: ["password"],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NewReadingForm {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub reading: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    pub electricity_per_unit: Option<String>,
    pub cold_water_per_unit: Option<String>,
    pub hot_water_per_unit: Option<String>,
    pub settlement_day: Option<String>,
}

impl SettingsForm {
    pub fn parse(&self) -> Result<(Prices, i64), InputError> {
        let price = |field: &'static str, raw: &Option<String>| {
            validation::required(field, raw.as_deref())
                .and_then(|v| validation::parse_number(field, v))
        };

        let prices = Prices {
            electricity_per_unit: price("electricity_per_unit", &self.electricity_per_unit)?,
            cold_water_per_unit: price("cold_water_per_unit", &self.cold_water_per_unit)?,
            hot_water_per_unit: price("hot_water_per_unit", &self.hot_water_per_unit)?,
        };
        let day = validation::required("settlement_day", self.settlement_day.as_deref())
            .and_then(|v| validation::parse_integer("settlement_day", v))?;

        Ok((prices, day))
    }
}

#[derive(Debug, Serialize)]
pub struct LatestReadings {
    pub electricity: Option<Reading>,
    pub cold_water: Option<Reading>,
    pub hot_water: Option<Reading>,
}

impl From<&Dataset> for LatestReadings {
    fn from(ds: &Dataset) -> Self {
        Self {
            electricity: ds.latest(ResourceKind::Electricity).copied(),
            cold_water: ds.latest(ResourceKind::ColdWater).copied(),
            hot_water: ds.latest(ResourceKind::HotWater).copied(),
        }
    }
}

/// Chart series with `MM/DD` labels.
#[derive(Debug, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl From<DailyUsage> for ChartData {
    fn from(daily: DailyUsage) -> Self {
        Self {
            labels: daily
                .dates
                .iter()
                .map(|d| format!("{:02}/{:02}", u8::from(d.month()), d.day()))
                .collect(),
            values: daily.usage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub latest: LatestReadings,
    /// Formatted to two decimals.
    pub total_cost: String,
    pub cycle: CycleSummary,
    pub chart: ChartData,
}

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub prices: Prices,
    pub settlement_day: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SettingsView {
    pub fn of(ds: &Dataset) -> Self {
        Self {
            prices: ds.prices,
            settlement_day: ds.settlement_day,
            message: None,
        }
    }
}
