use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{reading::f64_or_nan, Reading, ResourceKind},
    DomainError,
};

/// Unit price per resource, in the household's currency. `null` reads as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prices {
    #[serde(deserialize_with = "f64_or_nan")]
    pub electricity_per_unit: f64,
    #[serde(deserialize_with = "f64_or_nan")]
    pub cold_water_per_unit: f64,
    #[serde(deserialize_with = "f64_or_nan")]
    pub hot_water_per_unit: f64,
}

impl Prices {
    pub fn unit_price(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Electricity => self.electricity_per_unit,
            ResourceKind::ColdWater => self.cold_water_per_unit,
            ResourceKind::HotWater => self.hot_water_per_unit,
        }
    }
}

fn default_settlement_day() -> u8 {
    1
}

fn settlement_day_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or_else(default_settlement_day))
}

/// The whole persisted document: prices, the settlement day and one reading
/// series per resource.
///
/// Series are kept ascending by timestamp. Readings have no identity beyond
/// their position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub prices: Prices,
    #[serde(default = "default_settlement_day", deserialize_with = "settlement_day_or_default")]
    pub settlement_day: u8,
    #[serde(default)]
    pub electricity: Vec<Reading>,
    #[serde(default)]
    pub cold_water: Vec<Reading>,
    #[serde(default)]
    pub hot_water: Vec<Reading>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            prices: Prices::default(),
            settlement_day: default_settlement_day(),
            electricity: Vec::new(),
            cold_water: Vec::new(),
            hot_water: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn series(&self, kind: ResourceKind) -> &[Reading] {
        match kind {
            ResourceKind::Electricity => &self.electricity,
            ResourceKind::ColdWater => &self.cold_water,
            ResourceKind::HotWater => &self.hot_water,
        }
    }

    pub fn series_mut(&mut self, kind: ResourceKind) -> &mut Vec<Reading> {
        match kind {
            ResourceKind::Electricity => &mut self.electricity,
            ResourceKind::ColdWater => &mut self.cold_water,
            ResourceKind::HotWater => &mut self.hot_water,
        }
    }

    pub fn latest(&self, kind: ResourceKind) -> Option<&Reading> {
        self.series(kind).last()
    }

    /// Append a reading and restore timestamp order.
    ///
    /// The sort is stable, so readings sharing a timestamp keep their
    /// submission order.
    pub fn record(&mut self, kind: ResourceKind, reading: Reading) {
        let series = self.series_mut(kind);
        series.push(reading);
        series.sort_by_key(|r| r.timestamp);
    }

    /// Bulk variant of [`Dataset::record`]; every series is re-sorted once.
    pub fn record_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (ResourceKind, Reading)>,
    {
        for (kind, reading) in entries {
            self.series_mut(kind).push(reading);
        }
        for kind in ResourceKind::ALL {
            self.series_mut(kind).sort_by_key(|r| r.timestamp);
        }
    }

    pub fn set_settlement_day(&mut self, day: i64) -> Result<(), DomainError> {
        match u8::try_from(day) {
            Ok(d) if (1..=31).contains(&d) => {
                self.settlement_day = d;
                Ok(())
            }
            _ => Err(DomainError::InvalidSettlementDay(day)),
        }
    }
}
