use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::DomainError;

/// A single timestamped meter value.
///
/// `reading` is the cumulative register value shown on the meter, not the
/// consumption since the previous reading. A `null` value (how a NaN was
/// written by earlier versions) reads back as NaN, and NaN is written as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "crate::domain::timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(deserialize_with = "f64_or_nan")]
    pub reading: f64,
}

pub(crate) fn f64_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Reading {
    pub fn new(timestamp: OffsetDateTime, reading: f64) -> Self {
        Self { timestamp, reading }
    }
}

/// The metered resources tracked per household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Electricity,
    ColdWater,
    HotWater,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Electricity,
        ResourceKind::ColdWater,
        ResourceKind::HotWater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::ColdWater => "cold_water",
            Self::HotWater => "hot_water",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "electricity" => Ok(Self::Electricity),
            "cold_water" => Ok(Self::ColdWater),
            "hot_water" => Ok(Self::HotWater),
            other => Err(DomainError::UnknownResource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn resource_kind_parses_document_keys() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
        }
    }

    #[test]
    fn resource_kind_rejects_unknown_type() {
        let res = "gas".parse::<ResourceKind>();
        assert_eq!(res, Err(DomainError::UnknownResource("gas".to_string())));
    }

    #[test]
    fn reading_serializes_timestamp_as_rfc3339() {
        let r = Reading::new(datetime!(2024-05-01 08:30:00 UTC), 1234.5);
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T08:30:00Z");
        assert_eq!(json["reading"], 1234.5);
    }

    #[test]
    fn datetime_local_timestamp_reads_as_utc() {
        let r: Reading = serde_json::from_str(r#"{"timestamp":"2024-05-01T10:00","reading":100}"#).unwrap();
        assert_eq!(r.timestamp, datetime!(2024-05-01 10:00 UTC));
        assert_eq!(r.reading, 100.0);

        // written back in the canonical form
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn null_reading_is_nan() {
        let r: Reading = serde_json::from_str(r#"{"timestamp":"2024-05-01T10:00:00Z","reading":null}"#).unwrap();
        assert!(r.reading.is_nan());
    }
}
