//! Reading timestamps: written as RFC 3339, read leniently.
//!
//! Older data files hold the raw value of an HTML `datetime-local` input
//! (`YYYY-MM-DDTHH:MM[:SS]`, no offset). Those are read as UTC.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

/// RFC 3339, or a `datetime-local` value interpreted in `local_offset`.
pub fn parse_timestamp(raw: &str, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }

    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let minutes_only = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    [with_seconds, minutes_only]
        .into_iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .map(|local| local.assume_offset(local_offset))
}

pub fn serialize<S: Serializer>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    time::serde::rfc3339::serialize(ts, serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw, UtcOffset::UTC)
        .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a valid timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn accepts_rfc3339_and_datetime_local() {
        assert_eq!(
            parse_timestamp("2024-05-01T10:30:00-05:00", offset!(+8)),
            Some(datetime!(2024-05-01 15:30 UTC))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T10:30", offset!(+8)),
            Some(datetime!(2024-05-01 10:30 +08:00))
        );
        assert_eq!(
            parse_timestamp(" 2024-05-01T10:30:15 ", UtcOffset::UTC),
            Some(datetime!(2024-05-01 10:30:15 UTC))
        );
        assert_eq!(parse_timestamp("yesterday", UtcOffset::UTC), None);
    }
}
