use billflow_core::{
    domain::{self, Reading, ResourceKind},
    DomainError,
};
use time::{OffsetDateTime, UtcOffset};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("missing required field '{0}'")]
    Missing(&'static str),
    #[error("'{value}' is not a valid number for {field}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("'{0}' is not a valid timestamp")]
    InvalidTimestamp(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Treat absent and blank form values alike.
pub fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, InputError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(InputError::Missing(field))
}

/// Parse a finite decimal. `NaN` and infinities are rejected because JSON
/// cannot store them.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub fn parse_integer(field: &'static str, raw: &str) -> Result<i64, InputError> {
    raw.trim().parse::<i64>().map_err(|_| InputError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Accepts RFC 3339, or an HTML `datetime-local` value
/// (`YYYY-MM-DDTHH:MM[:SS]`) which is read in `local_offset`.
pub fn parse_timestamp(raw: &str, local_offset: UtcOffset) -> Result<OffsetDateTime, InputError> {
    domain::timestamp::parse_timestamp(raw, local_offset)
        .ok_or_else(|| InputError::InvalidTimestamp(raw.trim().to_string()))
}

/// Parse the three raw fields of a new reading.
///
/// Any finite meter value is accepted, including negative ones after a meter
/// replacement; cycle costs ignore the resulting negative delta.
pub fn parse_reading(
    kind: Option<&str>,
    reading: Option<&str>,
    timestamp: Option<&str>,
    local_offset: UtcOffset,
) -> Result<(ResourceKind, Reading), InputError> {
    let kind = required("type", kind)?;
    let value = required("reading", reading)?;
    let timestamp = required("timestamp", timestamp)?;

    let kind: ResourceKind = kind.parse()?;
    let reading = Reading::new(
        parse_timestamp(timestamp, local_offset)?,
        parse_number("reading", value)?,
    );

    Ok((kind, reading))
}
