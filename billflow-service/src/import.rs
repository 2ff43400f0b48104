use std::io::Read;

use billflow_core::domain::{Reading, ResourceKind};
use csv::StringRecord;
use time::UtcOffset;

use crate::validation::{self, InputError};

/// Rows parsed from a readings CSV.
///
/// Expected header columns (by name, any order):
/// - type (`electricity`, `cold_water` or `hot_water`)
/// - timestamp (RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]` in the configured offset)
/// - reading
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub rows: Vec<(ResourceKind, Reading)>,
    /// 1-based data line numbers (header excluded) with the reason they were skipped.
    pub rejected: Vec<(usize, String)>,
}

fn column<'r>(record: &'r StringRecord, headers: &StringRecord, name: &str) -> Option<&'r str> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|idx| record.get(idx))
}

fn record_to_reading(
    record: &StringRecord,
    headers: &StringRecord,
    local_offset: UtcOffset,
) -> Result<(ResourceKind, Reading), InputError> {
    validation::parse_reading(
        column(record, headers, "type"),
        column(record, headers, "reading"),
        column(record, headers, "timestamp"),
        local_offset,
    )
}

/// Parse every row; bad rows are collected rather than aborting the import.
pub fn parse_readings_csv<R: Read>(input: R, local_offset: UtcOffset) -> Result<ParsedCsv, csv::Error> {
    let mut rdr = csv::Reader::from_reader(input);
    let headers = rdr.headers()?.clone();

    let mut parsed = ParsedCsv::default();
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                parsed.rejected.push((line, e.to_string()));
                continue;
            }
        };

        match record_to_reading(&record, &headers, local_offset) {
            Ok(row) => parsed.rows.push(row),
            Err(e) => {
                metrics::counter!("import_rows_rejected_total").increment(1);
                parsed.rejected.push((line, e.to_string()));
            }
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn parses_rows_in_any_column_order() {
        let csv = "\
reading,type,timestamp
100.5,electricity,2024-05-01T08:00:00Z
12,cold_water,2024-05-01T09:30
";
        let parsed = parse_readings_csv(csv.as_bytes(), offset!(+8)).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(
            parsed.rows,
            vec![
                (ResourceKind::Electricity, Reading::new(datetime!(2024-05-01 08:00 UTC), 100.5)),
                (ResourceKind::ColdWater, Reading::new(datetime!(2024-05-01 09:30 +08:00), 12.0)),
            ]
        );
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let csv = "\
type,timestamp,reading
gas,2024-05-01T08:00:00Z,1
hot_water,2024-05-02T08:00:00Z,NaN
hot_water,2024-05-03T08:00:00Z,7
hot_water,,8
";
        let parsed = parse_readings_csv(csv.as_bytes(), UtcOffset::UTC).unwrap();
        assert_eq!(parsed.rows.len(), 1);

        let lines: Vec<usize> = parsed.rejected.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        assert!(parsed.rejected[0].1.contains("gas"));
        assert!(parsed.rejected[2].1.contains("timestamp"));
    }
}
