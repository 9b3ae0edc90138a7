use std::io::Read;

use csv::StringRecord;

use crate::error::ApiError;
use crate::models::{BookingFeatures, FEATURE_COUNT};

/// Raw CSV vocabulary: the model's columns, except the market segment
/// arrives as text and is one-hot encoded here.
pub const RAW_COLUMNS: [&str; FEATURE_COUNT] = [
    "lead_time",
    "no_of_special_requests",
    "avg_price_per_room",
    "market_segment_type",
    "arrival_month",
    "arrival_date",
    "arrival_year",
    "no_of_weekend_nights",
    "no_of_week_nights",
    "no_of_adults",
];

/// The only segment value that maps to 1. The comparison is against the
/// exact literal; "online" or "ONLINE" count as other segments.
const ONLINE_SEGMENT: &str = "Online";

/// Reads a CSV with the `RAW_COLUMNS` vocabulary into feature records,
/// preserving row order. Extra columns are ignored; a missing required
/// column or a malformed value fails the whole batch, since callers
/// re-associate results with source rows positionally.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<BookingFeatures>, ApiError> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput(format!("unreadable CSV header: {e}")))?;

    let mut indices = [0usize; FEATURE_COUNT];
    for (slot, column) in RAW_COLUMNS.iter().enumerate() {
        indices[slot] = headers
            .iter()
            .position(|header| header == *column)
            .ok_or_else(|| ApiError::SchemaMismatch((*column).to_string()))?;
    }

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| ApiError::InvalidInput(format!("row {}: {e}", row + 1)))?;
        rows.push(parse_row(&record, &indices, row)?);
    }

    Ok(rows)
}

fn parse_row(
    record: &StringRecord,
    indices: &[usize; FEATURE_COUNT],
    row: usize,
) -> Result<BookingFeatures, ApiError> {
    let field = |slot: usize| -> Result<&str, ApiError> {
        record.get(indices[slot]).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "row {}: missing value for column '{}'",
                row + 1,
                RAW_COLUMNS[slot]
            ))
        })
    };

    Ok(BookingFeatures {
        lead_time: parse_field(field(0)?, 0, row, "an integer")?,
        no_of_special_requests: parse_field(field(1)?, 1, row, "an integer")?,
        avg_price_per_room: parse_field(field(2)?, 2, row, "a number")?,
        market_segment_type_online: (field(3)? == ONLINE_SEGMENT) as u8,
        arrival_month: parse_field(field(4)?, 4, row, "an integer")?,
        arrival_date: parse_field(field(5)?, 5, row, "an integer")?,
        arrival_year: parse_field(field(6)?, 6, row, "an integer")?,
        no_of_weekend_nights: parse_field(field(7)?, 7, row, "an integer")?,
        no_of_week_nights: parse_field(field(8)?, 8, row, "an integer")?,
        no_of_adults: parse_field(field(9)?, 9, row, "an integer")?,
    })
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    slot: usize,
    row: usize,
    expected: &str,
) -> Result<T, ApiError> {
    raw.parse().map_err(|_| {
        ApiError::InvalidInput(format!(
            "row {}, column '{}': expected {expected}, got '{raw}'",
            row + 1,
            RAW_COLUMNS[slot]
        ))
    })
}
