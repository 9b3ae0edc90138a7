use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const FEATURE_COUNT: usize = 10;

/// Column order the cancellation model was trained with.
///
/// The artifact consumes a plain feature row, so this order is part of the
/// model contract: the same values in any other order still produce a
/// probability, just a wrong one. A retrained artifact that changes the
/// column set or order must ship with a new `FEATURE_SCHEMA_VERSION`.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "lead_time",
    "no_of_special_requests",
    "avg_price_per_room",
    "market_segment_type_Online",
    "arrival_month",
    "arrival_date",
    "arrival_year",
    "no_of_weekend_nights",
    "no_of_week_nights",
    "no_of_adults",
];

/// Schema identifier pinned to the trained artifact.
pub const FEATURE_SCHEMA_VERSION: &str = "hotel-cancellation-v1";

/// One booking, as the classifier sees it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BookingFeatures {
    pub lead_time: i64,
    pub no_of_special_requests: i64,
    pub avg_price_per_room: f64,
    #[serde(rename = "market_segment_type_Online")]
    pub market_segment_type_online: u8,
    pub arrival_month: u32,
    pub arrival_date: u32,
    pub arrival_year: i32,
    pub no_of_weekend_nights: i64,
    pub no_of_week_nights: i64,
    pub no_of_adults: i64,
}

impl BookingFeatures {
    pub fn validate(&self) -> Result<(), ApiError> {
        let non_negative = [
            ("lead_time", self.lead_time),
            ("no_of_special_requests", self.no_of_special_requests),
            ("no_of_weekend_nights", self.no_of_weekend_nights),
            ("no_of_week_nights", self.no_of_week_nights),
            ("no_of_adults", self.no_of_adults),
        ];

        for (name, value) in non_negative {
            if value < 0 {
                return Err(ApiError::InvalidInput(format!(
                    "{name} must be >= 0 (got {value})"
                )));
            }
        }

        if !self.avg_price_per_room.is_finite() || self.avg_price_per_room < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "avg_price_per_room must be a finite number >= 0 (got {})",
                self.avg_price_per_room
            )));
        }

        if self.market_segment_type_online > 1 {
            return Err(ApiError::InvalidInput(format!(
                "market_segment_type_Online must be 0 or 1 (got {})",
                self.market_segment_type_online
            )));
        }

        if !(1..=12).contains(&self.arrival_month) {
            return Err(ApiError::InvalidInput(format!(
                "arrival_month must be between 1 and 12 (got {})",
                self.arrival_month
            )));
        }

        if !(1..=31).contains(&self.arrival_date) {
            return Err(ApiError::InvalidInput(format!(
                "arrival_date must be between 1 and 31 (got {})",
                self.arrival_date
            )));
        }

        Ok(())
    }

    /// Feature row in `FEATURE_COLUMNS` order.
    pub fn to_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.lead_time as f32,
            self.no_of_special_requests as f32,
            self.avg_price_per_room as f32,
            self.market_segment_type_online as f32,
            self.arrival_month as f32,
            self.arrival_date as f32,
            self.arrival_year as f32,
            self.no_of_weekend_nights as f32,
            self.no_of_week_nights as f32,
            self.no_of_adults as f32,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    Canceled,
    #[serde(rename = "Not Canceled")]
    NotCanceled,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub prediction: BookingOutcome,
    /// Positive-class probability scaled to percent.
    pub probability: f32,
}

impl PredictionResult {
    /// Applies the decision threshold to a raw positive-class probability.
    ///
    /// The cutoff is strict: `probability == threshold` stays `NotCanceled`.
    /// Out-of-range model outputs are clamped so the reported percentage
    /// never leaves [0, 100].
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        let p = probability.clamp(0.0, 1.0);
        let prediction = if p > threshold {
            BookingOutcome::Canceled
        } else {
            BookingOutcome::NotCanceled
        };

        PredictionResult {
            prediction,
            probability: p * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BookingFeatures {
        BookingFeatures {
            lead_time: 50,
            no_of_special_requests: 1,
            avg_price_per_room: 100.0,
            market_segment_type_online: 1,
            arrival_month: 6,
            arrival_date: 15,
            arrival_year: 2024,
            no_of_weekend_nights: 2,
            no_of_week_nights: 3,
            no_of_adults: 2,
        }
    }

    #[test]
    fn accepts_valid_record() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_negative_counts() {
        for field in ["lead_time", "no_of_adults"] {
            let mut record = sample();
            match field {
                "lead_time" => record.lead_time = -1,
                _ => record.no_of_adults = -3,
            }
            let err = record.validate().unwrap_err();
            assert!(err.to_string().contains(field), "unexpected error: {err}");
        }
    }

    #[test]
    fn rejects_out_of_range_month() {
        for month in [0, 13] {
            let mut record = sample();
            record.arrival_month = month;
            assert!(record.validate().is_err(), "month {month} accepted");
        }
    }

    #[test]
    fn rejects_out_of_range_day() {
        for day in [0, 32] {
            let mut record = sample();
            record.arrival_date = day;
            assert!(record.validate().is_err(), "day {day} accepted");
        }
    }

    #[test]
    fn rejects_negative_and_non_finite_price() {
        let mut record = sample();
        record.avg_price_per_room = -0.01;
        assert!(record.validate().is_err());

        record.avg_price_per_room = f64::NAN;
        assert!(record.validate().is_err());
    }

    #[test]
    fn rejects_non_binary_segment_flag() {
        let mut record = sample();
        record.market_segment_type_online = 2;
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("market_segment_type_Online"));
    }

    #[test]
    fn feature_row_follows_pinned_column_order() {
        let row = sample().to_array();
        assert_eq!(
            row,
            [50.0, 1.0, 100.0, 1.0, 6.0, 15.0, 2024.0, 2.0, 3.0, 2.0]
        );
        assert_eq!(FEATURE_COLUMNS.len(), row.len());
        assert_eq!(FEATURE_COLUMNS[0], "lead_time");
        assert_eq!(FEATURE_COLUMNS[3], "market_segment_type_Online");
    }

    #[test]
    fn one_hot_field_keeps_trained_name_in_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("market_segment_type_Online").is_some());
        assert!(json.get("market_segment_type_online").is_none());

        let parsed: BookingFeatures = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn threshold_cutoff_is_strict() {
        let at_threshold = PredictionResult::from_probability(0.30, 0.30);
        assert_eq!(at_threshold.prediction, BookingOutcome::NotCanceled);

        let just_above = PredictionResult::from_probability(0.30 + 1e-4, 0.30);
        assert_eq!(just_above.prediction, BookingOutcome::Canceled);
    }

    #[test]
    fn probability_is_reported_as_percent() {
        let result = PredictionResult::from_probability(0.45, 0.30);
        assert_eq!(result.prediction, BookingOutcome::Canceled);
        assert!((result.probability - 45.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_model_outputs_are_clamped() {
        let high = PredictionResult::from_probability(1.2, 0.30);
        assert_eq!(high.probability, 100.0);
        assert_eq!(high.prediction, BookingOutcome::Canceled);

        let low = PredictionResult::from_probability(-0.2, 0.30);
        assert_eq!(low.probability, 0.0);
        assert_eq!(low.prediction, BookingOutcome::NotCanceled);
    }

    #[test]
    fn outcome_labels_serialize_as_display_strings() {
        assert_eq!(
            serde_json::to_string(&BookingOutcome::Canceled).unwrap(),
            "\"Canceled\""
        );
        assert_eq!(
            serde_json::to_string(&BookingOutcome::NotCanceled).unwrap(),
            "\"Not Canceled\""
        );
    }
}
