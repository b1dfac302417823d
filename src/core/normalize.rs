//! Canonical text for date and amount fields.
//!
//! Neither function fails: a value that cannot be interpreted is passed
//! through as text and flagged with `fell_back`, so callers can count it.

use crate::domain::model::CellValue;
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use std::str::FromStr;

const DATE_INPUT_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

// Largest amount kept as a number; longer integer parts pass through as text.
const MAX_INTEGER_DIGITS: i64 = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub fell_back: bool,
}

impl Normalized {
    fn parsed(text: String) -> Self {
        Self {
            text,
            fell_back: false,
        }
    }

    fn fallback(text: String) -> Self {
        Self {
            text,
            fell_back: true,
        }
    }
}

/// `YYYY-MM-DD` for date cells and for text in one of the accepted layouts.
pub fn format_date(value: &CellValue) -> Normalized {
    match value {
        CellValue::Empty => Normalized::parsed(String::new()),
        CellValue::DateTime(dt) => Normalized::parsed(dt.format(DATE_OUTPUT_FORMAT).to_string()),
        other => {
            let raw = other.to_plain_string();
            let trimmed = raw.trim();
            match parse_date_text(trimmed) {
                Some(date) => Normalized::parsed(date.format(DATE_OUTPUT_FORMAT).to_string()),
                None => Normalized::fallback(trimmed.to_string()),
            }
        }
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Two-decimal, half-up rounded amount. A comma is read as the decimal point.
pub fn format_numeric(value: &CellValue) -> Normalized {
    let raw = value.to_plain_string();
    if raw.is_empty() {
        return Normalized::parsed(raw);
    }

    let candidate = raw.replace(',', ".");
    match BigDecimal::from_str(candidate.trim()) {
        Ok(number) => {
            // Position of the leading digit relative to the decimal point.
            let magnitude = number.digits() as i64 - number.fractional_digit_count();
            if magnitude > MAX_INTEGER_DIGITS {
                return Normalized::fallback(raw);
            }
            if magnitude < -2 {
                // Below 0.001: rounds to zero at two places.
                return Normalized::parsed("0.00".to_string());
            }
            let rounded = number.with_scale_round(2, RoundingMode::HalfUp);
            Normalized::parsed(format!("{:.2}", rounded))
        }
        Err(_) => Normalized::fallback(raw),
    }
}
