use chrono::NaiveDate;

use crate::constants::DATE_FORMAT;
use crate::errors::{CalculatorError, Error, Result, ValidationError};

/// An inclusive, validated range of calendar days.
///
/// `start <= end` always holds; there is no way to build an empty or
/// reversed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CalculatorError::InvalidRange { start, end }.into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, both endpoints included.
    pub fn len(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> Vec<NaiveDate> {
        get_days_between(self.start, self.end)
    }
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .collect()
}

/// Parses a `YYYY-MM-DD` date, naming the offending field on failure.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid {} '{}': {}",
            field, value, e
        )))
    })
}
