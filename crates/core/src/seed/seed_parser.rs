//! CSV parsing for the weights and prices sheets.

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

use super::seed_model::{PriceRow, PricesTable, WeightRow, WeightsTable};
use crate::errors::{Error, Result, ValidationError};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn invalid(msg: String) -> Error {
    Error::Validation(ValidationError::InvalidInput(msg))
}

fn read_records(content: &str) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| invalid(format!("Failed to parse row {}: {}", idx + 2, e)))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok((headers, records))
}

pub fn parse_date_cell(value: &str) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }
    Err(invalid(format!("Unrecognised date '{}'", value)))
}

pub fn parse_decimal_cell(value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| invalid(format!("Invalid number '{}': {}", value, e)))
}

/// Extracts the portfolio number from a header such as `portafolio 2`.
/// Falls back to the column's position among the weight columns.
fn portfolio_id_from_header(header: &str, position: usize) -> u32 {
    header
        .rsplit(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(position as u32 + 1)
}

/// Parses the weights sheet.
///
/// Expected columns: date, asset name, then one weight column per portfolio.
pub fn parse_weights_csv(content: &str) -> Result<WeightsTable> {
    let (headers, records) = read_records(content)?;
    if headers.len() < 3 {
        return Err(invalid(format!(
            "Weights sheet needs a date, an asset and at least one portfolio column; found {} columns",
            headers.len()
        )));
    }

    let portfolio_ids: Vec<u32> = headers
        .iter()
        .skip(2)
        .enumerate()
        .map(|(position, header)| portfolio_id_from_header(header, position))
        .collect();
    let distinct: HashSet<u32> = portfolio_ids.iter().copied().collect();
    if distinct.len() != portfolio_ids.len() {
        return Err(invalid(format!(
            "Weights sheet names the same portfolio twice: {:?}",
            portfolio_ids
        )));
    }

    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let line = idx + 2;
        let asset_name = record.get(1).unwrap_or_default().to_string();
        if asset_name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(format!(
                "asset name (line {})",
                line
            ))));
        }
        if !seen.insert(asset_name.clone()) {
            return Err(invalid(format!(
                "Asset '{}' appears twice in the weights sheet (line {})",
                asset_name, line
            )));
        }

        let weights = (0..portfolio_ids.len())
            .map(|col| {
                let cell = record.get(col + 2).unwrap_or_default();
                if cell.is_empty() {
                    Ok(Decimal::ZERO)
                } else {
                    parse_decimal_cell(cell)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        rows.push(WeightRow {
            asset_name,
            weights,
        });
    }

    Ok(WeightsTable {
        portfolio_ids,
        rows,
    })
}

/// Parses the prices sheet.
///
/// Expected columns: date, then one price column per asset. Empty cells mean
/// no price was recorded for that asset on that date.
pub fn parse_prices_csv(content: &str) -> Result<PricesTable> {
    let (headers, records) = read_records(content)?;
    if headers.len() < 2 {
        return Err(invalid(
            "Prices sheet needs a date column and at least one asset column".to_string(),
        ));
    }

    let asset_names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut seen = HashSet::new();
    for name in &asset_names {
        if name.is_empty() || !seen.insert(name.as_str()) {
            return Err(invalid(format!(
                "Prices sheet has an empty or duplicated asset column '{}'",
                name
            )));
        }
    }

    let mut rows: Vec<PriceRow> = Vec::with_capacity(records.len());
    for record in &records {
        let date = parse_date_cell(record.get(0).unwrap_or_default())?;
        let prices = (0..asset_names.len())
            .map(|col| match record.get(col + 1).unwrap_or_default() {
                "" => Ok(None),
                cell => parse_decimal_cell(cell).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(PriceRow { date, prices });
    }

    rows.sort_by_key(|row| row.date);
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(invalid(format!(
            "Prices sheet lists {} more than once",
            pair[0].date
        )));
    }

    Ok(PricesTable { asset_names, rows })
}
