use super::normalizer::{normalize_header, parse_flag, parse_week, pressure_index_from_drivers};
use super::{CustomerSignal, SignalLoadError};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Deserializer};
use std::io::Read;

const UNKNOWN: &str = "unknown";

pub(crate) fn parse_signals<R: Read>(
    reader: R,
    today: NaiveDate,
) -> Result<Vec<CustomerSignal>, SignalLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut signals = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(index as u64 + 2);
        let row: RawSignalRow = record.deserialize(Some(&headers))?;
        signals.push(row.into_signal(line, today)?);
    }

    Ok(signals)
}

#[derive(Debug, Deserialize)]
struct RawSignalRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    customer_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cust_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cpi: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contract_days_remaining: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price_sensitivity_flag: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    peer_port_count_30d: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    weekly_ad_intensity_index: Option<String>,
}

impl RawSignalRow {
    fn into_signal(self, line: u64, today: NaiveDate) -> Result<CustomerSignal, SignalLoadError> {
        let contract_days = self
            .contract_days_remaining
            .as_deref()
            .map(|raw| parse_integer(raw, "contract_days_remaining", line))
            .transpose()?;

        let peer_ports = self
            .peer_port_count_30d
            .as_deref()
            .map(|raw| parse_count(raw, "peer_port_count_30d", line))
            .transpose()?;

        let ad_intensity = self
            .weekly_ad_intensity_index
            .as_deref()
            .map(|raw| parse_intensity(raw, line))
            .transpose()?;

        let price_sensitive = self
            .price_sensitivity_flag
            .as_deref()
            .map(parse_flag)
            .unwrap_or(false);

        let pressure_index = match self.cpi.as_deref() {
            Some(raw) => parse_pressure_index(raw, line)?,
            None => match (contract_days, peer_ports, ad_intensity) {
                (Some(days), Some(peers), Some(ad)) => {
                    pressure_index_from_drivers(days, price_sensitive, i64::from(peers), ad)
                }
                _ => 0,
            },
        };

        Ok(CustomerSignal {
            customer_id: self
                .customer_id
                .or(self.cust_id)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            region: self.region.unwrap_or_else(|| UNKNOWN.to_string()),
            week: self.date.as_deref().and_then(parse_week).unwrap_or(today),
            competitive_pressure_index: pressure_index,
            contract_days_remaining: contract_days.unwrap_or(0),
            price_sensitivity_flag: price_sensitive,
            peer_port_count_30d: peer_ports.unwrap_or(0),
            weekly_ad_intensity_index: ad_intensity.unwrap_or(0.0),
        })
    }
}

fn parse_integer(raw: &str, column: &'static str, line: u64) -> Result<i64, SignalLoadError> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }

    // spreadsheet exports write whole numbers as `30.0`
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(SignalLoadError::InvalidValue {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}

fn parse_count(raw: &str, column: &'static str, line: u64) -> Result<u32, SignalLoadError> {
    let value = parse_integer(raw, column, line)?;
    u32::try_from(value).map_err(|_| SignalLoadError::InvalidRange {
        line,
        column,
        value: value.to_string(),
        expected: "a non-negative count",
    })
}

fn parse_intensity(raw: &str, line: u64) -> Result<f64, SignalLoadError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| SignalLoadError::InvalidValue {
            line,
            column: "weekly_ad_intensity_index",
            value: raw.to_string(),
        })?;

    if !value.is_finite() || value < 0.0 {
        return Err(SignalLoadError::InvalidRange {
            line,
            column: "weekly_ad_intensity_index",
            value: raw.to_string(),
            expected: "a finite, non-negative index",
        });
    }

    Ok(value)
}

fn parse_pressure_index(raw: &str, line: u64) -> Result<u8, SignalLoadError> {
    let value = parse_integer(raw, "cpi", line)?;
    if !(0..=100).contains(&value) {
        return Err(SignalLoadError::InvalidRange {
            line,
            column: "cpi",
            value: value.to_string(),
            expected: "0..=100",
        });
    }

    Ok(value as u8)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
