use std::io::Read;
use std::str::FromStr;

use anyhow::{Context as _, Result, bail};
use chrono::{LocalResult, NaiveDateTime};
use chrono_tz::Tz;
use csv::{Reader, StringRecord};
use home_sentry::model::Forecast;
use macaddr::MacAddr6;

const READING_HEADER: [&str; 6] = [
    "mac_address",
    "temperature",
    "humidity",
    "aqi",
    "battery",
    "filter_life_remaining",
];
const MAC_ADDRESS_INDEX: usize = 0;
const TEMPERATURE_INDEX: usize = 1;
const HUMIDITY_INDEX: usize = 2;
const AQI_INDEX: usize = 3;
const BATTERY_INDEX: usize = 4;
const FILTER_LIFE_REMAINING_INDEX: usize = 5;

const FORECAST_HEADER: [&str; 3] = ["date", "temperature", "humidity"];
const FORECAST_AT_INDEX: usize = 0;
const FORECAST_TEMPERATURE_INDEX: usize = 1;
const FORECAST_HUMIDITY_INDEX: usize = 2;

/// One row of a poll-cycle dump, before it is matched against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingRecord {
    pub mac_address: MacAddr6,
    pub temperature_celsius: Option<f32>,
    pub humidity_percent: Option<u8>,
    pub aqi: Option<u16>,
    pub battery: Option<u8>,
    pub filter_life_remaining: Option<u8>,
}

#[derive(Debug)]
pub struct CsvReadingIter<R> {
    reader: Reader<R>,
}

impl<R: Read> CsvReadingIter<R> {
    pub fn new(rdr: R) -> Result<Self> {
        let mut reader = Reader::from_reader(rdr);
        check_header(&mut reader, &READING_HEADER)?;
        Ok(Self { reader })
    }
}

impl<R: Read> Iterator for CsvReadingIter<R> {
    type Item = Result<ReadingRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.reader.records().next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e.into())),
        };

        let record = (|| -> Result<ReadingRecord> {
            let mac_address = row[MAC_ADDRESS_INDEX]
                .trim()
                .parse::<MacAddr6>()
                .with_context(|| {
                    format!("failed to parse MAC address: {}", &row[MAC_ADDRESS_INDEX])
                })?;

            Ok(ReadingRecord {
                mac_address,
                temperature_celsius: parse_optional(&row, TEMPERATURE_INDEX, "temperature")?,
                humidity_percent: parse_optional(&row, HUMIDITY_INDEX, "humidity")?,
                aqi: parse_optional(&row, AQI_INDEX, "AQI")?,
                battery: parse_optional(&row, BATTERY_INDEX, "battery")?,
                filter_life_remaining: parse_optional(
                    &row,
                    FILTER_LIFE_REMAINING_INDEX,
                    "filter life remaining",
                )?,
            })
        })();

        Some(record)
    }
}

#[derive(Debug)]
pub struct CsvForecastIter<R> {
    reader: Reader<R>,
    timezone: Tz,
}

impl<R: Read> CsvForecastIter<R> {
    pub fn new(rdr: R, timezone: Tz) -> Result<Self> {
        let mut reader = Reader::from_reader(rdr);
        check_header(&mut reader, &FORECAST_HEADER)?;
        Ok(Self { reader, timezone })
    }
}

impl<R: Read> Iterator for CsvForecastIter<R> {
    type Item = Result<Forecast>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.reader.records().next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e.into())),
        };

        let record = (|| -> Result<Forecast> {
            let raw = row[FORECAST_AT_INDEX].trim();
            let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
                .with_context(|| format!("failed to parse timestamp: {raw}"))?;
            let forecast_at = match naive.and_local_timezone(self.timezone) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => bail!("invalid timestamp: {raw}"),
            };

            Ok(Forecast::new(
                forecast_at,
                parse_optional(&row, FORECAST_TEMPERATURE_INDEX, "temperature")?,
                parse_optional(&row, FORECAST_HUMIDITY_INDEX, "humidity")?,
            ))
        })();

        Some(record)
    }
}

fn check_header<R: Read>(reader: &mut Reader<R>, expected: &[&str]) -> Result<()> {
    let header = reader.headers().context("failed to read CSV header")?;
    let actual: Vec<&str> = header.iter().map(str::trim).collect();
    if actual != expected {
        bail!(
            "unexpected CSV header: {}, expected: {}",
            actual.join(","),
            expected.join(",")
        );
    }
    Ok(())
}

fn parse_optional<T>(row: &StringRecord, index: usize, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = row.get(index).map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse()
        .with_context(|| format!("failed to parse {name}: {raw}"))?;
    Ok(Some(value))
}
