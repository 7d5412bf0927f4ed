//! Alerting thresholds and notification toggles.
//!
//! Settings live in a key-value store administered outside this crate. A
//! [`Settings`] value is a snapshot of that store taken at the start of every
//! check, so administrator changes apply on the next poll cycle.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value for setting {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub notify_temperature: bool,
    pub temperature_min: f32,
    pub temperature_max: f32,

    pub notify_humidity: bool,
    pub humidity_min: u8,
    pub humidity_max: u8,

    pub notify_aqi: bool,
    pub aqi_threshold: u16,

    pub notify_network_overload: bool,
    pub network_overload_threshold: usize,
    pub notify_unknown_device: bool,

    pub notify_health: bool,
    pub health_threshold: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notify_temperature: true,
            temperature_min: 19.0,
            temperature_max: 27.0,
            notify_humidity: true,
            humidity_min: 20,
            humidity_max: 85,
            notify_aqi: true,
            aqi_threshold: 50,
            notify_network_overload: true,
            network_overload_threshold: 10,
            notify_unknown_device: true,
            notify_health: true,
            health_threshold: 15,
        }
    }
}

impl Settings {
    /// Builds a snapshot from raw key-value rows.
    ///
    /// Missing keys keep their defaults and unrelated keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Settings::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                "notify_temperature" => settings.notify_temperature = parse_bool(key, value)?,
                "temperature_min" => settings.temperature_min = parse_number(key, value)?,
                "temperature_max" => settings.temperature_max = parse_number(key, value)?,
                "notify_humidity" => settings.notify_humidity = parse_bool(key, value)?,
                "humidity_min" => settings.humidity_min = parse_number(key, value)?,
                "humidity_max" => settings.humidity_max = parse_number(key, value)?,
                "notify_aqi" => settings.notify_aqi = parse_bool(key, value)?,
                "aqi_threshold" => settings.aqi_threshold = parse_number(key, value)?,
                "notify_network_overload" => {
                    settings.notify_network_overload = parse_bool(key, value)?
                }
                "network_overload_threshold" => {
                    settings.network_overload_threshold = parse_number(key, value)?
                }
                "notify_unknown_device" => {
                    settings.notify_unknown_device = parse_bool(key, value)?
                }
                "notify_health" => settings.notify_health = parse_bool(key, value)?,
                "health_threshold" => settings.health_threshold = parse_number(key, value)?,
                _ => {}
            }
        }

        Ok(settings)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "on" => Ok(true),
        "false" | "f" | "0" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
