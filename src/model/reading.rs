use std::fmt;
use std::hash::{Hash, Hasher};

use crate::model::{Device, round_to_tenth};

/// Consumable indicator reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthField {
    Battery,
    FilterLifeRemaining,
}

impl HealthField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthField::Battery => "battery",
            HealthField::FilterLifeRemaining => "filter_life_remaining",
        }
    }

    /// Genitive form used in notification text.
    pub fn localized(&self) -> &'static str {
        match self {
            HealthField::Battery => "baterii",
            HealthField::FilterLifeRemaining => "filtra",
        }
    }
}

impl fmt::Display for HealthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device-specific consumable levels, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Health {
    Monitor {
        battery: Option<u8>,
    },
    Purifier {
        filter_life_remaining: Option<u8>,
    },
    Thermometer {
        battery: u8,
    },
    #[default]
    None,
}

impl Health {
    pub fn fields(&self) -> Vec<(HealthField, Option<u8>)> {
        match *self {
            Health::Monitor { battery } => vec![(HealthField::Battery, battery)],
            Health::Purifier {
                filter_life_remaining,
            } => vec![(HealthField::FilterLifeRemaining, filter_life_remaining)],
            Health::Thermometer { battery } => vec![(HealthField::Battery, Some(battery))],
            Health::None => Vec::new(),
        }
    }

    pub fn battery(&self) -> Option<u8> {
        match *self {
            Health::Monitor { battery } => battery,
            Health::Thermometer { battery } => Some(battery),
            _ => None,
        }
    }

    pub fn filter_life_remaining(&self) -> Option<u8> {
        match *self {
            Health::Purifier {
                filter_life_remaining,
            } => filter_life_remaining,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AirData {
    pub temperature_celsius: Option<f32>,

    pub humidity_percent: Option<u8>,

    pub aqi: Option<u16>,
}

/// One poll-cycle snapshot of an air device.
///
/// Readings share the identity of their device: equality and hashing use the
/// device MAC address only, so a set keeps at most one reading per device.
/// Two equal readings can carry different measurements.
#[derive(Debug, Clone)]
pub struct Reading {
    device: Device,
    air: AirData,
    health: Health,
}

impl Reading {
    /// Builds a reading, rounding the temperature to one decimal place.
    pub fn new(device: Device, air: AirData, health: Health) -> Self {
        let air = AirData {
            temperature_celsius: air.temperature_celsius.map(round_to_tenth),
            ..air
        };

        Self {
            device,
            air,
            health,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn location(&self) -> &str {
        &self.device.location
    }

    pub fn temperature_celsius(&self) -> Option<f32> {
        self.air.temperature_celsius
    }

    pub fn humidity_percent(&self) -> Option<u8> {
        self.air.humidity_percent
    }

    pub fn aqi(&self) -> Option<u16> {
        self.air.aqi
    }

    pub fn health(&self) -> &Health {
        &self.health
    }
}

impl PartialEq for Reading {
    fn eq(&self, other: &Self) -> bool {
        self.device == other.device
    }
}

impl Eq for Reading {}

impl Hash for Reading {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.device.hash(state);
    }
}
