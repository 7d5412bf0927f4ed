use std::fmt;

use crate::model::HealthField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirMetric {
    Temperature,
    Aqi,
    Humidity,
}

impl AirMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirMetric::Temperature => "temperature",
            AirMetric::Aqi => "aqi",
            AirMetric::Humidity => "humidity",
        }
    }
}

impl fmt::Display for AirMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkIssue {
    Overload,
    UnknownDevice,
}

impl NetworkIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkIssue::Overload => "overload",
            NetworkIssue::UnknownDevice => "unknown_device",
        }
    }
}

impl fmt::Display for NetworkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric that crossed its threshold, and the location of the reporting device.
pub type AirIssue = (AirMetric, String);

/// Consumable at or below the minimum level, and the location of its device.
pub type DiagnosticIssue = (HealthField, String);
