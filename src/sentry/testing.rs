use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use macaddr::MacAddr6;

use crate::model::{AirData, Device, DeviceCategory, Health, Reading, UnknownDevice};
use crate::notifier::{Notifier, NotifyError, Priority};
use crate::provider::ConfigurationProvider;
use crate::settings::Settings;

/// In-memory registry and settings store.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    pub settings: Settings,
    pub devices: Vec<Device>,
    pub unknown: Mutex<HashMap<MacAddr6, DateTime<Utc>>>,
    pub fail_settings: bool,
    pub fail_known_devices: bool,
    pub fail_registry_writes: bool,
}

impl MemoryProvider {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    pub fn last_seen(&self, mac_address: MacAddr6) -> Option<DateTime<Utc>> {
        self.unknown.lock().unwrap().get(&mac_address).copied()
    }
}

impl ConfigurationProvider for MemoryProvider {
    async fn settings(&self) -> Result<Settings> {
        if self.fail_settings {
            bail!("settings store unavailable");
        }
        Ok(self.settings.clone())
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        if self.fail_known_devices {
            bail!("device registry unavailable");
        }
        Ok(self.devices.clone())
    }

    async fn unknown_devices(&self) -> Result<HashSet<UnknownDevice>> {
        Ok(self
            .unknown
            .lock()
            .unwrap()
            .iter()
            .map(|(mac_address, last_seen)| UnknownDevice {
                mac_address: *mac_address,
                last_seen: *last_seen,
            })
            .collect())
    }

    async fn record_unknown(&self, mac_address: MacAddr6) -> Result<()> {
        if self.fail_registry_writes {
            bail!("device registry is read-only");
        }
        self.unknown.lock().unwrap().insert(mac_address, Utc::now());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub text: String,
    pub title: String,
    pub priority: Priority,
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send_notification(
        &self,
        text: &str,
        title: &str,
        priority: Priority,
    ) -> Result<u16, NotifyError> {
        self.sent.lock().unwrap().push(Sent {
            text: text.to_string(),
            title: title.to_string(),
            priority,
        });
        if self.fail {
            return Err(NotifyError::HttpStatus(503));
        }
        Ok(200)
    }
}

pub fn mac(last: u8) -> MacAddr6 {
    MacAddr6::new(0x50, 0xec, 0x50, 0x00, 0x00, last)
}

pub fn device(name: &str, location: &str, last_mac_byte: u8) -> Device {
    Device {
        name: name.to_string(),
        location: location.to_string(),
        category: DeviceCategory::Air,
        brand: "Xiaomi".to_string(),
        mac_address: mac(last_mac_byte),
        ip_address: None,
        token: None,
    }
}

pub fn air_reading(
    location: &str,
    temperature_celsius: Option<f32>,
    humidity_percent: Option<u8>,
    aqi: Option<u16>,
) -> Reading {
    Reading::new(
        device(
            "Mi Air Purifier 3H",
            location,
            location.bytes().fold(0u8, |acc, b| acc.wrapping_add(b)),
        ),
        AirData {
            temperature_celsius,
            humidity_percent,
            aqi,
        },
        Health::None,
    )
}

/// Thresholds used across the engine tests.
pub fn settings() -> Settings {
    Settings {
        temperature_min: 18.0,
        temperature_max: 27.0,
        humidity_min: 20,
        humidity_max: 85,
        aqi_threshold: 50,
        network_overload_threshold: 10,
        health_threshold: 15,
        ..Settings::default()
    }
}
