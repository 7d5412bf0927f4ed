use std::collections::HashSet;
use std::net::IpAddr;

use anyhow::{Context as _, Error, Result};
use chrono::{DateTime, Utc};
use macaddr::MacAddr6;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::model::{Device, DeviceCategory, Forecast, Reading, UnknownDevice};
use crate::provider::ConfigurationProvider;
use crate::settings::Settings;

pub async fn new_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

#[derive(Debug, sqlx::FromRow)]
struct DeviceRow {
    name: String,
    location: String,
    category: String,
    brand: String,
    mac_address: Vec<u8>,
    ip_address: Option<String>,
    token: Option<String>,
}

impl TryFrom<DeviceRow> for Device {
    type Error = Error;

    fn try_from(row: DeviceRow) -> Result<Self> {
        let mac_address = mac_address_from_bytes(&row.mac_address)?;
        let category = row
            .category
            .parse::<DeviceCategory>()
            .with_context(|| format!("invalid category of device {mac_address}"))?;
        let ip_address = row
            .ip_address
            .as_deref()
            .map(str::parse::<IpAddr>)
            .transpose()
            .with_context(|| format!("invalid IP address of device {mac_address}"))?;

        Ok(Device {
            name: row.name,
            location: row.location,
            category,
            brand: row.brand,
            mac_address,
            ip_address,
            token: row.token,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UnknownDeviceRow {
    mac_address: Vec<u8>,
    last_seen: DateTime<Utc>,
}

impl TryFrom<UnknownDeviceRow> for UnknownDevice {
    type Error = Error;

    fn try_from(row: UnknownDeviceRow) -> Result<Self> {
        Ok(UnknownDevice {
            mac_address: mac_address_from_bytes(&row.mac_address)?,
            last_seen: row.last_seen,
        })
    }
}

fn mac_address_from_bytes(bytes: &[u8]) -> Result<MacAddr6> {
    let octets: [u8; 6] = bytes
        .try_into()
        .with_context(|| format!("invalid MAC address length: {}", bytes.len()))?;
    Ok(MacAddr6::from(octets))
}

pub async fn get_devices(pool: &PgPool) -> Result<Vec<Device>> {
    let rows: Vec<DeviceRow> = sqlx::query_as(
        r#"
        SELECT name, location, category, brand, mac_address, ip_address, token
        FROM devices
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to execute devices query")?;

    rows.into_iter().map(Device::try_from).collect()
}

pub async fn get_unknown_devices(pool: &PgPool) -> Result<Vec<UnknownDevice>> {
    let rows: Vec<UnknownDeviceRow> =
        sqlx::query_as("SELECT mac_address, last_seen FROM unknown_devices")
            .fetch_all(pool)
            .await
            .context("failed to execute unknown devices query")?;

    rows.into_iter().map(UnknownDevice::try_from).collect()
}

pub async fn upsert_unknown_device(
    pool: &PgPool,
    mac_address: MacAddr6,
    last_seen: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO unknown_devices (mac_address, last_seen)
        VALUES ($1, $2)
        ON CONFLICT (mac_address) DO UPDATE SET last_seen = EXCLUDED.last_seen
        "#,
    )
    .bind(mac_address.as_bytes())
    .bind(last_seen)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert unknown device {mac_address}"))?;

    Ok(())
}

pub async fn get_settings(pool: &PgPool) -> Result<Settings> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await
        .context("failed to execute settings query")?;

    Settings::from_pairs(rows).context("failed to parse settings")
}

/// Column arrays of one `air_readings` UNNEST insert.
#[derive(Debug, Default, PartialEq)]
struct ReadingColumns {
    device_ids: Vec<Vec<u8>>,
    temperature_celsiuses: Vec<Option<f32>>,
    humidity_percents: Vec<Option<i16>>,
    aqis: Vec<Option<i32>>,
    battery_percents: Vec<Option<i16>>,
    filter_life_remaining_percents: Vec<Option<i16>>,
}

impl ReadingColumns {
    fn new(readings: &[Reading]) -> Self {
        Self {
            device_ids: readings
                .iter()
                .map(|r| r.device().mac_address.as_bytes().to_vec())
                .collect(),
            temperature_celsiuses: readings.iter().map(|r| r.temperature_celsius()).collect(),
            humidity_percents: readings
                .iter()
                .map(|r| r.humidity_percent().map(i16::from))
                .collect(),
            aqis: readings.iter().map(|r| r.aqi().map(i32::from)).collect(),
            battery_percents: readings
                .iter()
                .map(|r| r.health().battery().map(i16::from))
                .collect(),
            filter_life_remaining_percents: readings
                .iter()
                .map(|r| r.health().filter_life_remaining().map(i16::from))
                .collect(),
        }
    }
}

pub async fn bulk_insert_readings(
    pool: &PgPool,
    readings: &[Reading],
    measured_at: DateTime<Utc>,
) -> Result<()> {
    if readings.is_empty() {
        return Ok(());
    }

    let columns = ReadingColumns::new(readings);
    let measured_ats: Vec<DateTime<Utc>> = vec![measured_at; readings.len()];

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    sqlx::query(
        r#"
        INSERT INTO air_readings (device_id, measured_at, temperature_celsius, humidity_percent, aqi, battery_percent, filter_life_remaining_percent)
        SELECT * FROM UNNEST($1::BYTEA[], $2::TIMESTAMPTZ[], $3::FLOAT4[], $4::INT2[], $5::INT4[], $6::INT2[], $7::INT2[])
        ON CONFLICT (device_id, measured_at) DO NOTHING
        "#,
    )
    .bind(&columns.device_ids)
    .bind(&measured_ats)
    .bind(&columns.temperature_celsiuses)
    .bind(&columns.humidity_percents)
    .bind(&columns.aqis)
    .bind(&columns.battery_percents)
    .bind(&columns.filter_life_remaining_percents)
    .execute(&mut *tx)
    .await
    .context("failed to execute bulk insert query")?;

    tx.commit().await.context("failed to commit transaction")?;

    Ok(())
}

/// Sorted byte form of the active addresses, one `network_devices` row each.
fn network_device_ids(mac_addresses: &HashSet<MacAddr6>) -> Vec<Vec<u8>> {
    let mut ids: Vec<Vec<u8>> = mac_addresses
        .iter()
        .map(|m| m.as_bytes().to_vec())
        .collect();
    ids.sort();
    ids
}

/// Stores one network scan: an availability row per active address and the
/// number of active devices.
pub async fn bulk_insert_network(
    pool: &PgPool,
    mac_addresses: &HashSet<MacAddr6>,
    seen_at: DateTime<Utc>,
) -> Result<()> {
    let device_ids = network_device_ids(mac_addresses);
    let seen_ats: Vec<DateTime<Utc>> = vec![seen_at; device_ids.len()];
    let quantity = i32::try_from(device_ids.len()).context("too many active devices")?;

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    sqlx::query(
        r#"
        INSERT INTO network_devices (mac_address, seen_at)
        SELECT * FROM UNNEST($1::BYTEA[], $2::TIMESTAMPTZ[])
        ON CONFLICT (mac_address, seen_at) DO NOTHING
        "#,
    )
    .bind(&device_ids)
    .bind(&seen_ats)
    .execute(&mut *tx)
    .await
    .context("failed to execute network devices insert query")?;

    sqlx::query(
        r#"
        INSERT INTO network_device_counts (counted_at, quantity)
        VALUES ($1, $2)
        ON CONFLICT (counted_at) DO NOTHING
        "#,
    )
    .bind(seen_at)
    .bind(quantity)
    .execute(&mut *tx)
    .await
    .context("failed to execute network device count insert query")?;

    tx.commit().await.context("failed to commit transaction")?;

    Ok(())
}

pub async fn bulk_insert_forecasts(pool: &PgPool, forecasts: &[Forecast]) -> Result<()> {
    if forecasts.is_empty() {
        return Ok(());
    }

    let forecast_ats: Vec<DateTime<Utc>> = forecasts
        .iter()
        .map(|f| f.forecast_at.with_timezone(&Utc))
        .collect();
    let temperature_celsiuses: Vec<Option<f32>> =
        forecasts.iter().map(|f| f.temperature_celsius).collect();
    let humidity_percents: Vec<Option<i16>> = forecasts
        .iter()
        .map(|f| f.humidity_percent.map(i16::from))
        .collect();

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    sqlx::query(
        r#"
        INSERT INTO forecasts (forecast_at, temperature_celsius, humidity_percent)
        SELECT * FROM UNNEST($1::TIMESTAMPTZ[], $2::FLOAT4[], $3::INT2[])
        ON CONFLICT (forecast_at) DO NOTHING
        "#,
    )
    .bind(&forecast_ats)
    .bind(&temperature_celsiuses)
    .bind(&humidity_percents)
    .execute(&mut *tx)
    .await
    .context("failed to execute bulk insert query")?;

    tx.commit().await.context("failed to commit transaction")?;

    Ok(())
}

impl ConfigurationProvider for PgPool {
    async fn settings(&self) -> Result<Settings> {
        get_settings(self).await
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        get_devices(self).await
    }

    async fn known_device_mac_addresses(&self) -> Result<HashSet<MacAddr6>> {
        let rows: Vec<(Vec<u8>,)> = sqlx::query_as("SELECT mac_address FROM devices")
            .fetch_all(self)
            .await
            .context("failed to execute known devices query")?;

        rows.iter()
            .map(|(bytes,)| mac_address_from_bytes(bytes))
            .collect()
    }

    async fn unknown_devices(&self) -> Result<HashSet<UnknownDevice>> {
        Ok(get_unknown_devices(self).await?.into_iter().collect())
    }

    async fn record_unknown(&self, mac_address: MacAddr6) -> Result<()> {
        upsert_unknown_device(self, mac_address, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::model::{AirData, Health};

    fn row() -> DeviceRow {
        DeviceRow {
            name: "Mi Air Purifier 3H".to_string(),
            location: "living room".to_string(),
            category: "air".to_string(),
            brand: "Xiaomi".to_string(),
            mac_address: vec![0x50, 0xec, 0x50, 0x01, 0x02, 0x03],
            ip_address: Some("192.168.1.20".to_string()),
            token: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_device_from_row() {
        let device = Device::try_from(row()).unwrap();
        assert_eq!(
            device.mac_address,
            MacAddr6::new(0x50, 0xec, 0x50, 0x01, 0x02, 0x03)
        );
        assert_eq!(device.category, DeviceCategory::Air);
        assert_eq!(
            device.ip_address,
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)))
        );
        assert_eq!(device.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_device_without_ip_address() {
        let device = Device::try_from(DeviceRow {
            ip_address: None,
            ..row()
        })
        .unwrap();
        assert_eq!(device.ip_address, None);
    }

    #[test]
    fn test_short_mac_address_is_rejected() {
        let err = Device::try_from(DeviceRow {
            mac_address: vec![0x50, 0xec],
            ..row()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid MAC address length: 2");
    }

    #[test]
    fn test_bad_category_is_rejected() {
        let err = Device::try_from(DeviceRow {
            category: "lighting".to_string(),
            ..row()
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown device category: lighting"));
    }

    #[test]
    fn test_unknown_device_from_row() {
        let last_seen = Utc::now();
        let device = UnknownDevice::try_from(UnknownDeviceRow {
            mac_address: vec![0, 1, 2, 3, 4, 5],
            last_seen,
        })
        .unwrap();
        assert_eq!(device.mac_address, MacAddr6::new(0, 1, 2, 3, 4, 5));
        assert_eq!(device.last_seen, last_seen);
    }

    #[test]
    fn test_reading_columns() {
        let device = Device::try_from(row()).unwrap();
        let reading = Reading::new(
            device,
            AirData {
                temperature_celsius: Some(21.04),
                humidity_percent: Some(45),
                aqi: Some(40_000),
            },
            Health::Purifier {
                filter_life_remaining: Some(12),
            },
        );

        let columns = ReadingColumns::new(&[reading]);

        assert_eq!(
            columns,
            ReadingColumns {
                device_ids: vec![vec![0x50, 0xec, 0x50, 0x01, 0x02, 0x03]],
                temperature_celsiuses: vec![Some(21.0)],
                humidity_percents: vec![Some(45)],
                aqis: vec![Some(40_000)],
                battery_percents: vec![None],
                filter_life_remaining_percents: vec![Some(12)],
            }
        );
    }

    #[test]
    fn test_network_device_ids_are_sorted_bytes() {
        let mac_addresses = HashSet::from([
            MacAddr6::new(0x50, 0xec, 0x50, 0, 0, 9),
            MacAddr6::new(0x10, 0, 0, 0, 0, 1),
            MacAddr6::new(0x50, 0xec, 0x50, 0, 0, 2),
        ]);

        assert_eq!(
            network_device_ids(&mac_addresses),
            vec![
                vec![0x10, 0, 0, 0, 0, 1],
                vec![0x50, 0xec, 0x50, 0, 0, 2],
                vec![0x50, 0xec, 0x50, 0, 0, 9],
            ]
        );
        assert!(network_device_ids(&HashSet::new()).is_empty());
    }
}
