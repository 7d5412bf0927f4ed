mod args;
mod csv;

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use args::{Args, Command};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser as _;
use home_sentry::{
    db::{bulk_insert_forecasts, bulk_insert_network, bulk_insert_readings, new_pool},
    model::{AirData, Device, DeviceModel, Reading},
    notifier::NtfyNotifier,
    provider::ConfigurationProvider as _,
    sentry::Sentry,
};
use indexmap::IndexMap;
use macaddr::MacAddr6;
use sqlx::PgPool;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::csv::{CsvForecastIter, CsvReadingIter, ReadingRecord};

const BULK_INSERT_SIZE: usize = 1000;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let pool = new_pool(&args.database_url).await?;

    match args.command {
        Command::Air { file } => {
            let sentry = Sentry::new(pool, notifier(&args.ntfy_url, &args.ntfy_topic)?);
            check_air(&sentry, &file).await
        }
        Command::Network { mac_addresses } => {
            let sentry = Sentry::new(pool, notifier(&args.ntfy_url, &args.ntfy_topic)?);
            let mac_addresses: HashSet<MacAddr6> = mac_addresses.into_iter().collect();
            let issues = sentry.check_network(&mac_addresses).await;
            tracing::info!(
                addresses = mac_addresses.len(),
                issues = ?issues,
                "network check finished"
            );

            bulk_insert_network(sentry.provider(), &mac_addresses, Utc::now())
                .await
                .context("failed to save network scan")?;

            Ok(())
        }
        Command::Forecast { file, timezone } => import_forecasts(&pool, &file, timezone).await,
    }
}

fn notifier(url: &str, topic: &str) -> Result<NtfyNotifier> {
    let notifier = NtfyNotifier::new(url, topic).context("failed to build ntfy client")?;
    tracing::debug!(url = notifier.url(), "notifications enabled");
    Ok(notifier)
}

async fn check_air(sentry: &Sentry<PgPool, NtfyNotifier>, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open file: {path:?}"))?;
    let iter = CsvReadingIter::new(file).context("failed to create CSV reading iterator")?;

    let devices: IndexMap<MacAddr6, Device> = sentry
        .provider()
        .devices()
        .await
        .context("failed to get devices")?
        .into_iter()
        .map(|d| (d.mac_address, d))
        .collect();

    let mut readings: IndexMap<MacAddr6, Reading> = IndexMap::new();
    for result in iter {
        let record = result.context("failed to parse CSV record")?;
        let Some(device) = devices.get(&record.mac_address) else {
            tracing::warn!(mac_address = %record.mac_address, "skipping unregistered device");
            continue;
        };
        readings.insert(record.mac_address, reading(device, &record));
    }
    let readings: Vec<Reading> = readings.into_values().collect();

    let air_issues = sentry.check_air(&readings).await;
    let diagnostic_issues = sentry.check_diagnostic(&readings).await;
    tracing::info!(
        readings = readings.len(),
        air_issues = ?air_issues,
        diagnostic_issues = ?diagnostic_issues,
        "air check finished"
    );

    bulk_insert_readings(sentry.provider(), &readings, Utc::now())
        .await
        .context("failed to save readings")?;

    Ok(())
}

fn reading(device: &Device, record: &ReadingRecord) -> Reading {
    let health =
        DeviceModel::detect(&device.name).health(record.battery, record.filter_life_remaining);

    Reading::new(
        device.clone(),
        AirData {
            temperature_celsius: record.temperature_celsius,
            humidity_percent: record.humidity_percent,
            aqi: record.aqi,
        },
        health,
    )
}

async fn import_forecasts(pool: &PgPool, path: &Path, timezone: Tz) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open file: {path:?}"))?;
    let iter = CsvForecastIter::new(file, timezone)
        .context("failed to create CSV forecast iterator")?;

    let mut buffer = Vec::with_capacity(BULK_INSERT_SIZE);
    let mut total = 0;

    for result in iter {
        let record = result.context("failed to parse CSV record")?;
        buffer.push(record);

        if buffer.len() >= BULK_INSERT_SIZE {
            bulk_insert_forecasts(pool, &buffer)
                .await
                .context("failed to bulk insert forecasts")?;
            total += buffer.len();
            buffer.clear();
        }
    }

    if !buffer.is_empty() {
        bulk_insert_forecasts(pool, &buffer)
            .await
            .context("failed to bulk insert remaining forecasts")?;
        total += buffer.len();
    }

    tracing::info!(total, file = ?path, "forecasts imported");

    Ok(())
}
