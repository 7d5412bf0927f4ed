use std::collections::HashSet;

use anyhow::{Context as _, Result};

use crate::model::Reading;
use crate::notifier::{Notifier, Priority};
use crate::provider::ConfigurationProvider;
use crate::sentry::{AirIssue, AirMetric, Sentry, capitalize};

impl<P, N> Sentry<P, N>
where
    P: ConfigurationProvider,
    N: Notifier,
{
    /// Flags temperature, air quality and humidity outside their limits.
    ///
    /// Bounds are inclusive. Each reading is judged on its own and can raise
    /// up to one issue per metric.
    pub async fn check_air(&self, readings: &[Reading]) -> HashSet<AirIssue> {
        tracing::debug!(readings = readings.len(), "verifying air data");

        let mut issues = HashSet::new();
        if let Err(err) = self.evaluate_air(readings, &mut issues).await {
            tracing::error!("air check failed: {err:#}");
        }

        tracing::debug!(issues = issues.len(), "air data verified");
        issues
    }

    async fn evaluate_air(
        &self,
        readings: &[Reading],
        issues: &mut HashSet<AirIssue>,
    ) -> Result<()> {
        let settings = self
            .provider
            .settings()
            .await
            .context("failed to read settings")?;

        for reading in readings {
            let location = reading.location();
            let title = capitalize(location);

            if let Some(temperature) = reading.temperature_celsius()
                && settings.notify_temperature
                && (temperature >= settings.temperature_max
                    || temperature <= settings.temperature_min)
            {
                self.notify(
                    &format!("Temperature is {temperature:.1}°C"),
                    &title,
                    Priority::Default,
                )
                .await;
                issues.insert((AirMetric::Temperature, location.to_string()));
            }

            if let Some(aqi) = reading.aqi()
                && settings.notify_aqi
                && aqi >= settings.aqi_threshold
            {
                self.notify(
                    &format!("Air quality is {aqi}μg/m³"),
                    &title,
                    Priority::Default,
                )
                .await;
                issues.insert((AirMetric::Aqi, location.to_string()));
            }

            if let Some(humidity) = reading.humidity_percent()
                && settings.notify_humidity
                && (humidity >= settings.humidity_max || humidity <= settings.humidity_min)
            {
                self.notify(&format!("Humidity is {humidity}%"), &title, Priority::Default)
                    .await;
                issues.insert((AirMetric::Humidity, location.to_string()));
            }
        }

        Ok(())
    }
}
