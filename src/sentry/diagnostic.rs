use std::collections::HashSet;

use anyhow::{Context as _, Result};

use crate::model::Reading;
use crate::notifier::{Notifier, Priority};
use crate::provider::ConfigurationProvider;
use crate::sentry::{DiagnosticIssue, Sentry};

impl<P, N> Sentry<P, N>
where
    P: ConfigurationProvider,
    N: Notifier,
{
    /// Flags batteries and filters at or below the minimum health level.
    pub async fn check_diagnostic(&self, readings: &[Reading]) -> HashSet<DiagnosticIssue> {
        tracing::debug!(readings = readings.len(), "verifying diagnostic data");

        let mut issues = HashSet::new();
        if let Err(err) = self.evaluate_diagnostic(readings, &mut issues).await {
            tracing::error!("diagnostic check failed: {err:#}");
        }

        tracing::debug!(issues = issues.len(), "diagnostic data verified");
        issues
    }

    async fn evaluate_diagnostic(
        &self,
        readings: &[Reading],
        issues: &mut HashSet<DiagnosticIssue>,
    ) -> Result<()> {
        let settings = self
            .provider
            .settings()
            .await
            .context("failed to read settings")?;

        for reading in readings {
            let device = reading.device();

            for (field, value) in reading.health().fields() {
                let Some(value) = value else {
                    continue;
                };

                if !settings.notify_health || value > settings.health_threshold {
                    continue;
                }

                tracing::warn!(
                    device = %device.name,
                    location = %device.location,
                    %field,
                    value,
                    "device consumable running low"
                );
                self.notify(
                    &format!("Poziom {} wynosi {value}%", field.localized()),
                    &format!("{} - {}", device.name, device.location),
                    Priority::High,
                )
                .await;
                issues.insert((field, device.location.clone()));
            }
        }

        Ok(())
    }
}
