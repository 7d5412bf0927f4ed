use std::collections::HashSet;

use anyhow::{Context as _, Result};
use macaddr::MacAddr6;

use crate::notifier::{Notifier, Priority};
use crate::provider::ConfigurationProvider;
use crate::sentry::{NetworkIssue, Sentry};

const NETWORK_TITLE: &str = "Network";

impl<P, N> Sentry<P, N>
where
    P: ConfigurationProvider,
    N: Notifier,
{
    /// Checks the set of MAC addresses active on the local network.
    ///
    /// Reports an overload when too many devices are connected, and an unknown
    /// device when an address is missing from the registry. Every unknown
    /// address is upserted into the unknown-device ledger on each call, and
    /// the `UnknownDevice` marker is recorded even if its notification is
    /// switched off.
    pub async fn check_network(&self, mac_addresses: &HashSet<MacAddr6>) -> HashSet<NetworkIssue> {
        tracing::debug!(addresses = mac_addresses.len(), "verifying network data");

        let mut issues = HashSet::new();
        if let Err(err) = self.evaluate_network(mac_addresses, &mut issues).await {
            tracing::error!("network check failed: {err:#}");
        }

        tracing::debug!(issues = issues.len(), "network data verified");
        issues
    }

    async fn evaluate_network(
        &self,
        mac_addresses: &HashSet<MacAddr6>,
        issues: &mut HashSet<NetworkIssue>,
    ) -> Result<()> {
        let settings = self
            .provider
            .settings()
            .await
            .context("failed to read settings")?;

        let number_of_devices = mac_addresses.len();
        if settings.notify_network_overload
            && number_of_devices >= settings.network_overload_threshold
        {
            tracing::warn!(number_of_devices, "network overload");
            self.notify(
                &format!("Number of active devices = {number_of_devices}"),
                NETWORK_TITLE,
                Priority::Low,
            )
            .await;
            issues.insert(NetworkIssue::Overload);
        }

        let known = self
            .provider
            .known_device_mac_addresses()
            .await
            .context("failed to read known devices")?;

        let mut unknown: Vec<MacAddr6> = mac_addresses.difference(&known).copied().collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort();

        tracing::warn!(
            count = unknown.len(),
            "unknown device is connected to local network"
        );
        if settings.notify_unknown_device {
            self.notify(
                "Unknown device connected to local network",
                NETWORK_TITLE,
                Priority::High,
            )
            .await;
        }
        issues.insert(NetworkIssue::UnknownDevice);

        for mac_address in unknown {
            if let Err(err) = self.provider.record_unknown(mac_address).await {
                tracing::error!(%mac_address, "failed to record unknown device: {err:#}");
            }
        }

        Ok(())
    }
}
