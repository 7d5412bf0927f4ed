use std::collections::HashSet;

use anyhow::Result;
use macaddr::MacAddr6;

use crate::model::{Device, UnknownDevice};
use crate::settings::Settings;

/// Live view of settings and the device registry.
///
/// Every call reads the backing store; implementations must not cache.
#[allow(async_fn_in_trait)]
pub trait ConfigurationProvider {
    async fn settings(&self) -> Result<Settings>;

    async fn devices(&self) -> Result<Vec<Device>>;

    async fn known_device_mac_addresses(&self) -> Result<HashSet<MacAddr6>> {
        Ok(self
            .devices()
            .await?
            .into_iter()
            .map(|d| d.mac_address)
            .collect())
    }

    async fn unknown_devices(&self) -> Result<HashSet<UnknownDevice>>;

    /// Inserts the address with the current time, or refreshes its last-seen
    /// time if it is already recorded.
    async fn record_unknown(&self, mac_address: MacAddr6) -> Result<()>;
}
