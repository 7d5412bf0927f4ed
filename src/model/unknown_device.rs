use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use macaddr::MacAddr6;

/// A MAC address seen on the local network with no matching registered device.
#[derive(Debug, Clone)]
pub struct UnknownDevice {
    pub mac_address: MacAddr6,

    pub last_seen: DateTime<Utc>,
}

impl PartialEq for UnknownDevice {
    fn eq(&self, other: &Self) -> bool {
        self.mac_address == other.mac_address
    }
}

impl Eq for UnknownDevice {}

impl Hash for UnknownDevice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mac_address.hash(state);
    }
}
