use std::hash::{Hash, Hasher};
use std::net::IpAddr;

use macaddr::MacAddr6;

use crate::model::DeviceCategory;

/// A registered sensor or network device.
///
/// Equality and hashing look only at `mac_address`: two records with the same
/// MAC are the same device even if the rest of their fields disagree.
#[derive(Debug, Clone)]
pub struct Device {
    pub name: String,

    pub location: String,

    pub category: DeviceCategory,

    pub brand: String,

    pub mac_address: MacAddr6,

    pub ip_address: Option<IpAddr>,

    pub token: Option<String>,
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.mac_address == other.mac_address
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mac_address.hash(state);
    }
}
