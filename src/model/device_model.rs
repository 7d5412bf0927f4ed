use crate::model::Health;

/// Hardware family of an air device, detected from its registered name.
///
/// The family decides which consumable a reading reports: monitors and the
/// virtual outside thermometer run on a battery, purifiers wear down a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    AirPurifier,
    AirMonitor,
    OutsideThermometer,
    Other,
}

/// Battery level assumed for a thermometer that does not report one.
const THERMOMETER_DEFAULT_BATTERY: u8 = 100;

impl DeviceModel {
    pub fn detect(device_name: &str) -> Self {
        let name = device_name.to_lowercase();
        if name.contains("purifier") {
            DeviceModel::AirPurifier
        } else if name.contains("monitor") {
            DeviceModel::AirMonitor
        } else if name.contains("thermometer") {
            DeviceModel::OutsideThermometer
        } else {
            DeviceModel::Other
        }
    }

    /// Keeps only the consumable this family actually reports.
    pub fn health(self, battery: Option<u8>, filter_life_remaining: Option<u8>) -> Health {
        match self {
            DeviceModel::AirMonitor => Health::Monitor { battery },
            DeviceModel::AirPurifier => Health::Purifier {
                filter_life_remaining,
            },
            DeviceModel::OutsideThermometer => Health::Thermometer {
                battery: battery.unwrap_or(THERMOMETER_DEFAULT_BATTERY),
            },
            DeviceModel::Other => Health::None,
        }
    }
}
