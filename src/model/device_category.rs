use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCategory {
    Network,
    Air,
    Other,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Network => "network",
            DeviceCategory::Air => "air",
            DeviceCategory::Other => "other",
        }
    }
}

impl FromStr for DeviceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "network" => Ok(DeviceCategory::Network),
            "air" => Ok(DeviceCategory::Air),
            "other" => Ok(DeviceCategory::Other),
            _ => bail!("unknown device category: {}", s),
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories() {
        assert_eq!("air".parse::<DeviceCategory>().unwrap(), DeviceCategory::Air);
        assert_eq!(
            "network".parse::<DeviceCategory>().unwrap(),
            DeviceCategory::Network
        );
        assert_eq!(
            "other".parse::<DeviceCategory>().unwrap(),
            DeviceCategory::Other
        );
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "lighting".parse::<DeviceCategory>().unwrap_err();
        assert_eq!(err.to_string(), "unknown device category: lighting");
    }

    #[test]
    fn test_display_matches_registry_form() {
        assert_eq!(DeviceCategory::Air.to_string(), "air");
    }
}
