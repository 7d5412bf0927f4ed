use chrono::DateTime;
use chrono_tz::Tz;

use crate::model::round_to_tenth;

/// A single point of an external weather forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub forecast_at: DateTime<Tz>,

    pub temperature_celsius: Option<f32>,

    pub humidity_percent: Option<u8>,
}

impl Forecast {
    pub fn new(
        forecast_at: DateTime<Tz>,
        temperature_celsius: Option<f32>,
        humidity_percent: Option<u8>,
    ) -> Self {
        Self {
            forecast_at,
            temperature_celsius: temperature_celsius.map(round_to_tenth),
            humidity_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Europe::Warsaw;

    use super::*;

    #[test]
    fn test_temperature_is_rounded() {
        let at = Warsaw.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let forecast = Forecast::new(at, Some(21.46), Some(40));
        assert_eq!(forecast.temperature_celsius, Some(21.5));
        assert_eq!(forecast.humidity_percent, Some(40));
    }

    #[test]
    fn test_missing_temperature_stays_missing() {
        let at = Warsaw.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let forecast = Forecast::new(at, None, None);
        assert_eq!(forecast.temperature_celsius, None);
    }
}
