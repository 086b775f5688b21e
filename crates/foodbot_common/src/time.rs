//! Wall-clock access in the canteen's own time zone.

use crate::error::{config_error, FoodbotError};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use foodbot_config::AppConfig;

/// Source of "now" for deadline checks and "today" defaults.
///
/// `Fixed` pins the clock, which the router tests use to land on either side of a deadline.
#[derive(Debug, Clone, Copy)]
pub enum CanteenClock {
    Zone(Tz),
    Fixed(NaiveDateTime),
}

impl CanteenClock {
    /// Clock for the zone named in `canteen.timezone`.
    pub fn from_config(config: &AppConfig) -> Result<Self, FoodbotError> {
        let tz: Tz = config.canteen.timezone.parse().map_err(|e| {
            config_error(format!(
                "invalid canteen.timezone '{}': {}",
                config.canteen.timezone, e
            ))
        })?;
        Ok(CanteenClock::Zone(tz))
    }

    /// Local date and time, without zone.
    pub fn now(&self) -> NaiveDateTime {
        match self {
            CanteenClock::Zone(tz) => Utc::now().with_timezone(tz).naive_local(),
            CanteenClock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_zone_is_config_error() {
        let mut config = AppConfig::default();
        config.canteen.timezone = "Mars/Olympus".to_string();
        let err = CanteenClock::from_config(&config).unwrap_err();
        assert!(matches!(err, FoodbotError::ConfigError(_)));
    }

    #[test]
    fn test_fixed_clock() {
        let at = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(19, 46, 0)
            .unwrap();
        let clock = CanteenClock::Fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.today(), at.date());
    }
}
