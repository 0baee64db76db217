//! Options for the flexible date parser.

use chrono_tz::Tz;

use crate::error::TemporalError;
use crate::tz_cache::resolve_timezone;

/// Options for [`crate::FlexibleDateParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Zone used for inputs that carry no UTC offset. Defaults to UTC.
    pub timezone: Tz,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

impl ParseOptions {
    /// Options with the zone looked up by IANA name.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidTimezone`] if the name is not a known zone.
    pub fn with_timezone_name(name: &str) -> Result<Self, TemporalError> {
        Ok(Self {
            timezone: resolve_timezone(name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_utc() {
        assert_eq!(ParseOptions::default().timezone, Tz::UTC);
    }

    #[test]
    fn test_with_timezone_name() {
        let options = ParseOptions::with_timezone_name("America/New_York").unwrap();
        assert_eq!(options.timezone, Tz::America__New_York);
        assert!(ParseOptions::with_timezone_name("Nowhere/Special").is_err());
    }
}
