//! Local civil time for journey planner requests
//!
//! Calendar sources usually hand out UTC instants (`...Z`), while the journey
//! planner expects the travel region's wall-clock time with its UTC offset.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::TransitError;

const REQUEST_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Rule for finding the travel region's UTC offset at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalTimePolicy {
    /// Look the offset up in the IANA timezone database
    Zone {
        /// IANA zone name, e.g. `Europe/Oslo`
        time_zone: Tz,
    },
    /// Months March through October use the summer offset, the rest the
    /// standard offset. Wrong for the days around the DST switch.
    Seasonal {
        /// Offset from UTC in hours outside summer
        standard_offset_hours: i32,
        /// Offset from UTC in hours from March to October
        summer_offset_hours: i32,
    },
}

impl Default for LocalTimePolicy {
    fn default() -> Self {
        Self::Zone {
            time_zone: chrono_tz::Europe::Oslo,
        }
    }
}

impl LocalTimePolicy {
    /// The seasonal rule with Central European offsets (+01:00 / +02:00)
    #[must_use]
    pub const fn central_european_seasonal() -> Self {
        Self::Seasonal {
            standard_offset_hours: 1,
            summer_offset_hours: 2,
        }
    }

    /// Validate offsets of the seasonal rule
    ///
    /// # Errors
    ///
    /// Returns an error if an offset lies outside -12..=14 hours.
    pub fn validate(&self) -> Result<(), String> {
        if let Self::Seasonal {
            standard_offset_hours,
            summer_offset_hours,
        } = self
        {
            for hours in [standard_offset_hours, summer_offset_hours] {
                if !(-12..=14).contains(hours) {
                    return Err(format!("UTC offset {hours}h is out of range"));
                }
            }
        }
        Ok(())
    }

    /// Convert a UTC instant to the region's local time
    #[must_use]
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Zone { time_zone } => instant.with_timezone(time_zone).fixed_offset(),
            Self::Seasonal { .. } => {
                let offset = self.seasonal_offset(instant.month0());
                instant.with_timezone(&offset)
            },
        }
    }

    /// Attach the region's offset to a wall-clock time
    ///
    /// Returns `None` for times that do not exist locally (skipped by a DST
    /// switch). Ambiguous times resolve to the earlier instant.
    #[must_use]
    pub fn from_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Zone { time_zone } => time_zone
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Self::Seasonal { .. } => self
                .seasonal_offset(local.month0())
                .from_local_datetime(&local)
                .single(),
        }
    }

    fn seasonal_offset(&self, month0: u32) -> FixedOffset {
        let Self::Seasonal {
            standard_offset_hours,
            summer_offset_hours,
        } = self
        else {
            return Utc.fix();
        };

        let hours = if (2..=9).contains(&month0) {
            *summer_offset_hours
        } else {
            *standard_offset_hours
        };
        FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

/// Format an event start time for the journey planner's `dateTime` variable
///
/// - `...Z` (plain UTC) is converted to local time with its offset.
/// - Any other timestamp with a time part already carries an explicit offset
///   (or is deliberately local) and is passed through unchanged.
/// - A bare date (all-day event) is read as UTC midnight, the same instant
///   calendar events are ordered by, and converted like `...Z`.
///
/// # Errors
///
/// Returns [`TransitError::InvalidArrivalTime`] when the string cannot be parsed.
pub fn format_arrival(raw: &str, policy: &LocalTimePolicy) -> Result<String, TransitError> {
    let trimmed = raw.trim();

    if trimmed.ends_with('Z') || trimmed.ends_with('z') {
        let instant = DateTime::parse_from_rfc3339(trimmed)
            .map_err(|e| TransitError::InvalidArrivalTime(format!("{trimmed}: {e}")))?
            .with_timezone(&Utc);
        return Ok(policy.localize(instant).format(REQUEST_FORMAT).to_string());
    }

    if trimmed.contains('T') {
        return Ok(trimmed.to_string());
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| TransitError::InvalidArrivalTime(format!("{trimmed}: {e}")))?;
    let instant = date.and_time(NaiveTime::MIN).and_utc();
    Ok(policy.localize(instant).format(REQUEST_FORMAT).to_string())
}
