//! Changelog timestamps.
//!
//! A [`ChangelogTimestamp`] is a UTC instant at second precision that renders
//! as the 14-digit `YYYYMMDDHHmmss` key used to order migration scripts.
//! Ordering of the rendered strings matches ordering of the instants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

/// `strftime` pattern of the 14-digit key.
pub const CHANGELOG_FORMAT: &str = "%Y%m%d%H%M%S";

/// A 14-digit migration ordering key.
///
/// Invariant: second precision, year within `1000..=9999` so the rendering
/// is always exactly 14 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangelogTimestamp(DateTime<Utc>);

impl ChangelogTimestamp {
    /// Wrap an instant, dropping sub-second precision.
    pub fn from_datetime(instant: DateTime<Utc>) -> Result<Self, DomainError> {
        if !(1000..=9999).contains(&instant.year()) {
            return Err(DomainError::InvalidTimestamp {
                value: instant.to_rfc3339(),
                reason: "year must have four digits".into(),
            });
        }
        Ok(Self(instant.trunc_subsecs(0)))
    }

    /// From epoch milliseconds, as persisted in project configuration.
    pub fn from_millis(millis: i64) -> Result<Self, DomainError> {
        let instant =
            DateTime::from_timestamp_millis(millis).ok_or_else(|| DomainError::InvalidTimestamp {
                value: millis.to_string(),
                reason: "out of range".into(),
            })?;
        Self::from_datetime(instant)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// The key one second later.
    pub fn next_second(&self) -> Result<Self, DomainError> {
        let next = self
            .0
            .checked_add_signed(TimeDelta::seconds(1))
            .ok_or_else(|| DomainError::InvalidTimestamp {
                value: self.to_string(),
                reason: "cannot advance past the end of time".into(),
            })?;
        Self::from_datetime(next)
    }
}

impl fmt::Display for ChangelogTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CHANGELOG_FORMAT))
    }
}

impl FromStr for ChangelogTimestamp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidTimestamp {
                value: s.into(),
                reason: "expected 14 digits (YYYYMMDDHHmmss)".into(),
            });
        }
        let naive = NaiveDateTime::parse_from_str(s, CHANGELOG_FORMAT).map_err(|e| {
            DomainError::InvalidTimestamp {
                value: s.into(),
                reason: e.to_string(),
            }
        })?;
        Self::from_datetime(naive.and_utc())
    }
}

impl Serialize for ChangelogTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChangelogTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a user-supplied base date.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, or the 14-digit form.
pub fn parse_base_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();

    if let Ok(ts) = value.parse::<ChangelogTimestamp>() {
        return Ok(ts.as_datetime());
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(DomainError::InvalidTimestamp {
        value: value.into(),
        reason: "unrecognised date format".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn renders_fourteen_digits() {
        let ts = ChangelogTimestamp::from_datetime(utc(2030, 1, 1, 0, 0, 1)).unwrap();
        assert_eq!(ts.to_string(), "20300101000001");
    }

    #[test]
    fn drops_subsecond_precision() {
        let instant = utc(2020, 5, 17, 8, 30, 0) + TimeDelta::milliseconds(750);
        let ts = ChangelogTimestamp::from_datetime(instant).unwrap();
        assert_eq!(ts.as_millis() % 1000, 0);
        assert_eq!(ts.to_string(), "20200517083000");
    }

    #[test]
    fn parses_its_own_rendering() {
        let ts: ChangelogTimestamp = "20200101123456".parse().unwrap();
        assert_eq!(ts.as_datetime(), utc(2020, 1, 1, 12, 34, 56));
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("2020010112345".parse::<ChangelogTimestamp>().is_err());
        assert!("2020010112345x".parse::<ChangelogTimestamp>().is_err());
        assert!("20201301000000".parse::<ChangelogTimestamp>().is_err());
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        let far = utc(10000, 1, 1, 0, 0, 0);
        assert!(ChangelogTimestamp::from_datetime(far).is_err());
        assert!(ChangelogTimestamp::from_millis(i64::MAX).is_err());
    }

    #[test]
    fn next_second_advances() {
        let ts: ChangelogTimestamp = "20291231235959".parse().unwrap();
        assert_eq!(ts.next_second().unwrap().to_string(), "20300101000000");
    }

    #[test]
    fn base_timestamp_formats() {
        assert_eq!(
            parse_base_timestamp("2020-01-01").unwrap(),
            utc(2020, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            parse_base_timestamp("2020-01-01T10:00:00+02:00").unwrap(),
            utc(2020, 1, 1, 8, 0, 0)
        );
        assert_eq!(
            parse_base_timestamp("20200101080000").unwrap(),
            utc(2020, 1, 1, 8, 0, 0)
        );
        assert!(matches!(
            parse_base_timestamp("yesterday"),
            Err(DomainError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn serializes_as_string() {
        let ts: ChangelogTimestamp = "20200101000000".parse().unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"20200101000000\"");
        let back: ChangelogTimestamp = serde_json::from_str("\"20200101000000\"").unwrap();
        assert_eq!(back, ts);
    }
}
