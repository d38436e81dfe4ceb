//! Minimal calendar-instant collaborator: a wall-clock value plus a zone.
//!
//! This is deliberately not a date/time library. It exists so the locale
//! layer has something to sample and format; all real calendar math lives in
//! `chrono`, and named-zone resolution in `chrono-tz`.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::FormatError;

/// Where an instant's wall-clock fields are anchored.
///
/// `Universal` is the floating case: the instant carries no real-world zone
/// and its fields are treated as-is. `Named` carries an IANA zone name,
/// resolved lazily — an unknown name only surfaces when the instant is
/// actually formatted or converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Zone {
    Universal,
    Named(String),
}

impl Zone {
    pub fn is_universal(&self) -> bool {
        matches!(self, Zone::Universal)
    }

    /// The zone name handed to the formatting engine. The engine has no
    /// concept of a floating instant, so `Universal` reports "UTC"; callers
    /// must not rely on zone-sensitive fields being meaningful in that case.
    pub fn name(&self) -> &str {
        match self {
            Zone::Universal => "UTC",
            Zone::Named(name) => name,
        }
    }

    /// The host's zone, or `Universal` when it cannot be determined.
    pub fn system() -> Zone {
        match iana_time_zone::get_timezone() {
            Ok(name) => Zone::Named(name),
            Err(_) => Zone::Universal,
        }
    }

    pub(crate) fn resolve(&self) -> Result<Option<Tz>, FormatError> {
        match self {
            Zone::Universal => Ok(None),
            Zone::Named(name) => name
                .parse()
                .map(Some)
                .map_err(|_| FormatError::UnknownZone(name.clone())),
        }
    }
}

/// A specific point in calendar time: wall-clock fields plus a [`Zone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instant {
    wall: NaiveDateTime,
    zone: Zone,
}

impl Instant {
    /// Midnight on the given date, universal zone.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, FormatError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, FormatError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(FormatError::InvalidDate { year, month, day })?;
        let wall = date
            .and_hms_opt(hour, minute, second)
            .ok_or(FormatError::InvalidDate { year, month, day })?;
        Ok(Self {
            wall,
            zone: Zone::Universal,
        })
    }

    /// Reinterprets the wall-clock fields in `zone` without shifting them.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn wall(&self) -> NaiveDateTime {
        self.wall
    }

    /// The wall-clock fields reinterpreted as UTC, regardless of zone. This
    /// is the projection used to fake a floating instant past an engine that
    /// only understands real zones.
    pub fn as_if_utc(&self) -> DateTime<Utc> {
        self.wall.and_utc()
    }

    /// The real UTC timestamp of this instant. For a named zone the wall
    /// clock is resolved through the zone's rules; a wall time skipped by a
    /// DST transition is an invalid date, an ambiguous one resolves to its
    /// earlier reading.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        match self.zone.resolve()? {
            None => Ok(self.wall.and_utc()),
            Some(tz) => match tz.from_local_datetime(&self.wall) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    Ok(dt.with_timezone(&Utc))
                }
                LocalResult::None => Err(FormatError::InvalidDate {
                    year: chrono::Datelike::year(&self.wall),
                    month: chrono::Datelike::month(&self.wall),
                    day: chrono::Datelike::day(&self.wall),
                }),
            },
        }
    }
}
