//! Wall-clock times for GTFS schedules.
//!
//! GTFS stores stop times as "HH:MM:SS" strings relative to the start of the
//! service day, with no date attached. Trips that run past midnight keep
//! counting, so "25:10:00" is a valid time ten minutes past one in the
//! morning of the following calendar day. This module provides types for
//! working with those times without ever converting them into calendar
//! timestamps.

use std::fmt;

/// Timestamp used when a caller does not supply a start time.
///
/// The dataset has no notion of "today", so queries without an explicit
/// start time are answered for this fixed moment.
pub const FALLBACK_START_TIME: &str = "2025-04-02T08:00:00Z";

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A GTFS time of day, stored zero-padded as "HH:MM:SS".
///
/// Ordering is byte-wise on the padded form, which for two-digit hours is
/// the same as numeric ordering. Hours from 24 to 99 are accepted and kept
/// as-is.
///
/// # Examples
///
/// ```
/// use transit_server::domain::GtfsTime;
///
/// let t = GtfsTime::parse("8:05:00").unwrap();
/// assert_eq!(t.to_string(), "08:05:00");
///
/// let late = GtfsTime::parse("25:10:00").unwrap();
/// assert!(late > t);
/// assert_eq!(late.seconds_since_midnight(), 25 * 3600 + 600);
///
/// assert!(GtfsTime::parse("08:60:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GtfsTime([u8; 8]);

impl GtfsTime {
    /// Parse "HH:MM:SS" or "H:MM:SS".
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        let padded: [u8; 8] = match bytes.len() {
            8 => [
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ],
            7 => [
                b'0', bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6],
            ],
            _ => return Err(TimeError::new("expected HH:MM:SS format")),
        };

        if padded[2] != b':' || padded[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }

        parse_two_digits(&padded[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;

        let minute = parse_two_digits(&padded[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second = parse_two_digits(&padded[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(padded))
    }

    /// Returns the time as a zero-padded "HH:MM:SS" string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: only ASCII digits and colons are ever stored
        std::str::from_utf8(&self.0).unwrap()
    }

    /// Returns the hour, which may be 24 or more for trips past midnight.
    pub fn hour(&self) -> u32 {
        two_digits(&self.0[0..2])
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        two_digits(&self.0[3..5])
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u32 {
        two_digits(&self.0[6..8])
    }

    /// Seconds elapsed since the start of the service day.
    pub fn seconds_since_midnight(&self) -> u32 {
        self.hour() * 3600 + self.minute() * 60 + self.second()
    }
}

impl fmt::Debug for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GtfsTime({})", self.as_str())
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

fn two_digits(bytes: &[u8]) -> u32 {
    parse_two_digits(bytes).unwrap_or(0)
}

/// The caller's requested start moment, split into a date label and a
/// cutoff time of day.
///
/// This is deliberately not a calendar parse. The date part is whatever
/// precedes the first `T` and is only ever echoed back when stitching
/// result timestamps. The time part is the text between the `T` and the
/// trailing `Z`, with any fractional seconds or numeric offset dropped. No
/// timezone conversion takes place.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StartTime;
///
/// let start = StartTime::parse("2025-06-17T10:00:00.000Z").unwrap();
/// assert_eq!(start.date(), "2025-06-17");
/// assert_eq!(start.cutoff().as_str(), "10:00:00");
///
/// let start = StartTime::parse("2025-04-02T08:30:00+02:00").unwrap();
/// assert_eq!(start.cutoff().as_str(), "08:30:00");
///
/// assert!(StartTime::parse("08:30:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTime {
    raw: String,
    date: String,
    cutoff: GtfsTime,
}

impl StartTime {
    /// Extract the date label and cutoff from an ISO-8601-shaped timestamp.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let sep = s
            .find('T')
            .ok_or_else(|| TimeError::new("expected date and time separated by 'T'"))?;

        let date = &s[..sep];
        if date.is_empty() {
            return Err(TimeError::new("missing date before 'T'"));
        }

        let rest = &s[sep + 1..];
        let rest = rest.strip_suffix('Z').unwrap_or(rest);
        let clock = rest
            .split(['.', '+', '-'])
            .next()
            .unwrap_or_default();

        let cutoff = GtfsTime::parse(clock)?;

        Ok(Self {
            raw: s.to_string(),
            date: date.to_string(),
            cutoff,
        })
    }

    /// The timestamp exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The date label preceding the `T` separator.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The time-of-day threshold for departures.
    pub fn cutoff(&self) -> GtfsTime {
        self.cutoff
    }

    /// Attach this start time's date to a schedule time.
    ///
    /// The result is `{date}T{HH:MM:SS}Z`. Hours of 24 or more are passed
    /// through unchanged, so the output is not always a valid calendar
    /// timestamp.
    pub fn stitch(&self, time: GtfsTime) -> String {
        format!("{}T{}Z", self.date, time)
    }
}

impl Default for StartTime {
    fn default() -> Self {
        Self {
            raw: FALLBACK_START_TIME.to_string(),
            date: "2025-04-02".to_string(),
            cutoff: GtfsTime(*b"08:00:00"),
        }
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
