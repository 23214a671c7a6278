// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation dates: ISO 8601 parsing and conversion to Modified Julian
//! Dates.

mod error;

pub use error::DateParseError;

use hifitime::Epoch;

/// The fields of an ISO 8601 date-time (`yyyy-mm-ddThh:mm:ss.sss`). A date
/// without a time is at midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

/// Parse an ISO 8601 date, e.g. `2011-09-10T18:28:58.511999` or
/// `'2011-09-10'`. Surrounding quotes and whitespace are ignored.
pub fn parse_iso8601(s: &str) -> Result<IsoDateTime, DateParseError> {
    let input = s.trim().trim_matches('\'').trim();
    let (date, time) = match input.split_once('T') {
        Some((d, t)) => (d, Some(t.trim_end_matches('Z'))),
        None => (input, None),
    };

    let field_count = |part, separator, found| DateParseError::WrongFieldCount {
        input: input.to_string(),
        part,
        separator,
        expected: 3,
        found,
    };
    let bad_field = |field| DateParseError::BadField {
        input: input.to_string(),
        field,
    };

    let ymd: Vec<&str> = date.split('-').collect();
    let [year, month, day] = ymd.as_slice() else {
        return Err(field_count("date", '-', ymd.len()));
    };
    let year: i32 = year.trim().parse().map_err(|_| bad_field("year"))?;
    let month: u8 = month.trim().parse().map_err(|_| bad_field("month"))?;
    let day: u8 = day.trim().parse().map_err(|_| bad_field("day"))?;

    let (hour, minute, second) = match time {
        None => (0, 0, 0.0),
        Some(time) => {
            let hms: Vec<&str> = time.split(':').collect();
            let [hour, minute, second] = hms.as_slice() else {
                return Err(field_count("time", ':', hms.len()));
            };
            let hour: u8 = hour.trim().parse().map_err(|_| bad_field("hour"))?;
            let minute: u8 = minute.trim().parse().map_err(|_| bad_field("minute"))?;
            let second: f64 = second.trim().parse().map_err(|_| bad_field("second"))?;
            if !second.is_finite() || second < 0.0 {
                return Err(bad_field("second"));
            }
            (hour, minute, second)
        }
    };

    Ok(IsoDateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

impl IsoDateTime {
    /// This date as a UTC [`Epoch`].
    pub fn to_epoch(&self) -> Result<Epoch, DateParseError> {
        let whole_seconds = self.second.trunc();
        let nanos = ((self.second - whole_seconds) * 1e9).round() as u32;
        Epoch::maybe_from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            whole_seconds as u8,
            nanos,
        )
        .map_err(|e| DateParseError::InvalidDate {
            input: self.to_string(),
            reason: e.to_string(),
        })
    }

    /// The Modified Julian Date (JD - 2400000.5) of this date, in UTC days.
    pub fn to_mjd(&self) -> Result<f64, DateParseError> {
        Ok(self.to_epoch()?.to_mjd_utc_days())
    }
}

impl std::fmt::Display for IsoDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Convert a calendar date and time to a Modified Julian Date.
pub fn to_modified_julian_date(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
) -> Result<f64, DateParseError> {
    IsoDateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
    }
    .to_mjd()
}
