// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to parse strings into plain numbers or some quantity with a unit.

mod error;
#[cfg(test)]
mod tests;

pub use error::UnitParseError;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub enum FreqFormat {
    /// Hertz
    Hz,

    /// kiloHertz
    kHz,

    /// MegaHertz
    MHz,

    /// GigaHertz
    GHz,

    NoUnit,
}

impl FreqFormat {
    /// The factor that converts a value in this unit to Hz.
    pub fn multiplier(self) -> f64 {
        match self {
            FreqFormat::Hz | FreqFormat::NoUnit => 1.0,
            FreqFormat::kHz => 1e3,
            FreqFormat::MHz => 1e6,
            FreqFormat::GHz => 1e9,
        }
    }
}

/// Parse a string that may have a unit of frequency attached to it, e.g.
/// `115, GHz` or `120MHz`.
pub fn parse_freq(s: &str) -> Result<(f64, FreqFormat), UnitParseError> {
    // Values are sometimes separated from their units with a comma.
    let s_clean = s.replace(',', " ");
    let s_clean = s_clean.trim();

    // Try to parse a naked number.
    let maybe_number: Option<f64> = s_clean.parse().ok();
    if let Some(number) = maybe_number {
        return Ok((number, FreqFormat::NoUnit));
    };

    // That didn't work; let's search over our supported formats.
    let suffix = &s_clean[s_clean.trim_end_matches(char::is_alphabetic).len()..];
    for freq_format in FreqFormat::iter().filter(|&f| f != FreqFormat::NoUnit) {
        let freq_format_str: &'static str = freq_format.into();
        if suffix.to_uppercase() == freq_format_str.to_uppercase() {
            let prefix = s_clean.trim_end_matches(char::is_alphabetic).trim();
            let number: f64 = match prefix.parse() {
                Ok(n) => n,
                Err(_) => return Err(UnitParseError::GotFreqUnitButCantParse(s.to_string())),
            };
            return Ok((number, freq_format));
        }
    }

    // If we made it this far, we don't know how to parse the string.
    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "frequency",
    })
}

/// Convert a frequency in the named unit (`Hz`, `kHz`, `MHz` or `GHz`) to Hz.
pub fn normalize_frequency(value: f64, unit: &str) -> Result<f64, UnitParseError> {
    let unit = unit.trim();
    FreqFormat::iter()
        .filter(|&f| f != FreqFormat::NoUnit)
        .find(|&f| {
            let s: &'static str = f.into();
            s == unit
        })
        .map(|f| value * f.multiplier())
        .ok_or_else(|| UnitParseError::UnknownFrequencyUnit(unit.to_string()))
}

/// Parse a frequency string with an optional unit and return it in Hz. A value
/// without a unit is assumed to be in Hz already.
pub fn frequency_to_hz(s: &str) -> Result<f64, UnitParseError> {
    let (value, unit) = parse_freq(s)?;
    Ok(value * unit.multiplier())
}
