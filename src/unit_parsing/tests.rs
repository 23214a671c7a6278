// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;

use approx::assert_abs_diff_eq;

#[test]
fn test_parse_freq_str_without_units() {
    let result = parse_freq("20");
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let pair = result.unwrap();
    assert_abs_diff_eq!(pair.0, 20.0);
    assert_eq!(pair.1, FreqFormat::NoUnit);

    let result = parse_freq(" 40.0 ");
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let pair = result.unwrap();
    assert_abs_diff_eq!(pair.0, 40.0);
    assert_eq!(pair.1, FreqFormat::NoUnit);

    let result = parse_freq("1.4204e9");
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_abs_diff_eq!(result.unwrap().0, 1.4204e9);
}

#[test]
fn test_parse_freq_str_with_units() {
    // Iterate over all possible units.
    for freq_format in FreqFormat::iter().filter(|&f| f != FreqFormat::NoUnit) {
        let freq_format_str: &'static str = freq_format.into();
        for freq_format_str in [
            freq_format_str.to_lowercase(),
            freq_format_str.to_uppercase(),
        ] {
            for (expected, input) in [
                (20.0, format!("20{}", freq_format_str)),
                (10.0, format!("10.0{}", freq_format_str)),
                (40.0, format!(" 40.0 {} ", freq_format_str)),
                (115.0, format!("115, {}", freq_format_str)),
            ] {
                let result = parse_freq(&input);
                assert!(result.is_ok(), "{:?}", result.unwrap_err());
                let pair = result.unwrap();
                assert_abs_diff_eq!(pair.0, expected);
                assert_eq!(pair.1, freq_format);
            }
        }
    }
}

#[test]
fn test_parse_freq_errors() {
    assert_eq!(
        parse_freq("1.2.3MHz"),
        Err(UnitParseError::GotFreqUnitButCantParse("1.2.3MHz".to_string()))
    );
    assert!(matches!(
        parse_freq("115 parsecs"),
        Err(UnitParseError::Unknown { .. })
    ));
}

#[test]
fn test_normalize_frequency() {
    assert_abs_diff_eq!(normalize_frequency(1.0, "GHz").unwrap(), 1.0e9);
    assert_abs_diff_eq!(normalize_frequency(120.0, "MHz").unwrap(), 1.2e8);
    assert_abs_diff_eq!(normalize_frequency(2.5, "kHz").unwrap(), 2500.0);
    assert_abs_diff_eq!(normalize_frequency(7.0, " Hz ").unwrap(), 7.0);
    assert_eq!(
        normalize_frequency(1.0, "THz"),
        Err(UnitParseError::UnknownFrequencyUnit("THz".to_string()))
    );
}

#[test]
fn test_frequency_to_hz() {
    assert_abs_diff_eq!(frequency_to_hz("115, GHz").unwrap(), 1.15e11);
    assert_abs_diff_eq!(frequency_to_hz("120 MHz").unwrap(), 1.2e8);
    assert_abs_diff_eq!(frequency_to_hz("1420405751.786").unwrap(), 1420405751.786);
}
