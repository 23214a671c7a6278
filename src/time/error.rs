// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateParseError {
    #[error("Expected {expected} '{separator}'-separated {part} fields in '{input}', but found {found}")]
    WrongFieldCount {
        input: String,
        part: &'static str,
        separator: char,
        expected: usize,
        found: usize,
    },

    #[error("Could not parse the {field} of '{input}'")]
    BadField { input: String, field: &'static str },

    #[error("'{input}' is not a valid UTC date: {reason}")]
    InvalidDate { input: String, reason: String },
}
