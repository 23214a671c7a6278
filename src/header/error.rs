// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with keyword documents.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaderError {
    #[error("Keyword {0} not found")]
    MissingKeyword(String),

    #[error("Cannot insert relative to {0}; it isn't in the header")]
    AnchorNotFound(String),

    #[error("Could not parse the value of {keyword} ('{value}') as a float{}", fmt_line(.line))]
    ParseFloat {
        keyword: String,
        value: String,
        line: Option<u32>,
    },

    #[error("Expected the value of {keyword} to be an integer, but got '{value}'{}", fmt_line(.line))]
    NotAnInteger {
        keyword: String,
        value: String,
        line: Option<u32>,
    },

    #[error("Expected {expected} values for {keyword}, but found {found}{}", fmt_line(.line))]
    BadArity {
        keyword: String,
        expected: usize,
        found: usize,
        line: Option<u32>,
    },
}

fn fmt_line(line: &Option<u32>) -> String {
    match line {
        Some(l) => format!(" (line {l})"),
        None => String::new(),
    }
}
