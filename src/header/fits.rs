// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! FITS-style textual headers (`KEY = VALUE / comment`).

use log::trace;

use super::{FormatAdapter, KeywordDocument, KeywordRecord};
use crate::report::ValidationReport;

/// Keywords whose lines are commentary and never become records.
const COMMENTARY_KEYWORDS: [&str; 3] = ["COMMENT", "HISTORY", "END"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FitsAdapter;

impl FitsAdapter {
    /// Split a line into a record. Returns `None` for blank and commentary
    /// lines.
    fn parse_line(line: &str, line_num: u32) -> Option<KeywordRecord> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (keyword, rest) = match line.split_once('=') {
            Some((k, r)) => (k.trim(), r),
            None => {
                let trimmed = line.trim_start();
                match trimmed.split_once(char::is_whitespace) {
                    Some((k, r)) => (k, r),
                    None => (trimmed, ""),
                }
            }
        };
        if keyword.is_empty()
            || COMMENTARY_KEYWORDS
                .iter()
                .any(|c| keyword == *c || keyword.starts_with(&format!("{c} ")))
        {
            return None;
        }

        let (value, comment) = split_comment(rest);
        Some(KeywordRecord {
            keyword: keyword.to_string(),
            raw_value: value.trim().to_string(),
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            line: Some(line_num),
        })
    }
}

/// Split a value field at the first `/` that isn't inside a quoted string.
fn split_comment(field: &str) -> (&str, Option<&str>) {
    let mut in_quote = false;
    for (i, c) in field.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '/' if !in_quote => return (&field[..i], Some(&field[i + 1..])),
            _ => (),
        }
    }
    (field, None)
}

impl FormatAdapter for FitsAdapter {
    fn parse(&self, raw: &str) -> KeywordDocument {
        let doc: KeywordDocument = raw
            .lines()
            .zip(1..)
            .filter_map(|(line, line_num)| FitsAdapter::parse_line(line, line_num))
            .collect();
        trace!("Parsed {} FITS header records", doc.len());
        doc
    }

    fn check_signature(&self, raw: &str, report: &mut ValidationReport) -> bool {
        // Only the first two meaningful lines may carry the signature.
        let found = raw
            .lines()
            .map(|l| split_comment(l).0.trim())
            .filter(|l| {
                !l.is_empty() && !COMMENTARY_KEYWORDS.iter().any(|c| l.starts_with(c))
            })
            .take(2)
            .any(|l| l.contains("SIMPLE"));
        if !found {
            report.error("Invalid FITS type header file. Missing keyword signifier: SIMPLE");
        }
        found
    }

    fn render_record(&self, record: &KeywordRecord) -> String {
        let value = record.raw_value.trim_end_matches(['\r', '\n']);
        if value.is_empty() {
            format!("{:<8}=", record.keyword)
        } else {
            format!("{:<8}= {}", record.keyword, value)
        }
    }
}
