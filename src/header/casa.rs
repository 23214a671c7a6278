// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! CASA-Image textual headers (`KEY<TAB>VALUE`), as written by `imhead`-style
//! listings.

use log::trace;

use super::{FormatAdapter, KeywordDocument, KeywordRecord};
use crate::report::ValidationReport;

#[derive(Debug, Clone, Copy, Default)]
pub struct CasaImageAdapter;

impl FormatAdapter for CasaImageAdapter {
    fn parse(&self, raw: &str) -> KeywordDocument {
        let doc: KeywordDocument = raw
            .lines()
            .zip(1..)
            .filter_map(|(line, line_num)| {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }
                let (keyword, value) = match line.split_once(char::is_whitespace) {
                    Some((k, v)) => (k, v.trim()),
                    None => (line, ""),
                };
                let mut record = KeywordRecord::new(keyword, value);
                record.line = Some(line_num);
                Some(record)
            })
            .collect();
        trace!("Parsed {} CASA Image header records", doc.len());
        doc
    }

    fn check_signature(&self, raw: &str, report: &mut ValidationReport) -> bool {
        let found = raw
            .lines()
            .next()
            .map(|l| l.contains("CASA Image"))
            .unwrap_or(false);
        if !found {
            report.error("Invalid CASA Image header file. Missing: FILETYPE CASA Image");
        }
        found
    }

    fn render_record(&self, record: &KeywordRecord) -> String {
        let value = record.raw_value.trim_end_matches(['\r', '\n']);
        if value.is_empty() {
            format!("{}=", record.keyword)
        } else {
            format!("{}= {}", record.keyword, value)
        }
    }
}
