// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ordered keyword documents, and the adapters that read and write them in
//! FITS and CASA-Image textual header formats.
//!
//! Keyword uniqueness is not enforced; lookups return the first match in
//! document order. Insertions are keyed on the content of the document (e.g.
//! "after DATE-OBS") rather than numeric offsets.

mod casa;
mod error;
mod fits;

pub use casa::CasaImageAdapter;
pub use error::HeaderError;
pub use fits::FitsAdapter;

use crate::report::ValidationReport;

/// The lexical grammar of a header format.
pub trait FormatAdapter {
    /// Parse raw header text into a document. Parsing is best effort; lines
    /// that can't be understood are skipped.
    fn parse(&self, raw: &str) -> KeywordDocument;

    /// Check that `raw` carries this format's signature. If it doesn't, an
    /// error is recorded and `false` returned.
    fn check_signature(&self, raw: &str, report: &mut ValidationReport) -> bool;

    /// Render a single record. The result always uses `=` as the field
    /// separator and has no trailing newline.
    fn render_record(&self, record: &KeywordRecord) -> String;

    /// Render a whole document, one newline-terminated record per line.
    fn render(&self, doc: &KeywordDocument) -> String {
        let mut out = String::new();
        for record in doc.iter() {
            out.push_str(&self.render_record(record));
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    pub keyword: String,

    /// The value as it appeared in the header (or was inserted), with
    /// surrounding whitespace removed. Quotes are retained.
    pub raw_value: String,

    pub comment: Option<String>,

    /// The 1-indexed line this record was parsed from. Inserted records have
    /// no line.
    pub line: Option<u32>,
}

impl KeywordRecord {
    pub fn new<K: Into<String>, V: Into<String>>(keyword: K, raw_value: V) -> KeywordRecord {
        KeywordRecord {
            keyword: keyword.into(),
            raw_value: raw_value.into(),
            comment: None,
            line: None,
        }
    }

    /// A record holding a floating-point value.
    pub fn float<K: Into<String>>(keyword: K, value: f64) -> KeywordRecord {
        KeywordRecord::new(keyword, format_float(value))
    }

    /// The value without surrounding whitespace or single quotes.
    pub fn text(&self) -> &str {
        self.raw_value.trim().trim_matches('\'').trim()
    }

    /// Parse the value as a float. FITS-style `D` exponents and a trailing
    /// comma are accepted.
    pub fn number(&self) -> Result<f64, HeaderError> {
        let text = self.text().trim_end_matches(',').trim();
        text.parse::<f64>()
            .or_else(|_| text.replace(['D', 'd'], "E").parse::<f64>())
            .map_err(|_| HeaderError::ParseFloat {
                keyword: self.keyword.clone(),
                value: self.raw_value.clone(),
                line: self.line,
            })
    }

    /// Parse the value as a whole number (e.g. `3` or `3.0`).
    pub fn integer(&self) -> Result<i64, HeaderError> {
        let value = self.number()?;
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(HeaderError::NotAnInteger {
                keyword: self.keyword.clone(),
                value: self.raw_value.clone(),
                line: self.line,
            });
        }
        Ok(value as i64)
    }

    /// Split a two-valued record, e.g. `+44.55.19.95, 04:45:31.695` or
    /// `Declination, Right Ascension`. Values are separated by the first comma
    /// or, without a comma, by whitespace (in which case there must be exactly
    /// two tokens).
    pub fn pair(&self) -> Result<(&str, &str), HeaderError> {
        let text = self.text();
        let bad_arity = |found| HeaderError::BadArity {
            keyword: self.keyword.clone(),
            expected: 2,
            found,
            line: self.line,
        };

        if let Some((first, second)) = text.split_once(',') {
            let (first, second) = (first.trim(), second.trim().trim_end_matches(',').trim());
            if first.is_empty() || second.is_empty() || second.contains(',') {
                return Err(bad_arity(text.split(',').filter(|s| !s.trim().is_empty()).count()));
            }
            Ok((first, second))
        } else {
            let mut tokens = text.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(first), Some(second), None) => Ok((first, second)),
                _ => Err(bad_arity(text.split_whitespace().count())),
            }
        }
    }
}

/// Format a float the way values are written into overrides, e.g. `2000.0`
/// rather than `2000`.
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordDocument {
    records: Vec<KeywordRecord>,
}

impl KeywordDocument {
    pub fn new() -> KeywordDocument {
        KeywordDocument::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<KeywordRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<KeywordRecord> {
        self.records.iter_mut()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.keyword.as_str())
    }

    /// The index of the first record with this keyword.
    pub fn position(&self, keyword: &str) -> Option<usize> {
        self.records.iter().position(|r| r.keyword == keyword)
    }

    /// The index of the last record whose keyword is any of `keywords`.
    pub fn last_position_of(&self, keywords: &[&str]) -> Option<usize> {
        self.records
            .iter()
            .rposition(|r| keywords.contains(&r.keyword.as_str()))
    }

    pub fn find(&self, keyword: &str) -> Option<&KeywordRecord> {
        self.records.iter().find(|r| r.keyword == keyword)
    }

    pub fn find_mut(&mut self, keyword: &str) -> Option<&mut KeywordRecord> {
        self.records.iter_mut().find(|r| r.keyword == keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_some()
    }

    /// The raw value of the first record with this keyword.
    pub fn value(&self, keyword: &str) -> Option<&str> {
        self.find(keyword).map(|r| r.raw_value.as_str())
    }

    /// The unquoted, trimmed value of the first record with this keyword.
    pub fn text(&self, keyword: &str) -> Option<&str> {
        self.find(keyword).map(|r| r.text())
    }

    /// The numeric value of the first record with this keyword. `Ok(None)`
    /// means the keyword isn't present.
    pub fn number(&self, keyword: &str) -> Result<Option<f64>, HeaderError> {
        self.find(keyword).map(|r| r.number()).transpose()
    }

    /// Insert a record at `index`. Indices past the end append.
    pub fn insert_at(&mut self, index: usize, record: KeywordRecord) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    /// Insert records in order, starting at `index`.
    pub fn insert_many_at<I: IntoIterator<Item = KeywordRecord>>(&mut self, index: usize, records: I) {
        let mut index = index.min(self.records.len());
        for record in records {
            self.records.insert(index, record);
            index += 1;
        }
    }

    pub fn push(&mut self, record: KeywordRecord) {
        self.records.push(record);
    }

    /// Insert a record directly after the first record with keyword `anchor`.
    pub fn insert_after(&mut self, anchor: &str, record: KeywordRecord) -> Result<(), HeaderError> {
        self.insert_many_after(anchor, [record])
    }

    /// Insert a record directly before the first record with keyword `anchor`.
    pub fn insert_before(&mut self, anchor: &str, record: KeywordRecord) -> Result<(), HeaderError> {
        let index = self.anchor(anchor)?;
        self.records.insert(index, record);
        Ok(())
    }

    /// Insert records, in order, directly after the first record with keyword
    /// `anchor`.
    pub fn insert_many_after<I: IntoIterator<Item = KeywordRecord>>(
        &mut self,
        anchor: &str,
        records: I,
    ) -> Result<(), HeaderError> {
        let index = self.anchor(anchor)?;
        self.insert_many_at(index + 1, records);
        Ok(())
    }

    /// Replace the value of the first record with this keyword. Its comment is
    /// dropped.
    pub fn set_value<V: Into<String>>(&mut self, keyword: &str, value: V) -> Result<(), HeaderError> {
        let record = self
            .find_mut(keyword)
            .ok_or_else(|| HeaderError::MissingKeyword(keyword.to_string()))?;
        record.raw_value = value.into();
        record.comment = None;
        Ok(())
    }

    /// Remove the first record with this keyword.
    pub fn remove(&mut self, keyword: &str) -> Option<KeywordRecord> {
        self.position(keyword).map(|i| self.records.remove(i))
    }

    /// Remove the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> KeywordRecord {
        self.records.remove(index)
    }

    fn anchor(&self, keyword: &str) -> Result<usize, HeaderError> {
        self.position(keyword)
            .ok_or_else(|| HeaderError::AnchorNotFound(keyword.to_string()))
    }
}

impl FromIterator<KeywordRecord> for KeywordDocument {
    fn from_iter<I: IntoIterator<Item = KeywordRecord>>(iter: I) -> Self {
        KeywordDocument {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeywordDocument {
    type Item = &'a KeywordRecord;
    type IntoIter = std::slice::Iter<'a, KeywordRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
