// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The leveled message log produced while building an override, and its
//! rendering into validation (and "nogo") files.


use chrono::NaiveDate;
use log::{debug, error, warn};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::constants::{PKG_NAME, PKG_VERSION};

/// The severity of a validation message. Any [`Level::Error`] blocks
/// insertion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub level: Level,
    pub text: String,
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level, self.text)
    }
}

/// Append-only; messages are kept in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    messages: Vec<ValidationMessage>,
}

impl ValidationReport {
    pub fn new() -> ValidationReport {
        ValidationReport::default()
    }

    pub fn push<S: Into<String>>(&mut self, level: Level, text: S) {
        let text = text.into();
        match level {
            Level::Info => debug!("{text}"),
            Level::Warn => warn!("{text}"),
            Level::Error => error!("{text}"),
        }
        self.messages.push(ValidationMessage { level, text });
    }

    pub fn info<S: Into<String>>(&mut self, text: S) {
        self.push(Level::Info, text);
    }

    pub fn warn<S: Into<String>>(&mut self, text: S) {
        self.push(Level::Warn, text);
    }

    pub fn error<S: Into<String>>(&mut self, text: S) {
        self.push(Level::Error, text);
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == Level::Error)
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages.iter().filter(|m| m.level == level).count()
    }

    /// Does any message at `level` have exactly this text?
    pub fn contains(&self, level: Level, text: &str) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == level && m.text == text)
    }

    /// Render the validation file for the override written to `subject`.
    pub fn render(&self, subject: &str, written: NaiveDate) -> String {
        let mut out = report_preamble(subject, written);
        for message in &self.messages {
            out.push_str(&format!("{message}\n"));
        }
        out
    }
}

/// Render the marker written for a dataset type that can't be handled.
pub fn render_nogo(subject: &str, mime_type: &str, written: NaiveDate) -> String {
    let mut out = report_preamble(subject, written);
    out.push_str(&format!(
        "{} Unsupported MIME-TYPE: {mime_type}\n",
        Level::Error
    ));
    out
}

fn report_preamble(subject: &str, written: NaiveDate) -> String {
    format!(
        "# {PKG_NAME} Validation report for {subject}\n\
         # Written {}\n\
         # Package Name: {PKG_NAME}\n\
         # Package Version: {PKG_VERSION}\n\
         \n",
        written.format("%Y-%m-%d")
    )
}
