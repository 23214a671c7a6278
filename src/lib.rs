// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Normalise FITS and CASA-Image textual headers into validated WCS "override"
keyword sets, ready for an archival indexer.
 */

pub mod builder;
mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod header;
pub mod indexer;
pub mod keymaps;
pub mod policy;
pub mod ref_frame;
pub mod report;
pub mod time;
pub mod unit_parsing;

// Re-exports.
pub use builder::{build_override, DatasetType, Outcome, OverrideOptions};
pub use cli::{WcsOverride, WcsOverrideError};
pub use header::{KeywordDocument, KeywordRecord};
pub use keymaps::LookupTables;
pub use report::{Level, ValidationReport};
