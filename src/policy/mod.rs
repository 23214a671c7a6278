// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Which keywords an override must carry, and what to do when they're
//! missing.
//!
//! Some keywords can be interpolated ([`check_set_keys`]); others can't, and
//! their absence blocks insertion ([`confirm_required`]).


use log::{debug, trace};

use crate::{
    builder::DatasetType,
    header::{KeywordDocument, KeywordRecord},
    keymaps::{LookupTables, PROJECTION_CODES_COMMA_SEPARATED},
    report::ValidationReport,
};

/// Keywords that are interpolated if they're missing.
pub const CHECK_SET_KEYWORDS: [&str; 4] = ["OBJECT", "INSTRUME", "TELESCOP", "OBSERVER"];

/// Keywords a FITS image header must have; they are never defaulted.
pub const REQUIRED_FITS_KEYWORDS: [&str; 13] = [
    "OBSERVER", "TELESCOP", "INSTRUME", "DATE-OBS", "OBJECT", "BITPIX", "NAXIS", "CTYPE1",
    "CTYPE2", "CRVAL1", "CRVAL2", "CRPIX1", "CRPIX2",
];

/// Keywords a CASA Image header must have; they are never defaulted.
pub const REQUIRED_CASA_KEYWORDS: [&str; 4] = ["OBSERVER", "TELESCOPE", "MJD-OBS", "TARGET"];

const PLACEHOLDER: &str = "Unknown";

/// Objects from the GALFA surveys were all observed with ALFA on Arecibo.
const GALFA_OBJECT_MARKER: &str = "GALFACT";
const GALFA_TELESCOPE: &str = "ARECIBO";
const GALFA_INSTRUMENT: &str = "ALFA";

/// Where interpolated keywords go.
const INTERPOLATION_INDEX: usize = 2;

/// Insert any of [`CHECK_SET_KEYWORDS`] that are missing.
///
/// Missing keywords get an `Unknown` placeholder, except that:
/// - GALFA objects get the Arecibo telescope and the ALFA instrument;
/// - a missing instrument takes the value of the telescope, if there is one.
///
/// Interpolations from the header are warned about; placeholders are noted.
pub fn check_set_keys(doc: &mut KeywordDocument, report: &mut ValidationReport) {
    let galfa = doc
        .text("OBJECT")
        .map(|o| o.contains(GALFA_OBJECT_MARKER))
        .unwrap_or(false);
    let telescope = doc.find("TELESCOP").map(|r| r.raw_value.clone());

    let mut index = INTERPOLATION_INDEX.min(doc.len());
    for keyword in CHECK_SET_KEYWORDS {
        if doc.contains(keyword) {
            trace!("{keyword} present");
            continue;
        }

        let value = match keyword {
            "TELESCOP" if galfa => {
                report.warn(format!("Interpolated value: {keyword} = {GALFA_TELESCOPE}"));
                GALFA_TELESCOPE.to_string()
            }
            "INSTRUME" if galfa => {
                report.warn(format!("Interpolated value: {keyword} = {GALFA_INSTRUMENT}"));
                GALFA_INSTRUMENT.to_string()
            }
            "INSTRUME" if telescope.is_some() => {
                let telescope = telescope.clone().unwrap_or_default();
                report.warn(format!("{keyword} set to {telescope}"));
                telescope
            }
            _ => {
                report.info(format!("Interpolated value: {keyword} = {PLACEHOLDER}"));
                PLACEHOLDER.to_string()
            }
        };
        doc.insert_at(index, KeywordRecord::new(keyword, value));
        index += 1;
    }
}

/// The keywords that must be present for a dataset type. Types that can't be
/// built have none.
pub fn required_keywords(dataset_type: DatasetType) -> &'static [&'static str] {
    match dataset_type {
        DatasetType::FitsImage => &REQUIRED_FITS_KEYWORDS,
        DatasetType::CasaImage => &REQUIRED_CASA_KEYWORDS,
        DatasetType::FitsVisibility | DatasetType::MsVisibility => &[],
    }
}

/// Check that every required keyword is present. Each missing keyword is
/// reported as an error and returned.
pub fn confirm_required(
    doc: &KeywordDocument,
    dataset_type: DatasetType,
    report: &mut ValidationReport,
) -> Vec<&'static str> {
    let missing: Vec<&'static str> = required_keywords(dataset_type)
        .iter()
        .copied()
        .filter(|k| !doc.contains(k))
        .collect();
    for keyword in &missing {
        report.error(format!("VO compliance metadata not found: {keyword}"));
    }
    missing
}

/// Check that CTYPE1 and CTYPE2 describe a direction coordinate with a known
/// projection, e.g. `RA---SIN` and `DEC--SIN`. Returns whether they do.
pub fn check_direction_coordinate(
    doc: &KeywordDocument,
    tables: &LookupTables,
    report: &mut ValidationReport,
) -> bool {
    let mut ok = true;
    let mut found = 0;
    for keyword in ["CTYPE1", "CTYPE2"] {
        let Some(value) = doc.text(keyword) else {
            continue;
        };
        found += 1;

        let axis = value.split('-').next().unwrap_or_default();
        if tables.is_direction_code(axis) {
            debug!("Got direction code {axis} in {keyword}");
        } else {
            report.error(format!("Unrecognized direction coordinate:: {axis}"));
            ok = false;
        }

        match value.rsplit_once('-').map(|(_, p)| p) {
            Some(projection) if tables.is_projection_code(projection) => {
                debug!("Got projection code {projection} in {keyword}");
            }
            Some(projection) if !projection.is_empty() => {
                debug!("Known projection codes: {}", *PROJECTION_CODES_COMMA_SEPARATED);
                report.error(format!("Unrecognized FITS projection code:: {projection}"));
                ok = false;
            }
            _ => {
                report.error("No parsable projection code");
                ok = false;
            }
        }
    }

    if found != 2 {
        report.error("VO services require a Direction Coordinate. None Found.");
        ok = false;
    }
    ok
}
