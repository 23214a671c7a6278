// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Celestial and spectral reference frame resolution.
//!
//! The celestial defaults follow Calabretta & Greisen (2002), p. 1082, except
//! that the equinox used when nothing is specified is configurable (see
//! [`crate::constants::DEFAULT_EQUINOX`]).

mod error;

pub use error::RefFrameError;

use log::{debug, trace};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    constants::{FK4_EQUINOX, FK5_EQUINOX, FK5_EQUINOX_THRESHOLD},
    header::{format_float, KeywordDocument, KeywordRecord},
    keymaps::LookupTables,
    report::ValidationReport,
};

/// Keywords that together describe the celestial frame. `RADECSYS` is the
/// deprecated spelling of `RADESYS`.
const FRAME_KEYWORDS: [&str; 4] = ["EQUINOX", "EPOCH", "RADESYS", "RADECSYS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum CelestialFrame {
    #[strum(serialize = "FK4")]
    Fk4,

    #[strum(serialize = "FK4-NO-E")]
    Fk4NoE,

    #[strum(serialize = "FK5")]
    Fk5,

    #[strum(serialize = "ICRS")]
    Icrs,
}

impl CelestialFrame {
    /// The frame implied by an equinox when none is given explicitly.
    pub fn from_equinox(equinox: f64) -> CelestialFrame {
        if equinox >= FK5_EQUINOX_THRESHOLD {
            CelestialFrame::Fk5
        } else {
            CelestialFrame::Fk4
        }
    }

    /// The equinox a frame requires, if it requires one.
    pub fn expected_equinox(self) -> Option<f64> {
        match self {
            CelestialFrame::Fk4 | CelestialFrame::Fk4NoE => Some(FK4_EQUINOX),
            CelestialFrame::Fk5 => Some(FK5_EQUINOX),
            CelestialFrame::Icrs => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SpectralFrame {
    Lsrk,
    Heliocent,
    #[default]
    Topocent,
    Lsrd,
    Geocent,
    Source,
    Galactic,
}

/// Make the EQUINOX/RADESYS pair of a FITS document consistent, filling in
/// whatever is missing.
///
/// If both are present, they are only checked; a conflict is reported as an
/// error and nothing is changed. Otherwise, all frame keywords are removed and
/// a consistent pair is written where the first of them was (or at the end of
/// the document).
pub fn resolve_celestial_frame(
    doc: &mut KeywordDocument,
    default_equinox: f64,
    report: &mut ValidationReport,
) -> Result<(), RefFrameError> {
    let radesys = doc
        .text("RADESYS")
        .or_else(|| doc.text("RADECSYS"))
        .map(|s| s.to_string());
    let equinox = doc.number("EQUINOX")?;
    let epoch = doc.number("EPOCH")?;

    if let (Some(radesys), Some(equinox)) = (&radesys, equinox) {
        debug!("Found RADESYS ({radesys}) and EQUINOX ({equinox})");
        // Only frames with a fixed equinox can conflict; others (e.g. GAPPT)
        // are left as they are.
        match radesys.parse::<CelestialFrame>().ok().and_then(|f| f.expected_equinox()) {
            Some(expected) if (expected - equinox).abs() > 1e-6 => {
                report.error("Conflicting RADESYS, EQUINOX");
            }
            _ => (),
        }
        return Ok(());
    }

    let radesys = match radesys {
        Some(s) => match s.parse::<CelestialFrame>() {
            Ok(frame) => Some(frame),
            Err(_) => return Err(RefFrameError::UnknownReferenceFrame(s)),
        },
        None => None,
    };
    let (equinox, frame) = match radesys {
        Some(frame) => {
            let equinox = frame
                .expected_equinox()
                .unwrap_or_else(|| epoch.unwrap_or(default_equinox));
            (equinox, frame)
        }
        None => {
            let equinox = equinox.or(epoch).unwrap_or(default_equinox);
            (equinox, CelestialFrame::from_equinox(equinox))
        }
    };

    // Remove every frame record, remembering where the first one was.
    let mut first_index: Option<usize> = None;
    while let Some(index) = doc.last_position_of(&FRAME_KEYWORDS) {
        let removed = doc.remove_at(index);
        trace!("Removed {}", removed.keyword);
        first_index = Some(index);
    }
    let records = [
        KeywordRecord::float("EQUINOX", equinox),
        KeywordRecord::new("RADESYS", frame.to_string()),
    ];
    match first_index {
        Some(index) => doc.insert_many_at(index, records),
        None => {
            for record in records {
                doc.push(record);
            }
        }
    }
    report.info(format!("Wrote EQUINOX: {}", format_float(equinox)));
    report.info(format!("Wrote RADESYS: {frame}"));
    Ok(())
}

/// Rewrite a CASA Image direction frame (e.g. `FRAME2 J2000`) into a bare
/// equinox and insert the corresponding RADESYS after it.
pub fn resolve_casa_frame(
    doc: &mut KeywordDocument,
    tables: &LookupTables,
    report: &mut ValidationReport,
) -> Result<(), RefFrameError> {
    let keyword = match doc.find("FRAME2") {
        Some(r) => r.keyword.clone(),
        None => doc
            .keywords()
            .find(|k| k.starts_with("FRAME"))
            .map(|k| k.to_string())
            .ok_or(RefFrameError::MissingReferenceFrame)?,
    };
    let value = doc.text(&keyword).unwrap_or_default().to_string();
    let equinox = tables
        .frame_values
        .get(&value)
        .ok_or_else(|| RefFrameError::UnknownReferenceFrame(value.clone()))?
        .clone();
    let frame = match equinox.parse::<f64>() {
        Ok(e) => CelestialFrame::from_equinox(e),
        Err(_) => return Err(RefFrameError::UnknownReferenceFrame(value)),
    };

    debug!("{keyword} {value} becomes {equinox} ({frame})");
    doc.set_value(&keyword, equinox)?;
    doc.insert_after(&keyword, KeywordRecord::new("RADESYS", frame.to_string()))?;
    report.info(format!("Set RADESYS: {frame}"));
    Ok(())
}

/// Ensure the document has a SPECSYS, interpolating it from VELREF where
/// possible.
pub fn resolve_spectral_frame(
    doc: &mut KeywordDocument,
    tables: &LookupTables,
    report: &mut ValidationReport,
) -> Result<(), RefFrameError> {
    if doc.contains("SPECSYS") {
        trace!("SPECSYS present");
        return Ok(());
    }

    match doc.find("VELREF") {
        Some(record) => {
            let code = record.integer()?;
            let frame = match tables.velref.get(&code) {
                Some(f) => *f,
                None => {
                    let frame = SpectralFrame::default();
                    report.warn(format!(
                        "Unrecognized VELREF keyword: {code}. SPECSYS defaulted to {frame}"
                    ));
                    frame
                }
            };
            doc.insert_before("VELREF", KeywordRecord::new("SPECSYS", frame.to_string()))?;
            report.info(format!("VELREF keyword: {code}"));
            report.info(format!("Interpolated SPECSYS Term: {frame}"));
        }
        None => {
            let frame = SpectralFrame::default();
            doc.push(KeywordRecord::new("SPECSYS", frame.to_string()));
            report.info(format!("Wrote default SPECSYS: {frame}"));
        }
    }
    Ok(())
}
