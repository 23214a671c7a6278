// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Lookup tables used to translate header vocabularies.
//!
//! The tables are plain data; [`LookupTables::default`] gives the standard
//! mappings, and callers may substitute their own.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::ref_frame::SpectralFrame;

/// Axis codes (the text of a CTYPE before its first '-') that describe a
/// direction coordinate.
pub const DIRECTION_CODES: [&str; 6] = ["RA", "DEC", "GLON", "GLAT", "ELON", "ELAT"];

/// FITS WCS projection codes (Calabretta & Greisen 2002, Table 13).
pub const PROJECTION_CODES: [&str; 27] = [
    "DEF", "AZP", "TAN", "SIN", "STG", "ARC", "ZPN", "ZEA", "AIR", "CYP", "CAR", "MER", "CEA",
    "COP", "COD", "COE", "COO", "BON", "PCO", "SFL", "PAR", "AIT", "MOL", "CSC", "QSC", "TSC",
    "SZP",
];

lazy_static::lazy_static! {
    pub static ref PROJECTION_CODES_COMMA_SEPARATED: String = PROJECTION_CODES.iter().join(", ");
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupTables {
    /// VELREF codes to spectral frames (Greisen et al. 2006, Table 8). Radio
    /// conventions add 256 to the optical code.
    pub velref: BTreeMap<i64, SpectralFrame>,

    /// CASA coordinate names to FITS CTYPE stems. Direction stems are padded
    /// to four characters so that a projection suffix can be appended.
    pub coordinate_names: BTreeMap<String, String>,

    /// Projection codes to CTYPE suffixes.
    pub projections: BTreeMap<String, String>,

    /// CASA direction frame names to equinox strings.
    pub frame_values: BTreeMap<String, String>,

    pub direction_codes: Vec<String>,
    pub projection_codes: Vec<String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        use SpectralFrame::*;

        let mut velref = BTreeMap::new();
        for (code, frame) in (1..).zip([Lsrk, Heliocent, Topocent, Lsrd, Geocent, Source, Galactic]) {
            velref.insert(code, frame);
            velref.insert(code + 256, frame);
        }

        let coordinate_names = [
            ("Frequency", "FREQ"),
            ("Stokes", "STOKES"),
            ("Declination", "DEC-"),
            ("Right Ascension", "RA--"),
            ("Longitude", "GLON"),
            ("Latitude", "GLAT"),
            ("VELOCITY", "VELO"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let projections = PROJECTION_CODES
            .iter()
            .map(|code| (code.to_string(), format!("-{code}")))
            .collect();

        let frame_values = [("J2000", "2000"), ("B1950", "1950"), ("B1950_VLA", "1950")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        LookupTables {
            velref,
            coordinate_names,
            projections,
            frame_values,
            direction_codes: DIRECTION_CODES.iter().map(|s| s.to_string()).collect(),
            projection_codes: PROJECTION_CODES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LookupTables {
    pub fn is_direction_code(&self, code: &str) -> bool {
        self.direction_codes.iter().any(|c| c == code)
    }

    pub fn is_projection_code(&self, code: &str) -> bool {
        self.projection_codes.iter().any(|c| c == code)
    }
}
