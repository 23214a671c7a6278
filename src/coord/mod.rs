// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Coordinate transforms used when building overrides.

These are small numerical helpers: geodetic to geocentric positions, angles
written as dotted sexagesimal strings, CD matrices and the translation of CASA
coordinate names into FITS CTYPEs.
 */

mod error;
#[cfg(test)]
mod tests;

pub use error::CoordError;

use crate::{
    constants::{WGS84_A, WGS84_FL},
    header::{KeywordDocument, KeywordRecord},
    keymaps::LookupTables,
};

/// A position on the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticPosition {
    /// Geodetic latitude \[radians\]
    pub latitude_rad: f64,
    /// Longitude, east of Greenwich \[radians\]
    pub longitude_rad: f64,
    /// Height above the ellipsoid \[metres\]
    pub height_m: f64,
}

/// Earth-centred, Earth-fixed (ITRF) coordinates. All units are in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeocentricPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeodeticPosition {
    pub fn to_geocentric(self) -> GeocentricPosition {
        geodetic_to_geocentric(self.latitude_rad, self.longitude_rad, self.height_m)
    }

    /// Read a position from the keywords `latitude`, `longitude` and `height`
    /// of a document.
    pub fn from_document(
        doc: &KeywordDocument,
        latitude: &str,
        longitude: &str,
        height: &str,
    ) -> Result<GeodeticPosition, CoordError> {
        let get = |keyword: &str| -> Result<f64, CoordError> {
            doc.number(keyword)?
                .ok_or_else(|| CoordError::MissingGeodeticInput(keyword.to_string()))
        };
        Ok(GeodeticPosition {
            latitude_rad: get(latitude)?,
            longitude_rad: get(longitude)?,
            height_m: get(height)?,
        })
    }
}

/// Convert a geodetic latitude, longitude \[radians\] and height \[metres\]
/// into geocentric coordinates on the WGS84 ellipsoid.
///
/// The equations are those of the NGS XYZWIN package.
pub fn geodetic_to_geocentric(latitude: f64, longitude: f64, height: f64) -> GeocentricPosition {
    let f2 = (2.0 - WGS84_FL) * WGS84_FL;
    let f1 = (1.0 - WGS84_FL) * (1.0 - WGS84_FL);

    let (s_lat, c_lat) = latitude.sin_cos();
    let (s_lon, c_lon) = longitude.sin_cos();
    let n = WGS84_A / (1.0 - f2 * s_lat * s_lat).sqrt();

    GeocentricPosition {
        x: (n + height) * c_lat * c_lon,
        y: (n + height) * c_lat * s_lon,
        z: (n * f1 + height) * s_lat,
    }
}

/// Convert an angle written as `[+-]D.M.S[.sss]` (e.g. `+44.55.19.95`, or
/// `-0.0.1.0,` with a trailing comma) into decimal units of `D`.
pub fn decimalize_dms(s: &str) -> Result<f64, CoordError> {
    let malformed = || CoordError::MalformedAngle {
        input: s.to_string(),
    };
    let trimmed = s.trim().trim_end_matches(',');
    let negative = match trimmed.chars().next() {
        Some('-') => true,
        Some('+') => false,
        _ => return Err(malformed()),
    };

    let parts: Vec<&str> = trimmed[1..].split('.').collect();
    let seconds = match parts.as_slice() {
        [_, _, s] => s.to_string(),
        [_, _, s, frac] => format!("{s}.{frac}"),
        _ => return Err(malformed()),
    };
    let degrees: f64 = parts[0].parse().map_err(|_| malformed())?;
    let minutes: f64 = parts[1].parse().map_err(|_| malformed())?;
    let seconds: f64 = seconds.parse().map_err(|_| malformed())?;

    let value = degrees.abs() + (minutes + seconds / 60.0) / 60.0;
    Ok(if negative { -value } else { value })
}

/// Reformat a right ascension `HH:MM:SS.sss` into the dotted form accepted by
/// [`decimalize_dms`], e.g. `+HH.MM.SS.sss`. Hours are never negative, so the
/// sign is always `+`; a `-` sign is malformed.
pub fn format_ra_to_dms(ra: &str) -> Result<String, CoordError> {
    let ra = ra.trim().trim_end_matches(',');
    let fields: Vec<&str> = ra.split(':').collect();
    match fields.as_slice() {
        [h, m, s] if !h.starts_with('-') && !h.is_empty() && !m.is_empty() && !s.is_empty() => {
            Ok(format!("+{}.{m}.{s}", h.trim_start_matches('+')))
        }
        _ => Err(CoordError::MalformedRightAscension(ra.to_string())),
    }
}

/// Convert a right ascension `HH:MM:SS.sss` to degrees.
pub fn ra_hms_to_degrees(ra: &str) -> Result<f64, CoordError> {
    Ok(decimalize_dms(&format_ra_to_dms(ra)?)? * 15.0)
}

/// A FITS CD matrix (Calabretta & Greisen 2002, eq. 189).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CdMatrix {
    pub cd11: f64,
    pub cd12: f64,
    pub cd21: f64,
    pub cd22: f64,
}

impl CdMatrix {
    /// The `CD1_1`, `CD1_2`, `CD2_1` and `CD2_2` records, in that order.
    pub fn to_records(self) -> [KeywordRecord; 4] {
        [
            KeywordRecord::float("CD1_1", self.cd11),
            KeywordRecord::float("CD1_2", self.cd12),
            KeywordRecord::float("CD2_1", self.cd21),
            KeywordRecord::float("CD2_2", self.cd22),
        ]
    }
}

/// Compute a CD matrix from pixel scales and a rotation angle \[degrees\].
pub fn compute_cd_matrix(cdelt1: f64, cdelt2: f64, rotation_deg: f64) -> CdMatrix {
    let (s_rho, c_rho) = rotation_deg.to_radians().sin_cos();
    CdMatrix {
        cd11: cdelt1 * c_rho,
        cd12: -cdelt2 * s_rho,
        cd21: cdelt1 * s_rho,
        cd22: cdelt2 * c_rho,
    }
}

/// Pick a rotation angle; CROTA2 is preferred over CROTA1, and no rotation is
/// zero.
pub fn pick_rotation(crota1: Option<f64>, crota2: Option<f64>) -> f64 {
    crota2.or(crota1).unwrap_or(0.0)
}

/// Translate a CASA coordinate name into `(CTYPEn, value)` pairs, starting at
/// axis `axis_index`.
///
/// A direction coordinate is described by two names joined by `&` (e.g.
/// `Declination & Right Ascension`) and yields two CTYPEs, each carrying the
/// projection suffix. Anything else is a single name mapped directly.
pub fn map_coordinate_name_to_fits(
    descriptor: &str,
    axis_index: usize,
    projection: Option<&str>,
    tables: &LookupTables,
) -> Result<Vec<(String, String)>, CoordError> {
    let unrecognized = || CoordError::UnrecognizedCoordinate(descriptor.to_string());
    let stem = |name: &str| {
        tables
            .coordinate_names
            .get(name.trim())
            .ok_or_else(unrecognized)
    };

    match descriptor.split_once('&') {
        Some((first, second)) => {
            let projection = projection.map(str::trim).unwrap_or_default();
            let suffix = tables
                .projections
                .get(projection)
                .ok_or_else(|| CoordError::UnrecognizedProjection(projection.to_string()))?;
            Ok(vec![
                (
                    format!("CTYPE{axis_index}"),
                    format!("{}{suffix}", stem(first)?),
                ),
                (
                    format!("CTYPE{}", axis_index + 1),
                    format!("{}{suffix}", stem(second)?),
                ),
            ])
        }
        None => Ok(vec![(
            format!("CTYPE{axis_index}"),
            stem(descriptor)?.clone(),
        )]),
    }
}
