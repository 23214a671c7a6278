// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All floating-point constants are double precision.
 */

/// WGS84 semi-major axis \[metres\].
pub const WGS84_A: f64 = 6378137.0;

/// WGS84 flattening (1/298.257223563).
pub const WGS84_FL: f64 = 0.00335281066475;

/// The equinox used when a FITS header specifies no celestial reference frame
/// at all. The FITS WCS papers (Calabretta & Greisen 2002, p. 1082) give
/// 1950.0 here; archived products use 2000.0 instead.
pub const DEFAULT_EQUINOX: f64 = 2000.0;

/// Equinoxes at or after this year imply FK5, earlier ones FK4.
pub const FK5_EQUINOX_THRESHOLD: f64 = 1984.0;

pub const FK5_EQUINOX: f64 = 2000.0;
pub const FK4_EQUINOX: f64 = 1950.0;

/// Observation date inserted when a FITS header has no DATE-OBS.
pub const DEFAULT_DATE_OBS: &str = "2020-01-01";

/// Metadata release date for datasets that aren't public.
pub const EMBARGOED_META_RELEASE: &str = "2099-01-01";

/// Value of the PROJEKT database keyword.
pub const PROJECT_NAME: &str = "CYBERSKADQS";

/// Reference pixel of the synthetic time axis.
pub const TIME_AXIS_CRPIX: f64 = 0.5;

/// Pixel width of the synthetic time axis \[days\] (roughly one second).
pub const TIME_AXIS_CDELT_DAYS: f64 = 0.0000115;

/// Name and version of this package, written into overrides and reports.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
