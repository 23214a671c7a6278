// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with coordinate transforms.

use thiserror::Error;

use crate::header::HeaderError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordError {
    #[error("Telescope position parameter not found: {0}")]
    MissingGeodeticInput(String),

    #[error("Could not interpret '{input}' as an angle of the form [+-]D.M.S.sss")]
    MalformedAngle { input: String },

    #[error("Could not interpret '{0}' as a right ascension of the form HH:MM:SS.sss")]
    MalformedRightAscension(String),

    #[error("Cannot interpret coordinate, {0}")]
    UnrecognizedCoordinate(String),

    #[error("Unrecognized projection '{0}'")]
    UnrecognizedProjection(String),

    #[error(transparent)]
    Header(#[from] HeaderError),
}
