// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by pipeline steps. Inside a pipeline, these become `ERROR`
//! entries in the validation report.

use thiserror::Error;

use crate::{
    coord::CoordError, header::HeaderError, ref_frame::RefFrameError, time::DateParseError,
    unit_parsing::UnitParseError,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("The header contains no keywords")]
    EmptyHeader,

    #[error("Image dimensions not found: {0}")]
    NoDimensions(&'static str),

    #[error("Invalid number of image dimensions: {0}")]
    InvalidDimensions(i64),

    #[error("WCS metadata not found: {0}")]
    MissingWcs(&'static str),

    #[error("Observation Date not found.")]
    MissingObservationDate,

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error(transparent)]
    Unit(#[from] UnitParseError),

    #[error(transparent)]
    RefFrame(#[from] RefFrameError),

    #[error(transparent)]
    Date(#[from] DateParseError),
}
