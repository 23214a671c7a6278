// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::header::HeaderError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefFrameError {
    #[error("Unrecognized reference frame '{0}'")]
    UnknownReferenceFrame(String),

    #[error("No reference frame keyword (FRAME*) found")]
    MissingReferenceFrame,

    #[error(transparent)]
    Header(#[from] HeaderError),
}
