// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all wcs-override-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use crate::{builder::BuildError, config::ConfigError, indexer::IndexerError};

/// The README section describing the configuration file.
const CONFIG_DOCS: &str = "the 'Configuration' section of README.md";

/// The *only* publicly visible error from wcs-override.
#[derive(Error, Debug)]
pub enum WcsOverrideError {
    /// An error related to the configuration file.
    #[error("{0}\n\nSee for more info: {CONFIG_DOCS}")]
    Config(String),

    /// A header couldn't be turned into an override at all.
    #[error("{0}")]
    Header(String),

    /// The override was written but failed validation.
    #[error("{0}")]
    Validation(String),

    /// The dataset type can't be handled.
    #[error("{0}")]
    Unsupported(String),

    /// An error related to the indexer. Its settings come from the
    /// configuration file.
    #[error("{0}\n\nSee for more info: {CONFIG_DOCS}")]
    Indexer(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ConfigError> for WcsOverrideError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound(_)
            | ConfigError::UnknownExtension(_)
            | ConfigError::Toml { .. }
            | ConfigError::Json { .. }
            | ConfigError::Serialise(_) => Self::Config(e.to_string()),
            ConfigError::IO(e) => Self::from(e),
        }
    }
}

impl From<BuildError> for WcsOverrideError {
    fn from(e: BuildError) -> Self {
        Self::Header(e.to_string())
    }
}

impl From<IndexerError> for WcsOverrideError {
    fn from(e: IndexerError) -> Self {
        let s = e.to_string();
        match e {
            IndexerError::MissingDatasetConfig { .. } => Self::Config(s),
            IndexerError::UnsupportedDimensions(_) | IndexerError::UnsupportedDatasetType(_) => {
                Self::Unsupported(s)
            }
            IndexerError::BadUri(_)
            | IndexerError::NoCollectionId(_)
            | IndexerError::Spawn { .. }
            | IndexerError::Failed { .. } => Self::Indexer(s),
        }
    }
}

impl From<std::io::Error> for WcsOverrideError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
