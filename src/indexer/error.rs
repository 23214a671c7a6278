// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::builder::DatasetType;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Couldn't parse '{0}' as a URI")]
    BadUri(String),

    #[error("Couldn't find a collection ID in URI '{0}'")]
    NoCollectionId(String),

    #[error("Can't index a {0}-dimensional FITS image; only 2, 3 and 4 dimensions are supported")]
    UnsupportedDimensions(usize),

    #[error("The configuration has no indexer files for {dataset_type} data ([datasets.{key}])")]
    MissingDatasetConfig {
        dataset_type: DatasetType,
        key: &'static str,
    },

    #[error("Can't index {0} data")]
    UnsupportedDatasetType(DatasetType),

    #[error("Couldn't run the indexer '{executable}': {err}")]
    Spawn {
        executable: String,
        err: std::io::Error,
    },

    #[error("The indexer exited with {status}:\n{stderr}")]
    Failed { status: String, stderr: String },
}
