// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Handing an override to the external archive indexer.

mod error;
#[cfg(test)]
mod tests;

pub use error::IndexerError;

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, trace};
use url::{ParseError, Url};

use crate::{
    builder::DatasetType,
    config::{Config, ConfigPair},
};

/// The query parameter that carries a dataset's ID in archive URIs.
const FILE_ID_PARAM: &str = "fileid";

/// Get the collection ID of a dataset from its URI. This is the `fileid` query
/// parameter if there is one, e.g.
/// `http://dms.example.org/dlmanager/getfile?fileid=18868`, otherwise the last
/// path segment, e.g. `www.example.org/pg/file/read/18868`. URIs without a
/// scheme are assumed to be http.
pub fn collection_id(uri: &str) -> Result<String, IndexerError> {
    let url = match Url::parse(uri) {
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("http://{uri}")),
        result => result,
    }
    .map_err(|e| {
        debug!("Couldn't parse {uri}: {e}");
        IndexerError::BadUri(uri.to_string())
    })?;

    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == FILE_ID_PARAM) {
        trace!("Got collection ID {id} from the query of {uri}");
        return Ok(id.into_owned());
    }

    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
        .ok_or_else(|| IndexerError::NoCollectionId(uri.to_string()))
}

/// Select the indexer's config and defaults files for a dataset.
pub fn select_dataset_config(
    config: &Config,
    dataset_type: DatasetType,
    dimensions: usize,
) -> Result<&ConfigPair, IndexerError> {
    let (pair, key) = match (dataset_type, dimensions) {
        (DatasetType::FitsImage, 2) => (&config.datasets.fits_2d, "fits_2d"),
        (DatasetType::FitsImage, 3) => (&config.datasets.fits_3d, "fits_3d"),
        (DatasetType::FitsImage, 4) => (&config.datasets.fits_4d, "fits_4d"),
        (DatasetType::FitsImage, n) => return Err(IndexerError::UnsupportedDimensions(n)),
        (DatasetType::CasaImage, _) => (&config.datasets.cimage, "cimage"),
        (t, _) => return Err(IndexerError::UnsupportedDatasetType(t)),
    };
    pair.as_ref()
        .ok_or(IndexerError::MissingDatasetConfig { dataset_type, key })
}

/// Output captured from the indexer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexerOutput {
    pub stdout: String,
    pub stderr: String,
}

/// An indexer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerCommand {
    executable: String,
    args: Vec<String>,
}

impl IndexerCommand {
    pub fn new(
        config: &Config,
        dataset_type: DatasetType,
        dimensions: usize,
        collection_id: &str,
        override_file: &Path,
        uri: &str,
    ) -> Result<IndexerCommand, IndexerError> {
        let pair = select_dataset_config(config, dataset_type, dimensions)?;

        let mut args: Vec<String> = config
            .indexer
            .switches
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| match name.as_str() {
                // The only short option.
                "verbose" => "-v".to_string(),
                _ => format!("--{name}"),
            })
            .collect();

        let db = &config.database;
        let log_file: PathBuf = config
            .dirs
            .logs
            .join(format!("file_guid_{collection_id}.log"));
        args.extend([
            format!("--server={}", db.server),
            format!("--database={}", db.database),
            format!("--schema={}", db.schema),
            format!("--collection={}", db.collection),
            format!("--collectionID={collection_id}"),
            format!("--uri={uri}"),
            format!("--log={}", log_file.display()),
            format!("--config={}", pair.config.display()),
            format!("--overrides={}", override_file.display()),
            format!("--defaults={}", pair.defaults.display()),
        ]);

        Ok(IndexerCommand {
            executable: config.indexer.executable.clone(),
            args,
        })
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the indexer to completion. A non-zero exit is an error.
    pub fn run(&self) -> Result<IndexerOutput, IndexerError> {
        debug!("Running {self}");
        let output = Command::new(&self.executable)
            .args(&self.args)
            .output()
            .map_err(|err| IndexerError::Spawn {
                executable: self.executable.clone(),
                err,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(IndexerError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }
        Ok(IndexerOutput { stdout, stderr })
    }
}

impl std::fmt::Display for IndexerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
