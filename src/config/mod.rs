// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run configuration: where artifacts are written, which database the indexer
//! writes to, and the indexer's config/defaults files for each kind of
//! dataset.
//!
//! Every field has a default, so a configuration file only needs to specify
//! what differs. Both toml and json files are accepted.

mod error;

pub use error::ConfigError;

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The name of the configuration file searched for when one isn't given.
pub const CONFIG_FILE_NAME: &str = "wcs_override.toml";

/// An environment variable naming a directory that may hold
/// [`CONFIG_FILE_NAME`].
pub const CONFIG_DIR_ENV: &str = "WCS_OVERRIDE_DIR";

/// The default indexer executable.
pub const DEFAULT_INDEXER: &str = "fits2caom";

lazy_static::lazy_static! {
    pub static ref CONFIG_FILE_TYPES_COMMA_SEPARATED: String = ConfigFileType::iter().join(", ");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub enum ConfigFileType {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dirs: Dirs,
    pub database: Database,
    pub indexer: IndexerSettings,
    pub datasets: Datasets,
}

/// Output directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dirs {
    /// Copies of input headers.
    pub headers: PathBuf,

    /// `.override` files.
    pub overrides: PathBuf,

    /// `.valid` and `.nogo` files.
    pub validate: PathBuf,

    /// Indexer logs.
    pub logs: PathBuf,
}

impl Dirs {
    /// Use a single directory for everything.
    pub fn all_in<P: Into<PathBuf>>(dir: P) -> Dirs {
        let dir = dir.into();
        Dirs {
            headers: dir.clone(),
            overrides: dir.clone(),
            validate: dir.clone(),
            logs: dir,
        }
    }
}

impl Default for Dirs {
    fn default() -> Self {
        Dirs::all_in(".")
    }
}

/// Where the indexer inserts metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub server: String,
    pub database: String,
    pub schema: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerSettings {
    pub executable: String,

    /// Boolean switches, passed to the indexer in this order when `true`.
    pub switches: IndexMap<String, bool>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        IndexerSettings {
            executable: DEFAULT_INDEXER.to_string(),
            switches: IndexMap::new(),
        }
    }
}

/// The indexer's config and defaults files for a kind of dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigPair {
    pub config: PathBuf,
    pub defaults: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datasets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fits_2d: Option<ConfigPair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fits_3d: Option<ConfigPair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fits_4d: Option<ConfigPair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cimage: Option<ConfigPair>,
}

impl Config {
    /// Read a configuration file. The format is determined by the file
    /// extension.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        debug!("Attempting to parse config file {}", path.display());
        let file_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ConfigFileType::from_str(&e).ok())
            .ok_or_else(|| ConfigError::UnknownExtension(path.to_path_buf()))?;

        let mut contents = String::new();
        let mut fh = File::open(path)?;
        fh.read_to_string(&mut contents)?;

        match file_type {
            ConfigFileType::Toml => {
                debug!("Parsing toml file...");
                toml::from_str(&contents).map_err(|err| ConfigError::Toml {
                    path: path.to_path_buf(),
                    err: err.to_string(),
                })
            }
            ConfigFileType::Json => {
                debug!("Parsing json file...");
                serde_json::from_str(&contents).map_err(|err| ConfigError::Json {
                    path: path.to_path_buf(),
                    err: err.to_string(),
                })
            }
        }
    }

    /// Find and read a configuration file. An explicitly-given file must
    /// exist. Otherwise, [`CONFIG_FILE_NAME`] is looked for in `$HOME` and then
    /// in `$WCS_OVERRIDE_DIR`; `Ok(None)` means neither has one.
    pub fn find(explicit: Option<&Path>) -> Result<Option<(PathBuf, Config)>, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(Some((path.to_path_buf(), Config::from_file(path)?)));
        }

        for var in ["HOME", CONFIG_DIR_ENV] {
            let Some(dir) = std::env::var_os(var) else {
                trace!("${var} isn't set");
                continue;
            };
            let candidate = PathBuf::from(dir).join(CONFIG_FILE_NAME);
            trace!("Looking for {}", candidate.display());
            if candidate.exists() {
                let config = Config::from_file(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialise(e.to_string()))
    }
}
