// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::CONFIG_FILE_TYPES_COMMA_SEPARATED;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file {} doesn't exist", .0.display())]
    NotFound(PathBuf),

    #[error("Config file {} doesn't have a recognised file extension! Valid extensions are: {}", .0.display(), *CONFIG_FILE_TYPES_COMMA_SEPARATED)]
    UnknownExtension(PathBuf),

    #[error("Couldn't decode toml structure from {}:\n{err}", .path.display())]
    Toml { path: PathBuf, err: String },

    #[error("Couldn't decode json structure from {}:\n{err}", .path.display())]
    Json { path: PathBuf, err: String },

    #[error("Couldn't serialise the configuration: {0}")]
    Serialise(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
