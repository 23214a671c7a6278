// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod no_stderr;
mod override_files;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

use wcs_override::config::CONFIG_DIR_ENV;

/// The wcs-override binary, isolated from any configuration file on this
/// machine: `$HOME` is `home` and `$WCS_OVERRIDE_DIR` is unset.
fn wcs_override(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wcs-override").unwrap();
    cmd.env("HOME", home).env_remove(CONFIG_DIR_ENV);
    cmd
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// The absolute path to a test header.
fn header(name: &str) -> PathBuf {
    let path = PathBuf::from("test_files/headers").join(name);
    assert!(
        path.exists(),
        "Could not find {}, which is required for this test",
        path.display()
    );
    path.canonicalize().unwrap()
}

fn read(path: PathBuf) -> String {
    assert!(path.exists(), "{} wasn't written", path.display());
    std::fs::read_to_string(path).unwrap()
}
