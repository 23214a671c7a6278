// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_cmd_output, header, wcs_override};

#[test]
fn test_fits_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let hdr = header("ngc1700.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(tmp_dir.path())
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", "http://dms.example.org:8080/dlmanager/getfile?fileid=18868",
            "--output-dir", &tmp_dir.path().display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "wcs-override failed on a good FITS header: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_casa_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let hdr = header("ngc253.cimage.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(tmp_dir.path())
        .args([
            "--mtype", "image/ms-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", "http://www.example.org/pg/file/read/18868/ngc253",
            "--output-dir", &tmp_dir.path().display().to_string(),
            "--nodb",
            "-vv",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "wcs-override failed on a good CASA Image header: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
