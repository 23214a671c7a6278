// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests of the artifacts written for each kind of outcome.

use std::fs;

use tempfile::TempDir;

use crate::{get_cmd_output, header, read, wcs_override};

const URI: &str = "http://dms.example.org:8080/dlmanager/getfile?fileid=18868";

#[test]
fn test_fits_override_written() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("ngc1700.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--public",
            "--output-dir", &out.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("No DB request. Done"), "{stdout}");

    let override_text = read(out.join("ngc1700.override"));
    assert!(override_text.starts_with("SIMPLE  = T\nBITPIX  = -32\nMRELEASE= "));
    assert!(override_text.contains(&format!("\nDATAURI = {URI}\n")));
    assert!(override_text.contains("\nSPECSYS = LSRK\nVELREF  = 257\n"));
    assert!(override_text.contains("\nRADESYS = FK5\n"));
    assert!(override_text.contains("\nCTYPE5  = MJD\n"));
    assert!(override_text.contains("\nENGINEER= wcs_override v"));
    assert!(!override_text.contains("HISTORY"));
    assert!(!override_text.contains("END"));

    let valid = read(out.join("ngc1700.valid"));
    assert!(valid.starts_with(&format!(
        "# wcs_override Validation report for {}\n",
        out.join("ngc1700.override").display()
    )));
    assert!(valid.contains("\n# Package Name: wcs_override\n"));
    assert!(valid.contains("\nINFO Wrote CD Matrix\n"));
    assert!(!valid.contains("ERROR"));

    // The header is kept.
    assert_eq!(read(out.join("ngc1700.hdr")), read(hdr));
}

#[test]
fn test_casa_override_written() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("ngc253.cimage.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/ms-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--output-dir", &out.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());

    let override_text = read(out.join("ngc253.cimage.override"));
    assert!(override_text.starts_with(
        "FILETYPE= CASA Image\nTARGET= NGC 253\nMETA-RELEASE= 2099-01-01\nPROJEKT= CYBERSKADQS\n"
    ));
    assert!(override_text.contains("\nCTYPE3= DEC--SIN\nCTYPE4= RA---SIN\n"));
    assert!(override_text.contains("\nOBSGEO_UNIT= m\n"));

    let valid = read(out.join("ngc253.cimage.valid"));
    assert!(valid.contains("\nINFO DB Keys inserted.\n"));
    assert!(!valid.contains("ERROR"));
}

#[test]
fn test_galfacts_interpolation() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("galfacts_s1.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--output-dir", &out.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());

    let override_text = read(out.join("galfacts_s1.override"));
    assert!(override_text.contains("\nINSTRUME= ALFA\nTELESCOP= ARECIBO\n"));
    let valid = read(out.join("galfacts_s1.valid"));
    assert!(valid.contains("\nWARN Interpolated value: TELESCOP = ARECIBO\n"));
    assert!(valid.contains("\nWARN Interpolated value: INSTRUME = ALFA\n"));
    assert!(valid.contains("\nWARN Spectral coordinate value in CTYPE3 interpreted as FREQ\n"));
    assert!(!valid.contains("ERROR"));
}

#[test]
fn test_blocked_override() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("no_direction.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--output-dir", &out.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(
        stderr.contains(&format!(
            "Database insert aborted. See validation file: {}",
            out.join("no_direction.valid").display()
        )),
        "{stderr}"
    );

    // The artifacts are still written.
    assert!(out.join("no_direction.override").exists());
    let valid = read(out.join("no_direction.valid"));
    assert!(valid.contains("\nERROR VO services require a Direction Coordinate. None Found.\n"));
    assert!(valid.contains("\nERROR VO compliance metadata not found: CTYPE1\n"));
}

#[test]
fn test_commentary_only_header_is_reported() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = out.join("commentary.hdr");
    fs::write(&hdr, "COMMENT nothing but commentary\nHISTORY here\nEND\n").unwrap();

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Database insert aborted"), "{stderr}");

    let valid = read(out.join("commentary.valid"));
    assert!(valid.contains(
        "\nERROR Invalid FITS type header file. Missing keyword signifier: SIMPLE\n"
    ));
}

#[test]
fn test_unsupported_type_writes_nogo() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("ngc1700.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-uvw",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--output-dir", &out.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unsupported MIME-TYPE: image/fits-uvw"), "{stderr}");

    let nogo = read(out.join("ngc1700.nogo"));
    assert!(nogo.starts_with(&format!(
        "# wcs_override Validation report for {}\n",
        hdr.display()
    )));
    assert!(nogo.ends_with("\nERROR Unsupported MIME-TYPE: image/fits-uvw\n"));
    assert!(!out.join("ngc1700.override").exists());
}

#[test]
fn test_unknown_mime_type() {
    let tmp_dir = TempDir::new().unwrap();
    let hdr = header("ngc1700.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(tmp_dir.path())
        .args([
            "--mtype", "text/plain",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unrecognised MIME type 'text/plain'"), "{stderr}");
}

#[test]
fn test_config_required_for_indexing() {
    let tmp_dir = TempDir::new().unwrap();
    let hdr = header("ngc1700.hdr");

    #[rustfmt::skip]
    let cmd = wcs_override(tmp_dir.path())
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("wcs_override.toml wasn't found"), "{stderr}");
}

#[test]
fn test_save_toml() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("ngc1700.hdr");
    let saved = out.join("saved.toml");

    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
            "--output-dir", &out.display().to_string(),
            "--save-toml", &saved.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let toml = read(saved);
    assert!(toml.contains("[dirs]"));
    assert!(toml.contains("executable = \"fits2caom\""));
}

#[cfg(unix)]
#[test]
fn test_indexer_is_run() {
    let tmp_dir = TempDir::new().unwrap();
    let out = tmp_dir.path();
    let hdr = header("ngc1700.hdr");
    let config = out.join("wcs_override.toml");
    fs::write(
        &config,
        format!(
            r#"
[dirs]
headers = "{0}/headers"
overrides = "{0}/overrides"
validate = "{0}/validate"
logs = "{0}/logs"

[database]
server = "SYBASE"
database = "mddb"
schema = "dbo"
collection = "CYBERSKA"

[indexer]
executable = "echo"

[indexer.switches]
verbose = true

[datasets.fits_4d]
config = "fits4d.config"
defaults = "fits4d.default"
"#,
            out.display()
        ),
    )
    .unwrap();

    // The config is found in $HOME.
    #[rustfmt::skip]
    let cmd = wcs_override(out)
        .args([
            "--mtype", "image/fits-image",
            "--hdr", &hdr.display().to_string(),
            "--uri", URI,
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("--collectionID=18868"), "{stdout}");
    assert!(stdout.contains(&format!(
        "--overrides={}/overrides/ngc1700.override",
        out.display()
    )));
    assert!(out.join("headers/ngc1700.hdr").exists());
    assert!(out.join("validate/ngc1700.valid").exists());
    assert!(out.join("logs").is_dir());
}
