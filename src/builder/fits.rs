// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FITS image pipeline.

use log::{debug, trace};

use super::{
    database_keywords, time_axis_keywords, AxisRoles, BuildError, DatasetType, FormatStrategy,
    StepContext,
};
use crate::{
    constants::DEFAULT_DATE_OBS,
    coord::{compute_cd_matrix, pick_rotation},
    header::{format_float, FitsAdapter, FormatAdapter, HeaderError, KeywordDocument, KeywordRecord},
    policy,
    ref_frame::{resolve_celestial_frame, resolve_spectral_frame},
    report::ValidationReport,
    time::parse_iso8601,
};

const FITS_AXIS_ROLES: AxisRoles = AxisRoles {
    position1: 1,
    position2: 2,
    energy: 3,
    polarisation: 4,
    time: 5,
};

/// Spellings of a frequency axis that are rewritten to `FREQ`.
const FREQUENCY_CTYPES: [&str; 2] = ["Frequency", "FREQUENC"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FitsImageStrategy;

impl FormatStrategy for FitsImageStrategy {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::FitsImage
    }

    fn adapter(&self) -> &dyn FormatAdapter {
        &FitsAdapter
    }

    fn check_structure(&self, raw: &str, doc: &KeywordDocument, report: &mut ValidationReport) {
        if !self.adapter().check_signature(raw, report) {
            return;
        }
        let extended = doc.text("EXTEND").map(|v| v == "T").unwrap_or(false);
        if extended || doc.contains("NEXTEND") {
            report.error("[N]EXTEND keyword(s) detected. Cannot insert MEF files");
        }
    }

    fn discover_dimensions(&self, doc: &mut KeywordDocument) -> Result<usize, BuildError> {
        let naxis = doc
            .find("NAXIS")
            .ok_or(BuildError::NoDimensions("NAXIS"))?
            .integer()?;
        if naxis < 1 {
            return Err(BuildError::InvalidDimensions(naxis));
        }
        Ok(naxis as usize)
    }

    fn resolve_frame(
        &self,
        doc: &mut KeywordDocument,
        ctx: &mut StepContext,
    ) -> Result<(), BuildError> {
        resolve_celestial_frame(doc, ctx.options.default_equinox, &mut ctx.report)?;
        Ok(())
    }

    fn transform(&self, doc: &mut KeywordDocument, ctx: &mut StepContext) -> Option<usize> {
        insert_meta_release(doc, ctx);
        let dimensions = ctx.run_step("dimensions", |_| self.discover_dimensions(doc));
        policy::check_direction_coordinate(doc, ctx.tables, &mut ctx.report);
        let freq_axis = rename_spectral_ctype(doc, &mut ctx.report);
        policy::check_set_keys(doc, &mut ctx.report);
        if let Some(axis) = freq_axis {
            ctx.run_step("frequency unit", |ctx| {
                set_frequency_unit(doc, axis, &mut ctx.report)
            });
        }
        ctx.run_step("spectral frame", |ctx| {
            resolve_spectral_frame(doc, ctx.tables, &mut ctx.report)?;
            Ok(())
        });
        ctx.run_step("celestial frame", |ctx| self.resolve_frame(doc, ctx));
        ctx.run_step("CD matrix", |ctx| insert_cd_matrix(doc, &mut ctx.report));
        ctx.run_step("database keywords", |ctx| {
            doc.insert_many_after("MRELEASE", database_keywords(&ctx.options.uri, FITS_AXIS_ROLES))?;
            ctx.report.info(format!("Data URI {}", ctx.options.uri));
            Ok(())
        });
        ctx.run_step("dates", |ctx| insert_dates(doc, &mut ctx.report));
        dimensions
    }
}

fn insert_meta_release(doc: &mut KeywordDocument, ctx: &mut StepContext) {
    let release = ctx.options.meta_release();
    let index = doc.position("BITPIX").unwrap_or(0) + 1;
    doc.insert_at(index, KeywordRecord::new("MRELEASE", release.as_str()));
    ctx.report
        .info(format!("Metadata release date set: {release}"));
}

/// Rewrite a long-form frequency CTYPE to `FREQ`. Returns the number of the
/// frequency axis, if there is one.
fn rename_spectral_ctype(doc: &mut KeywordDocument, report: &mut ValidationReport) -> Option<usize> {
    let mut freq_axis = None;
    for record in doc.iter_mut() {
        let Some(axis) = record
            .keyword
            .strip_prefix("CTYPE")
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };
        let value = record.text();
        if FREQUENCY_CTYPES.iter().any(|f| value.starts_with(f)) {
            record.raw_value = "FREQ".to_string();
            record.comment = None;
            report.warn(format!(
                "Spectral coordinate value in CTYPE{axis} interpreted as FREQ"
            ));
            freq_axis = Some(axis);
            break;
        }
        if value.starts_with("FREQ") {
            freq_axis = Some(axis);
            break;
        }
    }
    trace!("Frequency axis: {freq_axis:?}");
    freq_axis
}

fn set_frequency_unit(
    doc: &mut KeywordDocument,
    axis: usize,
    report: &mut ValidationReport,
) -> Result<(), BuildError> {
    let cunit = format!("CUNIT{axis}");
    match doc.text(&cunit) {
        Some("Hz") => (),
        Some(unit) => {
            debug!("{cunit} was {unit}");
            doc.set_value(&cunit, "Hz")?;
            report.warn("Spectral unit set to Hz");
        }
        None => {
            doc.insert_after(&format!("CTYPE{axis}"), KeywordRecord::new(cunit, "Hz"))?;
            report.warn("Spectral unit not found. Set to Hz");
        }
    }
    Ok(())
}

fn insert_cd_matrix(doc: &mut KeywordDocument, report: &mut ValidationReport) -> Result<(), BuildError> {
    if doc.contains("CD1_1") {
        report.info("Found CD Matrix");
        return Ok(());
    }

    let cdelt1 = doc.number("CDELT1")?.ok_or(BuildError::MissingWcs("CDELT1"))?;
    let cdelt2 = doc.number("CDELT2")?.ok_or(BuildError::MissingWcs("CDELT2"))?;
    let rotation = pick_rotation(doc.number("CROTA1")?, doc.number("CROTA2")?);
    report.info(format!("WCS Rotation angle: {}", format_float(rotation)));

    let index = doc
        .last_position_of(&["CDELT1", "CDELT2", "CROTA1", "CROTA2"])
        .ok_or_else(|| HeaderError::AnchorNotFound("CDELT1".to_string()))?;
    doc.insert_many_at(index + 1, compute_cd_matrix(cdelt1, cdelt2, rotation).to_records());
    report.info("Wrote CD Matrix");
    Ok(())
}

fn insert_dates(doc: &mut KeywordDocument, report: &mut ValidationReport) -> Result<(), BuildError> {
    if let Some(mjd) = doc.number("MJD-OBS")? {
        report.info("MJD-OBS keyword found. No Action.");
        doc.insert_many_after("MJD-OBS", time_axis_keywords(mjd))?;
        return Ok(());
    }

    if !doc.contains("DATE-OBS") {
        doc.push(KeywordRecord::new("DATE-OBS", DEFAULT_DATE_OBS));
        report.warn("DATE-OBS not found");
        report.warn(format!("DATE-OBS Defaulted: {DEFAULT_DATE_OBS}"));
    }
    let date_obs = doc.text("DATE-OBS").unwrap_or(DEFAULT_DATE_OBS).to_string();

    match parse_iso8601(&date_obs).and_then(|d| d.to_mjd()) {
        Ok(mjd) => {
            debug!("DATE-OBS {date_obs} is MJD {mjd}");
            let mut records = vec![KeywordRecord::float("MJD-OBS", mjd)];
            records.extend(time_axis_keywords(mjd));
            doc.insert_many_after("DATE-OBS", records)?;
        }
        Err(e) => {
            debug!("{e}");
            report.error("Unrecognized DATE-OBS value");
            report.error("Could not parse DATE-OBS, Ref. ISO 8601");
        }
    }
    Ok(())
}
