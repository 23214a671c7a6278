// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The CASA Image pipeline.
//!
//! CASA Image headers describe the direction coordinate as a single
//! two-valued record (e.g. `REFERENCE2-VALUE +44.55.19.95, 04:45:31.695`,
//! declination first). These are split into the per-axis keywords the indexer
//! expects.

use log::{debug, trace};

use super::{
    database_keywords, time_axis_keywords, AxisRoles, BuildError, DatasetType, FormatStrategy,
    StepContext,
};
use crate::{
    coord::{
        compute_cd_matrix, decimalize_dms, map_coordinate_name_to_fits, ra_hms_to_degrees,
        GeodeticPosition,
    },
    header::{format_float, CasaImageAdapter, FormatAdapter, HeaderError, KeywordDocument, KeywordRecord},
    ref_frame::resolve_casa_frame,
    report::ValidationReport,
    unit_parsing::frequency_to_hz,
};

const CASA_AXIS_ROLES: AxisRoles = AxisRoles {
    position1: 3,
    position2: 4,
    energy: 1,
    polarisation: 2,
    time: 5,
};

/// Records holding frequencies, possibly with units.
const FREQUENCY_KEYWORDS: [&str; 3] = ["REFERENCE0-VALUE", "INCREMENT0", "REST-FREQUENCY"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CasaImageStrategy;

impl FormatStrategy for CasaImageStrategy {
    fn dataset_type(&self) -> DatasetType {
        DatasetType::CasaImage
    }

    fn adapter(&self) -> &dyn FormatAdapter {
        &CasaImageAdapter
    }

    fn check_structure(&self, raw: &str, _doc: &KeywordDocument, report: &mut ValidationReport) {
        self.adapter().check_signature(raw, report);
    }

    /// Dimensions come from `IMAGE-SHAPE [a, b, c, d]`. `NAXIS` and `NAXISn`
    /// are inserted after it.
    fn discover_dimensions(&self, doc: &mut KeywordDocument) -> Result<usize, BuildError> {
        let record = doc
            .find("IMAGE-SHAPE")
            .ok_or(BuildError::NoDimensions("IMAGE-SHAPE"))?;
        let shape = record
            .text()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u64>().map_err(|_| HeaderError::NotAnInteger {
                    keyword: record.keyword.clone(),
                    value: s.to_string(),
                    line: record.line,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if shape.is_empty() {
            return Err(BuildError::InvalidDimensions(0));
        }
        trace!("Image shape: {shape:?}");

        let mut records = vec![KeywordRecord::new("NAXIS", shape.len().to_string())];
        records.extend(
            shape
                .iter()
                .enumerate()
                .map(|(i, n)| KeywordRecord::new(format!("NAXIS{}", i + 1), n.to_string())),
        );
        doc.insert_many_after("IMAGE-SHAPE", records)?;
        Ok(shape.len())
    }

    fn resolve_frame(
        &self,
        doc: &mut KeywordDocument,
        ctx: &mut StepContext,
    ) -> Result<(), BuildError> {
        resolve_casa_frame(doc, ctx.tables, &mut ctx.report)?;
        Ok(())
    }

    fn transform(&self, doc: &mut KeywordDocument, ctx: &mut StepContext) -> Option<usize> {
        let release = ctx.options.meta_release();
        doc.insert_at(2, KeywordRecord::new("META-RELEASE", release.as_str()));
        ctx.report
            .info(format!("Metadata release date set: {release}"));

        ctx.run_step("observatory position", |ctx| insert_obsgeo(doc, &mut ctx.report));
        let dimensions = ctx.run_step("dimensions", |_| self.discover_dimensions(doc));
        for keyword in FREQUENCY_KEYWORDS {
            ctx.run_step(keyword, |_| normalize_frequency_record(doc, keyword));
        }
        ctx.run_step("direction units", |ctx| {
            insert_direction_units(doc, &mut ctx.report)
        });
        ctx.run_step("CTYPEs", |ctx| insert_ctypes(doc, ctx));
        ctx.run_step("celestial frame", |ctx| self.resolve_frame(doc, ctx));
        ctx.run_step("reference values", |_| insert_reference_values(doc));
        ctx.run_step("reference pixels", |_| insert_reference_pixels(doc));
        ctx.run_step("CD matrix", |ctx| insert_cd_matrix(doc, &mut ctx.report));
        ctx.run_step("database keywords", |ctx| {
            doc.insert_many_after(
                "META-RELEASE",
                database_keywords(&ctx.options.uri, CASA_AXIS_ROLES),
            )?;
            ctx.report.info("DB Keys inserted.");
            Ok(())
        });
        ctx.run_step("dates", |_| insert_time_axis(doc));
        dimensions
    }
}

fn insert_obsgeo(doc: &mut KeywordDocument, report: &mut ValidationReport) -> Result<(), BuildError> {
    let position =
        GeodeticPosition::from_document(doc, "TELESCOP_LAT", "TELESCOP_LON", "TELESCOP_HGT")?;
    let xyz = position.to_geocentric();
    debug!("Observatory {position:?} is at {xyz:?}");
    doc.insert_many_after(
        "TELESCOP_HGT",
        [
            KeywordRecord::float("OBSGEO-X", xyz.x),
            KeywordRecord::float("OBSGEO-Y", xyz.y),
            KeywordRecord::float("OBSGEO-Z", xyz.z),
            KeywordRecord::new("OBSGEO_UNIT", "m"),
        ],
    )?;
    report.info("SET OBSGEO keywords");
    Ok(())
}

/// Rewrite a frequency record (e.g. `1.4204GHz`) as bare Hz. Absent records
/// are left alone.
fn normalize_frequency_record(doc: &mut KeywordDocument, keyword: &str) -> Result<(), BuildError> {
    let Some(value) = doc.text(keyword) else {
        trace!("No {keyword}");
        return Ok(());
    };
    let hz = frequency_to_hz(value)?;
    doc.set_value(keyword, format_float(hz))?;
    Ok(())
}

fn insert_direction_units(
    doc: &mut KeywordDocument,
    report: &mut ValidationReport,
) -> Result<(), BuildError> {
    let Some(record) = doc.find("INCREMENT2_UNITS") else {
        report.warn("Direction coordinate units (INCREMENT2_UNITS) not found");
        return Ok(());
    };
    let (first, second) = record.pair()?;
    let records = [
        KeywordRecord::new("DIR1_UNIT", first),
        KeywordRecord::new("DIR2_UNIT", second),
    ];
    doc.insert_many_after("INCREMENT2_UNITS", records)?;
    Ok(())
}

/// Translate the `COORDINATEi-TYPE`/`COORDINATEi-NAME` records into CTYPEs.
fn insert_ctypes(doc: &mut KeywordDocument, ctx: &mut StepContext) -> Result<(), BuildError> {
    let n_axes = doc
        .find("N_OF-AXES")
        .ok_or_else(|| HeaderError::MissingKeyword("N_OF-AXES".to_string()))?
        .integer()?;
    let projection = doc
        .iter()
        .find(|r| r.keyword.starts_with("PROJECTION"))
        .map(|r| (r.keyword.clone(), r.text().to_string()));

    let mut axis = 1;
    let mut ctypes = vec![];
    for i in 0..n_axes {
        let type_keyword = format!("COORDINATE{i}-TYPE");
        let name_keyword = format!("COORDINATE{i}-NAME");
        let coord_type = doc
            .text(&type_keyword)
            .ok_or_else(|| HeaderError::MissingKeyword(type_keyword.clone()))?;
        let name = doc
            .find(&name_keyword)
            .ok_or_else(|| HeaderError::MissingKeyword(name_keyword.clone()))?;
        let descriptor = if coord_type.eq_ignore_ascii_case("direction") {
            let (first, second) = name.pair()?;
            format!("{first} & {second}")
        } else {
            name.text().to_string()
        };

        let mapped = map_coordinate_name_to_fits(
            &descriptor,
            axis,
            projection.as_ref().map(|(_, p)| p.as_str()),
            ctx.tables,
        )?;
        trace!("{descriptor} gives {mapped:?}");
        axis += mapped.len();
        ctypes.extend(mapped.into_iter().map(|(k, v)| KeywordRecord::new(k, v)));
    }

    let anchor = match &projection {
        Some((keyword, _)) => keyword.as_str(),
        None => "N_OF-AXES",
    };
    debug!("Inserting {} CTYPEs after {anchor}", ctypes.len());
    doc.insert_many_after(anchor, ctypes)?;
    Ok(())
}

fn insert_reference_values(doc: &mut KeywordDocument) -> Result<(), BuildError> {
    let record = doc
        .find("REFERENCE2-VALUE")
        .ok_or(BuildError::MissingWcs("REFERENCE2-VALUE"))?;
    let (dec, ra) = record.pair()?;
    let records = [
        KeywordRecord::float("CRVAL2_1", decimalize_dms(dec)?),
        KeywordRecord::float("CRVAL2_2", ra_hms_to_degrees(ra)?),
    ];
    doc.insert_many_after("REFERENCE2-VALUE", records)?;
    Ok(())
}

/// CASA reference pixels are 0-indexed; FITS pixels are 1-indexed.
fn insert_reference_pixels(doc: &mut KeywordDocument) -> Result<(), BuildError> {
    let record = doc
        .find("REFERENCE2-PIXEL")
        .ok_or(BuildError::MissingWcs("REFERENCE2-PIXEL"))?;
    let (p1, p2) = record.pair()?;
    let parse = |s: &str| {
        s.parse::<f64>().map_err(|_| HeaderError::ParseFloat {
            keyword: record.keyword.clone(),
            value: record.raw_value.clone(),
            line: record.line,
        })
    };
    let records = [
        KeywordRecord::float("CRPIX3", parse(p1)? + 1.0),
        KeywordRecord::float("CRPIX4", parse(p2)? + 1.0),
    ];
    doc.insert_many_after("REFERENCE2-PIXEL", records)?;
    Ok(())
}

/// The increments are `<dec>, <ra>`; there is no rotation.
fn insert_cd_matrix(doc: &mut KeywordDocument, report: &mut ValidationReport) -> Result<(), BuildError> {
    let record = doc
        .find("INCREMENT2")
        .ok_or(BuildError::MissingWcs("INCREMENT2"))?;
    let (dec, ra) = record.pair()?;
    let cd = compute_cd_matrix(decimalize_dms(ra)?, decimalize_dms(dec)?, 0.0);
    doc.insert_many_after("INCREMENT2", cd.to_records())?;
    report.info("Wrote CD Matrix");
    Ok(())
}

fn insert_time_axis(doc: &mut KeywordDocument) -> Result<(), BuildError> {
    if let Some(mjd) = doc.number("MJD-OBS")? {
        doc.insert_many_after("MJD-OBS", time_axis_keywords(mjd))?;
        return Ok(());
    }
    let mjd = doc
        .number("DATE-OBS-MJD")?
        .ok_or(BuildError::MissingObservationDate)?;
    let mut records = vec![KeywordRecord::float("MJD-OBS", mjd)];
    records.extend(time_axis_keywords(mjd));
    doc.insert_many_after("DATE-OBS-MJD", records)?;
    Ok(())
}
