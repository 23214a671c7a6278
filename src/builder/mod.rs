// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Building override keyword sets from raw headers.
//!
//! Each supported [`DatasetType`] has a [`FormatStrategy`] that runs a fixed
//! sequence of steps over a [`KeywordDocument`]. Steps record what they did in
//! a [`ValidationReport`]; a step that fails records an error and the
//! remaining independent steps still run. Any error leaves the override
//! [`Outcome::Blocked`].

mod casa;
mod error;
mod fits;

pub use casa::CasaImageStrategy;
pub use error::BuildError;
pub use fits::FitsImageStrategy;

use chrono::{Local, NaiveDate};
use itertools::Itertools;
use log::{debug, trace};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    constants::{
        DEFAULT_EQUINOX, EMBARGOED_META_RELEASE, PKG_NAME, PKG_VERSION, PROJECT_NAME,
        TIME_AXIS_CDELT_DAYS, TIME_AXIS_CRPIX,
    },
    header::{FormatAdapter, KeywordDocument, KeywordRecord},
    keymaps::LookupTables,
    policy,
    report::ValidationReport,
};

/// The kinds of dataset an override can be requested for, named by MIME
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum DatasetType {
    #[strum(serialize = "image/fits-image")]
    FitsImage,

    #[strum(serialize = "image/ms-image")]
    CasaImage,

    #[strum(serialize = "image/fits-uvw")]
    FitsVisibility,

    #[strum(serialize = "image/ms-uvw")]
    MsVisibility,
}

lazy_static::lazy_static! {
    pub static ref DATASET_TYPES_COMMA_SEPARATED: String = DatasetType::iter().join(", ");
}

impl DatasetType {
    /// Can overrides be built for this type?
    pub fn is_supported(self) -> bool {
        strategy_for(self).is_some()
    }
}

/// Per-run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideOptions {
    /// Where the dataset lives; written as `DATAURI`.
    pub uri: String,

    /// Public datasets have their metadata released today; others are
    /// embargoed.
    pub public: bool,

    /// The date used for release dates.
    pub today: NaiveDate,

    /// The equinox used when a FITS header has no celestial frame keywords.
    pub default_equinox: f64,
}

impl OverrideOptions {
    pub fn new<S: Into<String>>(uri: S, public: bool) -> OverrideOptions {
        OverrideOptions {
            uri: uri.into(),
            public,
            today: Local::now().date_naive(),
            default_equinox: DEFAULT_EQUINOX,
        }
    }

    /// The metadata release date, `yyyy-mm-dd`.
    pub fn meta_release(&self) -> String {
        if self.public {
            self.today.format("%Y-%m-%d").to_string()
        } else {
            EMBARGOED_META_RELEASE.to_string()
        }
    }
}

/// The result of building an override.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The override may be handed to the indexer.
    Ready {
        document: KeywordDocument,
        report: ValidationReport,
        dimensions: usize,
    },

    /// At least one error was recorded. The document is kept as it was when
    /// the pipeline stopped.
    Blocked {
        document: KeywordDocument,
        report: ValidationReport,
    },

    /// Overrides can't be built for this dataset type.
    Unsupported(DatasetType),
}

impl Outcome {
    pub fn document(&self) -> Option<&KeywordDocument> {
        match self {
            Outcome::Ready { document, .. } | Outcome::Blocked { document, .. } => Some(document),
            Outcome::Unsupported(_) => None,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Outcome::Ready { report, .. } | Outcome::Blocked { report, .. } => Some(report),
            Outcome::Unsupported(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready { .. })
    }
}

/// State shared by the steps of one pipeline run.
pub struct StepContext<'a> {
    pub options: &'a OverrideOptions,
    pub tables: &'a LookupTables,
    pub report: ValidationReport,
}

impl<'a> StepContext<'a> {
    pub fn new(options: &'a OverrideOptions, tables: &'a LookupTables) -> StepContext<'a> {
        StepContext {
            options,
            tables,
            report: ValidationReport::new(),
        }
    }

    /// Run a pipeline step. If it fails, the failure is recorded as an error
    /// and `None` is returned.
    pub fn run_step<T, F>(&mut self, name: &str, step: F) -> Option<T>
    where
        F: FnOnce(&mut Self) -> Result<T, BuildError>,
    {
        trace!("Step: {name}");
        match step(self) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Step '{name}' failed");
                self.report.error(e.to_string());
                None
            }
        }
    }
}

/// A header format's pipeline.
pub trait FormatStrategy {
    fn dataset_type(&self) -> DatasetType;

    fn adapter(&self) -> &dyn FormatAdapter;

    fn parse(&self, raw: &str) -> KeywordDocument {
        self.adapter().parse(raw)
    }

    fn render(&self, doc: &KeywordDocument) -> String {
        self.adapter().render(doc)
    }

    fn required_keywords(&self) -> &'static [&'static str] {
        policy::required_keywords(self.dataset_type())
    }

    /// Check that the raw header is something this pipeline can handle at
    /// all. Problems are recorded as errors.
    fn check_structure(&self, raw: &str, doc: &KeywordDocument, report: &mut ValidationReport);

    /// Find the number of image dimensions, adding any dimension keywords the
    /// override needs.
    fn discover_dimensions(&self, doc: &mut KeywordDocument) -> Result<usize, BuildError>;

    /// Make the celestial reference frame explicit.
    fn resolve_frame(&self, doc: &mut KeywordDocument, ctx: &mut StepContext)
        -> Result<(), BuildError>;

    /// Run the coordinate, frame and date steps. Returns the number of image
    /// dimensions, if they could be found.
    fn transform(&self, doc: &mut KeywordDocument, ctx: &mut StepContext) -> Option<usize>;
}

/// The pipeline for a dataset type, if there is one.
pub fn strategy_for(dataset_type: DatasetType) -> Option<Box<dyn FormatStrategy>> {
    match dataset_type {
        DatasetType::FitsImage => Some(Box::new(FitsImageStrategy)),
        DatasetType::CasaImage => Some(Box::new(CasaImageStrategy)),
        DatasetType::FitsVisibility | DatasetType::MsVisibility => None,
    }
}

/// Build an override from the text of a header.
///
/// Problems with the header, including a header with no keywords at all, are
/// recorded in the report of a [`Outcome::Blocked`] result.
pub fn build_override(
    dataset_type: DatasetType,
    raw: &str,
    options: &OverrideOptions,
    tables: &LookupTables,
) -> Result<Outcome, BuildError> {
    let Some(strategy) = strategy_for(dataset_type) else {
        debug!("No pipeline for {dataset_type}");
        return Ok(Outcome::Unsupported(dataset_type));
    };

    let mut document = strategy.parse(raw);
    debug!("Parsed {} keywords as {dataset_type}", document.len());

    let mut ctx = StepContext::new(options, tables);
    strategy.check_structure(raw, &document, &mut ctx.report);
    if document.is_empty() && !ctx.report.has_errors() {
        ctx.report.error(BuildError::EmptyHeader.to_string());
    }
    if ctx.report.has_errors() {
        debug!("Header structure is unusable; not transforming");
        return Ok(Outcome::Blocked {
            document,
            report: ctx.report,
        });
    }

    let dimensions = strategy.transform(&mut document, &mut ctx);
    document.push(engineer_signature());
    let missing = policy::confirm_required(&document, dataset_type, &mut ctx.report);
    if !missing.is_empty() {
        debug!("Missing required keywords: {}", missing.join(", "));
    }

    let report = ctx.report;
    Ok(match dimensions {
        Some(dimensions) if !report.has_errors() => Outcome::Ready {
            document,
            report,
            dimensions,
        },
        _ => Outcome::Blocked { document, report },
    })
}

/// Render a document in the format of a dataset type.
pub fn render(dataset_type: DatasetType, doc: &KeywordDocument) -> Option<String> {
    strategy_for(dataset_type).map(|s| s.render(doc))
}

/// Which override axes hold which coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisRoles {
    pub(crate) position1: u8,
    pub(crate) position2: u8,
    pub(crate) energy: u8,
    pub(crate) polarisation: u8,
    pub(crate) time: u8,
}

/// The database keywords the indexer needs that aren't in a header.
pub(crate) fn database_keywords(uri: &str, roles: AxisRoles) -> Vec<KeywordRecord> {
    vec![
        KeywordRecord::new("PROJEKT", PROJECT_NAME),
        KeywordRecord::new("DATAURI", uri),
        KeywordRecord::new("OBSCTYPE", "PROD"),
        KeywordRecord::new("OBSCUNIT", ""),
        KeywordRecord::new("POSAXIS1", roles.position1.to_string()),
        KeywordRecord::new("POSAXIS2", roles.position2.to_string()),
        KeywordRecord::new("ENAXIS", roles.energy.to_string()),
        KeywordRecord::new("POLAXIS", roles.polarisation.to_string()),
        KeywordRecord::new("TAXIS", roles.time.to_string()),
        KeywordRecord::new("SSYSOBS", "TOPOCENT"),
        KeywordRecord::new("VELSYS", ""),
    ]
}

/// Keywords for a single-pixel time axis starting at `mjd`.
pub(crate) fn time_axis_keywords(mjd: f64) -> Vec<KeywordRecord> {
    vec![
        KeywordRecord::new("NAXIS5", "1"),
        KeywordRecord::new("CTYPE5", "MJD"),
        KeywordRecord::new("CUNIT5", "d"),
        KeywordRecord::float("CRPIX5", TIME_AXIS_CRPIX),
        KeywordRecord::float("CRVAL5", mjd),
        KeywordRecord::float("CDELT5", TIME_AXIS_CDELT_DAYS),
    ]
}

/// Identifies the tool that wrote an override.
pub(crate) fn engineer_signature() -> KeywordRecord {
    KeywordRecord::new("ENGINEER", format!("{PKG_NAME} v{PKG_VERSION}"))
}
