// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Building an override from a header file, writing its artifacts, and
//! (optionally) handing it to the indexer.

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Args;
use log::{debug, info, trace, warn};

use super::{SummaryPrinter, WcsOverrideError};
use crate::{
    builder::{self, build_override, DatasetType, Outcome, OverrideOptions, DATASET_TYPES_COMMA_SEPARATED},
    config::{Config, Dirs, CONFIG_DIR_ENV, CONFIG_FILE_NAME},
    indexer::{collection_id, IndexerCommand},
    keymaps::LookupTables,
    report::{render_nogo, Level, ValidationReport},
};

lazy_static::lazy_static! {
    static ref MTYPE_HELP: String =
        format!("The MIME type of the dataset. Valid types are: {}", *DATASET_TYPES_COMMA_SEPARATED);

    static ref CONFIG_HELP: String =
        format!("The configuration file (toml or json). If not given, {CONFIG_FILE_NAME} is looked for in $HOME, then in ${CONFIG_DIR_ENV}");
}

#[derive(Debug, Args)]
pub(super) struct OverrideArgs {
    #[clap(short, long, help = MTYPE_HELP.as_str())]
    mtype: String,

    /// The header file to build an override from.
    #[clap(long, parse(from_os_str))]
    hdr: PathBuf,

    /// The URI of the dataset in the archive. The collection ID is taken from
    /// its 'fileid' query parameter or its last path segment.
    #[clap(short, long)]
    uri: String,

    /// Release the dataset's metadata today. Otherwise, release is embargoed.
    #[clap(long)]
    public: bool,

    #[clap(short, long, help = CONFIG_HELP.as_str(), parse(from_os_str))]
    config: Option<PathBuf>,

    /// Write all artifacts into this directory, rather than the directories
    /// named in the configuration.
    #[clap(short, long, parse(from_os_str))]
    output_dir: Option<PathBuf>,
}

impl OverrideArgs {
    pub(super) fn run(self, dry_run: bool, save_toml: Option<PathBuf>) -> Result<(), WcsOverrideError> {
        let OverrideArgs {
            mtype,
            hdr,
            uri,
            public,
            config: config_file,
            output_dir,
        } = self;

        let dataset_type = DatasetType::from_str(&mtype).map_err(|_| {
            WcsOverrideError::Unsupported(format!(
                "Unrecognised MIME type '{mtype}'. Valid types are: {}",
                *DATASET_TYPES_COMMA_SEPARATED
            ))
        })?;
        if !hdr.is_file() {
            return Err(WcsOverrideError::Generic(format!(
                "Header file {} doesn't exist",
                hdr.display()
            )));
        }

        let (config_path, mut config) = match Config::find(config_file.as_deref())? {
            Some((path, config)) => (Some(path), config),
            None if dry_run => {
                debug!("No configuration file; using defaults");
                let dir = hdr
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let config = Config {
                    dirs: Dirs::all_in(dir),
                    ..Default::default()
                };
                (None, config)
            }
            None => {
                return Err(WcsOverrideError::Config(format!(
                    "No configuration file was given, and {CONFIG_FILE_NAME} wasn't found in $HOME or ${CONFIG_DIR_ENV}"
                )))
            }
        };
        if let Some(dir) = output_dir {
            config.dirs = Dirs::all_in(dir);
        }
        if let Some(toml) = save_toml {
            fs::write(&toml, config.to_toml_string()?)?;
            info!("Saved the configuration to {}", toml.display());
        }

        let mut printer = SummaryPrinter::new("Override parameters".into());
        printer.push_block(vec![
            format!("Header file:   {}", hdr.display()).into(),
            format!("MIME type:     {dataset_type}").into(),
        ]);
        printer.push_block(vec![
            format!("Resource URI:  {uri}").into(),
            format!("Public release: {public}").into(),
        ]);
        printer.push_line(match &config_path {
            Some(p) => format!("Config file:   {}", p.display()).into(),
            None => Cow::Borrowed("Config file:   <none>"),
        });
        printer.display();

        for dir in [&config.dirs.headers, &config.dirs.overrides, &config.dirs.validate] {
            fs::create_dir_all(dir)?;
        }
        let stem = hdr
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "header".to_string());
        let options = OverrideOptions::new(uri.as_str(), public);

        let raw = fs::read_to_string(&hdr)?;
        keep_header_copy(&hdr, &config.dirs.headers)?;

        let outcome = build_override(dataset_type, &raw, &options, &LookupTables::default())?;
        let (document, report) = match &outcome {
            Outcome::Unsupported(t) => {
                let nogo = config.dirs.validate.join(format!("{stem}.nogo"));
                let subject = hdr.display().to_string();
                fs::write(&nogo, render_nogo(&subject, &t.to_string(), options.today))?;
                info!("Wrote {}", nogo.display());
                return Err(WcsOverrideError::Unsupported(format!(
                    "Unsupported MIME-TYPE: {t}. See nogo file: {}",
                    nogo.display()
                )));
            }
            Outcome::Ready {
                document, report, ..
            }
            | Outcome::Blocked { document, report } => (document, report),
        };

        let override_file = config.dirs.overrides.join(format!("{stem}.override"));
        let valid_file = config.dirs.validate.join(format!("{stem}.valid"));
        // Rendering only fails for unsupported types, which were handled above.
        if let Some(text) = builder::render(dataset_type, document) {
            fs::write(&override_file, text)?;
        }
        let subject = override_file.display().to_string();
        fs::write(&valid_file, report.render(&subject, options.today))?;
        info!("Wrote {}", override_file.display());
        info!("Wrote {}", valid_file.display());
        summarise(report);

        let dimensions = match outcome {
            Outcome::Ready { dimensions, .. } => dimensions,
            _ => {
                return Err(WcsOverrideError::Validation(format!(
                    "Database insert aborted. See validation file: {}",
                    valid_file.display()
                )))
            }
        };
        if dry_run {
            info!("No DB request. Done");
            return Ok(());
        }

        fs::create_dir_all(&config.dirs.logs)?;
        let collection_id = collection_id(&uri)?;
        let command = IndexerCommand::new(
            &config,
            dataset_type,
            dimensions,
            &collection_id,
            &override_file,
            &uri,
        )?;
        info!("Running the indexer:");
        info!("{command}");
        let output = command.run()?;
        for line in output.stdout.lines() {
            info!("{line}");
        }
        for line in output.stderr.lines() {
            warn!("{line}");
        }
        info!("Indexer finished for collection {collection_id}");
        Ok(())
    }
}

/// Copy the input header into `dir`, unless it's already there.
fn keep_header_copy(hdr: &Path, dir: &Path) -> Result<(), WcsOverrideError> {
    let Some(name) = hdr.file_name() else {
        return Ok(());
    };
    let dest = dir.join(name);
    if dest.exists() && dest.canonicalize()? == hdr.canonicalize()? {
        trace!("{} is already in {}", hdr.display(), dir.display());
        return Ok(());
    }
    fs::copy(hdr, &dest)?;
    debug!("Copied {} to {}", hdr.display(), dest.display());
    Ok(())
}

/// Print a summary of a validation report, with its warnings and errors.
fn summarise(report: &ValidationReport) {
    let mut printer = SummaryPrinter::new("Validation".into());
    printer.push_block(vec![
        format!("{} INFO", report.count(Level::Info)).into(),
        format!("{} WARN", report.count(Level::Warn)).into(),
        format!("{} ERROR", report.count(Level::Error)).into(),
    ]);
    printer.display();

    let problems: Vec<Cow<'static, str>> = report
        .messages()
        .iter()
        .filter(|m| m.level != Level::Info)
        .map(|m| Cow::Owned(m.to_string()))
        .collect();
    if !problems.is_empty() {
        let mut printer = SummaryPrinter::new("Warnings".into()).at_level(log::Level::Warn);
        printer.push_block(problems);
        printer.display();
    }
}
