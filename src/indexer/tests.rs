// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::*;

use crate::config::{Database, Dirs};

fn pair(name: &str) -> Option<ConfigPair> {
    Some(ConfigPair {
        config: format!("/cfg/{name}.config").into(),
        defaults: format!("/cfg/{name}.default").into(),
    })
}

fn config() -> Config {
    let mut config = Config {
        dirs: Dirs::all_in("/srv/dqs"),
        database: Database {
            server: "SYBASE".to_string(),
            database: "mddb".to_string(),
            schema: "dbo".to_string(),
            collection: "CYBERSKA".to_string(),
        },
        ..Default::default()
    };
    config.indexer.switches.insert("verbose".to_string(), true);
    config.indexer.switches.insert("test".to_string(), false);
    config.indexer.switches.insert("keep".to_string(), true);
    config.datasets.fits_2d = pair("fits2d");
    config.datasets.fits_3d = pair("fits3d");
    config.datasets.cimage = pair("cimage");
    config
}

#[test]
fn test_collection_id() {
    assert_eq!(
        collection_id("http://dms.example.org:8080/dlmanager/getfile?fileid=18868").unwrap(),
        "18868"
    );
    assert_eq!(
        collection_id("https://www.example.org/pg/file/read/18868/").unwrap(),
        "18868"
    );
    // No scheme.
    assert_eq!(
        collection_id("www.example.org/pg/file/read/18868/3mm-continuum-on-m100").unwrap(),
        "3mm-continuum-on-m100"
    );
    assert!(matches!(
        collection_id("http://example.org/"),
        Err(IndexerError::NoCollectionId(_))
    ));
    // Malformed URIs aren't given a second scheme.
    for uri in [
        "http://exa mple.org/a",
        "https://exa mple.org/pg/file/read/18868",
        "exa mple.org/a",
    ] {
        assert!(
            matches!(collection_id(uri), Err(IndexerError::BadUri(_))),
            "{uri}"
        );
    }
}

#[test]
fn test_select_dataset_config() {
    let config = config();
    assert_eq!(
        select_dataset_config(&config, DatasetType::FitsImage, 3).unwrap(),
        pair("fits3d").as_ref().unwrap()
    );
    assert_eq!(
        select_dataset_config(&config, DatasetType::CasaImage, 4).unwrap(),
        pair("cimage").as_ref().unwrap()
    );
    assert!(matches!(
        select_dataset_config(&config, DatasetType::FitsImage, 4),
        Err(IndexerError::MissingDatasetConfig { key: "fits_4d", .. })
    ));
    assert!(matches!(
        select_dataset_config(&config, DatasetType::FitsImage, 5),
        Err(IndexerError::UnsupportedDimensions(5))
    ));
    assert!(matches!(
        select_dataset_config(&config, DatasetType::MsVisibility, 4),
        Err(IndexerError::UnsupportedDatasetType(DatasetType::MsVisibility))
    ));
}

#[test]
fn test_command_line() {
    let uri = "http://dms.example.org/getfile?fileid=42";
    let command = IndexerCommand::new(
        &config(),
        DatasetType::FitsImage,
        2,
        "42",
        Path::new("/srv/dqs/m100.override"),
        uri,
    )
    .unwrap();
    assert_eq!(command.executable(), "fits2caom");
    assert_eq!(
        command.args(),
        [
            "-v",
            "--keep",
            "--server=SYBASE",
            "--database=mddb",
            "--schema=dbo",
            "--collection=CYBERSKA",
            "--collectionID=42",
            "--uri=http://dms.example.org/getfile?fileid=42",
            "--log=/srv/dqs/file_guid_42.log",
            "--config=/cfg/fits2d.config",
            "--overrides=/srv/dqs/m100.override",
            "--defaults=/cfg/fits2d.default",
        ]
    );
    assert!(command.to_string().starts_with("fits2caom -v --keep --server=SYBASE"));
}

#[test]
fn test_missing_executable() {
    let mut config = config();
    config.indexer.executable = "/this/indexer/does/not/exist".to_string();
    let command = IndexerCommand::new(
        &config,
        DatasetType::CasaImage,
        4,
        "1",
        Path::new("a.override"),
        "http://example.org/1",
    )
    .unwrap();
    assert!(matches!(command.run(), Err(IndexerError::Spawn { .. })));
}

#[cfg(unix)]
#[test]
fn test_run() {
    let mut config = config();
    config.indexer.executable = "echo".to_string();
    let command = IndexerCommand::new(
        &config,
        DatasetType::CasaImage,
        4,
        "1",
        Path::new("a.override"),
        "http://example.org/1",
    )
    .unwrap();
    let output = command.run().unwrap();
    assert!(output.stdout.starts_with("-v --keep --server=SYBASE"));
    assert!(output.stdout.contains("--defaults=/cfg/cimage.default"));
    assert!(output.stderr.is_empty());

    config.indexer.executable = "false".to_string();
    let command = IndexerCommand::new(
        &config,
        DatasetType::CasaImage,
        4,
        "1",
        Path::new("a.override"),
        "http://example.org/1",
    )
    .unwrap();
    assert!(matches!(command.run(), Err(IndexerError::Failed { .. })));
}
