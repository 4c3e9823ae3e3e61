//! Integration tests for playstats-common crate.

use playstats_common::{
    init_logging, is_valid_filter, DataFormatError, LoggingConfig, PlayStatsError,
};
use std::error::Error as _;

#[test]
fn test_data_error_wraps_with_row() {
    let err: PlayStatsError = DataFormatError::NegativeDuration {
        row: 7,
        value: "-12".to_string(),
    }
    .into();
    assert!(err.is_data_error());
    assert_eq!(err.category(), "data_format");
    assert!(err.to_string().contains("row 7"), "{err}");
    assert!(err.to_string().contains("-12"), "{err}");
}

#[test]
fn test_csv_errors_become_malformed_rows() {
    let data = "ts,ms_played\n2024-01-01,1\n2024-01-02,1,extra\n";
    let mut reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
    let err = reader
        .records()
        .find_map(Result::err)
        .expect("ragged row is rejected");

    match PlayStatsError::from(err) {
        PlayStatsError::DataFormat(DataFormatError::Malformed { row, .. }) => {
            assert_eq!(row, Some(2));
        }
        other => panic!("expected malformed row, got {other:?}"),
    }
}

#[test]
fn test_with_source_keeps_cause() {
    let io = std::io::Error::from(std::io::ErrorKind::NotFound);
    let err = PlayStatsError::with_source("cannot read input file 'x.csv'", io);
    assert_eq!(err.to_string(), "cannot read input file 'x.csv'");
    assert!(err.source().is_some());
    assert!(!err.is_data_error());
}

#[test]
fn test_log_filters() {
    assert!(is_valid_filter("info"));
    assert!(is_valid_filter("warn,playstats_analytics=debug"));
    assert!(!is_valid_filter("playstats=loud"));
}

#[test]
fn test_invalid_level_is_a_config_error() {
    let config = LoggingConfig {
        level: "playstats=loud".to_string(),
        ..LoggingConfig::default()
    };
    let err = init_logging(&config).unwrap_err();
    assert_eq!(err.category(), "config");
}

#[test]
fn test_log_file_parent_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("playstats.log");
    let config = LoggingConfig {
        level: "not=valid=at=all".to_string(),
        file_path: Some(path.clone()),
        ..LoggingConfig::default()
    };
    // The filter is checked before any file is touched.
    assert!(init_logging(&config).is_err());
    assert!(!path.exists());
}
