use crate::io::csv::{CsvSeedSource, parse_case_csv};
use crate::io::{SeedSource, SourceError};
use crate::tests::unit_sqlite_case_store::date;
use std::io::Write;

pub const SAMPLE_CSV: &str = "\
date,country,cases,deaths
2020-01-01,X,5,1
2020-01-02,X,9,2
2020-01-01,Y,3,0
";

#[test]
fn test_parse_maps_date_to_report_date() {
    let records = parse_case_csv(SAMPLE_CSV.as_bytes()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].country, "X");
    assert_eq!(records[1].cases, 9);
    assert_eq!(records[1].deaths, 2);
    assert_eq!(records[1].report_date, date("2020-01-02"));
}

// columns are matched by name, extra columns and order do not matter
#[test]
fn test_parse_ignores_extra_columns() {
    let raw = "country,id_code,deaths,date,cases\nPeru,PE,4,2020-05-01,120\n";

    let records = parse_case_csv(raw.as_bytes()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].country, "Peru");
    assert_eq!(records[0].cases, 120);
    assert_eq!(records[0].deaths, 4);
}

#[test]
fn test_parse_header_only_is_empty() {
    let records = parse_case_csv(b"date,country,cases,deaths\n").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_parse_rejects_bad_rows() {
    let bad_number = "date,country,cases,deaths\n2020-01-01,X,5,1\n2020-01-02,X,lots,2\n";
    match parse_case_csv(bad_number.as_bytes()) {
        Err(SourceError::InvalidRecord { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected InvalidRecord, got {:?}", other),
    }

    let negative = "date,country,cases,deaths\n2020-01-01,X,-5,1\n";
    assert!(matches!(
        parse_case_csv(negative.as_bytes()),
        Err(SourceError::InvalidRecord { .. })
    ));

    let bad_date = "date,country,cases,deaths\n01/02/2020,X,5,1\n";
    assert!(matches!(
        parse_case_csv(bad_date.as_bytes()),
        Err(SourceError::InvalidRecord { .. })
    ));

    let no_country = "date,country,cases,deaths\n2020-01-01,,5,1\n";
    assert!(matches!(
        parse_case_csv(no_country.as_bytes()),
        Err(SourceError::InvalidRecord { line: 2, .. })
    ));

    let missing_column = "date,country,cases\n2020-01-01,X,5\n";
    assert!(matches!(
        parse_case_csv(missing_column.as_bytes()),
        Err(SourceError::InvalidRecord { .. })
    ));
}

#[tokio::test]
async fn test_csv_source_reads_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

    let source = CsvSeedSource::new(file.path());
    let records = source.read_records().await.unwrap();

    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_csv_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvSeedSource::new(dir.path().join("missing.csv"));

    let result = source.read_records().await;

    assert!(matches!(result, Err(SourceError::Read { .. })));
}
