use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use venture_dashboard::data::DataError;
use venture_dashboard::data::loader::load_file;

const CSV: &str = "\
permalink,name,homepage_url,primary_category,funding_total_usd,status,country_code,founded_year,failed,startup_age_years
/org/acme,Acme,http://acme.io,software,1500000,operating,USA,2007.0,0,8.5
/org/bolt,Bolt,,hardware,,closed,GBR,2011,1,2
/org/cove,\"Cove, Inc.\",,software,0,acquired,USA,2003,0,
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn expect_unavailable(path: &Path, needle: &str) {
    match load_file(path) {
        Err(DataError::DataUnavailable { reason, .. }) => {
            assert!(reason.contains(needle), "reason was: {reason}")
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(ds) => panic!("expected failure, loaded {} rows", ds.len()),
    }
}

#[test]
fn csv_with_extra_columns_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "startups.csv", CSV);
    let ds = load_file(&path).unwrap();

    assert_eq!(ds.len(), 3);
    assert_eq!(ds.year_bounds(), Some((2003, 2011)));

    let acme = &ds.records()[0];
    assert_eq!(acme.name, "Acme");
    assert_eq!(acme.founded_year, 2007);
    assert_eq!(acme.funding_total_usd, Some(1_500_000.0));
    assert_eq!(acme.startup_age_years, Some(8.5));
    assert!(!acme.failed);

    let bolt = &ds.records()[1];
    assert_eq!(bolt.funding_total_usd, None);
    assert!(bolt.failed);
    assert_eq!(bolt.status, "closed");

    let cove = &ds.records()[2];
    assert_eq!(cove.name, "Cove, Inc.");
    assert_eq!(cove.funding_total_usd, Some(0.0));
    assert_eq!(cove.startup_age_years, None);

    assert_eq!(
        ds.industries().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["hardware", "software"]
    );
}

#[test]
fn json_records_load_like_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write(&dir, "startups.csv", CSV);
    let json_path = write(
        &dir,
        "startups.json",
        r#"[
          {"name": "Acme", "primary_category": "software", "country_code": "USA",
           "founded_year": 2007, "funding_total_usd": 1500000.0, "startup_age_years": 8.5,
           "failed": 0, "status": "operating"},
          {"name": "Bolt", "primary_category": "hardware", "country_code": "GBR",
           "founded_year": 2011, "funding_total_usd": null, "startup_age_years": 2,
           "failed": true, "status": "closed"},
          {"name": "Cove, Inc.", "primary_category": "software", "country_code": "USA",
           "founded_year": 2003.0, "funding_total_usd": 0, "startup_age_years": null,
           "failed": false, "status": "acquired"}
        ]"#,
    );

    assert_eq!(load_file(&json_path).unwrap(), load_file(&csv_path).unwrap());
}

#[test]
fn parquet_loads_like_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write(&dir, "startups.csv", CSV);
    let parquet_path = dir.path().join("startups.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("primary_category", DataType::Utf8, false),
        Field::new("country_code", DataType::Utf8, false),
        Field::new("founded_year", DataType::Int32, false),
        Field::new("funding_total_usd", DataType::Float64, true),
        Field::new("startup_age_years", DataType::Float64, true),
        Field::new("failed", DataType::Boolean, false),
        Field::new("status", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["Acme", "Bolt", "Cove, Inc."])),
        Arc::new(StringArray::from(vec!["software", "hardware", "software"])),
        Arc::new(StringArray::from(vec!["USA", "GBR", "USA"])),
        Arc::new(Int32Array::from(vec![2007, 2011, 2003])),
        Arc::new(Float64Array::from(vec![Some(1_500_000.0), None, Some(0.0)])),
        Arc::new(Float64Array::from(vec![Some(8.5), Some(2.0), None])),
        Arc::new(BooleanArray::from(vec![false, true, false])),
        Arc::new(StringArray::from(vec!["operating", "closed", "acquired"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&parquet_path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    assert_eq!(load_file(&parquet_path).unwrap(), load_file(&csv_path).unwrap());
}

#[test]
fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    expect_unavailable(&dir.path().join("nope.csv"), "opening CSV");
}

#[test]
fn missing_column_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "startups.csv",
        "name,primary_category,country_code,founded_year,funding_total_usd,startup_age_years,status\n\
         Acme,software,USA,2007,1,2,operating\n",
    );
    expect_unavailable(&path, "CSV missing 'failed' column");
}

#[test]
fn bad_year_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "startups.csv",
        "name,primary_category,country_code,founded_year,funding_total_usd,startup_age_years,failed,status\n\
         Acme,software,USA,soon,1,2,0,operating\n",
    );
    expect_unavailable(&path, "founded_year");
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "startups.csv",
        "name,primary_category,country_code,founded_year,funding_total_usd,startup_age_years,failed,status\n",
    );
    let ds = load_file(&path).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.year_bounds(), None);
}

#[test]
fn text_columns_keep_their_spelling() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "startups.csv",
        "name,primary_category,country_code,founded_year,funding_total_usd,startup_age_years,failed,status\n\
         007,1.10,USA,2007,1,2,0,operating\n\
         Acme,1.1,USA,2008,1,2,0,operating\n",
    );
    let ds = load_file(&path).unwrap();

    let first = &ds.records()[0];
    assert_eq!(first.name, "007");
    assert_eq!(first.primary_category, "1.10");
    assert_eq!(first.founded_year, 2007);
    assert_eq!(first.funding_total_usd, Some(1.0));
    assert_eq!(
        ds.industries().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["1.1", "1.10"]
    );
}
