use chrono::{TimeZone, Utc};
use defectdash::data::{analyze_csv, file_sha256, validate_schema, EXPECTED_COLUMNS};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_csv(path: &Path, header: &[&str], rows: &[&str]) {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

#[test]
fn schema_accepts_good_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("good.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &["1,15,Structural,Crack,2024-01-02,Component,Minor,Visual Inspection,Repair,245.47"],
    );
    let report = validate_schema(&path).unwrap();
    assert!(report.ok);
}

#[test]
fn schema_rejects_bad_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    write_csv(&path, &["id", "type", "cost"], &["1,Structural,10"]);
    let report = validate_schema(&path).unwrap();
    assert!(!report.ok);
}

#[test]
fn manifest_counts_unreadable_cost_and_date() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defects_data.csv");
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &[
            "1,15,Structural,Crack,2024-01-02,Component,Critical,Ultrasonic,Replacement,900.00",
            "2,16,Cosmetic,Scratch,not a date,Surface,Minor,Visual Inspection,Repair,",
            "3,17,Functional,Warp,03/15/2024,Internal,Moderate,Manual Testing,Rework,abc",
            ",18,Cosmetic,Blank id,2024-04-01,Surface,Minor,Visual Inspection,Repair,5",
        ],
    );
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let (manifest, report) = analyze_csv(&path, now).unwrap();

    assert_eq!(manifest.row_count, 3);
    assert_eq!(manifest.skipped_rows, 1);
    assert_eq!(report.bad_cost_rows, 2);
    assert_eq!(report.bad_date_rows, 1);
    assert_eq!(manifest.date_min.unwrap().to_string(), "2024-01-02");
    assert_eq!(manifest.date_max.unwrap().to_string(), "2024-03-15");
    assert_eq!(manifest.hash_sha256, file_sha256(&path).unwrap());
    assert!(manifest.generated_at.starts_with("2024-06-01T12:00:00"));
}

#[test]
fn hash_changes_with_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.csv");
    write_csv(&path, &EXPECTED_COLUMNS, &[]);
    let before = file_sha256(&path).unwrap();
    write_csv(
        &path,
        &EXPECTED_COLUMNS,
        &["1,15,Structural,Crack,2024-01-02,Component,Minor,Visual Inspection,Repair,1"],
    );
    assert_ne!(before, file_sha256(&path).unwrap());
    assert_eq!(before.len(), 64);
}
