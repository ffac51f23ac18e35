use chrono::Utc;
use defectdash::data::{analyze_csv, default_manifest_path, validate_schema, EXPECTED_COLUMNS};
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let path = env::args()
        .nth(1)
        .or_else(|| env::var("DEFECTS_CSV").ok())
        .unwrap_or_else(|| "data/defects_data.csv".to_string());
    let path = PathBuf::from(path);

    let schema = match validate_schema(&path) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("schema check failed: {}", err);
            std::process::exit(1);
        }
    };

    if !schema.ok {
        eprintln!("schema mismatch: {}", schema.message);
        eprintln!("expected columns: {:?}", EXPECTED_COLUMNS);
        std::process::exit(2);
    }

    let (manifest, report) = match analyze_csv(&path, Utc::now()) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("analysis failed: {}", err);
            std::process::exit(3);
        }
    };

    let out_path = default_manifest_path(&path);
    let payload = json!({
        "manifest": manifest,
        "report": report
    });
    let written = serde_json::to_string_pretty(&payload)
        .map_err(|e| e.to_string())
        .and_then(|text| fs::write(&out_path, text).map_err(|e| e.to_string()));
    if let Err(err) = written {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!(
        "wrote manifest {} ({} rows, {} bad cost, {} bad date)",
        out_path.display(),
        report.rows,
        report.bad_cost_rows,
        report.bad_date_rows
    );
}
