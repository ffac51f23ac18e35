use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use crate::model::EXPECTED_COLUMNS;
use crate::model::DefectRecord;

pub mod retry;
pub mod source;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },
    #[error("invalid data location {0}")]
    Location(String),
    #[error("error parsing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("no valid data was found")]
    NoData,
}

impl DataError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Records plus what was dropped on the way in.
#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub records: Vec<DefectRecord>,
    pub columns: Vec<String>,
    /// Rows without a defect_id.
    pub skipped_rows: u64,
    /// Rows the reader could not decode.
    pub bad_rows: u64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub row_count: u64,
    pub skipped_rows: u64,
    pub bad_rows: u64,
    pub bad_cost_rows: u64,
    pub bad_date_rows: u64,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub expected: Vec<String>,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub rows: u64,
    pub skipped_rows: u64,
    pub bad_rows: u64,
    pub bad_cost_rows: u64,
    pub bad_date_rows: u64,
    pub warnings: Vec<String>,
}

fn reader_for(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

/// Parse the defects file. Rows with a blank `defect_id` are dropped.
pub fn parse_defects(text: &str) -> Result<ParsedDataset, DataError> {
    let mut reader = reader_for(text);
    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(ParsedDataset::default());
    }
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let header_map = build_header_map(&headers);

    let missing: Vec<String> = EXPECTED_COLUMNS
        .iter()
        .filter(|c| !header_map.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing));
    }
    let idx: Vec<usize> = EXPECTED_COLUMNS.iter().map(|c| header_map[*c]).collect();

    let mut parsed = ParsedDataset {
        columns,
        ..Default::default()
    };

    for (line_no, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                parsed.bad_rows += 1;
                parsed.warnings.push(format!("bad_row {}: {}", line_no + 2, err));
                continue;
            }
        };
        let get = |i: usize| row.get(idx[i]).unwrap_or("").to_string();
        let record = DefectRecord {
            defect_id: get(0),
            product_id: get(1),
            defect_type: get(2),
            defect_description: get(3),
            defect_date: get(4),
            defect_location: get(5),
            severity: get(6),
            inspection_method: get(7),
            repair_action: get(8),
            repair_cost: get(9),
        };
        if record.defect_id.is_empty() {
            parsed.skipped_rows += 1;
            continue;
        }
        parsed.records.push(record);
    }

    Ok(parsed)
}

pub fn validate_header(header: &[String]) -> SchemaReport {
    let expected = EXPECTED_COLUMNS.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let ok = normalized == expected;
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("schema mismatch: got {:?} expected {:?}", header, expected)
    };
    SchemaReport {
        columns: header.to_vec(),
        expected,
        ok,
        message,
    }
}

pub fn validate_schema(path: &Path) -> Result<SchemaReport, DataError> {
    let header = read_header(path)?;
    Ok(validate_header(&header))
}

pub fn read_header(path: &Path) -> Result<Vec<String>, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let mut reader = reader_for(&text);
    let headers = reader.headers()?;
    Ok(headers.iter().map(|h| h.to_string()).collect())
}

pub fn analyze_csv(
    path: &Path,
    now: DateTime<Utc>,
) -> Result<(DatasetManifest, DataQualityReport), DataError> {
    let hash = file_sha256(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let parsed = parse_defects(&text)?;
    let mut warnings = parsed.warnings.clone();

    let mut bad_cost_rows = 0u64;
    let mut bad_date_rows = 0u64;
    let mut date_min: Option<NaiveDate> = None;
    let mut date_max: Option<NaiveDate> = None;

    for rec in &parsed.records {
        if rec.cost().is_none() {
            bad_cost_rows += 1;
            warnings.push(format!("bad_cost: {} {:?}", rec.defect_id, rec.repair_cost));
        }
        match rec.date() {
            Some(d) => {
                date_min = Some(date_min.map(|v| v.min(d)).unwrap_or(d));
                date_max = Some(date_max.map(|v| v.max(d)).unwrap_or(d));
            }
            None => {
                bad_date_rows += 1;
                warnings.push(format!("bad_date: {} {:?}", rec.defect_id, rec.defect_date));
            }
        }
    }

    let schema = validate_header(&parsed.columns);
    if !schema.ok {
        warnings.push(schema.message);
    }
    if parsed.records.is_empty() {
        warnings.push("no_records".to_string());
    }

    let manifest = DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        row_count: parsed.records.len() as u64,
        skipped_rows: parsed.skipped_rows,
        bad_rows: parsed.bad_rows,
        bad_cost_rows,
        bad_date_rows,
        date_min,
        date_max,
        columns: parsed.columns.clone(),
        warnings: warnings.clone(),
        generated_at: now.to_rfc3339(),
    };

    let report = DataQualityReport {
        rows: manifest.row_count,
        skipped_rows: parsed.skipped_rows,
        bad_rows: parsed.bad_rows,
        bad_cost_rows,
        bad_date_rows,
        warnings,
    };

    Ok((manifest, report))
}

pub fn file_sha256(path: &Path) -> Result<String, DataError> {
    let mut file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| DataError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("defects_data.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "defect_id,product_id,defect_type,defect_description,defect_date,defect_location,severity,inspection_method,repair_action,repair_cost";

    #[test]
    fn parses_quoted_fields() {
        let text = format!(
            "{}\n1,15,Structural,\"Crack, near flange\",2024-01-02,Component,Minor,Visual Inspection,Repair,245.47\n",
            HEADER
        );
        let parsed = parse_defects(&text).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].defect_description, "Crack, near flange");
        assert_eq!(parsed.records[0].cost(), Some(245.47));
    }

    #[test]
    fn drops_rows_without_id() {
        let text = format!(
            "{}\n1,15,Structural,x,2024-01-02,Component,Minor,Visual,Repair,1\n ,16,Cosmetic,y,2024-01-03,Surface,Minor,Visual,Repair,2\n\n",
            HEADER
        );
        let parsed = parse_defects(&text).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn short_rows_fill_with_empty() {
        let text = format!("{}\n7,15,Functional\n", HEADER);
        let parsed = parse_defects(&text).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].repair_cost, "");
        assert_eq!(parsed.records[0].cost(), None);
    }

    #[test]
    fn empty_text_is_an_empty_dataset() {
        for text in ["", "\n", "  \n\n"] {
            let parsed = parse_defects(text).unwrap();
            assert!(parsed.records.is_empty());
            assert!(parsed.columns.is_empty());
        }
    }

    #[test]
    fn missing_columns_is_an_error() {
        let err = parse_defects("defect_id,severity\n1,minor\n").unwrap_err();
        match err {
            DataError::MissingColumns(cols) => {
                assert!(cols.contains(&"repair_cost".to_string()));
                assert!(!cols.contains(&"severity".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_order_and_case_are_checked() {
        let good: Vec<String> = EXPECTED_COLUMNS.iter().map(|c| c.to_uppercase()).collect();
        assert!(validate_header(&good).ok);
        let mut shuffled: Vec<String> = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
        shuffled.swap(0, 1);
        assert!(!validate_header(&shuffled).ok);
    }

    #[test]
    fn manifest_path_sits_next_to_file() {
        let p = default_manifest_path(Path::new("data/defects_data.csv"));
        assert_eq!(p, PathBuf::from("data/defects_data.csv.manifest.json"));
    }
}
