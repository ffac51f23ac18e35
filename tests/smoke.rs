//! Smoke tests: generate a dataset, load it the way the CLI does, and check
//! that every view agrees with the aggregates.

use std::fs;

use defectdash::analysis::Summary;
use defectdash::config::{DashboardConfig, Theme};
use defectdash::data::source::{load_dataset, source_for, FileSource};
use defectdash::data::DataError;
use defectdash::model::Severity;
use defectdash::render::html::{render_dashboard, RenderOptions};
use defectdash::render::text::summary_report;
use defectdash::sample;
use defectdash::table::{Column, SortDir, TableQuery};
use tempfile::TempDir;

fn opts() -> RenderOptions {
    RenderOptions {
        theme: Theme::Dark,
        currency: "£".to_string(),
        source: "smoke".to_string(),
        generated_at: "2024-06-01T00:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn generated_dataset_flows_through_every_view() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defects_data.csv");
    let records = sample::generate(300, 11);
    sample::write_csv(&records, fs::File::create(&path).unwrap()).unwrap();

    let cfg = DashboardConfig {
        data_location: path.display().to_string(),
        ..Default::default()
    };
    let source = source_for(&cfg).unwrap();
    assert_eq!(source.local_path(), Some(path.as_path()));
    let parsed = load_dataset(source.as_ref()).await.unwrap();
    assert_eq!(parsed.records, records);

    let summary = Summary::compute(&parsed.records, 5);
    assert_eq!(summary.total_defects, 300);
    assert_eq!(
        summary.severity.critical + summary.severity.moderate + summary.severity.minor,
        300
    );
    let expected_total: f64 = records.iter().filter_map(|r| r.cost()).sum();
    assert!((summary.cost.total - expected_total).abs() < 1e-6);
    assert!((summary.cost.average - expected_total / 300.0).abs() < 1e-6);
    assert_eq!(summary.by_type.iter().map(|g| g.count).sum::<usize>(), 300);
    assert_eq!(summary.daily.iter().map(|p| p.count).sum::<usize>(), 300);

    let critical = TableQuery {
        severity: Some(Severity::Critical),
        sort: Some((Column::RepairCost, SortDir::Desc)),
        ..Default::default()
    }
    .apply(&parsed.records);
    assert_eq!(critical.matched, summary.severity.critical);
    let costs: Vec<f64> = critical.rows.iter().filter_map(|r| r.cost()).collect();
    assert!(costs.windows(2).all(|w| w[0] >= w[1]));

    let html = render_dashboard(&parsed.records, &summary, &opts());
    assert!(html.contains(r#"data-theme="dark""#));
    assert!(html.contains(&format!("£{:.2}", summary.cost.total)));
    assert!(html.contains("Dataset Description"));

    let report = summary_report(&summary, "£", "smoke");
    assert!(report.contains(&format!("Total Defects     {}", summary.total_defects)));
}

#[tokio::test]
async fn header_only_file_is_no_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    sample::write_csv(&[], fs::File::create(&path).unwrap()).unwrap();
    let err = load_dataset(&FileSource::new(&path)).await.unwrap_err();
    assert!(matches!(err, DataError::NoData));
}
