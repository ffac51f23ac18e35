//! Plain-text views for the terminal.

use std::fmt::Write as FmtWrite;

use super::money;
use crate::analysis::{GroupStat, Summary};
use crate::table::{truncate, Column, TablePage};

const MAX_CELL: usize = 24;
const MAX_DESCRIPTION: usize = 32;

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

fn groups(out: &mut String, title: &str, rows: &[GroupStat], currency: &str) {
    section(out, title);
    if rows.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    let width = rows
        .iter()
        .map(|g| g.key.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_CELL);
    for g in rows {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>5}  {:>5.1}%  total {:>12}  avg {:>10}",
            truncate(&g.key, MAX_CELL),
            g.count,
            g.percent,
            money(currency, g.total_cost),
            money(currency, g.avg_cost),
            width = width
        );
    }
}

pub fn summary_report(summary: &Summary, currency: &str, source: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Manufacturing Defects Summary ({})", source);
    let _ = writeln!(out, "  Total Defects     {}", summary.total_defects);
    let _ = writeln!(out, "  Average Cost      {}", money(currency, summary.cost.average));
    let _ = writeln!(out, "  Total Cost        {}", money(currency, summary.cost.total));
    let _ = writeln!(out, "  Critical Defects  {}", summary.severity.critical);
    let opt = |v: Option<f64>| v.map(|x| money(currency, x)).unwrap_or_else(|| "-".into());
    let _ = writeln!(
        out,
        "  Cost median/min/max  {} / {} / {}",
        opt(summary.cost.median),
        opt(summary.cost.min),
        opt(summary.cost.max)
    );
    let _ = writeln!(out, "  Critical share    {:.1}%", summary.critical_share());
    if let Some(g) = summary.most_common_type() {
        let _ = writeln!(out, "  Most common type  {} ({})", g.key, g.count);
    }
    if let Some(g) = summary.most_common_location() {
        let _ = writeln!(out, "  Most common area  {} ({})", g.key, g.count);
    }
    if let Some((first, last)) = summary.date_range() {
        let _ = writeln!(out, "  Date range        {} .. {}", first, last);
    }

    section(&mut out, "Severity");
    for s in &summary.severity_breakdown {
        let _ = writeln!(
            out,
            "  {:<9} {:>5}  {:>5.1}%  total {:>12}  avg {:>10}",
            s.severity,
            s.count,
            s.percent,
            money(currency, s.total_cost),
            money(currency, s.avg_cost)
        );
    }

    groups(
        &mut out,
        &format!("Top {} Defect Types", summary.top_n),
        &summary.top_types(),
        currency,
    );
    groups(&mut out, "Locations", &summary.by_location, currency);
    groups(&mut out, "Inspection Methods", &summary.by_inspection, currency);
    groups(&mut out, "Repair Actions", &summary.by_repair_action, currency);

    section(&mut out, "Defects per Month");
    let peak = summary.monthly.iter().map(|p| p.count).max().unwrap_or(0);
    for p in &summary.monthly {
        let bar = if peak == 0 { 0 } else { p.count * 40 / peak };
        let _ = writeln!(out, "  {}  {:>5}  {}", p.date, p.count, "#".repeat(bar));
    }
    out
}

fn cell(col: Column, value: &str, currency: &str) -> String {
    match col {
        Column::Description => truncate(value, MAX_DESCRIPTION),
        Column::RepairCost if !value.is_empty() => format!("{}{}", currency, value),
        _ => truncate(value, MAX_CELL),
    }
}

pub fn table_report(page: &TablePage, currency: &str) -> String {
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|r| {
            Column::ALL
                .iter()
                .map(|c| cell(*c, c.value(r), currency))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.label().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |out: &mut String, values: Vec<&str>| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };
    line(&mut out, Column::ALL.iter().map(|c| c.label()).collect());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut out, rule.iter().map(String::as_str).collect());
    for row in &cells {
        line(&mut out, row.iter().map(|s| s.as_str()).collect());
    }
    let _ = writeln!(
        out,
        "{} of {} matching rows shown ({} total)",
        page.rows.len(),
        page.matched,
        page.total
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefectRecord;
    use crate::table::TableQuery;

    fn recs() -> Vec<DefectRecord> {
        vec![
            DefectRecord {
                defect_id: "1".into(),
                defect_type: "Structural".into(),
                severity: "Critical".into(),
                defect_date: "2024-01-02".into(),
                defect_description: "A very long description that will not fit the column".into(),
                repair_cost: "100.00".into(),
                ..Default::default()
            },
            DefectRecord {
                defect_id: "2".into(),
                defect_type: "Cosmetic".into(),
                severity: "Minor".into(),
                defect_date: "2024-02-03".into(),
                repair_cost: "20.00".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn summary_lists_cards_and_months() {
        let data = recs();
        let report = summary_report(&Summary::compute(&data, 5), "£", "test.csv");
        assert!(report.contains("Total Defects     2"));
        assert!(report.contains("Average Cost      £60.00"));
        assert!(report.contains("Critical Defects  1"));
        assert!(report.contains("Critical share    50.0%"));
        assert!(report.contains("Most common type  Cosmetic (1)"));
        assert!(report.contains("2024-01"));
        assert!(report.contains("2024-02"));
    }

    #[test]
    fn table_has_header_and_footer() {
        let data = recs();
        let page = TableQuery::default().apply(&data);
        let out = table_report(&page, "£");
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("Defect ID"));
        assert!(first.ends_with("Repair Cost"));
        assert!(out.contains("£100.00"));
        assert!(out.contains('…'));
        assert!(out.trim_end().ends_with("2 of 2 matching rows shown (2 total)"));
    }
}
