use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{DefectRecord, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    DefectId,
    ProductId,
    DefectType,
    Severity,
    Description,
    Date,
    Location,
    Inspection,
    RepairAction,
    RepairCost,
}

impl Column {
    /// Display order of the table.
    pub const ALL: [Column; 10] = [
        Column::DefectId,
        Column::ProductId,
        Column::DefectType,
        Column::Severity,
        Column::Description,
        Column::Date,
        Column::Location,
        Column::Inspection,
        Column::RepairAction,
        Column::RepairCost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Column::DefectId => "Defect ID",
            Column::ProductId => "Product ID",
            Column::DefectType => "Type",
            Column::Severity => "Severity",
            Column::Description => "Description",
            Column::Date => "Date",
            Column::Location => "Location",
            Column::Inspection => "Inspection",
            Column::RepairAction => "Repair Action",
            Column::RepairCost => "Repair Cost",
        }
    }

    /// Name of the backing CSV column.
    pub fn field(&self) -> &'static str {
        match self {
            Column::DefectId => "defect_id",
            Column::ProductId => "product_id",
            Column::DefectType => "defect_type",
            Column::Severity => "severity",
            Column::Description => "defect_description",
            Column::Date => "defect_date",
            Column::Location => "defect_location",
            Column::Inspection => "inspection_method",
            Column::RepairAction => "repair_action",
            Column::RepairCost => "repair_cost",
        }
    }

    pub fn value<'a>(&self, rec: &'a DefectRecord) -> &'a str {
        match self {
            Column::DefectId => &rec.defect_id,
            Column::ProductId => &rec.product_id,
            Column::DefectType => &rec.defect_type,
            Column::Severity => &rec.severity,
            Column::Description => &rec.defect_description,
            Column::Date => &rec.defect_date,
            Column::Location => &rec.defect_location,
            Column::Inspection => &rec.inspection_method,
            Column::RepairAction => &rec.repair_action,
            Column::RepairCost => &rec.repair_cost,
        }
    }

    fn compare(&self, a: &DefectRecord, b: &DefectRecord) -> Ordering {
        match self {
            Column::RepairCost => match (a.cost(), b.cost()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Column::Date => a
                .date()
                .cmp(&b.date())
                .then_with(|| a.defect_date.cmp(&b.defect_date)),
            Column::DefectId | Column::ProductId => natural_cmp(self.value(a), self.value(b)),
            _ => self
                .value(a)
                .to_lowercase()
                .cmp(&self.value(b).to_lowercase()),
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        let col = match key.as_str() {
            "defect_id" | "id" => Column::DefectId,
            "product_id" | "product" => Column::ProductId,
            "defect_type" | "type" => Column::DefectType,
            "severity" => Column::Severity,
            "defect_description" | "description" => Column::Description,
            "defect_date" | "date" => Column::Date,
            "defect_location" | "location" => Column::Location,
            "inspection_method" | "inspection" => Column::Inspection,
            "repair_action" | "action" => Column::RepairAction,
            "repair_cost" | "cost" => Column::RepairCost,
            _ => return Err(format!("unknown column: {}", s)),
        };
        Ok(col)
    }
}

/// Parsed values the typed columns sort on. The HTML table receives the
/// same keys so the browser sorts exactly like `TableQuery`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortKeys {
    pub id: Option<u64>,
    pub product: Option<u64>,
    pub date: Option<NaiveDate>,
    pub cost: Option<f64>,
}

impl SortKeys {
    pub fn of(rec: &DefectRecord) -> Self {
        Self {
            id: rec.defect_id.parse().ok(),
            product: rec.product_id.parse().ok(),
            date: rec.date(),
            cost: rec.cost(),
        }
    }
}

/// Numeric ids compare as numbers, everything else as text.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDir::Asc),
            "desc" | "descending" => Ok(SortDir::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub search: Option<String>,
    pub severity: Option<Severity>,
    pub sort: Option<(Column, SortDir)>,
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a DefectRecord>,
    /// Rows passing the filters, before pagination.
    pub matched: usize,
    pub total: usize,
}

pub fn matches_search(rec: &DefectRecord, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || rec
            .fields()
            .iter()
            .any(|f| f.to_lowercase().contains(needle_lower))
}

impl TableQuery {
    pub fn apply<'a>(&self, records: &'a [DefectRecord]) -> TablePage<'a> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        let mut rows: Vec<&DefectRecord> = records
            .iter()
            .filter(|r| matches_search(r, &needle))
            .filter(|r| self.severity.as_ref().map_or(true, |s| r.severity().matches(s)))
            .collect();

        if let Some((col, dir)) = self.sort {
            rows.sort_by(|a, b| {
                let ord = col.compare(a, b);
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }

        let matched = rows.len();
        let rows = rows
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        TablePage {
            rows,
            matched,
            total: records.len(),
        }
    }
}

/// Cut to `width` characters, ending in an ellipsis when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, sev: &str, date: &str, cost: &str, desc: &str) -> DefectRecord {
        DefectRecord {
            defect_id: id.into(),
            severity: sev.into(),
            defect_date: date.into(),
            repair_cost: cost.into(),
            defect_description: desc.into(),
            ..Default::default()
        }
    }

    fn rows() -> Vec<DefectRecord> {
        vec![
            rec("10", "minor", "2024-03-01", "90.5", "Surface scratch"),
            rec("2", "critical", "2024-01-20", "", "Internal crack"),
            rec("7", "Critical", "2024-02-11", "400", "Crack at flange"),
            rec("1", "moderate", "2024-01-05", "120", "Warping"),
        ]
    }

    fn ids(page: &TablePage) -> Vec<String> {
        page.rows.iter().map(|r| r.defect_id.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_all_fields() {
        let data = rows();
        let q = TableQuery {
            search: Some("CRACK".into()),
            ..Default::default()
        };
        let page = q.apply(&data);
        assert_eq!(ids(&page), ["2", "7"]);
        assert_eq!(page.matched, 2);
        assert_eq!(page.total, 4);
    }

    #[test]
    fn blank_search_matches_everything() {
        let data = rows();
        let q = TableQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(q.apply(&data).matched, 4);
    }

    #[test]
    fn severity_filter() {
        let data = rows();
        let q = TableQuery {
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["2", "7"]);
    }

    #[test]
    fn sort_cost_numeric_missing_last() {
        let data = rows();
        let q = TableQuery {
            sort: Some((Column::RepairCost, SortDir::Asc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["10", "1", "7", "2"]);
        let q = TableQuery {
            sort: Some((Column::RepairCost, SortDir::Desc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["2", "7", "1", "10"]);
    }

    #[test]
    fn sort_ids_and_dates() {
        let data = rows();
        let q = TableQuery {
            sort: Some((Column::DefectId, SortDir::Asc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["1", "2", "7", "10"]);
        let q = TableQuery {
            sort: Some((Column::Date, SortDir::Desc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["10", "7", "2", "1"]);
    }

    #[test]
    fn pagination_after_filtering() {
        let data = rows();
        let q = TableQuery {
            sort: Some((Column::DefectId, SortDir::Asc)),
            offset: 1,
            limit: Some(2),
            ..Default::default()
        };
        let page = q.apply(&data);
        assert_eq!(ids(&page), ["2", "7"]);
        assert_eq!(page.matched, 4);
    }

    #[test]
    fn text_sort_ignores_case_and_keeps_ties_stable() {
        let types = ["cosmetic", "Structural", "Cosmetic", "functional", "COSMETIC"];
        let data: Vec<DefectRecord> = types
            .iter()
            .enumerate()
            .map(|(i, ty)| DefectRecord {
                defect_id: (i + 1).to_string(),
                defect_type: ty.to_string(),
                ..Default::default()
            })
            .collect();
        let q = TableQuery {
            sort: Some((Column::DefectType, SortDir::Asc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["1", "3", "5", "4", "2"]);
        let q = TableQuery {
            sort: Some((Column::DefectType, SortDir::Desc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["2", "4", "1", "3", "5"]);
    }

    #[test]
    fn dates_in_other_formats_sort_chronologically() {
        let data = vec![
            rec("1", "minor", "03/15/2024", "1", ""),
            rec("2", "minor", "12/01/2023", "1", ""),
            rec("3", "minor", "", "1", ""),
        ];
        let q = TableQuery {
            sort: Some((Column::Date, SortDir::Asc)),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["3", "2", "1"]);
    }

    #[test]
    fn other_severity_filter_ignores_case() {
        let mut data = rows();
        data.push(rec("11", "Unknown", "2024-01-01", "1", ""));
        data.push(rec("12", "", "2024-01-01", "1", ""));
        let q = TableQuery {
            severity: Some(Severity::parse("unknown")),
            ..Default::default()
        };
        assert_eq!(ids(&q.apply(&data)), ["11", "12"]);
    }

    #[test]
    fn sort_keys_parse_typed_columns() {
        let k = SortKeys::of(&DefectRecord {
            defect_id: "12".into(),
            product_id: "".into(),
            defect_date: "12/01/2023".into(),
            repair_cost: "12abc".into(),
            ..Default::default()
        });
        assert_eq!(k.id, Some(12));
        assert_eq!(k.product, None);
        assert_eq!(k.date, NaiveDate::from_ymd_opt(2023, 12, 1));
        assert_eq!(k.cost, None);
    }

    #[test]
    fn column_aliases() {
        assert_eq!("cost".parse::<Column>().unwrap(), Column::RepairCost);
        assert_eq!("Repair Action".parse::<Column>().unwrap(), Column::RepairAction);
        assert_eq!("defect_date".parse::<Column>().unwrap(), Column::Date);
        assert!("price".parse::<Column>().is_err());
        assert_eq!("DESC".parse::<SortDir>().unwrap(), SortDir::Desc);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer description", 8), "a longe…");
    }
}
