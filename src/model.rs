use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Header order of the defects file.
pub const EXPECTED_COLUMNS: [&str; 10] = [
    "defect_id",
    "product_id",
    "defect_type",
    "defect_description",
    "defect_date",
    "defect_location",
    "severity",
    "inspection_method",
    "repair_action",
    "repair_cost",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// One row of the defects file. Text columns are kept as read (trimmed);
/// typed accessors derive severity, cost and date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub defect_id: String,
    pub product_id: String,
    pub defect_type: String,
    pub defect_description: String,
    pub defect_date: String,
    pub defect_location: String,
    pub severity: String,
    pub inspection_method: String,
    pub repair_action: String,
    pub repair_cost: String,
}

impl DefectRecord {
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.severity)
    }

    /// `None` when blank or not a number.
    pub fn cost(&self) -> Option<f64> {
        let raw = self.repair_cost.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.defect_date)
    }

    /// Field values in header order.
    pub fn fields(&self) -> [&str; 10] {
        [
            &self.defect_id,
            &self.product_id,
            &self.defect_type,
            &self.defect_description,
            &self.defect_date,
            &self.defect_location,
            &self.severity,
            &self.inspection_method,
            &self.repair_action,
            &self.repair_cost,
        ]
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    Moderate,
    Minor,
    Other(String),
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "moderate" => Severity::Moderate,
            "minor" => Severity::Minor,
            _ => Severity::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Severity::Critical => "Critical",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
            Severity::Other(s) if s.is_empty() => "Unknown",
            Severity::Other(s) => s,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Critical => "#d32f2f",
            Severity::Moderate => "#fbc02d",
            Severity::Minor => "#388e3c",
            Severity::Other(_) => "#9e9e9e",
        }
    }

    /// Badge class used by the table view.
    pub fn badge(&self) -> &'static str {
        match self {
            Severity::Critical => "error",
            Severity::Moderate => "warning",
            Severity::Minor => "success",
            Severity::Other(_) => "default",
        }
    }

    /// Filter equality: unrecognised levels compare by label, ignoring case,
    /// so a blank severity matches "unknown".
    pub fn matches(&self, other: &Severity) -> bool {
        match (self, other) {
            (Severity::Other(_), Severity::Other(_)) => {
                self.label().to_lowercase() == other.label().to_lowercase()
            }
            _ => self == other,
        }
    }

    /// The three known levels, most severe first.
    pub fn known() -> [Severity; 3] {
        [Severity::Critical, Severity::Moderate, Severity::Minor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cost: &str, date: &str) -> DefectRecord {
        DefectRecord {
            defect_id: "1".into(),
            repair_cost: cost.into(),
            defect_date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn severity_is_case_insensitive() {
        assert_eq!(Severity::parse("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::parse(" Minor "), Severity::Minor);
        assert_eq!(Severity::parse("severe"), Severity::Other("severe".into()));
        assert_eq!(Severity::parse("").label(), "Unknown");
    }

    #[test]
    fn badge_matches_severity() {
        assert_eq!(Severity::Critical.badge(), "error");
        assert_eq!(Severity::Moderate.badge(), "warning");
        assert_eq!(Severity::Minor.badge(), "success");
        assert_eq!(Severity::Other("x".into()).badge(), "default");
    }

    #[test]
    fn other_levels_match_ignoring_case() {
        assert!(Severity::parse("Unknown").matches(&Severity::parse("unknown")));
        assert!(Severity::parse("").matches(&Severity::parse("UNKNOWN")));
        assert!(!Severity::parse("severe").matches(&Severity::parse("unknown")));
        assert!(Severity::parse("minor").matches(&Severity::Minor));
        assert!(!Severity::Minor.matches(&Severity::parse("Other")));
    }

    #[test]
    fn cost_parses_or_is_none() {
        assert_eq!(record("245.50", "").cost(), Some(245.5));
        assert_eq!(record("", "").cost(), None);
        assert_eq!(record("n/a", "").cost(), None);
        assert_eq!(record("NaN", "").cost(), None);
    }

    #[test]
    fn dates_accept_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(record("", "2024-03-07").date(), expected);
        assert_eq!(record("", "03/07/2024").date(), expected);
        assert_eq!(record("", "07-03-2024").date(), expected);
        assert_eq!(record("", "yesterday").date(), None);
    }
}
