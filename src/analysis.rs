//! Aggregates behind the overview cards, charts and detailed analysis.
//!
//! Everything is recomputed from the record list on each render; there is
//! no incremental state.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::logging::{log, obj, v_num, Domain, Level, ProfileScope};
use crate::model::{DefectRecord, Severity};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub count: usize,
    pub percent: f64,
    pub total_cost: f64,
    pub avg_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeverityTally {
    pub critical: usize,
    pub moderate: usize,
    pub minor: usize,
    pub other: usize,
}

impl SeverityTally {
    pub fn count(&self, severity: &Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
            Severity::Other(_) => self.other,
        }
    }

    fn bump(&mut self, severity: &Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Minor => self.minor += 1,
            Severity::Other(_) => self.other += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostStats {
    /// Missing costs count as zero.
    pub total: f64,
    /// `total / total_defects`.
    pub average: f64,
    /// Over records that have a cost.
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub priced: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCost {
    pub severity: String,
    pub color: String,
    pub count: usize,
    pub percent: f64,
    pub total_cost: f64,
    pub avg_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_defects: usize,
    pub cost: CostStats,
    pub severity: SeverityTally,
    pub severity_breakdown: Vec<SeverityCost>,
    /// First-seen order.
    pub by_type: Vec<GroupStat>,
    pub by_location: Vec<GroupStat>,
    pub by_inspection: Vec<GroupStat>,
    pub by_repair_action: Vec<GroupStat>,
    pub daily: Vec<DatePoint>,
    pub monthly: Vec<DatePoint>,
    /// Earliest and latest parseable dates.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub top_n: usize,
}

#[derive(Default)]
struct GroupAccumulator {
    order: Vec<String>,
    totals: HashMap<String, (usize, f64)>,
}

impl GroupAccumulator {
    fn add(&mut self, raw_key: &str, cost: f64) {
        let key = if raw_key.trim().is_empty() {
            UNKNOWN
        } else {
            raw_key.trim()
        };
        match self.totals.get_mut(key) {
            Some(entry) => {
                entry.0 += 1;
                entry.1 += cost;
            }
            None => {
                self.order.push(key.to_string());
                self.totals.insert(key.to_string(), (1, cost));
            }
        }
    }

    fn finish(self, total: usize) -> Vec<GroupStat> {
        self.order
            .into_iter()
            .map(|key| {
                let (count, total_cost) = self.totals.get(&key).copied().unwrap_or((0, 0.0));
                GroupStat {
                    percent: percent(count, total),
                    avg_cost: mean(total_cost, count),
                    key,
                    count,
                    total_cost,
                }
            })
            .collect()
    }
}

pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Count by key, ordered by count descending then key ascending.
pub fn top(groups: &[GroupStat], n: usize) -> Vec<GroupStat> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    sorted.truncate(n);
    sorted
}

impl Summary {
    pub fn compute(records: &[DefectRecord], top_n: usize) -> Self {
        let _scope = ProfileScope::new("summary_compute");
        let total = records.len();
        let mut severity = SeverityTally::default();
        let mut severity_cost: HashMap<Severity, f64> = HashMap::new();
        let mut by_type = GroupAccumulator::default();
        let mut by_location = GroupAccumulator::default();
        let mut by_inspection = GroupAccumulator::default();
        let mut by_repair = GroupAccumulator::default();
        let mut daily: HashMap<String, (Option<NaiveDate>, usize)> = HashMap::new();
        let mut monthly: HashMap<(i32, u32), usize> = HashMap::new();
        let mut priced: Vec<f64> = Vec::new();
        let mut total_cost = 0.0;
        let mut first_date: Option<NaiveDate> = None;
        let mut last_date: Option<NaiveDate> = None;

        for rec in records {
            let cost = rec.cost();
            if let Some(c) = cost {
                priced.push(c);
            }
            let cost = cost.unwrap_or(0.0);
            total_cost += cost;

            let sev = rec.severity();
            severity.bump(&sev);
            let bucket = match sev {
                Severity::Other(_) => Severity::Other(String::new()),
                known => known,
            };
            *severity_cost.entry(bucket).or_insert(0.0) += cost;

            by_type.add(&rec.defect_type, cost);
            by_location.add(&rec.defect_location, cost);
            by_inspection.add(&rec.inspection_method, cost);
            by_repair.add(&rec.repair_action, cost);

            let parsed = rec.date();
            daily
                .entry(rec.defect_date.trim().to_string())
                .or_insert((parsed, 0))
                .1 += 1;
            if let Some(d) = parsed {
                first_date = Some(first_date.map_or(d, |v| v.min(d)));
                last_date = Some(last_date.map_or(d, |v| v.max(d)));
                *monthly.entry((d.year(), d.month())).or_insert(0) += 1;
            }
        }

        let mut severity_breakdown: Vec<SeverityCost> = Severity::known()
            .into_iter()
            .map(|s| {
                let count = severity.count(&s);
                let sum = severity_cost.get(&s).copied().unwrap_or(0.0);
                SeverityCost {
                    severity: s.label().to_string(),
                    color: s.color().to_string(),
                    count,
                    percent: percent(count, total),
                    total_cost: sum,
                    avg_cost: mean(sum, count),
                }
            })
            .collect();
        if severity.other > 0 {
            let other = Severity::Other(String::new());
            let sum = severity_cost.get(&other).copied().unwrap_or(0.0);
            severity_breakdown.push(SeverityCost {
                severity: "Other".to_string(),
                color: other.color().to_string(),
                count: severity.other,
                percent: percent(severity.other, total),
                total_cost: sum,
                avg_cost: mean(sum, severity.other),
            });
        }

        let mut daily: Vec<(String, Option<NaiveDate>, usize)> =
            daily.into_iter().map(|(k, (d, c))| (k, d, c)).collect();
        daily.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut monthly: Vec<((i32, u32), usize)> = monthly.into_iter().collect();
        monthly.sort_by_key(|(ym, _)| *ym);

        let priced_count = priced.len();
        let min = priced.iter().copied().reduce(f64::min);
        let max = priced.iter().copied().reduce(f64::max);

        let summary = Summary {
            total_defects: total,
            cost: CostStats {
                total: total_cost,
                average: mean(total_cost, total),
                median: median(&mut priced),
                min,
                max,
                priced: priced_count,
            },
            severity,
            severity_breakdown,
            by_type: by_type.finish(total),
            by_location: by_location.finish(total),
            by_inspection: by_inspection.finish(total),
            by_repair_action: by_repair.finish(total),
            daily: daily
                .into_iter()
                .map(|(date, _, count)| DatePoint { date, count })
                .collect(),
            monthly: monthly
                .into_iter()
                .map(|((y, m), count)| DatePoint {
                    date: format!("{:04}-{:02}", y, m),
                    count,
                })
                .collect(),
            first_date,
            last_date,
            top_n,
        };
        log(
            Level::Debug,
            Domain::Analysis,
            "summary_computed",
            obj(&[
                ("records", v_num(total as f64)),
                ("groups", v_num(summary.by_type.len() as f64)),
                ("days", v_num(summary.daily.len() as f64)),
                ("total_cost", v_num(summary.cost.total)),
            ]),
        );
        summary
    }

    pub fn top_types(&self) -> Vec<GroupStat> {
        top(&self.by_type, self.top_n)
    }

    pub fn critical_share(&self) -> f64 {
        percent(self.severity.critical, self.total_defects)
    }

    pub fn most_common_type(&self) -> Option<&GroupStat> {
        most_common(&self.by_type)
    }

    pub fn most_common_location(&self) -> Option<&GroupStat> {
        most_common(&self.by_location)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.first_date.zip(self.last_date)
    }
}

fn most_common(groups: &[GroupStat]) -> Option<&GroupStat> {
    groups
        .iter()
        .min_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, ty: &str, sev: &str, date: &str, cost: &str) -> DefectRecord {
        DefectRecord {
            defect_id: id.into(),
            defect_type: ty.into(),
            severity: sev.into(),
            defect_date: date.into(),
            repair_cost: cost.into(),
            defect_location: "Surface".into(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<DefectRecord> {
        vec![
            rec("1", "Structural", "critical", "2024-02-01", "100"),
            rec("2", "Cosmetic", "Minor", "2024-01-15", "50"),
            rec("3", "Structural", "moderate", "2024-01-15", ""),
            rec("4", "Functional", "CRITICAL", "2024-02-10", "250"),
            rec("5", "", "unknown", "2024-03-01", "40"),
        ]
    }

    #[test]
    fn totals_and_average_use_all_rows() {
        let s = Summary::compute(&sample(), 5);
        assert_eq!(s.total_defects, 5);
        assert!((s.cost.total - 440.0).abs() < 1e-9);
        assert!((s.cost.average - 88.0).abs() < 1e-9);
        assert_eq!(s.cost.priced, 4);
        assert_eq!(s.cost.min, Some(40.0));
        assert_eq!(s.cost.max, Some(250.0));
        assert_eq!(s.cost.median, Some(75.0));
    }

    #[test]
    fn severity_tally_is_case_insensitive() {
        let s = Summary::compute(&sample(), 5);
        assert_eq!(s.severity.critical, 2);
        assert_eq!(s.severity.moderate, 1);
        assert_eq!(s.severity.minor, 1);
        assert_eq!(s.severity.other, 1);
        assert!((s.critical_share() - 40.0).abs() < 1e-9);

        let crit = &s.severity_breakdown[0];
        assert_eq!(crit.severity, "Critical");
        assert!((crit.total_cost - 350.0).abs() < 1e-9);
        assert!((crit.avg_cost - 175.0).abs() < 1e-9);
        assert_eq!(s.severity_breakdown.last().unwrap().severity, "Other");
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let s = Summary::compute(&sample(), 5);
        let keys: Vec<&str> = s.by_type.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["Structural", "Cosmetic", "Functional", "Unknown"]);
        assert_eq!(s.by_type[0].count, 2);
        assert!((s.by_type[0].percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn top_types_sort_by_count_then_name() {
        let s = Summary::compute(&sample(), 3);
        let top: Vec<String> = s.top_types().into_iter().map(|g| g.key).collect();
        assert_eq!(top, ["Structural", "Cosmetic", "Functional"]);
        assert_eq!(s.most_common_type().unwrap().key, "Structural");
    }

    #[test]
    fn dates_sort_chronologically() {
        let s = Summary::compute(&sample(), 5);
        let days: Vec<(&str, usize)> = s.daily.iter().map(|p| (p.date.as_str(), p.count)).collect();
        assert_eq!(
            days,
            [("2024-01-15", 2), ("2024-02-01", 1), ("2024-02-10", 1), ("2024-03-01", 1)]
        );
        let months: Vec<(&str, usize)> = s.monthly.iter().map(|p| (p.date.as_str(), p.count)).collect();
        assert_eq!(months, [("2024-01", 2), ("2024-02", 2), ("2024-03", 1)]);
        let range = s.date_range().map(|(a, b)| (a.to_string(), b.to_string()));
        assert_eq!(range, Some(("2024-01-15".to_string(), "2024-03-01".to_string())));
    }

    #[test]
    fn date_range_ignores_unparsed_dates() {
        let records = vec![
            rec("1", "Structural", "Minor", "2024-01-05", "1"),
            rec("2", "Structural", "Minor", "", "1"),
            rec("3", "Structural", "Minor", "not a date", "1"),
            rec("4", "Structural", "Minor", "2024-03-01", "1"),
        ];
        let s = Summary::compute(&records, 5);
        assert_eq!(s.daily[0].date, "");
        assert_eq!(
            s.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
            ))
        );
        assert_eq!(Summary::compute(&records[1..3], 5).date_range(), None);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let s = Summary::compute(&[], 5);
        assert_eq!(s.total_defects, 0);
        assert_eq!(s.cost.average, 0.0);
        assert_eq!(s.cost.median, None);
        assert!(s.by_type.is_empty());
        assert!(s.most_common_type().is_none());
        assert_eq!(s.critical_share(), 0.0);
    }

    #[test]
    fn median_of_odd_and_even() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
