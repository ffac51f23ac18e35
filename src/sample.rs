//! Deterministic synthetic defect data for demos and tests.

use std::io::Write;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{DefectRecord, EXPECTED_COLUMNS};

const TYPES: [&str; 3] = ["Structural", "Functional", "Cosmetic"];
const LOCATIONS: [&str; 3] = ["Component", "Surface", "Internal"];
const INSPECTIONS: [&str; 4] = ["Visual Inspection", "Automated Testing", "Manual Testing", "Ultrasonic"];
const ACTIONS: [&str; 3] = ["Repair", "Replacement", "Rework"];

const STRUCTURAL: [&str; 4] = ["Crack", "Inclusion", "Void", "Lap"];
const FUNCTIONAL: [&str; 4] = ["Warping", "Out of tolerance bore", "Misaligned flange", "Thin web"];
const COSMETIC: [&str; 4] = ["Surface mark", "Scratch", "Discoloration", "Pitting"];

fn description(ty: &str, location: &str, rng: &mut StdRng) -> String {
    let pool: &[&str] = match ty {
        "Structural" => &STRUCTURAL,
        "Functional" => &FUNCTIONAL,
        _ => &COSMETIC,
    };
    let what = pool.choose(rng).copied().unwrap_or("Defect");
    format!("{} found on {} area", what, location.to_lowercase())
}

pub fn generate(rows: usize, seed: u64) -> Vec<DefectRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (1..=rows)
        .map(|id| {
            let ty = TYPES[rng.gen_range(0..TYPES.len())];
            let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
            let roll: f64 = rng.gen();
            let (severity, cost_range) = if roll < 0.2 {
                ("Critical", 600.0..1000.0)
            } else if roll < 0.55 {
                ("Moderate", 200.0..650.0)
            } else {
                ("Minor", 50.0..250.0)
            };
            let date = start + Duration::days(rng.gen_range(0..180));
            DefectRecord {
                defect_id: id.to_string(),
                product_id: rng.gen_range(1..=100).to_string(),
                defect_type: ty.to_string(),
                defect_description: description(ty, location, &mut rng),
                defect_date: date.format("%Y-%m-%d").to_string(),
                defect_location: location.to_string(),
                severity: severity.to_string(),
                inspection_method: INSPECTIONS[rng.gen_range(0..INSPECTIONS.len())].to_string(),
                repair_action: ACTIONS[rng.gen_range(0..ACTIONS.len())].to_string(),
                repair_cost: format!("{:.2}", rng.gen_range(cost_range)),
            }
        })
        .collect()
}

pub fn write_csv<W: Write>(records: &[DefectRecord], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(EXPECTED_COLUMNS)?;
    for rec in records {
        writer.write_record(rec.fields())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_defects;

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate(50, 7), generate(50, 7));
        assert_ne!(generate(50, 7), generate(50, 8));
    }

    #[test]
    fn generated_rows_are_well_formed() {
        for rec in generate(200, 1) {
            assert!(rec.cost().is_some());
            assert!(rec.date().is_some());
            assert!(matches!(rec.severity().badge(), "error" | "warning" | "success"));
        }
    }

    #[test]
    fn written_csv_parses_back() {
        let records = generate(25, 3);
        let mut buf = Vec::new();
        write_csv(&records, &mut buf).unwrap();
        let parsed = parse_defects(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_eq!(parsed.records, records);
    }
}
