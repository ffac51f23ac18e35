//! Fixed text for the "Dataset Description" tab and the chart captions.

pub const TITLE: &str = "Manufacturing Defects Analysis Dashboard";
pub const SUBTITLE: &str = "Comprehensive analysis of manufacturing quality control data";

pub const ABOUT: &str = "Each record describes a defect found in a forged titanium part. \
The data covers a range of inspection methods (ultrasonic, dye penetrant, X-ray and visual \
checks) and tracks the type of each defect together with where in the part it was found, how \
severe it was, how it was repaired and what the repair cost.";

pub const COLUMNS: [(&str, &str); 10] = [
    ("defect_id", "Unique identifier for each defect"),
    ("product_id", "Identifier for the forged titanium part associated with the defect"),
    ("defect_type", "Type or category of the defect (e.g. structural, functional, cosmetic)"),
    ("defect_description", "Description of the defect"),
    ("defect_date", "Date when the defect was detected"),
    ("defect_location", "Location within the part where the defect was found (e.g. surface, component, internal)"),
    ("severity", "Severity level of the defect (minor, moderate, critical)"),
    ("inspection_method", "Method used to detect the defect (ultrasonic, dye penetrant, X-ray, visual inspection)"),
    ("repair_action", "Action taken to repair or address the defect"),
    ("repair_cost", "Cost incurred to repair the defect (in GBP)"),
];

pub const POTENTIAL_USES: [(&str, &str); 4] = [
    ("Quality Control Analysis", "Analyze defect patterns and trends in manufacturing processes"),
    ("Process Improvement", "Identify areas for process optimization to reduce defect rates"),
    ("Cost Analysis", "Evaluate the financial impact of defects on production costs and profitability"),
    ("Product Quality Assurance", "Enhance product quality assurance strategies based on defect data analysis"),
];

pub const DATA_QUALITY_NOTES: &str = "Rows without a defect identifier are dropped on load. \
A missing or unreadable repair cost counts as zero in totals and averages and is left out of \
the median, minimum and maximum. Dates are read as YYYY-MM-DD, MM/DD/YYYY or DD-MM-YYYY.";

pub const ANALYSIS_INTRO: &str = "Key metrics and trends from the quality control system: \
defect severity, cost impact and the most common defect types.";

pub const SEVERITY_CAPTION: &str = "Distribution of defect severities. Critical defects \
usually mean a part is rejected, moderate ones can often be repaired, minor ones are mostly \
cosmetic.";

pub const TYPES_CAPTION: &str = "Defect categories by frequency. Structural defects affect \
part integrity and safety, functional defects affect performance, cosmetic defects affect \
appearance.";

pub const TIMELINE_CAPTION: &str = "Defects reported per day. Use it to spot increases or \
decreases in quality issues and to check whether process changes made a difference.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EXPECTED_COLUMNS;

    #[test]
    fn glossary_covers_every_column_in_order() {
        let names: Vec<&str> = COLUMNS.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, EXPECTED_COLUMNS);
    }
}
