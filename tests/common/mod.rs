#![allow(dead_code)]

use ecfr_dashboard::model::{ObservationRow, StructuralSummary};
use serde_json::json;

#[cfg(feature = "web")]
pub mod backend;

pub fn row(agency: &str, date: &str, value: serde_json::Value) -> ObservationRow {
    serde_json::from_value(json!({
        "agency_slug": agency,
        "Title": 25,
        "Level_Name": "Chapter",
        "Level": "I",
        "Date": date,
        "Value": value,
    }))
    .unwrap()
}

/// BIA and NSF over two days, with one duplicate BIA row on the first day.
pub fn two_agency_rows() -> Vec<ObservationRow> {
    vec![
        row("BIA", "2022-01-01", json!(10)),
        row("NSF", "2022-01-01", json!(5)),
        row("BIA", "2022-01-02", json!(20)),
        row("BIA", "2022-01-01T12:30:00", json!(2.5)),
    ]
}

// Kept as text so the map order is the document order.
pub const SUMMARY_JSON: &str = r#"{
    "total_elements": 65432,
    "total_sections": 120,
    "total_parts": 12,
    "total_subparts": 30,
    "element_distribution": {
        "P": 500, "SECTION": 120, "HEAD": 140, "PART": 12, "SUBPART": 30, "CITA": 90,
        "AUTH": 12, "SOURCE": 12, "NOTE": 3, "FP": 7, "EXTRACT": 1, "GPOTABLE": 2
    },
    "section_count_by_part": { "Part 1": 10, "Part 2": 4 },
    "text_length_stats": { "mean": 84.6, "min": 1, "max": 2048, "total_chars": 1234567 }
}"#;

pub fn summary() -> StructuralSummary {
    serde_json::from_str(SUMMARY_JSON).unwrap()
}
