use crate::model::ObservationRow;
use crate::table::{SortDirection, display_value, sort_rows};

/// Convert fetched metric rows to CSV format
///
/// Rows are written in the given sort order under an
/// `agency,title,level,date,value` header. Fields containing commas, quotes
/// or newlines are quoted, with embedded quotes doubled.
///
/// # Examples
/// ```
/// use ecfr_dashboard::export::to_csv;
/// use ecfr_dashboard::model::ObservationRow;
/// use ecfr_dashboard::table::SortDirection;
///
/// let rows: Vec<ObservationRow> = serde_json::from_str(
///     r#"[{"agency_slug": "BIA", "Title": "Indians, general", "Level": 1, "Date": "2022-01-01", "Value": 8}]"#,
/// ).unwrap();
/// let csv = to_csv(&rows, SortDirection::Descending);
/// assert_eq!(csv, "agency,title,level,date,value\nBIA,\"Indians, general\",1,2022-01-01,8\n");
/// ```
pub fn to_csv(rows: &[ObservationRow], direction: SortDirection) -> String {
    let mut csv_content = String::from("agency,title,level,date,value\n");

    for row in sort_rows(rows, direction) {
        let fields = [
            row.agency.clone(),
            row.title_text(),
            row.level_text(),
            row.date.clone(),
            display_value(row),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                csv_content.push(',');
            }
            push_field(&mut csv_content, field);
        }
        csv_content.push('\n');
    }

    csv_content
}

fn push_field(out: &mut String, value: &str) {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        out.push_str(&format!("\"{}\"", escaped));
    } else {
        out.push_str(value);
    }
}
