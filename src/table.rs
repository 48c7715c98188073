use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::ObservationRow;

/// Direction of the Value column sort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Value for the header's `aria-sort` attribute.
    pub fn aria(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Orders rows by numeric value without touching the originals.
///
/// The sort is stable, so rows with equal values keep the order the service
/// returned them in.
pub fn sort_rows(rows: &[ObservationRow], direction: SortDirection) -> Vec<&ObservationRow> {
    let mut sorted: Vec<&ObservationRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        let (av, bv) = (a.numeric_value(), b.numeric_value());
        match direction {
            SortDirection::Ascending => av.total_cmp(&bv),
            SortDirection::Descending => bv.total_cmp(&av),
        }
    });
    sorted
}

/// Date as shown in the table: `M/D/YYYY` when the leading day part parses,
/// the raw text otherwise.
pub fn display_date(raw: &str) -> String {
    let day = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Err(_) => raw.to_string(),
    }
}

/// Value cell text. Whole numbers drop the fractional part.
pub fn display_value(row: &ObservationRow) -> String {
    let v = row.numeric_value();
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// One rendered table line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow {
    pub agency: String,
    pub title: String,
    pub level: String,
    pub date: String,
    pub value: String,
}

pub fn table_rows(rows: &[ObservationRow], direction: SortDirection) -> Vec<TableRow> {
    sort_rows(rows, direction)
        .into_iter()
        .map(|row| TableRow {
            agency: row.agency.clone(),
            title: row.title_text(),
            level: row.level_text(),
            date: display_date(&row.date),
            value: display_value(row),
        })
        .collect()
}
