use std::collections::BTreeSet;

use crate::model::ObservationRow;

/// Per-day, per-agency totals of a row set.
///
/// Dates and agencies are kept sorted ascending. Cells are stored row-major by
/// date, so the stacked column for a date is a contiguous slice.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateMatrix {
    dates: Vec<String>,
    agencies: Vec<String>,
    cells: Vec<f64>,
}

impl AggregateMatrix {
    /// Groups `rows` by (day-truncated date, agency) and sums their values.
    ///
    /// # Examples
    /// ```
    /// use ecfr_dashboard::aggregate::AggregateMatrix;
    /// use ecfr_dashboard::model::ObservationRow;
    ///
    /// let rows: Vec<ObservationRow> = serde_json::from_str(r#"[
    ///     {"agency_slug": "BIA", "Date": "2022-01-01T00:00:00", "Value": 5},
    ///     {"agency_slug": "NSF", "Date": "2022-01-01", "Value": 2}
    /// ]"#).unwrap();
    ///
    /// let matrix = AggregateMatrix::from_rows(&rows);
    /// assert_eq!(matrix.get("2022-01-01", "BIA"), 5.0);
    /// assert_eq!(matrix.max_column_total(), 7.0);
    /// ```
    pub fn from_rows(rows: &[ObservationRow]) -> Self {
        let dates: Vec<String> = rows
            .iter()
            .map(|r| r.day().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let agencies: Vec<String> = rows
            .iter()
            .map(|r| r.agency.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut matrix = AggregateMatrix {
            cells: vec![0.0; dates.len() * agencies.len()],
            dates,
            agencies,
        };

        for row in rows {
            if let Some(index) = matrix.cell_index(row.day(), &row.agency) {
                matrix.cells[index] += row.numeric_value();
            }
        }

        matrix
    }

    fn cell_index(&self, date: &str, agency: &str) -> Option<usize> {
        let d = self
            .dates
            .binary_search_by(|probe| probe.as_str().cmp(date))
            .ok()?;
        let a = self
            .agencies
            .binary_search_by(|probe| probe.as_str().cmp(agency))
            .ok()?;
        Some(d * self.agencies.len() + a)
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn agencies(&self) -> &[String] {
        &self.agencies
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Total for one (date, agency) pair; unknown keys read as zero.
    pub fn get(&self, date: &str, agency: &str) -> f64 {
        self.cell_index(date, agency)
            .map(|i| self.cells[i])
            .unwrap_or(0.0)
    }

    /// Agency totals for the date at `date_index`, in agency order.
    pub fn column(&self, date_index: usize) -> &[f64] {
        let width = self.agencies.len();
        let start = date_index * width;
        self.cells.get(start..start + width).unwrap_or(&[])
    }

    pub fn column_total(&self, date_index: usize) -> f64 {
        self.column(date_index).iter().sum()
    }

    /// Largest stacked column, never below 1 so it can be used as a divisor.
    pub fn max_column_total(&self) -> f64 {
        (0..self.dates.len())
            .map(|i| self.column_total(i))
            .fold(1.0, f64::max)
    }

    pub fn grand_total(&self) -> f64 {
        self.cells.iter().sum()
    }
}
