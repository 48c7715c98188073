//! Stacked bar chart of per-day, per-agency totals, drawn as plain SVG.
//!
//! Layout is computed first as plain data ([`StackedChart`]) so it can be checked
//! without parsing markup; [`StackedChart::to_svg`] only serializes it.

use std::fmt::Write;

use crate::aggregate::AggregateMatrix;
use crate::model::ObservationRow;

/// Agency colors, assigned by sorted agency position and repeating past the end.
pub const PALETTE: [&str; 7] = [
    "#4f46e5", "#22c55e", "#f59e0b", "#ef4444", "#06b6d4", "#a855f7", "#3b82f6",
];

pub const COLUMN_PITCH: f64 = 50.0;
pub const COLUMN_OFFSET: f64 = 12.0;
pub const BAR_WIDTH: f64 = 26.0;
pub const BASELINE_Y: f64 = 170.0;
pub const PLOT_HEIGHT: f64 = 130.0;
pub const CHART_HEIGHT: f64 = 200.0;
pub const MIN_CHART_WIDTH: f64 = 200.0;
pub const LABEL_Y: f64 = 188.0;
pub const LABEL_ANGLE: f64 = -35.0;
pub const LABEL_FONT_SIZE: f64 = 10.0;
const LEGEND_LINE: f64 = 18.0;

pub fn color_for(agency_index: usize) -> &'static str {
    PALETTE[agency_index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub agency: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
}

/// Rotated date caption under a column. The rotation pivots on `(pivot_x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DateLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub pivot_x: f64,
    pub angle: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub date: String,
    pub x: f64,
    pub segments: Vec<Segment>,
    pub label: DateLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub agency: String,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StackedChart {
    pub width: f64,
    pub height: f64,
    pub max_total: f64,
    pub columns: Vec<Column>,
    pub legend: Vec<LegendEntry>,
}

impl StackedChart {
    pub fn from_rows(rows: &[ObservationRow]) -> Self {
        Self::layout(&AggregateMatrix::from_rows(rows))
    }

    /// Lays out one column per date with one segment per agency, stacked
    /// bottom-up from the baseline in agency order. Segment heights are scaled
    /// against the tallest column so it reaches exactly `PLOT_HEIGHT`.
    pub fn layout(matrix: &AggregateMatrix) -> Self {
        let max_total = matrix.max_column_total();

        let columns = matrix
            .dates()
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let x = i as f64 * COLUMN_PITCH + COLUMN_OFFSET;
                let mut current_y = BASELINE_Y;
                let segments = matrix
                    .agencies()
                    .iter()
                    .zip(matrix.column(i))
                    .enumerate()
                    .map(|(ai, (agency, &value))| {
                        let height = value / max_total * PLOT_HEIGHT;
                        current_y -= height;
                        Segment {
                            agency: agency.clone(),
                            value,
                            x,
                            y: current_y,
                            width: BAR_WIDTH,
                            height,
                            color: color_for(ai),
                        }
                    })
                    .collect();

                Column {
                    date: date.clone(),
                    x,
                    segments,
                    label: DateLabel {
                        text: date.clone(),
                        x: x - 2.0,
                        y: LABEL_Y,
                        pivot_x: x,
                        angle: LABEL_ANGLE,
                    },
                }
            })
            .collect::<Vec<_>>();

        let legend = matrix
            .agencies()
            .iter()
            .enumerate()
            .map(|(i, agency)| LegendEntry {
                agency: agency.clone(),
                color: color_for(i),
            })
            .collect();

        StackedChart {
            width: (columns.len() as f64 * COLUMN_PITCH).max(MIN_CHART_WIDTH),
            height: CHART_HEIGHT,
            max_total,
            columns,
            legend,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Inline `<svg>` element that scales to its container width.
    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{}" viewBox="0 0 {} {}">"#,
            num(self.height),
            num(self.width),
            num(self.height)
        );
        self.write_columns(&mut svg);
        svg.push_str("</svg>");
        svg
    }

    /// Standalone SVG document with the legend drawn beneath the bars.
    pub fn to_svg_document(&self) -> String {
        let total_height = self.height + self.legend.len() as f64 * LEGEND_LINE;
        let mut svg = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        svg.push('\n');
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(total_height)
        );
        self.write_columns(&mut svg);
        for (i, entry) in self.legend.iter().enumerate() {
            let y = self.height + i as f64 * LEGEND_LINE;
            let _ = write!(
                svg,
                r##"<rect x="12" y="{}" width="12" height="12" fill="{}"/><text x="30" y="{}" font-size="12" fill="#374151">{}</text>"##,
                num(y + 2.0),
                entry.color,
                num(y + 12.0),
                escape_xml(&entry.agency)
            );
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn write_columns(&self, svg: &mut String) {
        for column in &self.columns {
            svg.push_str("<g>");
            for seg in &column.segments {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"><title>{}: {}</title></rect>"#,
                    num(seg.x),
                    num(seg.y),
                    num(seg.width),
                    num(seg.height),
                    seg.color,
                    escape_xml(&seg.agency),
                    num(seg.value)
                );
            }
            let label = &column.label;
            let _ = write!(
                svg,
                r##"<text x="{}" y="{}" font-size="{}" fill="#374151" transform="rotate({} {} {})">{}</text>"##,
                num(label.x),
                num(label.y),
                num(LABEL_FONT_SIZE),
                num(label.angle),
                num(label.pivot_x),
                num(label.y),
                escape_xml(&label.text)
            );
            svg.push_str("</g>");
        }
    }
}

// Two decimals at most, without trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_trims_trailing_zeros() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(103.333333), "103.33");
        assert_eq!(num(-35.0), "-35");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn escape_xml_handles_markup() {
        assert_eq!(escape_xml("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
