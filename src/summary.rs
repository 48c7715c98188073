use serde::Serialize;

use crate::model::{StructuralSummary, TextLengthStats};

/// How many element types the distribution charts show.
pub const TOP_ELEMENT_LIMIT: usize = 10;

/// A single named bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub name: String,
    pub value: u64,
}

/// Share of one element type in the pie chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
    pub fraction: f64,
    pub label: String,
}

/// A headline number with its caption.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
    pub label: &'static str,
}

/// The element types with the highest counts, largest first.
///
/// Ties keep the order the service listed them in.
pub fn top_elements(summary: &StructuralSummary, limit: usize) -> Vec<Bar> {
    let mut bars: Vec<Bar> = summary
        .element_distribution
        .entries()
        .iter()
        .map(|(name, count)| Bar {
            name: name.clone(),
            value: *count,
        })
        .collect();
    bars.sort_by(|a, b| b.value.cmp(&a.value));
    bars.truncate(limit);
    bars
}

/// Sections per part in service order, or `None` when there is nothing to chart.
pub fn section_bars(summary: &StructuralSummary) -> Option<Vec<Bar>> {
    if summary.section_count_by_part.is_empty() {
        return None;
    }
    Some(
        summary
            .section_count_by_part
            .entries()
            .iter()
            .map(|(name, count)| Bar {
                name: name.clone(),
                value: *count,
            })
            .collect(),
    )
}

pub fn text_stat_bars(stats: &TextLengthStats) -> Vec<Bar> {
    vec![
        Bar {
            name: "Mean Length".to_string(),
            value: whole(stats.mean),
        },
        Bar {
            name: "Min Length".to_string(),
            value: whole(stats.min),
        },
        Bar {
            name: "Max Length".to_string(),
            value: whole(stats.max),
        },
    ]
}

pub fn pie_slices(bars: &[Bar]) -> Vec<PieSlice> {
    let total: u64 = bars.iter().map(|b| b.value).sum();
    bars.iter()
        .map(|bar| {
            let fraction = if total == 0 {
                0.0
            } else {
                bar.value as f64 / total as f64
            };
            PieSlice {
                name: bar.name.clone(),
                value: bar.value,
                fraction,
                // Halves round away from zero: 12.5% shows as 13%
                label: format!("{}: {}%", bar.name, (fraction * 100.0).round()),
            }
        })
        .collect()
}

pub fn overview_cards(summary: &StructuralSummary) -> Vec<Card> {
    vec![
        Card {
            title: "Total Elements",
            value: format_thousands(summary.total_elements),
            label: "XML elements parsed",
        },
        Card {
            title: "Sections",
            value: summary.total_sections.to_string(),
            label: "Regulatory sections",
        },
        Card {
            title: "Parts",
            value: summary.total_parts.to_string(),
            label: "Regulatory parts",
        },
        Card {
            title: "Subparts",
            value: summary.total_subparts.to_string(),
            label: "Regulatory subparts",
        },
    ]
}

pub fn text_cards(stats: &TextLengthStats) -> Vec<Card> {
    vec![
        Card {
            title: "Average Text Length",
            value: whole(stats.mean).to_string(),
            label: "characters",
        },
        Card {
            title: "Shortest Text",
            value: whole(stats.min).to_string(),
            label: "characters",
        },
        Card {
            title: "Longest Text",
            value: whole(stats.max).to_string(),
            label: "characters",
        },
        Card {
            title: "Total Characters",
            value: format_thousands(whole(stats.total_chars)),
            label: "across all text nodes",
        },
    ]
}

/// Formats `n` with comma thousands separators: `65432` → `"65,432"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// Nearest whole number, clamped at zero.
fn whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Everything the upload view shows for one summary.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryView {
    pub overview: Vec<Card>,
    pub top_elements: Vec<Bar>,
    pub sections: Option<Vec<Bar>>,
    pub text_stats: Vec<Bar>,
    pub text_cards: Vec<Card>,
    pub element_share: Vec<PieSlice>,
}

impl SummaryView {
    pub fn from_summary(summary: &StructuralSummary) -> Self {
        let top = top_elements(summary, TOP_ELEMENT_LIMIT);
        SummaryView {
            overview: overview_cards(summary),
            element_share: pie_slices(&top),
            top_elements: top,
            sections: section_bars(summary),
            text_stats: text_stat_bars(&summary.text_length_stats),
            text_cards: text_cards(&summary.text_length_stats),
        }
    }
}
