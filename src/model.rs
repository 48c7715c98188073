use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Position in the regulatory hierarchy, ordered from broadest to narrowest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Title,
    Chapter,
    Subchapter,
    Part,
    Subpart,
    Section,
}

impl Rank {
    pub const ALL: [Rank; 6] = [
        Rank::Title,
        Rank::Chapter,
        Rank::Subchapter,
        Rank::Part,
        Rank::Subpart,
        Rank::Section,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Title => "Title",
            Rank::Chapter => "Chapter",
            Rank::Subchapter => "Subchapter",
            Rank::Part => "Part",
            Rank::Subpart => "Subpart",
            Rank::Section => "Section",
        }
    }

    /// Ordinal sent to the query service as the `level` parameter.
    pub fn index(&self) -> usize {
        Rank::ALL
            .iter()
            .position(|rank| rank == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Rank> {
        Rank::ALL.get(index).copied()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rank {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rank::ALL
            .iter()
            .find(|rank| rank.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| DashboardError::InvalidQuery(format!("Unknown level: {}", s)))
    }
}

/// The metrics the query service knows how to serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricName {
    WordCount,
    KeywordCount,
    CrossReferencesAverage,
    LexicalDiversity,
    CitationDepth,
}

impl MetricName {
    pub const ALL: [MetricName; 5] = [
        MetricName::WordCount,
        MetricName::KeywordCount,
        MetricName::CrossReferencesAverage,
        MetricName::LexicalDiversity,
        MetricName::CitationDepth,
    ];

    /// Wire name, exactly as the query service expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::WordCount => "Word count",
            MetricName::KeywordCount => "Keyword count",
            MetricName::CrossReferencesAverage => "cross-references Average",
            MetricName::LexicalDiversity => "Lexical diversity",
            MetricName::CitationDepth => "Citation depth",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricName::ALL
            .iter()
            .find(|metric| metric.as_str() == s.trim())
            .copied()
            .ok_or_else(|| DashboardError::InvalidQuery(format!("Unknown metric: {}", s)))
    }
}

/// One observation returned by the metric query service.
///
/// Field names follow the service's JSON. `Title`, `Level` and `Value` are kept
/// as raw JSON values because the service is loose about their types; use the
/// accessor methods to read them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    #[serde(rename = "agency_slug", default)]
    pub agency: String,

    #[serde(rename = "Title", default)]
    pub title: Value,

    #[serde(rename = "Level_Name", default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,

    #[serde(rename = "Level", default)]
    pub level: Value,

    #[serde(rename = "Date", default)]
    pub date: String,

    #[serde(rename = "Value", default)]
    pub value: Value,
}

impl ObservationRow {
    /// Numeric reading of `Value`.
    ///
    /// Numbers are taken as-is, numeric strings are parsed, booleans count as
    /// 1 or 0. Anything else (missing, null, text, NaN) reads as zero.
    pub fn numeric_value(&self) -> f64 {
        let n = match &self.value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>().unwrap_or(0.0)
                }
            }
            Value::Bool(true) => 1.0,
            _ => 0.0,
        };
        if n.is_finite() { n } else { 0.0 }
    }

    /// The date truncated to day precision (`YYYY-MM-DD`).
    pub fn day(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    pub fn title_text(&self) -> String {
        json_text(&self.title)
    }

    pub fn level_text(&self) -> String {
        json_text(&self.level)
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Name → count pairs that remember the order the service sent them in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedCounts(Vec<(String, u64)>);

impl OrderedCounts {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        OrderedCounts(entries)
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for OrderedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = OrderedCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of names to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, count)) = map.next_entry::<String, f64>()? {
                    entries.push((name, count.max(0.0).round() as u64));
                }
                Ok(OrderedCounts(entries))
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

impl Serialize for OrderedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLengthStats {
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub total_chars: f64,
}

/// Statistics produced by the external XML analysis service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralSummary {
    pub total_elements: u64,
    pub total_sections: u64,
    pub total_parts: u64,
    pub total_subparts: u64,
    #[serde(default)]
    pub element_distribution: OrderedCounts,
    #[serde(default)]
    pub section_count_by_part: OrderedCounts,
    #[serde(default)]
    pub text_length_stats: TextLengthStats,
}
