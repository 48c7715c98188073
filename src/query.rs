use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::model::{MetricName, Rank};

lazy_static! {
    static ref AGENCY_TOKEN: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw values of the query form, exactly as submitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub metric_name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub start_dt: String,
    #[serde(default)]
    pub end_dt: String,
    #[serde(default)]
    pub agencies: String,
}

impl Default for QueryForm {
    fn default() -> Self {
        Self {
            metric_name: MetricName::WordCount.as_str().to_string(),
            level: Rank::Chapter.name().to_string(),
            start_dt: "2022-01-01".to_string(),
            end_dt: "2022-02-01".to_string(),
            agencies: "BIA".to_string(),
        }
    }
}

impl QueryForm {
    pub fn to_query(&self) -> Result<MetricQuery, DashboardError> {
        MetricQuery::parse(
            &self.metric_name,
            &self.level,
            &self.start_dt,
            &self.end_dt,
            &self.agencies,
        )
    }
}

/// A validated metric query, ready to be sent to the query service.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricQuery {
    pub metric: MetricName,
    pub rank: Rank,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub agencies: Vec<String>,
}

impl MetricQuery {
    /// Builds a query from the form's text fields.
    ///
    /// # Errors
    /// * `DashboardError::InvalidQuery` if the metric or level is not one of the
    ///   known names, a date is not `YYYY-MM-DD`, the range is inverted, or the
    ///   agency list is empty or holds a malformed identifier
    pub fn parse(
        metric: &str,
        level: &str,
        start: &str,
        end: &str,
        agencies: &str,
    ) -> Result<Self, DashboardError> {
        let metric: MetricName = metric.parse()?;
        let rank: Rank = level.parse()?;
        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;

        if start > end {
            return Err(DashboardError::InvalidQuery(format!(
                "Start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }

        Ok(MetricQuery {
            metric,
            rank,
            start,
            end,
            agencies: parse_agencies(agencies)?,
        })
    }

    pub fn agencies_param(&self) -> String {
        self.agencies.join(",")
    }

    /// Query-string pairs in the order the service documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("metric_name", self.metric.as_str().to_string()),
            ("level", self.rank.index().to_string()),
            ("start_dt", self.start.format(DATE_FORMAT).to_string()),
            ("end_dt", self.end.format(DATE_FORMAT).to_string()),
            ("agencies", self.agencies_param()),
        ]
    }

    /// Percent-encoded `key=value&...` form of [`MetricQuery::params`].
    pub fn query_string(&self) -> String {
        self.params()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn parse_date(which: &str, raw: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        DashboardError::InvalidQuery(format!("Invalid {} date: {:?}", which, raw))
    })
}

/// Splits a comma-separated agency filter, trimming tokens and dropping empty ones.
pub fn parse_agencies(raw: &str) -> Result<Vec<String>, DashboardError> {
    let mut agencies = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !AGENCY_TOKEN.is_match(token) {
            return Err(DashboardError::InvalidQuery(format!(
                "Invalid agency identifier: {:?}",
                token
            )));
        }
        agencies.push(token.to_string());
    }

    if agencies.is_empty() {
        return Err(DashboardError::InvalidQuery(
            "Enter at least one agency".to_string(),
        ));
    }
    Ok(agencies)
}
