#![cfg(feature = "web")]
//! HTML pages, rendered with handlebars from the templates under `src/static`.

use handlebars::Handlebars;
use serde_json::{Value, json};

use crate::error::DashboardError;
use crate::graph::render_summary_charts;
use crate::model::{MetricName, Rank};
use crate::stacked::StackedChart;
use crate::state::{QueryPanel, ResultTab, UploadPanel};
use crate::summary::SummaryView;
use crate::table::table_rows;

pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, DashboardError> {
        let mut registry = Handlebars::new();
        registry.register_partial("header", include_str!("./static/header.hbs"))?;
        registry.register_template_string("index", include_str!("./static/index.hbs"))?;
        registry.register_template_string("upload", include_str!("./static/upload.hbs"))?;
        registry.register_template_string("metrics", include_str!("./static/metrics.hbs"))?;
        Ok(Pages { registry })
    }

    pub fn index(&self) -> Result<String, DashboardError> {
        Ok(self
            .registry
            .render("index", &json!({ "page_title": "Home" }))?)
    }

    pub fn upload(&self, panel: &UploadPanel) -> Result<String, DashboardError> {
        Ok(self.registry.render("upload", &upload_context(panel)?)?)
    }

    pub fn metrics(&self, panel: &QueryPanel) -> Result<String, DashboardError> {
        Ok(self.registry.render("metrics", &metrics_context(panel))?)
    }
}

fn upload_context(panel: &UploadPanel) -> Result<Value, DashboardError> {
    let state = panel.state();
    let summary = match state.data() {
        Some(loaded) => {
            let view = SummaryView::from_summary(&loaded.summary);
            let charts = render_summary_charts(&view)?;
            json!({
                "label": loaded.label,
                "overview": view.overview,
                "text_cards": view.text_cards,
                "charts": {
                    "elements": charts.elements,
                    "sections": charts.sections,
                    "text_stats": charts.text_stats,
                    "element_share": charts.element_share,
                },
            })
        }
        None => Value::Null,
    };

    Ok(json!({
        "page_title": "XML Analyzer",
        "loading": state.is_loading(),
        "error": state.error(),
        "summary": summary,
    }))
}

fn metrics_context(panel: &QueryPanel) -> Value {
    let metric_options: Vec<Value> = MetricName::ALL
        .iter()
        .map(|m| json!({ "name": m.as_str(), "selected": m.as_str() == panel.form.metric_name }))
        .collect();
    let level_options: Vec<Value> = Rank::ALL
        .iter()
        .map(|r| json!({ "name": r.name(), "selected": r.name() == panel.form.level }))
        .collect();

    let rows = panel.rows().unwrap_or(&[]);
    let has_rows = !rows.is_empty();
    let table_active = has_rows && panel.tab == ResultTab::Table;
    let graph_active = has_rows && panel.tab == ResultTab::Graph;

    let (chart_svg, legend) = if graph_active {
        let chart = StackedChart::from_rows(rows);
        let legend: Vec<Value> = chart
            .legend
            .iter()
            .map(|entry| json!({ "agency": entry.agency, "color": entry.color }))
            .collect();
        (Some(chart.to_svg()), legend)
    } else {
        (None, Vec::new())
    };

    let table = if table_active {
        table_rows(rows, panel.sort)
    } else {
        Vec::new()
    };

    let last_query = if panel.results.state().data().is_some() {
        panel.form.to_query().ok().map(|q| q.query_string())
    } else {
        None
    };

    json!({
        "page_title": "eCFR Metrics",
        "metric_options": metric_options,
        "level_options": level_options,
        "start_dt": panel.form.start_dt,
        "end_dt": panel.form.end_dt,
        "agencies": panel.form.agencies,
        "loading": panel.results.state().is_loading(),
        "form_error": panel.form_error,
        "has_rows": has_rows,
        "no_results": panel.rows().is_some_and(|r| r.is_empty()),
        "table_active": table_active,
        "graph_active": graph_active,
        "sort_aria": panel.sort.aria(),
        "sort_arrow": panel.sort.arrow(),
        "rows": table,
        "chart_svg": chart_svg,
        "legend": legend,
        "last_query": last_query,
    })
}
