#![cfg(feature = "web")]
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;

use crate::error::DashboardError;
use crate::summary::{Bar, PieSlice, SummaryView};

/// Fill colors for pie slices, cycled by slice position.
pub const PIE_COLORS: [RGBColor; 8] = [
    RGBColor(0x66, 0x7e, 0xea),
    RGBColor(0x76, 0x4b, 0xa2),
    RGBColor(0xf0, 0x93, 0xfb),
    RGBColor(0x4f, 0xac, 0xfe),
    RGBColor(0x00, 0xf2, 0xfe),
    RGBColor(0x43, 0xe9, 0x7b),
    RGBColor(0xfa, 0x70, 0x9a),
    RGBColor(0xfe, 0xe1, 0x40),
];

/// Charts the upload view can show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    /// Top element types by occurrence
    Elements,

    /// Section count per part
    Sections,

    /// Mean, min and max text length
    TextStats,

    /// Top element types as shares of a pie
    ElementShare,
}

impl ChartKind {
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Elements => "elements",
            ChartKind::Sections => "sections",
            ChartKind::TextStats => "text-stats",
            ChartKind::ElementShare => "element-share",
        }
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.strip_suffix(".svg").unwrap_or(s);
        [
            ChartKind::Elements,
            ChartKind::Sections,
            ChartKind::TextStats,
            ChartKind::ElementShare,
        ]
        .into_iter()
        .find(|kind| kind.slug() == slug)
        .ok_or_else(|| DashboardError::InvalidQuery(format!("Unknown chart: {}", s)))
    }
}

/// Configuration options for chart generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,

    /// Bar fill color
    pub color: RGBColor,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width: 800,
            height: 400,
            color: RGBColor(0x66, 0x7e, 0xea),
        }
    }
}

impl GraphOptions {
    /// Styling used by the upload view for each chart kind.
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Elements => GraphOptions {
                title: "Element Distribution (Top 10)".to_string(),
                y_label: "count".to_string(),
                ..Default::default()
            },
            ChartKind::Sections => GraphOptions {
                title: "Sections per Part".to_string(),
                y_label: "sections".to_string(),
                color: RGBColor(0x76, 0x4b, 0xa2),
                ..Default::default()
            },
            ChartKind::TextStats => GraphOptions {
                title: "Text Length Statistics".to_string(),
                y_label: "characters".to_string(),
                height: 300,
                color: RGBColor(0x4f, 0xac, 0xfe),
                ..Default::default()
            },
            ChartKind::ElementShare => GraphOptions {
                title: "Element Type Distribution".to_string(),
                ..Default::default()
            },
        }
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> DashboardError {
    DashboardError::Chart(e.to_string())
}

/// Renders named bars as an SVG bar chart, one category per bar.
///
/// # Arguments
/// * `bars` - Category names and heights, drawn left to right in order
/// * `options` - Chart styling options
///
/// # Returns
/// * The SVG document as a string, or `DashboardError::Chart`
pub fn create_bar_graph(bars: &[Bar], options: &GraphOptions) -> Result<String, DashboardError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let names: Vec<&str> = bars.iter().map(|b| b.name.as_str()).collect();
        let max_y = bars.iter().map(|b| b.value).max().unwrap_or(0).max(1);
        let categories = bars.len().max(1) as u32;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..categories).into_segmented(), 0u64..max_y + max_y / 10 + 1)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(categories as usize)
            .x_label_formatter(&|v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => names
                    .get(*i as usize)
                    .map(|name| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                let i = i as u32;
                let mut rect = Rectangle::new(
                    [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), bar.value)],
                    options.color.filled(),
                );
                rect.set_margin(0, 0, 6, 6);
                rect
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

/// Renders pie slices clockwise from twelve o'clock with `name: NN%` labels
/// outside the rim. Empty slices are skipped.
pub fn create_pie_graph(
    slices: &[PieSlice],
    options: &GraphOptions,
) -> Result<String, DashboardError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let root = root
            .titled(&options.title, ("sans-serif", 20).into_font())
            .map_err(chart_err)?;

        let (w, h) = root.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = w.min(h) as f64 * 0.35;

        let mut start = -FRAC_PI_2;
        for (i, slice) in slices.iter().enumerate() {
            if slice.fraction <= 0.0 {
                continue;
            }
            let sweep = slice.fraction * TAU;
            let steps = (slice.fraction * 120.0).ceil().max(2.0) as usize;

            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let angle = start + sweep * s as f64 / steps as f64;
                points.push(on_circle(center, radius, angle));
            }
            root.draw(&Polygon::new(
                points,
                PIE_COLORS[i % PIE_COLORS.len()].filled(),
            ))
            .map_err(chart_err)?;

            let mid = start + sweep / 2.0;
            let h_pos = if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right };
            let style = TextStyle::from(("sans-serif", 13).into_font())
                .pos(Pos::new(h_pos, VPos::Center));
            root.draw(&Text::new(
                slice.label.clone(),
                on_circle(center, radius * 1.15, mid),
                style,
            ))
            .map_err(chart_err)?;

            start += sweep;
        }

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn on_circle(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Renders one chart of a summary view. `Ok(None)` means the view has
/// nothing to show for that chart, and it is left out of the page.
pub fn render_chart(view: &SummaryView, kind: ChartKind) -> Result<Option<String>, DashboardError> {
    let options = GraphOptions::for_kind(kind);
    match kind {
        ChartKind::Elements => create_bar_graph(&view.top_elements, &options).map(Some),
        ChartKind::Sections => match &view.sections {
            Some(bars) => create_bar_graph(bars, &options).map(Some),
            None => Ok(None),
        },
        ChartKind::TextStats => create_bar_graph(&view.text_stats, &options).map(Some),
        ChartKind::ElementShare => {
            if view.element_share.is_empty() {
                Ok(None)
            } else {
                create_pie_graph(&view.element_share, &options).map(Some)
            }
        }
    }
}

/// All four upload-view charts as inline SVG.
#[derive(Clone, Debug, Default)]
pub struct SummaryCharts {
    pub elements: Option<String>,
    pub sections: Option<String>,
    pub text_stats: Option<String>,
    pub element_share: Option<String>,
}

pub fn render_summary_charts(view: &SummaryView) -> Result<SummaryCharts, DashboardError> {
    Ok(SummaryCharts {
        elements: render_chart(view, ChartKind::Elements)?,
        sections: render_chart(view, ChartKind::Sections)?,
        text_stats: render_chart(view, ChartKind::TextStats)?,
        element_share: render_chart(view, ChartKind::ElementShare)?,
    })
}
