/*!
# ECFR Metrics Dashboard

A browser-based dashboard for exploring structural and historical metrics of the
Electronic Code of Federal Regulations, built in Rust.

## Overview

The dashboard sits in front of two backend services. It never parses regulation
XML itself: it forwards uploads to an analysis service, asks a metric query
service for per-agency time series, and turns both answers into pages, tables
and SVG charts.

## Architecture

### Presentation Layer
- **Technologies**: HTML rendered with handlebars, inline SVG, plain CSS
- **Key Components**:
  - XML Analyzer page - upload a file or load sample data, then browse summary cards and charts
  - Metrics page - query form, sortable result table and stacked bar chart

### Server Layer
- **Technologies**: Rust, axum, tokio
- **Core Components**:
  - View State - `Idle`/`Loading`/`Success`/`Error` per panel, with stale responses discarded
  - Backend Clients - multipart upload, sample fetch and metric query over reqwest
  - Aggregation - date × agency matrix behind the stacked chart
  - Chart Rendering - plotters bar/pie charts and a hand-laid-out stacked chart

## Modules

- **model**: Wire types returned by the backend services
- **query**: Query form parsing and validation
- **aggregate**: Date × agency matrix of summed metric values
- **stacked**: Stacked bar chart layout and SVG output
- **table**: Result table sorting and display formatting
- **summary**: Summary cards and chart series derived from a structural summary
- **export**: CSV export of result rows
- **state**: Panel view states and request fencing
- **config**: Runtime settings from the environment
- **error**: Error type shared by every module
- **client**: HTTP clients for the backend services
- **graph**: Bar and pie charts for the summary view
- **pages**: HTML page rendering
- **app**: Routing and handlers

## Routes

- `/` - Landing page
- `/health` - Liveness probe
- `/upload`, `/upload/sample` - XML Analyzer
- `/upload/charts/{chart}.svg` - Summary chart download
- `/metrics`, `/metrics/sort` - Metric query view
- `/metrics/chart.svg`, `/metrics/export.csv` - Result downloads
*/

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod stacked;
pub mod state;
pub mod summary;
pub mod table;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod client;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod pages;

pub use aggregate::AggregateMatrix;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use model::{MetricName, ObservationRow, Rank, StructuralSummary};
pub use query::{MetricQuery, QueryForm};
pub use stacked::StackedChart;
pub use state::{Panel, QueryPanel, RequestTicket, ViewState};
pub use table::SortDirection;
