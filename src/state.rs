use serde::{Deserialize, Serialize};

use crate::model::{ObservationRow, StructuralSummary};
use crate::query::QueryForm;
use crate::table::SortDirection;

/// What a panel is currently showing.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Proof that a request was issued, carrying its place in the sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A view state guarded by a request sequence counter.
///
/// Every request takes a ticket from [`Panel::begin`]; [`Panel::complete`]
/// only applies the outcome of the most recent ticket. Completions of
/// superseded requests are dropped, so a slow early response can never
/// overwrite a later one.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel<T> {
    state: ViewState<T>,
    latest: u64,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Panel {
            state: ViewState::Idle,
            latest: 0,
        }
    }
}

impl<T> Panel<T> {
    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Starts a request: the panel goes to `Loading` and any earlier
    /// in-flight request is superseded.
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        self.state = ViewState::Loading;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest && self.state.is_loading()
    }

    /// Applies a finished request's outcome. Returns whether it was applied.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "dropping stale completion #{} (latest #{})",
                ticket.0,
                self.latest
            );
            return false;
        }
        self.state = match outcome {
            Ok(data) => ViewState::Success(data),
            Err(message) => ViewState::Error(message),
        };
        true
    }
}

/// A summary together with where it came from ("Sample Data" or a filename).
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSummary {
    pub label: String,
    pub summary: StructuralSummary,
}

pub type UploadPanel = Panel<LoadedSummary>;

/// Which rendering of the query results is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTab {
    #[default]
    Table,
    Graph,
}

impl ResultTab {
    /// Tab for a `?tab=` value; `None` for anything unrecognised.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "table" => Some(ResultTab::Table),
            "graph" => Some(ResultTab::Graph),
            _ => None,
        }
    }
}

/// State of the metric query view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPanel {
    pub results: Panel<Vec<ObservationRow>>,
    pub form: QueryForm,
    pub form_error: Option<String>,
    pub sort: SortDirection,
    pub tab: ResultTab,
}

impl QueryPanel {
    pub fn begin_fetch(&mut self, form: QueryForm) -> RequestTicket {
        self.form = form;
        self.form_error = None;
        self.results.begin()
    }

    /// Stores fetched rows if `ticket` is still current. A fresh row set
    /// always starts sorted descending.
    pub fn complete_fetch(&mut self, ticket: RequestTicket, rows: Vec<ObservationRow>) -> bool {
        let applied = self.results.complete(ticket, Ok(rows));
        if applied {
            self.sort = SortDirection::Descending;
        }
        applied
    }

    /// Keeps the rejected input on screen with an explanation; results are untouched.
    pub fn reject_form(&mut self, form: QueryForm, message: String) {
        self.form = form;
        self.form_error = Some(message);
    }

    pub fn toggle_sort(&mut self) -> SortDirection {
        self.sort = self.sort.toggled();
        self.sort
    }

    pub fn rows(&self) -> Option<&[ObservationRow]> {
        self.results.state().data().map(Vec::as_slice)
    }
}
