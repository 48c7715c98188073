use thiserror::Error;

/// Everything that can go wrong while fetching, deriving or rendering dashboard data.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The remote service answered with a non-success status.
    /// `detail` is the `detail` string of its JSON error body, when it had one.
    #[error("upstream returned {status}")]
    Upstream { status: u16, detail: Option<String> },

    #[cfg(feature = "web")]
    #[error("upstream http: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[cfg(feature = "web")]
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[cfg(feature = "web")]
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Message suitable for the error banner: the server's own detail when it
    /// sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            DashboardError::Upstream {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(feature = "web")]
impl axum::response::IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            DashboardError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            DashboardError::Upstream { .. } | DashboardError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("request failed: {}", self);
        (status, self.to_string()).into_response()
    }
}
