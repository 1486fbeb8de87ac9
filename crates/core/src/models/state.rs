use serde::{Deserialize, Serialize};

pub const MSG_INITIAL: &str =
    "Select the filters above and click Run to generate the tables and charts.";
pub const MSG_RESET: &str = "Filters reset. Click Run to refresh the dashboard.";
pub const MSG_LOADING: &str = "Fetching stock history...";
pub const MSG_NO_RECORDS: &str = "No stock records found for the selected filters.";
pub const MSG_NO_DEVIATIONS: &str = "No stock deviations found for the selected filters.";
pub const MSG_GENERIC_ERROR: &str = "Unable to load the stock history. Please try again.";

/// Lifecycle of the fetch/render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchState {
    Idle,
    Loading,
    Ready,
    Empty,
    Error,
}

impl std::fmt::Display for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchState::Idle => write!(f, "Idle"),
            FetchState::Loading => write!(f, "Loading"),
            FetchState::Ready => write!(f, "Ready"),
            FetchState::Empty => write!(f, "Empty"),
            FetchState::Error => write!(f, "Error"),
        }
    }
}

/// Kind of status banner shown above the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    Info,
    Loading,
    Error,
}

/// The single status message shown to the user. Hidden while results are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBanner {
    pub state: RenderState,
    pub message: String,
}

impl StatusBanner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            state: RenderState::Info,
            message: message.into(),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            state: RenderState::Loading,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: RenderState::Error,
            message: message.into(),
        }
    }
}
