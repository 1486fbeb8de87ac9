use crate::errors::CoreError;
use crate::models::filters::Filters;
use crate::models::item::Item;
use crate::models::state::{
    FetchState, StatusBanner, MSG_GENERIC_ERROR, MSG_INITIAL, MSG_LOADING, MSG_NO_DEVIATIONS,
    MSG_NO_RECORDS, MSG_RESET,
};
use crate::providers::traits::StockHistoryProvider;

/// Monotonic counter identifying a fetch attempt.
pub type RequestEpoch = u64;

/// A request issued by [`FetchCoordinator::run`], tagged with its epoch.
///
/// Executing the ticket is the only suspension point of a fetch cycle; the
/// resulting [`FetchOutcome`] goes back through [`FetchCoordinator::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: RequestEpoch,
    pub request: Filters,
}

impl FetchTicket {
    /// Call the provider. The ticket is consumed; its epoch travels with the result.
    pub async fn execute(self, provider: &dyn StockHistoryProvider) -> FetchOutcome {
        tracing::debug!(epoch = self.epoch, provider = provider.name(), "fetching stock history");
        let result = provider.fetch_stock_history(&self.request).await;
        FetchOutcome {
            epoch: self.epoch,
            result,
        }
    }

    /// Pair this ticket with a result obtained some other way.
    pub fn complete(&self, result: Result<Vec<Item>, CoreError>) -> FetchOutcome {
        FetchOutcome {
            epoch: self.epoch,
            result,
        }
    }
}

/// A provider response, still carrying the epoch it was requested under.
#[derive(Debug)]
pub struct FetchOutcome {
    pub epoch: RequestEpoch,
    pub result: Result<Vec<Item>, CoreError>,
}

/// What [`FetchCoordinator::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    /// The outcome was current and moved the coordinator to this state.
    Applied(FetchState),
    /// The outcome belonged to a superseded or reset cycle and was dropped.
    Stale,
}

impl ApplyResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyResult::Applied(_))
    }
}

/// Drives the fetch state machine and guards against stale responses.
///
/// No request is ever aborted. Every `run` bumps the epoch; an outcome is
/// applied only while its epoch is current and the cycle is still loading.
#[derive(Debug)]
pub struct FetchCoordinator {
    epoch: RequestEpoch,
    state: FetchState,
    items: Vec<Item>,
    banner: Option<StatusBanner>,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            state: FetchState::Idle,
            items: Vec::new(),
            banner: Some(StatusBanner::info(MSG_INITIAL)),
        }
    }

    /// Start a new cycle: clear current results and issue a ticket for the new epoch.
    pub fn run(&mut self, filters: Filters) -> FetchTicket {
        self.epoch += 1;
        self.state = FetchState::Loading;
        self.items.clear();
        self.banner = Some(StatusBanner::loading(MSG_LOADING));
        tracing::info!(epoch = self.epoch, from = %filters.from_date, to = %filters.to_date, "fetch issued");

        FetchTicket {
            epoch: self.epoch,
            request: filters,
        }
    }

    /// Apply a provider outcome if it belongs to the current cycle.
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApplyResult {
        if outcome.epoch != self.epoch || self.state != FetchState::Loading {
            tracing::debug!(
                epoch = outcome.epoch,
                current = self.epoch,
                state = %self.state,
                "discarding stale response"
            );
            return ApplyResult::Stale;
        }

        match outcome.result {
            Ok(items) if items.is_empty() => {
                self.state = FetchState::Empty;
                self.banner = Some(StatusBanner::info(MSG_NO_RECORDS));
            }
            Ok(items) if !items.iter().any(Item::has_differences) => {
                self.state = FetchState::Empty;
                self.banner = Some(StatusBanner::info(MSG_NO_DEVIATIONS));
            }
            Ok(items) => {
                tracing::info!(epoch = self.epoch, items = items.len(), "fetch applied");
                self.state = FetchState::Ready;
                self.items = items;
                self.banner = None;
            }
            Err(e) => {
                tracing::warn!(epoch = self.epoch, error = %e, "fetch failed");
                let message = e.user_message().unwrap_or(MSG_GENERIC_ERROR).to_string();
                self.state = FetchState::Error;
                self.banner = Some(StatusBanner::error(message));
            }
        }
        ApplyResult::Applied(self.state)
    }

    /// Back to idle. In-flight responses will be discarded on arrival.
    pub fn reset(&mut self) {
        self.state = FetchState::Idle;
        self.items.clear();
        self.banner = Some(StatusBanner::info(MSG_RESET));
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn epoch(&self) -> RequestEpoch {
        self.epoch
    }

    /// Items of the last applied, non-empty response.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The status message to show, or `None` while results are displayed.
    pub fn banner(&self) -> Option<&StatusBanner> {
        self.banner.as_ref()
    }
}

impl Default for FetchCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
