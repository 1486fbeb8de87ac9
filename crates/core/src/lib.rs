pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

use errors::CoreError;
use models::{
    card::Card,
    settings::DashboardSettings,
    state::{FetchState, StatusBanner},
};
use providers::{frappe::FrappeStockHistoryProvider, traits::StockHistoryProvider};
use services::{
    card_service::CardRenderer,
    chart_service::{ChartBackend, ChartRegistry},
    fetch_service::{ApplyResult, FetchCoordinator, FetchOutcome, FetchTicket, RequestEpoch},
    filter_service::FilterController,
    format_service::{FallbackFormatter, NumberFormatter},
    search_service::apply_search,
    text_render_service::TextCardRenderer,
};

/// Main entry point for the stock variance dashboard.
///
/// Wires the filter form, the race-safe fetch cycle, card rendering, chart
/// lifecycle and the card search together. The hosting UI calls three
/// actions: [`run`](Self::run), [`reset`](Self::reset) and
/// [`search_input`](Self::search_input) (plus [`tick`](Self::tick) to settle
/// debounced input).
#[must_use]
pub struct DashboardController {
    settings: DashboardSettings,
    filters: FilterController,
    coordinator: FetchCoordinator,
    renderer: CardRenderer,
    charts: ChartRegistry,
    provider: Arc<dyn StockHistoryProvider>,
    cards: Vec<Card>,
    search_visible: bool,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("provider", &self.provider.name())
            .field("state", &self.coordinator.state())
            .field("epoch", &self.coordinator.epoch())
            .field("cards", &self.cards.len())
            .field("charts", &self.charts)
            .finish()
    }
}

impl DashboardController {
    /// Create a dashboard with the fallback formatter and today's date.
    ///
    /// Runs the chart backend's one-time setup.
    pub fn new(
        provider: Arc<dyn StockHistoryProvider>,
        chart_backend: Box<dyn ChartBackend>,
        settings: DashboardSettings,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let formatter: Arc<dyn NumberFormatter> = match &settings.currency_symbol {
            Some(symbol) => Arc::new(FallbackFormatter::with_currency_symbol(symbol.clone())),
            None => Arc::new(FallbackFormatter::new()),
        };
        let mut charts = ChartRegistry::new(chart_backend);
        charts.ensure_prepared()?;

        Ok(Self {
            filters: FilterController::starting_today(settings.search_debounce()),
            coordinator: FetchCoordinator::new(),
            renderer: CardRenderer::new(formatter),
            charts,
            provider,
            cards: Vec::new(),
            search_visible: false,
            settings,
        })
    }

    /// Create a dashboard talking to a Frappe server configured in `settings`.
    pub fn with_frappe(
        chart_backend: Box<dyn ChartBackend>,
        settings: DashboardSettings,
    ) -> Result<Self, CoreError> {
        let provider = FrappeStockHistoryProvider::new(&settings)?;
        Self::new(Arc::new(provider), chart_backend, settings)
    }

    /// Use an injected formatting service instead of the fallback.
    pub fn with_formatter(mut self, formatter: Arc<dyn NumberFormatter>) -> Self {
        self.renderer = CardRenderer::new(formatter);
        self
    }

    /// Reset the filter defaults relative to a fixed date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.filters = FilterController::new(today, self.settings.search_debounce());
        self
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Validate the filters and start a fetch cycle.
    ///
    /// On a validation error nothing changes: no epoch is consumed and the
    /// current results stay on screen. Otherwise the previous cards and
    /// charts are cleared and a ticket for the new epoch is returned; the
    /// caller executes it and hands the outcome to [`apply`](Self::apply).
    pub fn run(&mut self) -> Result<FetchTicket, CoreError> {
        let filters = self.filters.get_values()?;
        self.clear_cards();
        Ok(self.coordinator.run(filters))
    }

    /// Feed a provider outcome back. Stale outcomes are dropped silently.
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApplyResult {
        let result = self.coordinator.apply(outcome);
        let ApplyResult::Applied(state) = result else {
            return result;
        };

        self.clear_cards();
        if state == FetchState::Ready {
            self.cards = self
                .renderer
                .render_all(self.coordinator.items(), &mut self.charts);
        }

        // Any outcome without cards (no records, no deviations, error) drops the query.
        if self.cards.is_empty() {
            self.filters.clear_search();
            self.search_visible = false;
        } else {
            self.search_visible = true;
            apply_search(&mut self.cards, self.filters.search_query());
        }
        result
    }

    /// Run a full cycle against the configured provider.
    pub async fn run_and_wait(&mut self) -> Result<ApplyResult, CoreError> {
        let ticket = self.run()?;
        let provider = Arc::clone(&self.provider);
        let outcome = ticket.execute(provider.as_ref()).await;
        Ok(self.apply(outcome))
    }

    /// Restore default filters, drop all results and release every chart.
    pub fn reset(&mut self) {
        self.filters.reset();
        self.coordinator.reset();
        self.clear_cards();
        self.search_visible = false;
    }

    /// Record search box input. Evaluated by [`tick`](Self::tick) once the
    /// debounce window has passed.
    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.filters.input_search(text, now);
    }

    /// Settle debounced search input. Returns the number of visible cards
    /// when the search was re-evaluated.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let query = self.filters.poll_search(now)?;
        Some(apply_search(&mut self.cards, &query))
    }

    /// Apply a search immediately, bypassing the debounce window.
    pub fn apply_search(&mut self, raw: &str) -> usize {
        self.filters.set_search(raw);
        apply_search(&mut self.cards, self.filters.search_query())
    }

    fn clear_cards(&mut self) {
        self.charts.dispose_all();
        self.cards.clear();
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn filters(&self) -> &FilterController {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterController {
        &mut self.filters
    }

    pub fn state(&self) -> FetchState {
        self.coordinator.state()
    }

    pub fn epoch(&self) -> RequestEpoch {
        self.coordinator.epoch()
    }

    pub fn banner(&self) -> Option<&StatusBanner> {
        self.coordinator.banner()
    }

    /// All cards of the current result, including hidden ones.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards matching the active search; hidden cards take no space.
    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_visible())
    }

    /// Whether the search box should be shown (only when there are cards).
    pub fn is_search_visible(&self) -> bool {
        self.search_visible
    }

    pub fn live_charts(&self) -> usize {
        self.charts.live_count()
    }

    pub fn provider(&self) -> Arc<dyn StockHistoryProvider> {
        Arc::clone(&self.provider)
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Render the banner and the visible cards as plain text.
    pub fn render_text(&self) -> String {
        let text = TextCardRenderer::new();
        let mut out = String::new();
        if let Some(banner) = self.banner() {
            out.push_str(&text.render_banner(banner));
            out.push('\n');
        }
        out.push_str(&text.render_cards(&self.cards));
        out
    }
}
