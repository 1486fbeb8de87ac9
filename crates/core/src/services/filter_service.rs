use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::CoreError;
use crate::models::filters::{FilterInput, Filters, TextField};
use crate::services::search_service::{normalize_query, SearchDebouncer};

/// Split a text filter into tokens.
///
/// Delimited strings split on any run of newlines, commas and semicolons;
/// tokens are trimmed and empty ones dropped. Pre-split lists are only
/// trimmed and filtered.
pub fn parse_multi_value(input: impl Into<FilterInput>) -> Vec<String> {
    match input.into() {
        FilterInput::Text(text) => clean_tokens(text.split(|c: char| matches!(c, '\n' | ',' | ';'))),
        FilterInput::List(values) => clean_tokens(values.iter().map(String::as_str)),
    }
}

fn clean_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<String> {
    tokens
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Owns the filter form state and the search box text.
///
/// Never triggers a fetch itself; the dashboard reads [`get_values`] once per
/// run.
///
/// [`get_values`]: FilterController::get_values
pub struct FilterController {
    today: DateSource,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    text: HashMap<TextField, Vec<String>>,
    search_query: String,
    debouncer: SearchDebouncer,
}

/// Supplies the current date whenever defaults are (re)computed.
pub type DateSource = Box<dyn Fn() -> NaiveDate + Send + Sync>;

impl std::fmt::Debug for FilterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterController")
            .field("from_date", &self.from_date)
            .field("to_date", &self.to_date)
            .field("text", &self.text)
            .field("search_query", &self.search_query)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

impl FilterController {
    /// Create a controller whose year-to-date defaults are pinned to `today`.
    pub fn new(today: NaiveDate, search_debounce: Duration) -> Self {
        Self::with_date_source(move || today, search_debounce)
    }

    /// Create a controller that asks `today` for the date on every reset.
    pub fn with_date_source(
        today: impl Fn() -> NaiveDate + Send + Sync + 'static,
        search_debounce: Duration,
    ) -> Self {
        let mut controller = Self {
            today: Box::new(today),
            from_date: None,
            to_date: None,
            text: HashMap::new(),
            search_query: String::new(),
            debouncer: SearchDebouncer::new(search_debounce),
        };
        controller.set_defaults();
        controller
    }

    /// Defaults follow the local calendar date.
    pub fn starting_today(search_debounce: Duration) -> Self {
        Self::with_date_source(|| Local::now().date_naive(), search_debounce)
    }

    fn set_defaults(&mut self) {
        let today = (self.today)();
        // January 1st always exists, so this only falls back for impossible years.
        self.from_date = NaiveDate::from_ymd_opt(today.year(), 1, 1).or(Some(today));
        self.to_date = Some(today);
        self.text.clear();
    }

    // ── Field state ─────────────────────────────────────────────────

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn set_from_date(&mut self, date: Option<NaiveDate>) {
        self.from_date = date;
    }

    pub fn set_to_date(&mut self, date: Option<NaiveDate>) {
        self.to_date = date;
    }

    /// Set a text filter from a delimited string or a pre-split list.
    pub fn set_text_field(&mut self, field: TextField, input: impl Into<FilterInput>) {
        let tokens = parse_multi_value(input);
        if tokens.is_empty() {
            self.text.remove(&field);
        } else {
            self.text.insert(field, tokens);
        }
    }

    pub fn text_field(&self, field: TextField) -> &[String] {
        self.text.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Validate the form and produce the filters for one fetch.
    pub fn get_values(&self) -> Result<Filters, CoreError> {
        let (Some(from_date), Some(to_date)) = (self.from_date, self.to_date) else {
            return Err(CoreError::ValidationError(
                "Please select both From Date and To Date.".into(),
            ));
        };
        if from_date > to_date {
            return Err(CoreError::ValidationError(format!(
                "From Date ({from_date}) cannot be later than To Date ({to_date})."
            )));
        }

        let mut filters = Filters::new(from_date, to_date);
        for field in TextField::ALL {
            filters.field_mut(field).extend_from_slice(self.text_field(field));
        }
        Ok(filters)
    }

    /// Restore defaults for the current date and clear the search state.
    pub fn reset(&mut self) {
        self.set_defaults();
        self.search_query.clear();
        self.debouncer.cancel();
    }

    // ── Search text ─────────────────────────────────────────────────

    /// Store the normalized query. Returns whether it changed.
    pub fn set_search(&mut self, text: &str) -> bool {
        let normalized = normalize_query(text);
        if normalized == self.search_query {
            return false;
        }
        self.search_query = normalized;
        true
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.debouncer.cancel();
    }

    /// Record a keystroke; evaluation waits for the quiet window.
    pub fn input_search(&mut self, text: &str, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Settle the debounced search input. Returns the new query once the
    /// quiet window has passed and the query actually changed.
    pub fn poll_search(&mut self, now: Instant) -> Option<String> {
        let text = self.debouncer.poll(now)?;
        self.set_search(&text).then(|| self.search_query.clone())
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }
}
