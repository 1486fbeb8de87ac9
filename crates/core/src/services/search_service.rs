use std::time::{Duration, Instant};

use crate::models::card::Card;

/// Trim and case-fold a raw search box value.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a card's search text matches an already-normalized query.
/// The empty query matches everything.
pub fn matches(search_text: &str, query: &str) -> bool {
    query.is_empty() || search_text.contains(query)
}

/// Show matching cards and hide the rest. Returns the number left visible.
pub fn apply_search(cards: &mut [Card], query: &str) -> usize {
    let query = normalize_query(query);
    cards
        .iter_mut()
        .map(|card| {
            card.hidden = !matches(&card.search_text, &query);
            card.is_visible()
        })
        .filter(|visible| *visible)
        .count()
}

/// Coalesces rapid search input into one evaluation after a quiet window.
///
/// Clock-driven rather than timer-driven: the host feeds `now` on every
/// keystroke and on every tick, so the behaviour is deterministic.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record the latest text; pushes the deadline out by the quiet window.
    pub fn input(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now + self.quiet));
    }

    /// Take the pending text if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    /// When the pending text becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
