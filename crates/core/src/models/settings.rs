use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;

/// Default RPC method serving the stock history payload.
pub const DEFAULT_METHOD: &str = "stock_history.api.fetch_stock_variance";

/// Upper bound for the search debounce window.
const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Dashboard configuration supplied by the hosting application.
///
/// Filter state is deliberately not part of this struct: filters live only
/// for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Base URL of the stock-history service (e.g., "https://erp.example.com")
    pub base_url: String,

    /// RPC method path appended to `/api/method/`
    pub method: String,

    /// Optional credentials. Keys: "api_key", "api_secret".
    pub api_keys: HashMap<String, String>,

    /// Per-request timeout (native targets only)
    pub request_timeout_secs: u64,

    /// Quiet window before a search keystroke burst is evaluated
    pub search_debounce_ms: u64,

    /// Prefix used by the fallback formatter when rendering prices
    pub currency_symbol: Option<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            method: DEFAULT_METHOD.to_string(),
            api_keys: HashMap::new(),
            request_timeout_secs: 30,
            search_debounce_ms: 200,
            currency_symbol: None,
        }
    }
}

impl DashboardSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.method.trim().is_empty() {
            return Err(CoreError::InvalidSettings("method must not be empty".into()));
        }
        if self.search_debounce_ms > MAX_DEBOUNCE_MS {
            return Err(CoreError::InvalidSettings(format!(
                "search_debounce_ms of {} exceeds maximum of {MAX_DEBOUNCE_MS}",
                self.search_debounce_ms
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::InvalidSettings(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `token <key>:<secret>` when both credentials are configured.
    pub fn authorization_header(&self) -> Option<String> {
        let key = self.api_keys.get("api_key").filter(|k| !k.is_empty())?;
        let secret = self.api_keys.get("api_secret").filter(|s| !s.is_empty())?;
        Some(format!("token {key}:{secret}"))
    }
}
