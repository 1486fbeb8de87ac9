use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::payload::parse_items;
use super::traits::StockHistoryProvider;
use crate::errors::CoreError;
use crate::models::filters::Filters;
use crate::models::item::Item;
use crate::models::settings::DashboardSettings;

const PROVIDER_NAME: &str = "Frappe";

/// Stock-history provider backed by a Frappe whitelisted RPC method.
///
/// - **Endpoint**: `POST {base_url}/api/method/{method}`
/// - **Body**: `{"filters": {...}}`
/// - **Success**: `{"message": {"items": [...]}}`
/// - **Fault**: non-2xx status with `_server_messages`, `message` or `exception`
pub struct FrappeStockHistoryProvider {
    client: Client,
    endpoint: String,
    authorization: Option<String>,
}

impl std::fmt::Debug for FrappeStockHistoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrappeStockHistoryProvider")
            .field("endpoint", &self.endpoint)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl FrappeStockHistoryProvider {
    pub fn new(settings: &DashboardSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        if settings.base_url.trim().is_empty() {
            return Err(CoreError::InvalidSettings("base_url must not be empty".into()));
        }

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(settings.request_timeout());

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint_url(&settings.base_url, &settings.method),
            authorization: settings.authorization_header(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Join base URL and method into the RPC endpoint, tolerating stray slashes.
pub fn endpoint_url(base_url: &str, method: &str) -> String {
    format!(
        "{}/api/method/{}",
        base_url.trim().trim_end_matches('/'),
        method.trim().trim_start_matches('/')
    )
}

/// Pull the human-readable message out of a Frappe fault body.
///
/// `_server_messages` is a JSON string holding an array of JSON strings, each
/// an object with a `message` field (or, on older servers, a plain string).
pub fn extract_fault_message(body: &Value) -> Option<String> {
    if let Some(raw) = body.get("_server_messages").and_then(Value::as_str) {
        let messages: Vec<String> = serde_json::from_str::<Vec<String>>(raw)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_str::<Value>(&entry) {
                Ok(Value::Object(obj)) => obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => Some(entry),
            })
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if !messages.is_empty() {
            return Some(messages.join("\n"));
        }
    }

    ["message", "exception"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl StockHistoryProvider for FrappeStockHistoryProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_stock_history(&self, filters: &Filters) -> Result<Vec<Item>, CoreError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "filters": filters }));
        if let Some(auth) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(provider = PROVIDER_NAME, %status, "stock history request failed");
            // A fault body that isn't JSON still counts as a fault, just without a message.
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(match extract_fault_message(&body) {
                Some(message) => CoreError::Service(message),
                None => CoreError::ServiceFault,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            CoreError::Deserialization(format!("{PROVIDER_NAME}: failed to parse response: {e}"))
        })?;

        parse_items(body.get("message").cloned().unwrap_or(Value::Null))
    }
}
