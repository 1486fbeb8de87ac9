use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::filters::Filters;
use crate::models::item::Item;

/// Trait abstraction for the stock-history service.
///
/// Implementations own the transport and the conversion from the wire
/// payload into typed [`Item`]s (see `providers::payload`). Nothing past this
/// seam ever sees untyped JSON.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait StockHistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the stock history for every item matching `filters`.
    ///
    /// An empty list and items without differences are valid results.
    /// Service faults map to `CoreError::Service`/`CoreError::ServiceFault`,
    /// transport failures to `CoreError::Network`.
    async fn fetch_stock_history(&self, filters: &Filters) -> Result<Vec<Item>, CoreError>;
}
