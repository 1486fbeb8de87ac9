use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::errors::CoreError;
use crate::models::chart::{ChartHandle, ChartSpec};

/// A UI target's chart implementation.
///
/// Charts are the only externally-owned resources the dashboard holds, so
/// every handle returned by `create` must eventually go back through
/// `destroy`. [`ChartRegistry`] takes care of that.
pub trait ChartBackend {
    /// One-time setup (theme, styles). Called once per registry, before the
    /// first chart is created.
    fn prepare(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    fn create(&mut self, spec: &ChartSpec) -> Result<ChartHandle, CoreError>;

    fn destroy(&mut self, handle: ChartHandle);
}

/// Owns the chart handles of the current card set.
///
/// Handles are disposed before every re-render, on reset, and when the
/// registry is dropped.
pub struct ChartRegistry {
    backend: Box<dyn ChartBackend>,
    live: Vec<ChartHandle>,
    prepared: bool,
}

impl ChartRegistry {
    pub fn new(backend: Box<dyn ChartBackend>) -> Self {
        Self {
            backend,
            live: Vec::new(),
            prepared: false,
        }
    }

    /// Run the backend's one-time setup. Subsequent calls are no-ops; a
    /// failed setup is retried on the next call.
    pub fn ensure_prepared(&mut self) -> Result<(), CoreError> {
        if self.prepared {
            return Ok(());
        }
        self.backend.prepare()?;
        self.prepared = true;
        Ok(())
    }

    /// Create a chart and track its handle.
    pub fn allocate(&mut self, spec: &ChartSpec) -> Result<ChartHandle, CoreError> {
        self.ensure_prepared()?;
        let handle = self.backend.create(spec)?;
        self.live.push(handle);
        Ok(handle)
    }

    /// Destroy every tracked chart. Returns how many were released.
    pub fn dispose_all(&mut self) -> usize {
        let count = self.live.len();
        for handle in self.live.drain(..) {
            self.backend.destroy(handle);
        }
        if count > 0 {
            tracing::debug!(count, "disposed chart handles");
        }
        count
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }
}

impl Drop for ChartRegistry {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

impl std::fmt::Debug for ChartRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRegistry")
            .field("live", &self.live.len())
            .field("prepared", &self.prepared)
            .finish()
    }
}

// ── In-memory backend ───────────────────────────────────────────────

/// Bookkeeping shared between an [`InMemoryChartBackend`] and its observers.
#[derive(Debug, Default)]
pub struct ChartLedger {
    next_id: u64,
    live: BTreeSet<u64>,
    prepare_calls: usize,
    created: usize,
    destroyed: usize,
}

impl ChartLedger {
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: ChartHandle) -> bool {
        self.live.contains(&handle.0)
    }

    pub fn prepare_calls(&self) -> usize {
        self.prepare_calls
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

/// Backend for headless hosts (text output, tests): keeps no pixels, only
/// tracks which handles are alive.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChartBackend {
    ledger: Rc<RefCell<ChartLedger>>,
}

impl InMemoryChartBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the bookkeeping, still valid after the backend is boxed.
    pub fn ledger(&self) -> Rc<RefCell<ChartLedger>> {
        Rc::clone(&self.ledger)
    }
}

impl ChartBackend for InMemoryChartBackend {
    fn prepare(&mut self) -> Result<(), CoreError> {
        self.ledger.borrow_mut().prepare_calls += 1;
        Ok(())
    }

    fn create(&mut self, spec: &ChartSpec) -> Result<ChartHandle, CoreError> {
        if spec.labels.len() != spec.values.len() {
            return Err(CoreError::ChartBackend(format!(
                "{} labels for {} values",
                spec.labels.len(),
                spec.values.len()
            )));
        }
        let mut ledger = self.ledger.borrow_mut();
        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.live.insert(id);
        ledger.created += 1;
        Ok(ChartHandle(id))
    }

    fn destroy(&mut self, handle: ChartHandle) {
        let mut ledger = self.ledger.borrow_mut();
        if ledger.live.remove(&handle.0) {
            ledger.destroyed += 1;
        }
    }
}
