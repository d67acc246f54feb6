use abtest_utils::engine::AbTestEngine;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

/// Shared state available to all request handlers.
pub struct AppState {
    /// The engine carries only configuration, so handlers clone it freely.
    pub engine: AbTestEngine,

    pub started_at: Instant,

    /// Total calculations served (for /health).
    pub total_requests: AtomicU64,
}

impl AppState {
    pub fn new(engine: AbTestEngine) -> Self {
        Self {
            engine,
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
        }
    }
}

pub type SharedState = Arc<AppState>;
