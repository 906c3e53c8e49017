use parking_lot::Mutex;
use serde::Serialize;

/// Point-in-time view of the counter, safe to hand to callers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsageSnapshot {
    pub requests: u64,
    pub tokens: u64,
    pub limit: u64,
}

/// Advisory request/token tally for display purposes.
///
/// Owned by the caller and injected into the orchestrator at construction.
/// Process-local: resets on restart. `limit` is informational only; nothing
/// is ever rejected for exceeding it.
#[derive(Debug)]
pub struct UsageCounter {
    limit: u64,
    inner: Mutex<Tally>,
}

#[derive(Debug, Default)]
struct Tally {
    requests: u64,
    tokens: u64,
}

impl UsageCounter {
    pub fn new(limit: u64) -> Self {
        Self { limit, inner: Mutex::new(Tally::default()) }
    }

    /// Record one upstream call and its token spend; returns the running totals.
    pub fn record(&self, tokens: u64) -> UsageSnapshot {
        let mut tally = self.inner.lock();
        tally.requests += 1;
        tally.tokens += tokens;
        UsageSnapshot { requests: tally.requests, tokens: tally.tokens, limit: self.limit }
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        let tally = self.inner.lock();
        UsageSnapshot { requests: tally.requests, tokens: tally.tokens, limit: self.limit }
    }
}
