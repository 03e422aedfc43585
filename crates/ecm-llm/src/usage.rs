//! Per-client usage counters
//!
//! Counters only grow. They are atomics so a client shared across threads
//! stays sound, but the totals are advisory telemetry, not billing data.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Accumulating usage counters owned by one client
#[derive(Debug, Default)]
pub struct UsageStats {
    chat_invokes: AtomicU64,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    execution_micros: AtomicU64,
}

impl UsageStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed call
    pub fn record(&self, input_tokens: u64, output_tokens: u64, elapsed: Duration) {
        self.chat_invokes.fetch_add(1, Ordering::Relaxed);
        self.input_tokens.fetch_add(input_tokens, Ordering::Relaxed);
        self.output_tokens.fetch_add(output_tokens, Ordering::Relaxed);
        self.execution_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            chat_invokes: self.chat_invokes.load(Ordering::Relaxed),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            execution_time: Duration::from_micros(self.execution_micros.load(Ordering::Relaxed)),
        }
    }
}

/// Copy of a client's usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageSnapshot {
    /// Successful chat completions
    pub chat_invokes: u64,
    /// Prompt tokens reported by the provider
    pub input_tokens: u64,
    /// Completion tokens reported by the provider
    pub output_tokens: u64,
    /// Wall-clock time spent in requests
    pub execution_time: Duration,
}

impl UsageSnapshot {
    /// Input plus output tokens
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl fmt::Display for UsageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total API calls: {}", self.chat_invokes)?;
        writeln!(f, "Total input tokens: {}", self.input_tokens)?;
        writeln!(f, "Total output tokens: {}", self.output_tokens)?;
        writeln!(f, "Total tokens: {}", self.total_tokens())?;
        write!(f, "Total execution time: {:.2}s", self.execution_time.as_secs_f64())
    }
}
