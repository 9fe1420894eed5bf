//! Per-phase timing for the integrator
//!
//! A [`ProfilerScope`] measures from construction to drop and emits the elapsed
//! time as a `trace!` event, so phase timings appear with `RUST_LOG=trace` and cost
//! nothing otherwise.

use std::time::Instant;
use tracing::trace;

/// A profiling scope that measures elapsed time using RAII
pub struct ProfilerScope {
    start: Instant,
    name: &'static str,
}

impl ProfilerScope {
    /// Start timing the phase `name`
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Elapsed time in milliseconds
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        trace!(phase = self.name, elapsed_ms = self.elapsed_ms(), "phase finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_profiler_scope_measures_time() {
        let scope = ProfilerScope::new("test");
        thread::sleep(Duration::from_millis(10));
        let elapsed = scope.elapsed_ms();
        assert!(elapsed >= 10.0, "Expected at least 10ms, got {elapsed}");
    }
}
