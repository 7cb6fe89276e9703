//! Running performance counters for the verification engine.

use std::sync::Mutex;

use geoverify_core::PerformanceStats;

#[derive(Debug, Default, Clone)]
struct Counters {
    total_requests: u64,
    nominatim_only: u64,
    escalations: u64,
    radar_calls_saved: u64,
    cache_hits: u64,
    /// Completed non-cache resolutions, the denominator of the running mean.
    timed_resolutions: u64,
    average_response_time_ms: f64,
}

/// Process-lifetime counters, shared across overlapping in-flight
/// resolutions. Monotonic until [`StatsTracker::reset`].
#[derive(Debug, Default)]
pub struct StatsTracker {
    counters: Mutex<Counters>,
}

impl StatsTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `verify` call, cache hits included.
    pub fn record_request(&self) {
        self.lock().total_requests += 1;
    }

    pub fn record_cache_hit(&self) {
        self.lock().cache_hits += 1;
    }

    /// A fast accept: the free provider alone sufficed, so a paid call was
    /// avoided.
    pub fn record_fast_accept(&self) {
        let mut c = self.lock();
        c.nominatim_only += 1;
        c.radar_calls_saved += 1;
    }

    /// The resolution escalated to the paid provider.
    pub fn record_escalation(&self) {
        self.lock().escalations += 1;
    }

    /// Folds one completed (non-cache) resolution time into the running
    /// mean: `avg += (new - avg) / n`.
    pub fn record_response_time(&self, elapsed_ms: u64) {
        let mut c = self.lock();
        c.timed_resolutions += 1;
        #[allow(clippy::cast_precision_loss)]
        let delta = elapsed_ms as f64 - c.average_response_time_ms;
        #[allow(clippy::cast_precision_loss)]
        let n = c.timed_resolutions as f64;
        c.average_response_time_ms += delta / n;
    }

    /// Snapshot with the derived percentage rates.
    #[must_use]
    pub fn snapshot(&self) -> PerformanceStats {
        let c = self.lock().clone();

        let percent_of_total = |count: u64| -> f64 {
            if c.total_requests == 0 {
                return 0.0;
            }
            #[allow(clippy::cast_precision_loss)]
            let rate = count as f64 / c.total_requests as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        };

        PerformanceStats {
            total_requests: c.total_requests,
            nominatim_only: c.nominatim_only,
            escalations: c.escalations,
            radar_calls_saved: c.radar_calls_saved,
            average_response_time_ms: c.average_response_time_ms,
            cache_hits: c.cache_hits,
            efficiency_rate: percent_of_total(c.nominatim_only),
            savings_rate: percent_of_total(c.radar_calls_saved),
        }
    }

    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Counters> {
        self.counters.lock().expect("stats mutex poisoned")
    }
}
