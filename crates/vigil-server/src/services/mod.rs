//! Business endpoints (simulated user API).

pub mod users;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Pseudo-random value in `lo..=hi` without an external crate.
/// Seeded from the sub-second clock; good enough for simulated latency and ids.
pub(crate) fn jitter(lo: u64, hi: u64) -> u64 {
    if hi <= lo {
        return lo;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    lo + nanos % (hi - lo + 1)
}

/// Sleep for a simulated backend call when enabled in config.
pub(crate) async fn simulate_latency(enabled: bool, lo_ms: u64, hi_ms: u64) {
    if enabled {
        tokio::time::sleep(Duration::from_millis(jitter(lo_ms, hi_ms))).await;
    }
}
