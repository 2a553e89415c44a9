// src/metrics.rs
//
// Prometheus counters behind the `metrics` feature. The shim functions are
// always present so call sites need no cfg of their own.

#[cfg(feature = "metrics")]
mod prom {
    use once_cell::sync::Lazy;
    use prometheus::{register_int_counter_vec, IntCounterVec};

    pub static SOURCE_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
        register_int_counter_vec!(
            "pegwatch_source_failures_total", "Upstream calls that degraded", &["source", "reason"]
        ).expect("metric registration")
    });

    pub static SIGNALS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
        register_int_counter_vec!(
            "pegwatch_signals_total", "Signals produced", &["state"] // buy|sell|neutral|unavailable
        ).expect("metric registration")
    });
}

#[inline]
pub fn source_failure(source: &str, reason: &str) {
    #[cfg(feature = "metrics")]
    prom::SOURCE_FAILURES_TOTAL.with_label_values(&[source, reason]).inc();
    #[cfg(not(feature = "metrics"))]
    let _ = (source, reason);
}

#[inline]
pub fn signal(state: &str) {
    #[cfg(feature = "metrics")]
    prom::SIGNALS_TOTAL.with_label_values(&[state]).inc();
    #[cfg(not(feature = "metrics"))]
    let _ = state;
}
