//! Metrics Collector (C11, spec §4.1/§6): a narrow, nullable counter/
//! histogram sink consumed by the attack pipeline. "Nullable" here means
//! every call site works through `Option<&mut Metrics>` and fails closed —
//! no metrics collector, no panic, no lost messages, just no counters.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Metrics {
    counters: HashMap<String, i64>,
    histograms: HashMap<String, Vec<f64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&mut self, name: &str) {
        self.incr_by(name, 1);
    }

    pub fn incr_by(&mut self, name: &str, amount: i64) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    pub fn record(&mut self, name: &str, value: f64) {
        self.histograms.entry(name.to_string()).or_default().push(value);
    }

    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn histogram(&self, name: &str) -> &[f64] {
        self.histograms.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Fail-closed helper: increments a counter if a collector is present, a
/// no-op otherwise (spec §9 Singletons: "must fail closed when absent").
pub fn incr(metrics: Option<&mut Metrics>, name: &str) {
    if let Some(metrics) = metrics {
        metrics.incr(name);
    }
}

pub fn record(metrics: Option<&mut Metrics>, name: &str, value: f64) {
    if let Some(metrics) = metrics {
        metrics.record(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_accumulates() {
        let mut metrics = Metrics::new();
        incr(Some(&mut metrics), "player_attacks_made");
        incr(Some(&mut metrics), "player_attacks_made");
        assert_eq!(metrics.counter("player_attacks_made"), 2);
    }

    #[test]
    fn absent_collector_is_a_silent_no_op() {
        incr(None, "anything");
    }
}
