//! Minimal metrics registry for the push client.
//!
//! Counter/gauge types with dynamic labels backed by `DashMap`. Labels are
//! flattened into sorted key vectors to keep deterministic ordering.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn render_labels(key: &[(String, String)]) -> String {
    if key.is_empty() {
        return String::new();
    }
    let inner = key
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{inner}}}")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum over all label sets.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{} {}", name, render_labels(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<Vec<(String, String)>, AtomicI64>,
}

impl GaugeVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Decrement by 1.
    pub fn dec(&self, labels: &[(&str, &str)]) {
        self.add(labels, -1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{} {}", name, render_labels(r.key()), val);
        }
    }
}

/// Counters shared by all sessions of one process.
#[derive(Default)]
pub struct ClientMetrics {
    pub frames: CounterVec,
    /// Labelled by `stage`: frame | decompress | response | message.
    pub decode_errors: CounterVec,
    pub acks_sent: CounterVec,
    pub heartbeats_sent: CounterVec,
    /// Labelled by `method` (see `Method::as_str`).
    pub messages: CounterVec,
    pub chat_events: CounterVec,
    pub sink_errors: CounterVec,
    pub sessions_closed: CounterVec,
    pub sessions_active: GaugeVec,
}

impl ClientMetrics {
    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.frames.render("livepush_frames_total", &mut out);
        self.decode_errors.render("livepush_decode_errors_total", &mut out);
        self.acks_sent.render("livepush_acks_sent_total", &mut out);
        self.heartbeats_sent.render("livepush_heartbeats_sent_total", &mut out);
        self.messages.render("livepush_messages_total", &mut out);
        self.chat_events.render("livepush_chat_events_total", &mut out);
        self.sink_errors.render("livepush_sink_errors_total", &mut out);
        self.sessions_closed.render("livepush_sessions_closed_total", &mut out);
        self.sessions_active.render("livepush_sessions_active", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("room", "1"), ("stage", "frame")]);
        c.inc(&[("stage", "frame"), ("room", "1")]);
        assert_eq!(c.get(&[("room", "1"), ("stage", "frame")]), 2);
        assert_eq!(c.get(&[("stage", "decompress")]), 0);
        assert_eq!(c.total(), 2);
    }

    #[test]
    fn render_prometheus_text() {
        let m = ClientMetrics::default();
        m.decode_errors.inc(&[("stage", "frame")]);
        m.acks_sent.inc(&[]);
        m.sessions_active.inc(&[]);
        m.sessions_active.dec(&[]);

        let out = m.render();
        assert!(out.contains("# TYPE livepush_decode_errors_total counter"));
        assert!(out.contains("livepush_decode_errors_total{stage=\"frame\"} 1"));
        assert!(out.contains("livepush_acks_sent_total 1"));
        assert!(out.contains("livepush_sessions_active 0"));
    }
}
