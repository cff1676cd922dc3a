//! Prometheus text exposition format (version 0.0.4).

use std::fmt::Write;

use crate::metrics::registry::{MetricSnapshot, SeriesValue};
use crate::metrics::LabelSet;

/// Media type served on `/metrics`.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

/// `{k="v",...}` with an optional trailing `le`; empty string when there are no labels.
fn label_block(labels: &LabelSet, le: Option<&str>) -> String {
    let mut parts: Vec<String> = labels
        .pairs()
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some(le) = le {
        parts.push(format!("le=\"{}\"", le));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}

/// Render snapshots in order. Families with no series still get their HELP/TYPE lines.
pub fn encode(families: &[MetricSnapshot]) -> String {
    let mut out = String::with_capacity(families.len() * 256);
    for fam in families {
        let name = fam.descriptor.name();
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(fam.descriptor.help()));
        let _ = writeln!(out, "# TYPE {} {}", name, fam.descriptor.kind().as_str());

        for (labels, value) in &fam.series {
            match value {
                SeriesValue::Counter(v) | SeriesValue::Gauge(v) => {
                    let _ = writeln!(out, "{}{} {}", name, label_block(labels, None), format_value(*v));
                }
                SeriesValue::Histogram(h) => {
                    for (bound, count) in h.bounds.iter().zip(&h.cumulative) {
                        let le = format_value(*bound);
                        let _ = writeln!(out, "{}_bucket{} {}", name, label_block(labels, Some(&le)), count);
                    }
                    let _ = writeln!(out, "{}_bucket{} {}", name, label_block(labels, Some("+Inf")), h.count);
                    let _ = writeln!(out, "{}_sum{} {}", name, label_block(labels, None), format_value(h.sum));
                    let _ = writeln!(out, "{}_count{} {}", name, label_block(labels, None), h.count);
                }
            }
        }
    }
    out
}
