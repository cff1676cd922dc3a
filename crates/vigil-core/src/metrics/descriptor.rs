//! Metric descriptors: name, help, label schema and kind.
//!
//! Descriptors are validated once, when they are built. After that the label
//! schema is immutable and every write is resolved against it.

use std::sync::Arc;

use crate::error::{Result, VigilError};

/// Kind of a metric family, as written on the `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Immutable description of one metric family.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    help: String,
    label_names: Vec<String>,
    kind: MetricKind,
    // Upper bounds, ascending, without the implicit +Inf. Empty unless histogram.
    buckets: Arc<[f64]>,
}

impl Descriptor {
    pub fn counter(name: &str, help: &str, label_names: &[&str]) -> Result<Self> {
        Self::build(name, help, label_names, MetricKind::Counter, &[])
    }

    pub fn gauge(name: &str, help: &str, label_names: &[&str]) -> Result<Self> {
        Self::build(name, help, label_names, MetricKind::Gauge, &[])
    }

    pub fn histogram(name: &str, help: &str, label_names: &[&str], buckets: &[f64]) -> Result<Self> {
        Self::build(name, help, label_names, MetricKind::Histogram, buckets)
    }

    fn build(
        name: &str,
        help: &str,
        label_names: &[&str],
        kind: MetricKind,
        buckets: &[f64],
    ) -> Result<Self> {
        if !is_valid_metric_name(name) {
            return Err(VigilError::InvalidMetric(format!("invalid metric name: {name:?}")));
        }

        let mut labels: Vec<String> = Vec::with_capacity(label_names.len());
        for l in label_names {
            if !is_valid_label_name(l) {
                return Err(VigilError::InvalidMetric(format!(
                    "invalid label name {l:?} on {name}"
                )));
            }
            if kind == MetricKind::Histogram && *l == "le" {
                return Err(VigilError::InvalidMetric(format!(
                    "histogram {name} cannot declare reserved label \"le\""
                )));
            }
            if labels.iter().any(|x| x == l) {
                return Err(VigilError::InvalidMetric(format!(
                    "duplicate label name {l:?} on {name}"
                )));
            }
            labels.push((*l).to_string());
        }

        let buckets = match kind {
            MetricKind::Histogram => validate_buckets(name, buckets)?,
            _ => Vec::new(),
        };

        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: labels,
            kind,
            buckets: buckets.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    pub(crate) fn shared_buckets(&self) -> Arc<[f64]> {
        Arc::clone(&self.buckets)
    }
}

fn validate_buckets(name: &str, raw: &[f64]) -> Result<Vec<f64>> {
    // A trailing +Inf is always implicit.
    let bounds = match raw.split_last() {
        Some((last, rest)) if *last == f64::INFINITY => rest,
        _ => raw,
    };
    if bounds.is_empty() {
        return Err(VigilError::InvalidMetric(format!("histogram {name} needs at least one bucket")));
    }
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(VigilError::InvalidMetric(format!("histogram {name} has a non-finite bucket")));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(VigilError::InvalidMetric(format!(
            "histogram {name} buckets must be strictly increasing"
        )));
    }
    Ok(bounds.to_vec())
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, `__` prefix reserved.
fn is_valid_label_name(s: &str) -> bool {
    if s.starts_with("__") {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
