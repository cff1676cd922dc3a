//! Process-scoped metric registry.
//!
//! The registry is an explicit value: build one at startup, register the
//! families, and hand clones of the instrument handles to whoever records.
//! Registration takes a short write lock on the family list; snapshots take
//! the read lock only to clone the family handles and read series afterwards.

use std::sync::{Arc, RwLock};

use crate::error::{Result, VigilError};
use crate::metrics::exposition;
use crate::metrics::family::Collect;
use crate::metrics::instruments::{Counter, Gauge, Histogram, HistogramSample};
use crate::metrics::{Descriptor, LabelSet, MetricKind};

/// A registered instrument, as returned by [`Registry::register`].
#[derive(Clone)]
pub enum Instrument {
    Counter(Counter),
    Gauge(Gauge),
    Histogram(Histogram),
}

/// Value of one series at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Counter(f64),
    Gauge(f64),
    Histogram(HistogramSample),
}

/// One family and all of its series at snapshot time.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub descriptor: Descriptor,
    pub series: Vec<(LabelSet, SeriesValue)>,
}

impl MetricSnapshot {
    /// First series whose labels contain all of `labels`.
    pub fn find(&self, labels: &[(&str, &str)]) -> Option<&SeriesValue> {
        self.series
            .iter()
            .find(|(set, _)| set.matches(labels))
            .map(|(_, v)| v)
    }
}

#[derive(Default)]
pub struct Registry {
    families: RwLock<Vec<Arc<dyn Collect>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a family. Fails if a family with the same name already exists.
    pub fn register(&self, desc: Descriptor) -> Result<Instrument> {
        let mut families = self
            .families
            .write()
            .map_err(|_| VigilError::Internal("metric registry lock poisoned".into()))?;

        if families.iter().any(|f| f.descriptor().name() == desc.name()) {
            return Err(VigilError::DuplicateMetric(desc.name().to_string()));
        }

        let (instrument, collect): (Instrument, Arc<dyn Collect>) = match desc.kind() {
            MetricKind::Counter => {
                let c = Counter::new(desc);
                let f: Arc<dyn Collect> = c.family();
                (Instrument::Counter(c), f)
            }
            MetricKind::Gauge => {
                let g = Gauge::new(desc);
                let f: Arc<dyn Collect> = g.family();
                (Instrument::Gauge(g), f)
            }
            MetricKind::Histogram => {
                let h = Histogram::new(desc);
                let f: Arc<dyn Collect> = h.family();
                (Instrument::Histogram(h), f)
            }
        };
        families.push(collect);

        tracing::debug!(count = families.len(), "metric family registered");
        Ok(instrument)
    }

    pub fn counter(&self, name: &str, help: &str, labels: &[&str]) -> Result<Counter> {
        match self.register(Descriptor::counter(name, help, labels)?)? {
            Instrument::Counter(c) => Ok(c),
            _ => Err(VigilError::Internal(format!("{name} registered with wrong kind"))),
        }
    }

    pub fn gauge(&self, name: &str, help: &str, labels: &[&str]) -> Result<Gauge> {
        match self.register(Descriptor::gauge(name, help, labels)?)? {
            Instrument::Gauge(g) => Ok(g),
            _ => Err(VigilError::Internal(format!("{name} registered with wrong kind"))),
        }
    }

    pub fn histogram(
        &self,
        name: &str,
        help: &str,
        labels: &[&str],
        buckets: &[f64],
    ) -> Result<Histogram> {
        match self.register(Descriptor::histogram(name, help, labels, buckets)?)? {
            Instrument::Histogram(h) => Ok(h),
            _ => Err(VigilError::Internal(format!("{name} registered with wrong kind"))),
        }
    }

    /// Copy every family and series, in registration order.
    pub fn snapshot(&self) -> Result<Vec<MetricSnapshot>> {
        let families: Vec<Arc<dyn Collect>> = self
            .families
            .read()
            .map_err(|_| VigilError::Serialization("metric registry lock poisoned".into()))?
            .clone();

        Ok(families.iter().map(|f| f.collect()).collect())
    }

    /// Snapshot and render in Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let snap = self.snapshot()?;
        Ok(exposition::encode(&snap))
    }

    /// Snapshot of a single family by name.
    pub fn family(&self, name: &str) -> Result<Option<MetricSnapshot>> {
        let family = self
            .families
            .read()
            .map_err(|_| VigilError::Serialization("metric registry lock poisoned".into()))?
            .iter()
            .find(|f| f.descriptor().name() == name)
            .cloned();
        Ok(family.map(|f| f.collect()))
    }
}
