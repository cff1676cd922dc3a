//! Labeled instruments: counter, gauge, histogram.
//!
//! Instruments are cheap `Arc` handles to their family; clone them freely.
//! Each write resolves labels against the descriptor, then updates a single
//! series with atomics. `series()` returns a handle bound to one series for
//! callers that write the same labels repeatedly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, VigilError};
use crate::metrics::atomic::AtomicF64;
use crate::metrics::family::{Family, SeriesCell};
use crate::metrics::registry::SeriesValue;
use crate::metrics::Descriptor;

// --------------------
// Counter
// --------------------

pub struct CounterCell(AtomicF64);

impl SeriesCell for CounterCell {
    fn read(&self) -> SeriesValue {
        SeriesValue::Counter(self.0.get())
    }
}

#[derive(Clone)]
pub struct Counter {
    family: Arc<Family<CounterCell>>,
}

impl Counter {
    pub(crate) fn new(desc: Descriptor) -> Self {
        Self {
            family: Arc::new(Family::new(desc, |_| CounterCell(AtomicF64::new(0.0)))),
        }
    }

    pub(crate) fn family(&self) -> Arc<Family<CounterCell>> {
        Arc::clone(&self.family)
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.family.descriptor()
    }

    /// Get or create the series for `labels`.
    pub fn series(&self, labels: &[(&str, &str)]) -> Result<CounterSeries> {
        Ok(CounterSeries {
            name: self.family.descriptor().name().into(),
            cell: self.family.get_or_create(labels)?,
        })
    }

    /// Add `delta` (must be >= 0) to the series for `labels`.
    pub fn inc(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        // Reject before touching the family so a bad call never creates a series.
        check_delta(self.family.descriptor().name(), delta)?;
        self.series(labels)?.inc(delta)
    }

    /// Current value, or `None` if the series was never touched.
    pub fn value(&self, labels: &[(&str, &str)]) -> Result<Option<f64>> {
        Ok(self.family.get(labels)?.map(|c| c.0.get()))
    }
}

#[derive(Clone)]
pub struct CounterSeries {
    name: Arc<str>,
    cell: Arc<CounterCell>,
}

impl CounterSeries {
    pub fn inc(&self, delta: f64) -> Result<()> {
        check_delta(&self.name, delta)?;
        self.cell.0.add(delta);
        Ok(())
    }

    pub fn get(&self) -> f64 {
        self.cell.0.get()
    }
}

fn check_delta(metric: &str, delta: f64) -> Result<()> {
    // NaN fails this comparison too.
    if delta >= 0.0 {
        Ok(())
    } else {
        Err(VigilError::NegativeDelta {
            metric: metric.to_string(),
            delta,
        })
    }
}

// --------------------
// Gauge
// --------------------

pub struct GaugeCell(AtomicF64);

impl SeriesCell for GaugeCell {
    fn read(&self) -> SeriesValue {
        SeriesValue::Gauge(self.0.get())
    }
}

#[derive(Clone)]
pub struct Gauge {
    family: Arc<Family<GaugeCell>>,
}

impl Gauge {
    pub(crate) fn new(desc: Descriptor) -> Self {
        Self {
            family: Arc::new(Family::new(desc, |_| GaugeCell(AtomicF64::new(0.0)))),
        }
    }

    pub(crate) fn family(&self) -> Arc<Family<GaugeCell>> {
        Arc::clone(&self.family)
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.family.descriptor()
    }

    pub fn series(&self, labels: &[(&str, &str)]) -> Result<GaugeSeries> {
        Ok(GaugeSeries {
            cell: self.family.get_or_create(labels)?,
        })
    }

    pub fn set(&self, labels: &[(&str, &str)], v: f64) -> Result<()> {
        self.series(labels)?.set(v);
        Ok(())
    }

    pub fn inc(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        self.series(labels)?.add(delta);
        Ok(())
    }

    pub fn dec(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        self.series(labels)?.add(-delta);
        Ok(())
    }

    pub fn value(&self, labels: &[(&str, &str)]) -> Result<Option<f64>> {
        Ok(self.family.get(labels)?.map(|c| c.0.get()))
    }
}

#[derive(Clone)]
pub struct GaugeSeries {
    cell: Arc<GaugeCell>,
}

impl GaugeSeries {
    pub fn set(&self, v: f64) {
        self.cell.0.set(v);
    }

    pub fn add(&self, delta: f64) -> f64 {
        self.cell.0.add(delta)
    }

    pub fn inc(&self) -> f64 {
        self.add(1.0)
    }

    pub fn dec(&self) -> f64 {
        self.add(-1.0)
    }

    pub fn get(&self) -> f64 {
        self.cell.0.get()
    }
}

// --------------------
// Histogram
// --------------------

/// Per-bucket (non-cumulative) counts plus one overflow slot.
///
/// Storing disjoint slots keeps every snapshot internally consistent: the
/// cumulative counts are computed on read, so they are non-decreasing and the
/// `+Inf` bucket always equals the total count.
pub struct HistogramCell {
    bounds: Arc<[f64]>,
    slots: Box<[AtomicU64]>,
    sum: AtomicF64,
}

impl HistogramCell {
    fn new(desc: &Descriptor) -> Self {
        let bounds = desc.shared_buckets();
        let slots = (0..=bounds.len()).map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            slots,
            sum: AtomicF64::new(0.0),
        }
    }

    fn observe(&self, v: f64) {
        // Smallest bound >= v; NaN and values past the last bound go to overflow.
        let idx = if v.is_nan() {
            self.bounds.len()
        } else {
            self.bounds.partition_point(|b| *b < v)
        };
        if let Some(slot) = self.slots.get(idx) {
            slot.fetch_add(1, Ordering::Relaxed);
        }
        self.sum.add(v);
    }

    fn sample(&self) -> HistogramSample {
        let mut running = 0u64;
        let mut cumulative = Vec::with_capacity(self.slots.len());
        for slot in self.slots.iter() {
            running += slot.load(Ordering::Relaxed);
            cumulative.push(running);
        }
        HistogramSample {
            bounds: self.bounds.to_vec(),
            cumulative,
            sum: self.sum.get(),
            count: running,
        }
    }
}

impl SeriesCell for HistogramCell {
    fn read(&self) -> SeriesValue {
        SeriesValue::Histogram(self.sample())
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSample {
    /// Upper bounds without `+Inf`.
    pub bounds: Vec<f64>,
    /// Cumulative counts, one per bound plus the trailing `+Inf` bucket.
    pub cumulative: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

#[derive(Clone)]
pub struct Histogram {
    family: Arc<Family<HistogramCell>>,
}

impl Histogram {
    pub(crate) fn new(desc: Descriptor) -> Self {
        Self {
            family: Arc::new(Family::new(desc, HistogramCell::new)),
        }
    }

    pub(crate) fn family(&self) -> Arc<Family<HistogramCell>> {
        Arc::clone(&self.family)
    }

    pub fn descriptor(&self) -> &Descriptor {
        self.family.descriptor()
    }

    pub fn series(&self, labels: &[(&str, &str)]) -> Result<HistogramSeries> {
        Ok(HistogramSeries {
            cell: self.family.get_or_create(labels)?,
        })
    }

    pub fn observe(&self, labels: &[(&str, &str)], v: f64) -> Result<()> {
        self.series(labels)?.observe(v);
        Ok(())
    }

    pub fn sample(&self, labels: &[(&str, &str)]) -> Result<Option<HistogramSample>> {
        Ok(self.family.get(labels)?.map(|c| c.sample()))
    }
}

#[derive(Clone)]
pub struct HistogramSeries {
    cell: Arc<HistogramCell>,
}

impl HistogramSeries {
    pub fn observe(&self, v: f64) {
        self.cell.observe(v);
    }

    pub fn sample(&self) -> HistogramSample {
        self.cell.sample()
    }
}
