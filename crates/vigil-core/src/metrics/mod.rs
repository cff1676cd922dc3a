//! In-process metrics with Prometheus text exposition.
//!
//! A [`Registry`] owns every metric family of the process. Families are keyed
//! by their label values and backed by `DashMap`, so concurrent first-touches of
//! a series race on one shard entry and all callers end up sharing it. Series
//! values are plain atomics; nothing takes a lock wider than one shard.

pub mod atomic;
pub mod descriptor;
pub mod exposition;
pub mod family;
pub mod instruments;
pub mod labels;
pub mod registry;

pub use descriptor::{Descriptor, MetricKind};
pub use exposition::{encode, CONTENT_TYPE};
pub use instruments::{
    Counter, CounterSeries, Gauge, GaugeSeries, Histogram, HistogramSample, HistogramSeries,
};
pub use labels::LabelSet;
pub use registry::{Instrument, MetricSnapshot, Registry, SeriesValue};
