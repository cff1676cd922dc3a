//! Per-descriptor series storage.
//!
//! A family maps label values (declared order) to one shared cell. Lookups go
//! through `DashMap::entry`, which holds the shard write lock for the duration
//! of the insert, so racing first-touches of a key observe the same `Arc`.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Result;
use crate::metrics::labels::{resolve_key, LabelSet};
use crate::metrics::registry::{MetricSnapshot, SeriesValue};
use crate::metrics::Descriptor;

/// A series value cell that can be copied out for exposition.
pub trait SeriesCell: Send + Sync + 'static {
    fn read(&self) -> SeriesValue;
}

/// Read side of a family, as seen by the registry.
pub trait Collect: Send + Sync {
    fn descriptor(&self) -> &Descriptor;
    fn collect(&self) -> MetricSnapshot;
}

pub struct Family<C> {
    desc: Descriptor,
    series: DashMap<Vec<String>, Arc<C>>,
    init: fn(&Descriptor) -> C,
}

impl<C: SeriesCell> Family<C> {
    pub fn new(desc: Descriptor, init: fn(&Descriptor) -> C) -> Self {
        Self {
            desc,
            series: DashMap::new(),
            init,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.desc
    }

    /// Return the series for `labels`, creating the zero series on first access.
    pub fn get_or_create(&self, labels: &[(&str, &str)]) -> Result<Arc<C>> {
        let key = resolve_key(&self.desc, labels)?;
        if let Some(cell) = self.series.get(&key) {
            return Ok(Arc::clone(cell.value()));
        }
        let cell = self
            .series
            .entry(key)
            .or_insert_with(|| Arc::new((self.init)(&self.desc)));
        Ok(Arc::clone(cell.value()))
    }

    /// Return the series for `labels` without creating it.
    pub fn get(&self, labels: &[(&str, &str)]) -> Result<Option<Arc<C>>> {
        let key = resolve_key(&self.desc, labels)?;
        Ok(self.series.get(&key).map(|c| Arc::clone(c.value())))
    }
}

impl<C: SeriesCell> Collect for Family<C> {
    fn descriptor(&self) -> &Descriptor {
        &self.desc
    }

    fn collect(&self) -> MetricSnapshot {
        // Copy out under per-shard read locks; formatting happens later, lock-free.
        let mut rows: Vec<(Vec<String>, SeriesValue)> = self
            .series
            .iter()
            .map(|r| (r.key().clone(), r.value().read()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let names = self.desc.label_names();
        MetricSnapshot {
            descriptor: self.desc.clone(),
            series: rows
                .into_iter()
                .map(|(key, v)| (LabelSet::from_key(names, &key), v))
                .collect(),
        }
    }
}
