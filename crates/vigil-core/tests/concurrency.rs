//! Concurrent series creation, updates and snapshots.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use vigil_core::metrics::{Registry, SeriesValue};

#[test]
fn concurrent_first_touch_yields_one_series() {
    let reg = Registry::new();
    let c = reg.counter("touch_total", "Touches", &["key"]).unwrap();
    let barrier = Barrier::new(1000);

    thread::scope(|s| {
        for _ in 0..1000 {
            s.spawn(|| {
                barrier.wait();
                c.inc(&[("key", "same")], 1.0).unwrap();
            });
        }
    });

    let snap = reg.family("touch_total").unwrap().unwrap();
    assert_eq!(snap.series.len(), 1);
    assert_eq!(snap.series[0].1, SeriesValue::Counter(1000.0));
}

#[test]
fn gauge_inc_dec_pairs_are_conserved() {
    let reg = Registry::new();
    let g = reg.gauge("active", "Active", &[]).unwrap();

    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                let series = g.series(&[]).unwrap();
                for _ in 0..10_000 {
                    series.inc();
                    series.dec();
                }
            });
        }
    });

    assert_eq!(g.value(&[]).unwrap(), Some(0.0));
}

#[test]
fn snapshots_run_alongside_writers() {
    let reg = Arc::new(Registry::new());
    let h = reg
        .histogram("work_seconds", "Work", &["worker"], &[0.5, 1.0])
        .unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        for w in 0..4 {
            let h = h.clone();
            s.spawn(move || {
                let label = w.to_string();
                for i in 0..5_000 {
                    h.observe(&[("worker", label.as_str())], (i % 3) as f64 * 0.5).unwrap();
                }
            });
        }

        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                for fam in reg.snapshot().unwrap() {
                    for (_, v) in fam.series {
                        if let SeriesValue::Histogram(sample) = v {
                            // cumulative counts never go down and +Inf equals count
                            assert!(sample.cumulative.windows(2).all(|w| w[0] <= w[1]));
                            assert_eq!(sample.cumulative.last().copied(), Some(sample.count));
                        }
                    }
                }
            }
        });

        // wait for the writers by polling the totals
        loop {
            let total: u64 = (0..4)
                .filter_map(|w| h.sample(&[("worker", w.to_string().as_str())]).unwrap())
                .map(|s| s.count)
                .sum();
            if total == 20_000 {
                break;
            }
            thread::yield_now();
        }
        done.store(true, Ordering::Relaxed);
    });

    let s = h.sample(&[("worker", "0")]).unwrap().unwrap();
    assert_eq!(s.count, 5_000);
}
