// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use journal_virtual_scroll::{HeadlessSurface, ManualScheduler, VirtualScroll, compute_range};

const ROW_HEIGHT: f64 = 50.0;
const VIEWPORT: f64 = 600.0;

fn bench_compute_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/compute_range");

    for len in [1_000usize, 12_500, 1_000_000] {
        let extent = len as f64 * ROW_HEIGHT;
        let offsets: Vec<f64> = (0..1_024).map(|i| extent * f64::from(i) / 1_024.0).collect();
        group.throughput(Throughput::Elements(offsets.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &offsets, |b, offsets| {
            b.iter(|| {
                for &offset in offsets {
                    black_box(compute_range(
                        black_box(offset),
                        VIEWPORT,
                        len,
                        ROW_HEIGHT,
                        5,
                    ));
                }
            });
        });
    }

    group.finish();
}

// Hypothesis: paint cost depends on the window (22 rows here), not on `len`.
fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/refresh");

    for len in [1_000u64, 12_500, 1_000_000] {
        let surface = HeadlessSurface::<String>::new(VIEWPORT);
        let journal = VirtualScroll::builder()
            .container(surface.clone())
            .render_row(|amount: &u64, index| format!("{index}:{amount}"))
            .build()
            .unwrap();
        journal.set_data((0..len).collect()).unwrap();
        surface.scroll_to(len as f64 * ROW_HEIGHT / 2.0);

        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| black_box(journal.refresh().unwrap()));
        });
    }

    group.finish();
}

fn bench_scroll_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("window/scroll_burst");

    for notifications in [16u32, 256] {
        let surface = HeadlessSurface::<String>::new(VIEWPORT);
        let frames = ManualScheduler::new();
        let journal = VirtualScroll::builder()
            .container(surface.clone())
            .scheduler(frames.clone())
            .render_row(|amount: &u64, _| amount.to_string())
            .build()
            .unwrap();
        journal.set_data((0..12_500).collect()).unwrap();
        group.throughput(Throughput::Elements(u64::from(notifications)));

        group.bench_function(BenchmarkId::from_parameter(notifications), |b| {
            b.iter(|| {
                for step in 0..notifications {
                    surface.scroll_to(f64::from(step) * 37.0);
                }
                frames.run_pending();
                black_box(journal.window())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_range, bench_refresh, bench_scroll_burst);
criterion_main!(benches);
