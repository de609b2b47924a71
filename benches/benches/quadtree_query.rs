// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use umbra_quadtree::Quadtree;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, world: f64, max_size: f64) -> Vec<Rect> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let x0 = rng.next_f64() * world;
        let y0 = rng.next_f64() * world;
        let w = rng.next_f64() * max_size;
        let h = rng.next_f64() * max_size;
        out.push(Rect::new(x0, y0, x0 + w, y0 + h));
    }
    out
}

fn bench_query_rect(c: &mut Criterion) {
    const WORLD: f64 = 4000.0;
    let mut group = c.benchmark_group("query_rect");
    for &count in &[1000_usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let rects = gen_random_rects(count, WORLD, 100.0);

        let mut tree: Quadtree<usize> = Quadtree::new(Rect::new(0.0, 0.0, WORLD, WORLD));
        for (i, &r) in rects.iter().enumerate() {
            tree.insert(r, i);
        }
        let window = Rect::new(1000.0, 1000.0, 1400.0, 1400.0);

        group.bench_function(format!("quadtree/{count}"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                tree.visit_rect(black_box(window), |_, _| hits += 1);
                black_box(hits)
            });
        });
        group.bench_function(format!("linear/{count}"), |b| {
            b.iter(|| {
                let w = black_box(window);
                let hits = rects
                    .iter()
                    .filter(|r| {
                        r.x0 <= w.x1 && w.x0 <= r.x1 && r.y0 <= w.y1 && w.y0 <= r.y1
                    })
                    .count();
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    const WORLD: f64 = 4000.0;
    let mut group = c.benchmark_group("churn");
    let rects = gen_random_rects(10_000, WORLD, 100.0);

    group.bench_function("insert_remove/10000", |b| {
        b.iter(|| {
            let mut tree: Quadtree<usize> = Quadtree::new(Rect::new(0.0, 0.0, WORLD, WORLD));
            let keys: Vec<_> = rects
                .iter()
                .enumerate()
                .map(|(i, &r)| tree.insert(r, i))
                .collect();
            for key in keys {
                tree.remove(key);
            }
            black_box(tree.len())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_query_rect, bench_churn);
criterion_main!(benches);
