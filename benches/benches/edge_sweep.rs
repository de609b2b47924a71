// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use kurbo::Point;
use umbra_edges::{Edge, EdgeId, EdgeOptions, Sense};

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

fn gen_random_edges(count: usize, world: f64, max_len: f64) -> Vec<Edge> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let a = Point::new(rng.next_f64() * world, rng.next_f64() * world);
        let b = Point::new(
            a.x + (rng.next_f64() - 0.5) * max_len,
            a.y + (rng.next_f64() - 0.5) * max_len,
        );
        out.push(Edge::new(
            a,
            b,
            EdgeId::scoped("wall", &format!("{i}")),
            EdgeOptions {
                sight: Sense::Normal,
                ..EdgeOptions::default()
            },
        ));
    }
    out
}

fn brute_force(edges: &mut [Edge]) {
    for e in edges.iter_mut() {
        e.clear_intersections();
    }
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (head, tail) = edges.split_at_mut(j);
            head[i].record_intersections(&mut tail[0]);
        }
    }
}

fn bench_identify_intersections(c: &mut Criterion) {
    let mut group = c.benchmark_group("identify_intersections");
    for &count in &[100_usize, 500, 2000] {
        group.throughput(Throughput::Elements(count as u64));
        let edges = gen_random_edges(count, 4000.0, 300.0);

        group.bench_function(format!("sweep/{count}"), |b| {
            b.iter_batched(
                || edges.clone(),
                |mut edges| Edge::identify_edge_intersections(edges.iter_mut()),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("brute_force/{count}"), |b| {
            b.iter_batched(
                || edges.clone(),
                |mut edges| brute_force(&mut edges),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_identify_intersections);
criterion_main!(benches);
