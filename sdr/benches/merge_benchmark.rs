/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;
use sdr::Sdr;
use sdr::SdrConfig;
use sdr::Traversal;
use sdr::Unit;
use sdr::config::global;
use sdr::container::Array;
use sdr::container::Columnar;
use sdr::container::Container;
use sdr::container::SinglyLinked;
use sdr::container::Tree;

const WIDTH: usize = 1 << 20;

fn random_sdr<C: Container<u32, Unit>>(rng: &mut SmallRng, len: usize) -> Sdr<u32, Unit, C> {
    let mut ids: Vec<u32> = index::sample(rng, WIDTH, len)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    ids.sort_unstable();
    Sdr::from_ids(ids)
}

fn bench_container<C: Container<u32, Unit>>(c: &mut Criterion, name: &str) {
    let mut rng = SmallRng::seed_from_u64(0);
    let mut group = c.benchmark_group(format!("and/{}", name));
    for len in [1_000, 10_000, 100_000] {
        let a: Sdr<u32, Unit, C> = random_sdr(&mut rng, len);
        let b: Sdr<u32, Unit, C> = random_sdr(&mut rng, len);
        group.throughput(Throughput::Elements((len * 2) as u64));
        group.bench_function(BenchmarkId::new("ande", len), |bench| {
            bench.iter(|| a.ande(&b))
        });
        group.bench_function(BenchmarkId::new("ands", len), |bench| {
            bench.iter(|| a.ands(&b))
        });
        group.bench_function(BenchmarkId::new("ore", len), |bench| {
            bench.iter(|| a.ore(&b))
        });
        group.bench_function(BenchmarkId::new("andi", len), |bench| {
            bench.iter(|| {
                let mut x = a.clone();
                x.andi(&b);
                x
            })
        });
    }
    group.finish();
}

// A short operand against a long one, where searching ahead skips
// most of the long side.
fn bench_traversal(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let long: Sdr<u32, Unit, Array<u32, Unit>> = random_sdr(&mut rng, 200_000);
    let mut group = c.benchmark_group("traversal");
    for short_len in [10, 100, 1_000] {
        let short: Sdr<u32, Unit, Array<u32, Unit>> = random_sdr(&mut rng, short_len);
        for traversal in [Traversal::Linear, Traversal::Search] {
            let lock = global::lock();
            let _guard = lock.override_config(SdrConfig {
                traversal,
                ..SdrConfig::default()
            });
            group.bench_function(
                BenchmarkId::new(format!("{:?}", traversal), short_len),
                |bench| bench.iter(|| short.ands(&long)),
            );
        }
    }
    group.finish();
}

fn bench_containers(c: &mut Criterion) {
    bench_container::<Array<u32, Unit>>(c, "array");
    bench_container::<Columnar<u32, Unit>>(c, "columnar");
    bench_container::<Tree<u32, Unit>>(c, "tree");
    bench_container::<SinglyLinked<u32, Unit>>(c, "list");
}

criterion_group!(benches, bench_containers, bench_traversal);

criterion_main!(benches);
