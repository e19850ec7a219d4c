//! Benchmarks for ring lookups and membership changes.
//!
//! Lookup is the hot path (shared lock + binary search); add/remove are
//! linear in the node's virtual-node count plus a re-sort.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashring::{HashRing, Xxh3Partitioner};

fn seeded_ring(nodes: usize, replication_factor: u32) -> HashRing {
    let ring = HashRing::new(replication_factor);
    ring.add_nodes((0..nodes).map(|i| (format!("server{i}"), 1.0)));
    ring
}

fn bench_lookup(c: &mut Criterion) {
    let keys: Vec<String> = (0..1024).map(|i| format!("key{i}")).collect();
    let mut group = c.benchmark_group("get_node");
    group.throughput(Throughput::Elements(keys.len() as u64));

    for nodes in [3usize, 100, 1000] {
        let ring = seeded_ring(nodes, 50);
        group.bench_with_input(BenchmarkId::new("blake3", nodes), &ring, |b, ring| {
            b.iter(|| {
                for key in &keys {
                    black_box(ring.get_node(key));
                }
            })
        });

        let ring = HashRing::with_partitioner(50, Xxh3Partitioner);
        ring.add_nodes((0..nodes).map(|i| (format!("server{i}"), 1.0)));
        group.bench_with_input(BenchmarkId::new("xxh3", nodes), &ring, |b, ring| {
            b.iter(|| {
                for key in &keys {
                    black_box(ring.get_node(key));
                }
            })
        });
    }
    group.finish();
}

fn bench_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");
    for nodes in [10usize, 100] {
        let ring = seeded_ring(nodes, 50);
        group.bench_with_input(BenchmarkId::new("add_remove", nodes), &ring, |b, ring| {
            b.iter(|| {
                ring.add_node("bench-node", 1.0);
                ring.remove_node("bench-node");
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_membership);
criterion_main!(benches);
