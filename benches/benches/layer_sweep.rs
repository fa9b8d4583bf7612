// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_layers::event::{HostEvent, KeyEvent, KeyState};
use understory_layers::layer::{Context, Layer};
use understory_layers::manager::LayerManager;

struct Counter {
    name: String,
}

impl Layer<u64> for Counter {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, cx: &mut Context<'_, u64>) {
        *cx.shared_mut() += 1;
    }

    fn key(&mut self, event: &KeyEvent, cx: &mut Context<'_, u64>) {
        *cx.shared_mut() += event.key as u64;
    }
}

/// Deletes itself on its first update.
struct Ephemeral(String);

impl Layer<u64> for Ephemeral {
    fn name(&self) -> &str {
        &self.0
    }

    fn update(&mut self, cx: &mut Context<'_, u64>) {
        cx.delete_self();
    }
}

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("layer-{i:05}")).collect()
}

fn populated(names: &[String], active: bool) -> LayerManager<u64> {
    let mut layers = LayerManager::new(0);
    for name in names {
        let _ = layers.add_layer(Counter { name: name.clone() });
        if active {
            layers.activate_layer(name.as_str());
        }
    }
    layers
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    for &n in &[16usize, 256, 4096] {
        let names = names(n);
        let mut layers = populated(&names, true);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("update_all_active_n{}", n), |b| {
            b.iter(|| {
                layers.update();
                black_box(layers.shared_app_data());
            })
        });
        let mut idle = populated(&names, false);
        group.bench_function(format!("update_all_idle_n{}", n), |b| {
            b.iter(|| {
                idle.update();
                black_box(idle.frame_index());
            })
        });
    }
    group.finish();
}

fn bench_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("switch");
    for &n in &[16usize, 256, 4096] {
        let names = names(n);
        let mut layers = populated(&names, false);
        group.bench_function(format!("round_robin_n{}", n), |b| {
            let mut i = 0;
            b.iter(|| {
                layers.switch_layer(names[i % n].as_str());
                i += 1;
            })
        });
        group.bench_function(format!("unknown_name_n{}", n), |b| {
            b.iter(|| layers.switch_layer(black_box("missing")))
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for &n in &[16usize, 256] {
        let names = names(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("add_activate_delete_n{}", n), |b| {
            b.iter_batched(
                || LayerManager::<u64>::new(0),
                |mut layers| {
                    for name in &names {
                        let _ = layers.add_layer(Ephemeral(name.clone()));
                        layers.activate_layer(name.as_str());
                    }
                    // First sweep marks every layer dead, second destroys them.
                    layers.update();
                    layers.update();
                    black_box(layers.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    let event = HostEvent::Key(KeyEvent {
        state: KeyState::Pressed,
        key: 32,
    });
    for &n in &[16usize, 256, 4096] {
        let names = names(n);
        let mut layers = populated(&names, true);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("key_to_active_n{}", n), |b| {
            b.iter(|| black_box(layers.handle_event(&event)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweep, bench_switch, bench_churn, bench_fan_out);
criterion_main!(benches);
