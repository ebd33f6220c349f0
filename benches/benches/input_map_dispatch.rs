// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_input_events::patterns::{any_of, key_pressed, key_typed, pointer_pressed};
use understory_input_events::types::{EventKind, InputEvent, KeyCode, Modifiers, PointerButton};
use understory_input_map::handler::{HandlerTemplate, HandlerTemplateMap};
use understory_input_map::template::{InputMapTemplate, consume, process, sequence};
use understory_input_map::types::InputResult;

#[derive(Default)]
struct Counter(Cell<u64>);

type Tmpl = InputMapTemplate<Counter, InputEvent>;

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
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn letter(rng: &mut Rng) -> char {
    char::from(b'a' + rng.below(26) as u8)
}

// A mix of narrow key bindings and broad family handlers, like a real editor keymap.
fn gen_bindings(n: usize, seed: u64) -> Vec<Tmpl> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| match rng.below(8) {
            0 => process(any_of(EventKind::Key), |c: &Counter, _: InputEvent| {
                c.0.set(c.0.get() + 1);
                InputResult::Proceed
            }),
            1 => consume(pointer_pressed(PointerButton::Primary), |c: &Counter, _: InputEvent| {
                c.0.set(c.0.get() + 1);
            }),
            2 | 3 => consume(key_typed(letter(&mut rng)), |c: &Counter, _: InputEvent| {
                c.0.set(c.0.get() + 1);
            }),
            _ => consume(
                key_pressed(KeyCode::Char(letter(&mut rng)), Modifiers::CONTROL),
                |c: &Counter, _: InputEvent| c.0.set(c.0.get() + 1),
            ),
        })
        .collect()
}

fn gen_events(count: usize, seed: u64) -> Vec<InputEvent> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| match rng.below(4) {
            0 => InputEvent::key_typed(letter(&mut rng), Modifiers::empty()),
            1 => InputEvent::key_pressed(KeyCode::Char(letter(&mut rng)), Modifiers::CONTROL),
            2 => InputEvent::pointer_moved(kurbo_point(&mut rng)),
            _ => InputEvent::pointer_pressed(PointerButton::Primary, kurbo_point(&mut rng)),
        })
        .collect()
}

fn kurbo_point(rng: &mut Rng) -> Point {
    Point::new(rng.below(800) as f64, rng.below(600) as f64)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for &n in &[16usize, 64, 256] {
        let bindings = gen_bindings(n, 0x9E37_79B9_7F4A_7C15);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("flatten_sequence_n{}", n), |b| {
            b.iter_batched(
                || sequence(bindings.clone()),
                |tmpl| black_box(tmpl.handler_template_map().len()),
                BatchSize::SmallInput,
            )
        });
        // Same bindings grouped in pairs: exercises re-insertion across levels.
        group.bench_function(format!("flatten_nested_n{}", n), |b| {
            b.iter_batched(
                || sequence(bindings.chunks(2).map(|pair| sequence(pair.to_vec()))),
                |tmpl| black_box(tmpl.handler_template_map().len()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let events = gen_events(1024, 0xD1B5_4A32_D192_ED03);
    for &n in &[16usize, 64, 256] {
        let bound = sequence(gen_bindings(n, 0x9E37_79B9_7F4A_7C15)).bind(Counter::default());
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(format!("events_1024_bindings_n{}", n), |b| {
            b.iter(|| {
                let consumed = events
                    .iter()
                    .filter(|e| bound.handle(e).is_consumed())
                    .count();
                black_box(consumed)
            })
        });
    }
    group.finish();
}

fn bench_same_key_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("same_key_insert");
    for &n in &[64usize, 512] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_after_n{}", n), |b| {
            b.iter_batched(
                HandlerTemplateMap::<Counter, InputEvent>::new,
                |mut map| {
                    for _ in 0..n {
                        map.insert_after(
                            EventKind::KeyPressed,
                            HandlerTemplate::from_fn(|_: &Counter, _: &InputEvent| {
                                InputResult::Proceed
                            }),
                        );
                    }
                    let ev = InputEvent::key_pressed(KeyCode::Enter, Modifiers::empty());
                    black_box(map.handle(&Counter::default(), &ev))
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile, bench_dispatch, bench_same_key_insert);
criterion_main!(benches);
