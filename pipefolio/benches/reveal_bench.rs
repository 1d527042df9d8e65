//! Benchmarks for command interpretation and reveal stepping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipefolio::core::Stage;
use pipefolio::reveal::{typing_frames, PacedItem, PacedSequence};
use pipefolio::terminal::{interpret, CommandTable};
use pipefolio::views::StageView;

fn interpret_benchmark(c: &mut Criterion) {
    let welcome = CommandTable::welcome();
    let floating = CommandTable::floating();

    c.bench_function("interpret_hit", |b| {
        b.iter(|| interpret(black_box(&welcome), black_box("  Skills ")))
    });
    c.bench_function("interpret_cat", |b| {
        b.iter(|| interpret(black_box(&welcome), black_box("cat /etc/motd")))
    });
    c.bench_function("interpret_miss", |b| {
        b.iter(|| interpret(black_box(&floating), black_box("sudo rm -rf /")))
    });
}

fn sequence_benchmark(c: &mut Criterion) {
    let items: Vec<_> = (0..200u32).map(|i| PacedItem::after_ms(i, 5)).collect();

    c.bench_function("paced_sequence_drain", |b| {
        b.iter(|| {
            let mut sequence = PacedSequence::new(items.clone());
            let mut sum = 0u32;
            while let Some((_, value)) = sequence.advance() {
                sum += *value;
            }
            black_box(sum)
        })
    });
    c.bench_function("typing_frames", |b| {
        b.iter(|| typing_frames(black_box("$ cat services.txt")).count())
    });
    c.bench_function("stage_scripts", |b| {
        b.iter(|| {
            Stage::ALL
                .iter()
                .map(|&stage| StageView::script(stage).len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, interpret_benchmark, sequence_benchmark);
criterion_main!(benches);
