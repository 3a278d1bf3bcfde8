use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use wordnet::models::WordNode;
use wordnet::services::{SeedFile, Sm2Scheduler};

fn benchmark_scheduling(c: &mut Criterion) {
    let scheduler = Sm2Scheduler;
    let now = 1_704_103_200_000;
    let item = scheduler.initial_item("restructure", now);

    let mut group = c.benchmark_group("scheduling");

    group.bench_function("sm2_review_sequence", |b| {
        b.iter(|| {
            let mut current = item.clone();
            for quality in [5u8, 4, 3, 5, 1, 4, 5, 5] {
                current = scheduler.next_review(black_box(&current), quality, now);
            }
            current
        })
    });

    let mut word = WordNode::with_details(
        "restructure",
        "重组",
        &["re".to_string(), "struct".to_string(), "ure".to_string()],
        now,
    );
    word.review_count = 3;
    word.set_memory_strength(0.6);

    group.bench_function("forgetting_curve_estimate", |b| {
        b.iter(|| black_box(&word).next_review_time())
    });

    group.bench_function("morpheme_relations", |b| {
        b.iter(|| black_box(&word).parse_morpheme_relations())
    });

    group.finish();
}

fn benchmark_seed_parse(c: &mut Criterion) {
    let json = std::fs::read_to_string("data/default_words.json")
        .expect("Failed to read default words");

    c.bench_function("parse_default_words", |b| {
        b.iter(|| SeedFile::load_from_json(black_box(&json)))
    });
}

criterion_group!(benches, benchmark_scheduling, benchmark_seed_parse);
criterion_main!(benches);
