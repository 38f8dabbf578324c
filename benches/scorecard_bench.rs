//! Criterion benchmarks for u-scorecard evaluation.
//!
//! Uses synthetic chained configurations over random records to measure
//! planning and per-item evaluation overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_scorecard::{Configuration, EvalexprParser, Evaluator, EvaluatorConfig, Record, Rule};

// ===========================================================================
// Synthetic configuration: r0 = x0 * 2, r_i = r_{i-1} + x_i, clamped
// ===========================================================================

fn chained_configuration(rules: usize) -> Configuration {
    let built = (0..rules).map(|i| {
        let expression = if i == 0 {
            "x0 * 2".to_string()
        } else {
            format!("r{} + x{}", i - 1, i % 8)
        };
        Rule::expression(format!("r{i}"), "chained", expression)
            .unwrap()
            .with_bounds(0.0, 1000.0)
    });

    let mut config = Configuration::builder()
        .with_id("bench")
        .with_description("chained rules")
        .created_now()
        // Reverse insertion so the planner has to reorder.
        .with_rules(built.rev())
        .build()
        .unwrap();
    config.prepare(&EvalexprParser::new()).unwrap();
    config
}

fn random_records(n: usize) -> Vec<Record> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            (0..8).fold(Record::new(), |record, i| {
                record.with_attribute(format!("x{i}"), rng.random_range(-10.0..50.0_f64))
            })
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");

    for rules in [10, 100, 500] {
        let config = chained_configuration(rules);
        group.bench_with_input(BenchmarkId::from_parameter(rules), &config, |b, config| {
            b.iter(|| Evaluator::new(black_box(config)).unwrap());
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for rules in [10, 50, 200] {
        let config = chained_configuration(rules);
        let evaluator = Evaluator::new(&config).unwrap();
        let record = random_records(1).remove(0);
        group.bench_with_input(BenchmarkId::from_parameter(rules), &record, |b, record| {
            b.iter(|| evaluator.evaluate(black_box(record), None).unwrap());
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    let config = chained_configuration(50);
    let records = random_records(1000);

    for parallel in [false, true] {
        let evaluator = Evaluator::new(&config)
            .unwrap()
            .with_config(EvaluatorConfig::default().with_parallel(parallel));
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &records, |b, records| {
            b.iter(|| evaluator.evaluate_batch(black_box(records)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan, bench_evaluate, bench_batch);
criterion_main!(benches);
