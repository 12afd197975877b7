use criterion::{Criterion, criterion_group, criterion_main};
use script_arithmetic::{
    Arithmetics, ChainElement, EvaluationContext, Literal, Operator, TypeInfo, Variable,
    parse_chain,
};
use std::hint::black_box;

fn chain(len: usize) -> Vec<ChainElement> {
    let operators = [
        Operator::Addition,
        Operator::Multiplication,
        Operator::Subtraction,
        Operator::Division,
    ];
    let mut chain = vec![ChainElement::operand(Literal::new(1i64))];
    for i in 0..len {
        chain.push(operators[i % operators.len()].into());
        chain.push(ChainElement::operand(Literal::new(i as i64 + 2)));
    }
    chain
}

fn benchmark_lookup(c: &mut Criterion) {
    let registry = Arithmetics::standard().unwrap();

    c.bench_function("lookup_exact_cached", |b| {
        b.iter(|| {
            black_box(registry.get_operation_info(
                black_box(Operator::Addition),
                TypeInfo::Integer,
                TypeInfo::Integer,
            ))
        })
    });

    c.bench_function("lookup_negative_cached", |b| {
        b.iter(|| {
            black_box(registry.lookup_operation_info(
                black_box(Operator::Addition),
                TypeInfo::String,
                TypeInfo::Integer,
            ))
        })
    });

    c.bench_function("lookup_uncached", |b| {
        b.iter(|| {
            registry.clear_caches();
            black_box(registry.lookup_operation_info(
                black_box(Operator::Multiplication),
                TypeInfo::Timespan,
                TypeInfo::Integer,
            ))
        })
    });
}

fn benchmark_parse(c: &mut Criterion) {
    let registry = Arithmetics::standard().unwrap();

    for len in [1, 8, 64] {
        let elements = chain(len);
        c.bench_function(&format!("parse_chain_{len}"), |b| {
            b.iter(|| black_box(parse_chain(&registry, black_box(&elements))))
        });
    }
}

fn benchmark_evaluate(c: &mut Criterion) {
    let registry = Arithmetics::standard().unwrap();
    let context = EvaluationContext::new()
        .with_variable("x", 6i64)
        .with_variable("y", 2.5f64);

    let tree = parse_chain(&registry, &chain(16)).unwrap();
    c.bench_function("evaluate_resolved", |b| {
        b.iter(|| black_box(tree.evaluate(&registry, black_box(&context))))
    });

    let erased = [
        ChainElement::operand(Variable::new("x")),
        Operator::Multiplication.into(),
        ChainElement::operand(Variable::new("y")),
        Operator::Addition.into(),
        ChainElement::operand(Variable::new("z")),
    ];
    let tree = parse_chain(&registry, &erased).unwrap();
    c.bench_function("evaluate_erased", |b| {
        b.iter(|| black_box(tree.evaluate(&registry, black_box(&context))))
    });
}

criterion_group!(benches, benchmark_lookup, benchmark_parse, benchmark_evaluate);
criterion_main!(benches);
