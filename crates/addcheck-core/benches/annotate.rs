use criterion::{black_box, criterion_group, criterion_main, Criterion};

use addcheck_core::annotator::{annotate, GraphFormat};
use addcheck_core::evaluator::evaluate;
use addcheck_core::model::AttemptId;
use addcheck_core::ontology::{OntologyContext, OntologyFormat};

const ONTOLOGY_OWL: &str = include_str!("../../../ontology/math-addition.owl");

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate", |b| {
        b.iter(|| evaluate(black_box(3), black_box(4), black_box(7)).unwrap())
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_rdfxml_ontology", |b| {
        b.iter(|| {
            OntologyContext::from_reader(black_box(ONTOLOGY_OWL.as_bytes()), OntologyFormat::RdfXml)
                .unwrap()
        })
    });
}

fn bench_annotate(c: &mut Criterion) {
    let ctx = OntologyContext::from_reader(ONTOLOGY_OWL.as_bytes(), OntologyFormat::RdfXml).unwrap();
    let mut group = c.benchmark_group("annotate");

    group.bench_function("build_graph", |b| {
        b.iter(|| annotate(&ctx, AttemptId(black_box(42)), 3, 4, 7).unwrap())
    });

    let record = annotate(&ctx, AttemptId(42), 3, 4, 7).unwrap();
    group.bench_function("serialize_turtle", |b| {
        b.iter(|| record.serialize(GraphFormat::Turtle).unwrap())
    });
    group.bench_function("serialize_ntriples", |b| {
        b.iter(|| record.serialize(GraphFormat::NTriples).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_load, bench_annotate);
criterion_main!(benches);
