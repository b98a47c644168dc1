//! Benchmarks for field validators and form extraction.
//!
//! Run with: `cargo bench --bench validators`

#![allow(missing_docs, reason = "Benchmark functions are self-documenting")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rebilly_token::{
    form::{FieldExtractor, HtmlForm, InputElement},
    validate::{card, customer},
};

fn bench_luhn(c: &mut Criterion) {
    let mut group = c.benchmark_group("luhn");
    for number in ["4601398104203552", "5349207783952559", "378282246310005", "1131313"] {
        group.bench_with_input(BenchmarkId::from_parameter(number), number, |b, n| {
            b.iter(|| card::luhn(black_box(n)));
        });
    }
    group.finish();
}

fn bench_card_number(c: &mut Criterion) {
    c.bench_function("card_number_grouped", |b| {
        b.iter(|| card::card_number(black_box("4494 5908 0494 9548")));
    });
}

fn bench_customer(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer");
    group.bench_function("first_name", |b| b.iter(|| customer::first_name(black_box("Éloïse"))));
    group.bench_function("address", |b| {
        b.iter(|| customer::address(black_box("1234 Rue Saint-Denis, Apt. 5")));
    });
    group.bench_function("postal_code", |b| b.iter(|| customer::postal_code(black_box("H2X 1K4"))));
    group.bench_function("phone_number", |b| {
        b.iter(|| customer::phone_number(black_box("+1 (514) 555-0199")));
    });
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let form = HtmlForm::new()
        .with_input(InputElement::new("4111111111111111").with_attribute("data-rebilly", "pan"))
        .with_input(InputElement::new("12").with_attribute("data-rebilly", "expMonth"))
        .with_input(InputElement::new("2030").with_attribute("data-rebilly", "expYear"))
        .with_input(InputElement::new("123").with_attribute("data-rebilly", "cvv"))
        .with_input(InputElement::new("Ada").with_attribute("data-rebilly", "firstName"))
        .with_input(InputElement::new("Lovelace").with_attribute("data-rebilly", "lastName"))
        .with_input(InputElement::new("10 Downing St").with_attribute("data-rebilly", "address"));
    let extractor = FieldExtractor::default();

    c.bench_function("extract_form", |b| b.iter(|| extractor.extract(black_box(&form))));
}

criterion_group!(benches, bench_luhn, bench_card_number, bench_customer, bench_extract);
criterion_main!(benches);
