use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sitecraft_compiler_react::generate;
use sitecraft_parser::{parse, WidgetNode};

fn widgets(count: usize) -> Vec<WidgetNode> {
    (0..count)
        .map(|i| match i % 3 {
            0 => WidgetNode::new(i.to_string(), "Button")
                .with_content(format!("Button {}", i))
                .with_style("backgroundColor", "#fff"),
            1 => WidgetNode::new(i.to_string(), "Text").with_content("Some text"),
            _ => WidgetNode::new(i.to_string(), "Image")
                .with_prop("src", "/placeholder.svg")
                .with_prop("alt", "Sample Image"),
        })
        .collect()
}

fn generate_documents(c: &mut Criterion) {
    let small = widgets(10);
    let large = widgets(300);

    c.bench_function("generate_small", |b| b.iter(|| generate(black_box(&small))));
    c.bench_function("generate_large", |b| b.iter(|| generate(black_box(&large))));
}

fn round_trip(c: &mut Criterion) {
    let large = widgets(300);

    c.bench_function("round_trip_large", |b| {
        b.iter(|| parse(&generate(black_box(&large))))
    });
}

criterion_group!(benches, generate_documents, round_trip);
criterion_main!(benches);
