use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use viewhelper::{Config, HtmlAttributesSet, HtmlEscaper, View};

use std::rc::Rc;

fn head_render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_head");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut view = View::new(&Config::from_toml_str("doctype = \"HTML5\""));
            for i in 0..size {
                view.head_link()
                    .append_stylesheet(format!("/css/{}.css", i).as_str())
                    .unwrap();
                view.head_script()
                    .append_file(format!("/js/{}.js", i).as_str())
                    .unwrap();
                view.head_meta()
                    .append_name(&format!("key{}", i), "content")
                    .unwrap();
            }
            b.iter(|| black_box(view.render_head(Some("    "))));
        });
    }

    group.finish();
}

fn stylesheet_dedup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_stylesheet");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut view = View::new(&Config::new());
                for i in 0..size {
                    let href = format!("/css/{}.css", i % 10);
                    view.head_link()
                        .append_stylesheet(black_box(href.as_str()))
                        .unwrap();
                }
            });
        });
    }

    group.finish();
}

fn attribute_render_benchmark(c: &mut Criterion) {
    let escaper = Rc::new(HtmlEscaper::new());
    let attributes = vec![
        ("id", "main"),
        ("class", "container fluid"),
        ("title", "He said \"hi\" & left"),
        ("data-url", "/path/to/resource?x=1&y=2"),
    ];
    let set = HtmlAttributesSet::new(escaper, attributes);

    c.bench_function("attributes_render", |b| b.iter(|| black_box(set.render())));
}

criterion_group!(
    benches,
    head_render_benchmark,
    stylesheet_dedup_benchmark,
    attribute_render_benchmark
);
criterion_main!(benches);
