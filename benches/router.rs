use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use url_router::{Router, RouterOptions};

/// 77 routes: a few fixed pages, ten resources with five properties each,
/// and a catch-all.
fn route_table() -> Vec<String> {
    let mut patterns: Vec<String> = ["/", "/signin", "/signout", "/profile", "/settings", "/upload/*file"]
        .iter()
        .map(|p| p.to_string())
        .collect();
    for i in 0..10 {
        for j in 0..5 {
            patterns.push(format!("/resource{}/:id/property{}", i, j));
        }
        patterns.push(format!("/resource{}/:id", i));
        patterns.push(format!("/resource{}", i));
    }
    patterns.push("/*".to_string());
    patterns
}

fn build(compress: bool) -> Router<usize> {
    let options = RouterOptions {
        compress,
        known_methods: None,
    };
    Router::from_routes(
        options,
        route_table()
            .into_iter()
            .enumerate()
            .map(|(i, pattern)| (pattern, None, i)),
    )
    .expect("benchmark routes must build")
}

fn bench_resolve(c: &mut Criterion) {
    let requests = ["/", "/resource9/123", "/resource9/123/property1", "/doesnotexist"];
    let mut group = c.benchmark_group("resolve");

    for (label, compress) in [("compressed", true), ("uncompressed", false)] {
        let router = build(compress);
        for path in requests {
            group.bench_with_input(BenchmarkId::new(label, path), path, |b, path| {
                b.iter(|| router.resolve(black_box(path), None))
            });
        }
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_77_routes", |b| b.iter(|| build(black_box(true))));
}

criterion_group!(benches, bench_resolve, bench_build);
criterion_main!(benches);
