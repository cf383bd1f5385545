use criterion::{black_box, criterion_group, criterion_main, Criterion};

use facetmap::map::graticule::graticule_paths;
use facetmap::{GeoPoint, Projector};

fn bench_project(c: &mut Criterion) {
    let proj = Projector::standard();
    let points: Vec<GeoPoint> = (0..1000)
        .map(|i| GeoPoint::new((i % 170) as f64 - 85.0, (i % 355) as f64 - 169.0))
        .collect();
    c.bench_function("project_1k_inferred", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(proj.project(black_box(p)));
            }
        })
    });
}

fn bench_graticule(c: &mut Criterion) {
    let proj = Projector::standard();
    c.bench_function("graticule_5deg", |b| {
        b.iter(|| black_box(graticule_paths(black_box(&proj), 5)))
    });
}

criterion_group!(benches, bench_project, bench_graticule);
criterion_main!(benches);
