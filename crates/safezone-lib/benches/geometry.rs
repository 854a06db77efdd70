use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use safezone_lib::polyline::{decode, encode};
use safezone_lib::{haversine, path_length, GeoPoint};
use std::hint::black_box;

/// A 2,000-point wiggle along the California coast.
static PATH: Lazy<Vec<GeoPoint>> = Lazy::new(|| {
    (0..2_000)
        .map(|i| {
            let t = i as f64 / 2_000.0;
            GeoPoint::new(
                32.7 + 9.0 * t + 0.01 * (t * 400.0).sin(),
                -117.2 - 7.0 * t,
            )
        })
        .collect()
});
static ENCODED: Lazy<String> = Lazy::new(|| encode(&PATH).expect("coastal path is in range"));

fn benchmark_geometry(c: &mut Criterion) {
    c.bench_function("decode_2000_points", |b| {
        let encoded = ENCODED.as_str();
        b.iter(|| {
            let path = decode(black_box(encoded)).expect("valid polyline");
            black_box(path.len())
        });
    });

    c.bench_function("encode_2000_points", |b| {
        let path = &*PATH;
        b.iter(|| black_box(encode(black_box(path)).map(|s| s.len())));
    });

    c.bench_function("haversine_sf_la", |b| {
        let sf = GeoPoint::new(37.7749, -122.4194);
        let la = GeoPoint::new(34.0522, -118.2437);
        b.iter(|| black_box(haversine(black_box(sf), black_box(la))));
    });

    c.bench_function("path_length_2000_points", |b| {
        let path = &*PATH;
        b.iter(|| black_box(path_length(black_box(path))));
    });
}

criterion_group!(benches, benchmark_geometry);
criterion_main!(benches);
