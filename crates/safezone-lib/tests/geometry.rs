//! Property-style tests for the polyline codec and distance helpers.
//!
//! Paths are generated from a fixed-seed LCG so failures are reproducible.

use safezone_lib::polyline::{decode, encode, PRECISION};
use safezone_lib::{haversine, within_radius, GeoPoint};

struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn point(&mut self) -> GeoPoint {
        GeoPoint::new(
            self.next_unit() * 180.0 - 90.0,
            self.next_unit() * 360.0 - 180.0,
        )
    }
}

#[test]
fn round_trip_random_paths_within_precision() {
    let mut rng = Lcg(0x5AFE_2024);
    for len in [1usize, 2, 17, 250] {
        let path: Vec<GeoPoint> = (0..len).map(|_| rng.point()).collect();
        let decoded = decode(&encode(&path).expect("points are in range")).expect("encoder output decodes");

        assert_eq!(decoded.len(), path.len());
        for (original, got) in path.iter().zip(&decoded) {
            assert!((original.lat - got.lat).abs() <= 1.0 / PRECISION);
            assert!((original.lng - got.lng).abs() <= 1.0 / PRECISION);
        }
    }
}

#[test]
fn decoded_points_are_quantized() {
    // Re-encoding a decoded path is lossless.
    let encoded = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
    let decoded = decode(encoded).unwrap();
    assert_eq!(encode(&decoded).unwrap(), encoded);
}

#[test]
fn distance_identity_and_symmetry() {
    let mut rng = Lcg(42);
    for _ in 0..200 {
        let a = rng.point();
        let b = rng.point();
        assert_eq!(haversine(a, a), 0.0);
        assert_eq!(haversine(a, b), haversine(b, a));
        assert!(haversine(a, b) >= 0.0);
    }
}

#[test]
fn radius_filter_is_monotone() {
    let mut rng = Lcg(7);
    let center = GeoPoint::new(35.6762, 139.6503);
    let points: Vec<GeoPoint> = (0..300).map(|_| rng.point()).collect();

    let radii = [0.0, 1_000.0, 500_000.0, 2_000_000.0, 8_000_000.0, 20_100_000.0];
    let mut previous: Vec<GeoPoint> = Vec::new();
    for radius in radii {
        let hits = within_radius(center, points.iter().copied(), radius).unwrap();
        for p in &previous {
            assert!(hits.contains(p), "{} m result lost {:?}", radius, p);
        }
        previous = hits;
    }
    // Half the circumference covers the whole sphere.
    assert_eq!(previous.len(), points.len());
}
