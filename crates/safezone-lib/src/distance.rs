//! Great-circle distance on a spherical Earth.
//!
//! Distances are in meters on a sphere of radius [`EARTH_RADIUS_METERS`]. The
//! spherical model is accurate to roughly 0.5%, which is enough for proximity
//! filtering and display but not for surveying.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::geo::{GeoPoint, Located, EARTH_RADIUS_METERS};

/// Haversine distance between two points, in meters.
///
/// No range validation is performed; out-of-range inputs produce a finite but
/// meaningless value. Use [`distance_between`] when inputs come from users.
pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Validated Haversine distance in meters.
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> Result<f64> {
    a.validate()?;
    b.validate()?;
    Ok(haversine(a, b))
}

/// Total length of a path in meters (sum of consecutive legs).
pub fn path_length(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|leg| haversine(leg[0], leg[1])).sum()
}

/// Keep the items whose location lies within `radius_m` meters of `center`.
///
/// The boundary is inclusive, so a larger radius always returns a superset of
/// a smaller one. Input order is preserved.
pub fn within_radius<T, I>(center: GeoPoint, items: I, radius_m: f64) -> Result<Vec<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    check_radius(radius_m)?;
    Ok(items
        .into_iter()
        .filter(|item| haversine(center, item.location()) <= radius_m)
        .collect())
}

/// Sort items nearest-first relative to `center`. Ties keep their input order.
pub fn sort_by_distance<T: Located>(center: GeoPoint, items: &mut [T]) {
    items.sort_by(|a, b| {
        let da = haversine(center, a.location());
        let db = haversine(center, b.location());
        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
    });
}

/// Reject negative or non-finite radii.
pub fn check_radius(radius_m: f64) -> Result<()> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRadius { radius: radius_m })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAN_FRANCISCO: GeoPoint = GeoPoint::new(37.7749, -122.4194);
    const LOS_ANGELES: GeoPoint = GeoPoint::new(34.0522, -118.2437);

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine(SAN_FRANCISCO, SAN_FRANCISCO), 0.0);
    }

    #[test]
    fn san_francisco_to_los_angeles() {
        let d = haversine(SAN_FRANCISCO, LOS_ANGELES);
        assert!((d - 559_000.0).abs() <= 2_000.0, "got {} m", d);
    }

    #[test]
    fn symmetric() {
        assert_eq!(
            haversine(SAN_FRANCISCO, LOS_ANGELES),
            haversine(LOS_ANGELES, SAN_FRANCISCO)
        );
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * R / 360
        let d = haversine(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 0.1, "got {} m", d);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = haversine(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half).abs() < 1e-6 * half);
    }

    #[test]
    fn distance_between_validates() {
        assert!(distance_between(SAN_FRANCISCO, LOS_ANGELES).is_ok());
        assert!(matches!(
            distance_between(GeoPoint::new(91.0, 0.0), LOS_ANGELES),
            Err(Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn path_length_sums_legs() {
        let path = [SAN_FRANCISCO, LOS_ANGELES, SAN_FRANCISCO];
        let expected = 2.0 * haversine(SAN_FRANCISCO, LOS_ANGELES);
        assert!((path_length(&path) - expected).abs() < 1e-6);
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[SAN_FRANCISCO]), 0.0);
    }

    #[test]
    fn within_radius_is_inclusive_and_ordered() {
        let points = vec![LOS_ANGELES, SAN_FRANCISCO];
        let hits = within_radius(SAN_FRANCISCO, points.clone(), 0.0).unwrap();
        assert_eq!(hits, vec![SAN_FRANCISCO]);

        let hits = within_radius(SAN_FRANCISCO, points, 600_000.0).unwrap();
        assert_eq!(hits, vec![LOS_ANGELES, SAN_FRANCISCO]);
    }

    #[test]
    fn within_radius_rejects_bad_radius() {
        let points = vec![LOS_ANGELES];
        assert!(matches!(
            within_radius(SAN_FRANCISCO, points.clone(), -1.0),
            Err(Error::InvalidRadius { .. })
        ));
        assert!(within_radius(SAN_FRANCISCO, points, f64::NAN).is_err());
    }

    #[test]
    fn sort_nearest_first() {
        let sacramento = GeoPoint::new(38.5816, -121.4944);
        let mut points = vec![LOS_ANGELES, sacramento, SAN_FRANCISCO];
        sort_by_distance(SAN_FRANCISCO, &mut points);
        assert_eq!(points, vec![SAN_FRANCISCO, sacramento, LOS_ANGELES]);
    }
}
