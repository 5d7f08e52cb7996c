//! Property checks for the geometry utilities
//!
//! These tests exercise sampling and great-circle round trips over many random
//! inputs rather than a handful of hand-picked points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use venue_position_faker::geo::*;

/// A concave "U" shaped hall: two wings joined along the south side
fn u_shaped_hall() -> Polygon {
    Polygon::new(vec![
        [-79.3880, 43.6420],
        [-79.3850, 43.6420],
        [-79.3850, 43.6440],
        [-79.3858, 43.6440],
        [-79.3858, 43.6426],
        [-79.3872, 43.6426],
        [-79.3872, 43.6440],
        [-79.3880, 43.6440],
        [-79.3880, 43.6420],
    ])
    .unwrap()
}

#[test]
fn test_uniform_samples_always_inside_concave_polygon() {
    let hall = u_shaped_hall();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..10_000 {
        let point = hall.sample_uniform(&mut rng).unwrap();
        assert!(hall.contains(&point), "sample {} escaped the hall", point);
    }
}

#[test]
fn test_uniform_samples_never_land_in_the_notch() {
    let hall = u_shaped_hall();
    let mut rng = StdRng::seed_from_u64(99);

    // the courtyard between the wings
    let in_notch = |p: &Point| p.lon > -79.3872 && p.lon < -79.3858 && p.lat > 43.6426;
    let hits = (0..10_000).map(|_| hall.sample_uniform(&mut rng).unwrap()).filter(in_notch).count();
    assert_eq!(hits, 0);
}

#[test]
fn test_uniform_samples_spread_over_both_wings() {
    let hall = u_shaped_hall();
    let mut rng = StdRng::seed_from_u64(5);

    let (mut west, mut east) = (0, 0);
    for _ in 0..10_000 {
        let p = hall.sample_uniform(&mut rng).unwrap();
        if p.lat > 43.6426 {
            if p.lon < -79.3872 {
                west += 1;
            } else if p.lon > -79.3858 {
                east += 1;
            }
        }
    }

    // the wings have the same area, so the split should be roughly even
    assert!(west > 1_000 && east > 1_000);
    let ratio = west as f64 / east as f64;
    assert!((0.8..1.25).contains(&ratio), "west/east ratio {}", ratio);
}

#[test]
fn test_translate_by_distance_and_bearing_reaches_target() {
    let hall = u_shaped_hall();
    let mut rng = StdRng::seed_from_u64(77);

    for _ in 0..1_000 {
        let a = hall.sample_uniform(&mut rng).unwrap();
        let b = hall.sample_uniform(&mut rng).unwrap();

        let reached = translate(&a, distance_meters(&a, &b), bearing_degrees(&a, &b));
        assert!(points_equal(&reached, &b), "{} -> {} landed at {}", a, b, reached);
        assert!(distance_meters(&reached, &b) < 1e-3);
    }
}

#[test]
fn test_bearing_range_and_symmetry_of_distance() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..1_000 {
        let a = Point::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0));
        let b = Point::new(rng.gen_range(-180.0..180.0), rng.gen_range(-80.0..80.0));

        let bearing = bearing_degrees(&a, &b);
        assert!((-180.0..=180.0).contains(&bearing));

        let there = distance_meters(&a, &b);
        let back = distance_meters(&b, &a);
        assert!((there - back).abs() < 1e-6);
        assert!(there <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1e-6);
    }
}
