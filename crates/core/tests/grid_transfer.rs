mod common;

use approx::assert_abs_diff_eq;
use bubble_sim_core::front::{interpolate_velocity, spread_to_grid};
use bubble_sim_core::{Axis, Domain, FieldData, StaggeredField, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn domain() -> Domain {
    Domain::new(2.0, 1.0, 20, 12, Vec2::zeros()).unwrap()
}

#[test]
fn test_index_and_weights_reconstruct_position() {
    let domain = domain();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2_000 {
        let x = rng.random_range(0.0..domain.lx);
        let y = rng.random_range(0.0..domain.ly);
        for (axis, (ox, oy)) in [(Axis::X, (0.0, 0.5)), (Axis::Y, (0.5, 0.0))] {
            let (ix, iy) = domain.cell_index(x, y, axis);
            let (wx, wy) = domain.weight_coeff(x, y, ix, iy, axis);

            assert!((0.0..1.0).contains(&wx), "wx={wx} at ({x}, {y})");
            assert!((0.0..1.0).contains(&wy), "wy={wy} at ({x}, {y})");
            assert_abs_diff_eq!((ix as f64 + wx - ox) * domain.dx, x, epsilon = 1e-12);
            assert_abs_diff_eq!((iy as f64 + wy - oy) * domain.dy, y, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_spread_conserves_total_at_random_points() {
    let domain = domain();
    let mut rng = StdRng::seed_from_u64(11);
    let (w, h) = domain.cell_shape();
    let mut fx = FieldData::new(w, h);
    let mut fy = FieldData::new(w, h);

    let mut total = Vec2::zeros();
    for _ in 0..500 {
        let x = rng.random_range(0.0..=domain.lx);
        let y = rng.random_range(0.0..=domain.ly);
        let f = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        spread_to_grid(&domain, &mut fx, x, y, f.x, Axis::X).unwrap();
        spread_to_grid(&domain, &mut fy, x, y, f.y, Axis::Y).unwrap();
        total += f;
    }

    assert_abs_diff_eq!(fx.sum() * domain.cell_area(), total.x, epsilon = 1e-9);
    assert_abs_diff_eq!(fy.sum() * domain.cell_area(), total.y, epsilon = 1e-9);
}

#[test]
fn test_bilinear_fields_are_interpolated_exactly() {
    let domain = domain();
    let mut velocity = StaggeredField::new(&domain);
    let u_exact = |p: Vec2| 0.3 + 1.5 * p.x - 2.0 * p.y + 0.7 * p.x * p.y;
    let v_exact = |p: Vec2| -1.0 + 0.25 * p.x + 3.0 * p.y - 1.1 * p.x * p.y;
    velocity.u = FieldData::from_fn(velocity.u.width, velocity.u.height, |i, j| {
        u_exact(domain.u_position(i, j))
    });
    velocity.v = FieldData::from_fn(velocity.v.width, velocity.v.height, |i, j| {
        v_exact(domain.v_position(i, j))
    });

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1_000 {
        let p = Vec2::new(
            rng.random_range(0.0..=domain.lx),
            rng.random_range(0.0..=domain.ly),
        );
        let u = interpolate_velocity(&domain, &velocity.u, p.x, p.y, Axis::X).unwrap();
        let v = interpolate_velocity(&domain, &velocity.v, p.x, p.y, Axis::Y).unwrap();
        assert_abs_diff_eq!(u, u_exact(p), epsilon = 1e-10);
        assert_abs_diff_eq!(v, v_exact(p), epsilon = 1e-10);
    }
}
