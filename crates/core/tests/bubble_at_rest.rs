//! A centred circular bubble in a quiescent box without gravity must stay put:
//! surface tension only builds the Laplace pressure jump.

mod common;

use bubble_sim_core::{BubbleConfig, Simulation, SimulationConfig, Vec2};

fn resting_bubble() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.domain.nx = 16;
    config.domain.ny = 16;
    config.domain.gravity_y = 0.0;
    config.pressure.max_iterations = 20_000;
    config.pressure.tolerance = 1e-10;
    config.bubbles = vec![BubbleConfig {
        center_x: 0.5,
        center_y: 0.5,
        radius: 0.25,
        points: 64,
    }];
    config
}

#[test]
fn test_centroid_stays_fixed() {
    let mut sim = Simulation::new(resting_bubble()).unwrap();
    let before = sim.fronts()[0].centroid();
    sim.step().unwrap();
    let after = sim.fronts()[0].centroid();

    let displacement = (after - before).norm();
    assert!(displacement < 1e-6, "centroid moved by {displacement:e}");
    assert!((after - Vec2::new(0.5, 0.5)).norm() < 1e-6);
}

#[test]
fn test_pressure_is_symmetric_with_laplace_jump() {
    let mut sim = Simulation::new(resting_bubble()).unwrap();
    sim.step().unwrap();

    let p = &sim.cells().pressure;
    let (nx, ny) = (sim.domain().nx, sim.domain().ny);
    let scale = p.max_abs();
    assert!(scale > 0.0);

    for j in 1..=ny {
        for i in 1..=nx {
            let mirror_x = p[(nx + 1 - i, j)];
            let mirror_y = p[(i, ny + 1 - j)];
            assert!(
                (p[(i, j)] - mirror_x).abs() <= 1e-3 * scale,
                "x-asymmetry at ({i}, {j}): {} vs {mirror_x}",
                p[(i, j)]
            );
            assert!(
                (p[(i, j)] - mirror_y).abs() <= 1e-3 * scale,
                "y-asymmetry at ({i}, {j}): {} vs {mirror_y}",
                p[(i, j)]
            );
        }
    }

    // Cells (8, 8) and (9, 9) straddle the centre; (1, 1) is in the liquid corner
    let inside = p[(8, 8)];
    let outside = p[(1, 1)];
    assert!(
        inside > outside,
        "expected a Laplace jump, inside {inside}, outside {outside}"
    );
}

#[test]
fn test_front_keeps_its_area() {
    let mut sim = Simulation::new(resting_bubble()).unwrap();
    let area_before = sim.fronts()[0].area();
    for _ in 0..3 {
        sim.step().unwrap();
    }
    let area_after = sim.fronts()[0].area();
    assert!(
        ((area_after - area_before) / area_before).abs() < 1e-3,
        "area {area_before} -> {area_after}"
    );
    assert_eq!(sim.fronts()[0].len(), 64);
}
