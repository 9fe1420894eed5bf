//! The default configuration: a light bubble in a heavier liquid under gravity.

mod common;

use bubble_sim_core::{Simulation, SimulationConfig, Snapshot};

#[test]
fn test_light_bubble_rises() {
    let mut config = SimulationConfig::default();
    config.time.output_interval = 5;
    let mut sim = Simulation::new(config).unwrap();

    let start = sim.fronts()[0].centroid();
    let area_start = sim.fronts()[0].area();

    let mut snapshots: Vec<Snapshot> = Vec::new();
    let summary = sim
        .run(20, |sim, _| {
            snapshots.push(sim.snapshot(false));
            Ok(())
        })
        .unwrap();
    assert_eq!(summary.steps, 20);
    assert_eq!(snapshots.len(), 4);

    let end = sim.fronts()[0].centroid();
    let rise = end.y - start.y;
    assert!(rise > 1e-3, "bubble rose by {rise}");
    assert!((end.x - start.x).abs() < 5e-3, "lateral drift {}", end.x - start.x);

    // Centroid height increases monotonically between snapshots
    for pair in snapshots.windows(2) {
        assert!(pair[1].fronts[0].centroid.y > pair[0].fronts[0].centroid.y);
    }

    let area_end = sim.fronts()[0].area();
    assert!(
        ((area_end - area_start) / area_start).abs() < 0.05,
        "area {area_start} -> {area_end}"
    );
}

#[test]
fn test_velocity_stays_bounded() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    for _ in 0..10 {
        let report = sim.step().unwrap();
        assert!(report.max_speed.is_finite());
        assert!(report.max_speed < 10.0, "max speed {}", report.max_speed);
    }
}
