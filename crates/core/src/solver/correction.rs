//! Projection of the temporary velocity onto a divergence-free field

use crate::grid::{CellField, Domain, StaggeredField};
use rayon::prelude::*;

/// Subtract the pressure gradient from the temporary velocity
///
/// ```text
/// u = u* − dt · 2·(p[i+1,j] − p[i,j]) / (dx·(ρ[i+1,j] + ρ[i,j]))
/// v = v* − dt · 2·(p[i,j+1] − p[i,j]) / (dy·(ρ[i,j+1] + ρ[i,j]))
/// ```
///
/// Only interior faces are corrected; wall-normal faces and ghosts are left as the
/// boundary conditions set them.
pub fn correct_velocity(
    domain: &Domain,
    dt: f64,
    cells: &CellField,
    velocity: &mut StaggeredField,
) {
    let (nx, ny) = (domain.nx, domain.ny);
    let (dx, dy) = (domain.dx, domain.dy);
    let (p, rho) = (&cells.pressure, &cells.density);
    let StaggeredField {
        u, v, u_temp, v_temp, ..
    } = velocity;
    let (u_temp, v_temp) = (&*u_temp, &*v_temp);

    let u_width = u.width;
    u.as_mut_slice()
        .par_chunks_mut(u_width)
        .enumerate()
        .filter(|(j, _)| (1..=ny).contains(j))
        .for_each(|(j, row)| {
            for (i, value) in row.iter_mut().enumerate().take(nx).skip(1) {
                *value = u_temp[(i, j)]
                    - dt * 2.0 * (p[(i + 1, j)] - p[(i, j)])
                        / (dx * (rho[(i + 1, j)] + rho[(i, j)]));
            }
        });

    let v_width = v.width;
    v.as_mut_slice()
        .par_chunks_mut(v_width)
        .enumerate()
        .filter(|(j, _)| (1..ny).contains(j))
        .for_each(|(j, row)| {
            for (i, value) in row.iter_mut().enumerate().take(nx + 1).skip(1) {
                *value = v_temp[(i, j)]
                    - dt * 2.0 * (p[(i, j + 1)] - p[(i, j)])
                        / (dy * (rho[(i, j + 1)] + rho[(i, j)]));
            }
        });
}

/// Largest absolute discrete divergence over the interior cells
#[must_use]
pub fn max_divergence(domain: &Domain, velocity: &StaggeredField) -> f64 {
    let (u, v) = (&velocity.u, &velocity.v);
    (1..=domain.ny)
        .into_par_iter()
        .map(|j| {
            (1..=domain.nx)
                .map(|i| {
                    ((u[(i, j)] - u[(i - 1, j)]) / domain.dx
                        + (v[(i, j)] - v[(i, j - 1)]) / domain.dy)
                        .abs()
                })
                .fold(0.0, f64::max)
        })
        .reduce(|| 0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec2;
    use crate::solver::pressure::{solve_pressure, PressureParams, PressureSystem};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_uniform_pressure_changes_nothing() {
        let domain = Domain::new(1.0, 1.0, 6, 6, Vec2::zeros()).unwrap();
        let mut cells = CellField::new(&domain, 1.5, 0.1);
        cells.pressure.fill(3.0);
        let mut velocity = StaggeredField::new(&domain);
        velocity.u_temp.fill(0.4);
        velocity.v_temp.fill(0.1);

        correct_velocity(&domain, 0.01, &cells, &mut velocity);
        assert_abs_diff_eq!(velocity.u[(3, 3)], 0.4, epsilon = 1e-14);
        assert_abs_diff_eq!(velocity.v[(3, 3)], 0.1, epsilon = 1e-14);
        // Wall faces untouched
        assert_eq!(velocity.u[(0, 3)], 0.0);
        assert_eq!(velocity.v[(3, 0)], 0.0);
    }

    #[test]
    fn test_gradient_is_subtracted() {
        let domain = Domain::new(1.0, 1.0, 4, 4, Vec2::zeros()).unwrap();
        let mut cells = CellField::new(&domain, 1.0, 0.1);
        cells.pressure[(3, 2)] = 1.0;
        let mut velocity = StaggeredField::new(&domain);
        let dt = 0.1;

        correct_velocity(&domain, dt, &cells, &mut velocity);
        // Flow away from the high-pressure cell
        let expected = dt * 2.0 * 1.0 / (domain.dx * 2.0);
        assert_abs_diff_eq!(velocity.u[(2, 2)], -expected, epsilon = 1e-12);
        assert_abs_diff_eq!(velocity.u[(3, 2)], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_removes_divergence() {
        let domain = Domain::new(1.0, 1.0, 16, 16, Vec2::zeros()).unwrap();
        let mut cells = CellField::new(&domain, 1.0, 0.1);
        for j in 5..12 {
            for i in 5..12 {
                cells.density[(i, j)] = 0.2;
            }
        }
        let mut velocity = StaggeredField::new(&domain);
        for j in 1..=16 {
            for i in 1..16 {
                let p = domain.u_position(i, j);
                velocity.u_temp[(i, j)] = (3.0 * p.y).sin() * p.x;
            }
        }
        velocity.u.copy_from(&velocity.u_temp);
        let before = max_divergence(&domain, &velocity);

        let dt = 0.01;
        let params = PressureParams {
            beta: 1.7,
            max_iterations: 50_000,
            tolerance: 1e-11,
            boundary_density: 1.0,
            ..Default::default()
        };
        let system = PressureSystem::assemble(&domain, &cells.density, &velocity, dt, 1.0);
        let report = solve_pressure(&system, &mut cells.pressure, &params);
        assert!(report.converged);
        correct_velocity(&domain, dt, &cells, &mut velocity);

        // Cells touching a wall exchange flux with the ghost layer
        let (u, v) = (&velocity.u, &velocity.v);
        let mut after: f64 = 0.0;
        for j in 2..16 {
            for i in 2..16 {
                let div = (u[(i, j)] - u[(i - 1, j)]) / domain.dx
                    + (v[(i, j)] - v[(i, j - 1)]) / domain.dy;
                after = after.max(div.abs());
            }
        }
        assert!(after < 1e-6 * before, "before {before}, after {after}");
    }
}
