//! Predictor step of the projection method
//!
//! Advances the face velocities by advection, viscous diffusion, the spread
//! surface tension force and buoyancy, ignoring pressure. The result lands in
//! `u_temp`/`v_temp`; the pressure solve then makes it divergence-free.
//!
//! Buoyancy is written relative to a reference density: the body force per unit
//! mass on a face is `(1 − ρ_ref/ρ_face)·g`, which removes the hydrostatic
//! pressure of the reference fluid from the pressure unknown. `g` is the physical
//! gravity vector, so `(0, −100)` points down and lighter fluid rises.

use crate::config::FluidProperties;
use crate::grid::{CellField, Domain, FieldData, StaggeredField};
use rayon::prelude::*;

/// Compute `u_temp` and `v_temp` from the current velocities and cell properties
///
/// Interior faces are `i ∈ 1..nx, j ∈ 1..=ny` for u and `i ∈ 1..=nx, j ∈ 1..ny`
/// for v. Every other entry of the temporary arrays is a copy of the current
/// velocity, so walls and ghosts pass through the solve unchanged.
///
/// # Arguments
///
/// * `domain` - Grid geometry and gravity
/// * `fluid` - Reference density for buoyancy
/// * `dt` - Time step
/// * `cells` - Density, viscosity and spread forces
/// * `velocity` - Current velocities in, temporary velocities out
pub fn compute_temporary_velocity(
    domain: &Domain,
    fluid: &FluidProperties,
    dt: f64,
    cells: &CellField,
    velocity: &mut StaggeredField,
) {
    let StaggeredField {
        u, v, u_temp, v_temp, ..
    } = velocity;
    let stencil = MomentumStencil {
        nx: domain.nx,
        ny: domain.ny,
        dx: domain.dx,
        dy: domain.dy,
        gravity_x: domain.gravity.x,
        gravity_y: domain.gravity.y,
        reference_density: fluid.reference_density,
        dt,
        u: &*u,
        v: &*v,
        rho: &cells.density,
        mu: &cells.viscosity,
    };

    let u_width = u_temp.width;
    u_temp
        .as_mut_slice()
        .par_chunks_mut(u_width)
        .enumerate()
        .for_each(|(j, row)| {
            row.copy_from_slice(stencil.u.row(j));
            if (1..=stencil.ny).contains(&j) {
                for (i, value) in row.iter_mut().enumerate().take(stencil.nx).skip(1) {
                    *value = stencil.u_predict(i, j, cells.force_x[(i, j)]);
                }
            }
        });

    let v_width = v_temp.width;
    v_temp
        .as_mut_slice()
        .par_chunks_mut(v_width)
        .enumerate()
        .for_each(|(j, row)| {
            row.copy_from_slice(stencil.v.row(j));
            if (1..stencil.ny).contains(&j) {
                for (i, value) in row.iter_mut().enumerate().take(stencil.nx + 1).skip(1) {
                    *value = stencil.v_predict(i, j, cells.force_y[(i, j)]);
                }
            }
        });
}

struct MomentumStencil<'a> {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    gravity_x: f64,
    gravity_y: f64,
    reference_density: f64,
    dt: f64,
    u: &'a FieldData,
    v: &'a FieldData,
    rho: &'a FieldData,
    mu: &'a FieldData,
}

impl MomentumStencil<'_> {
    fn u_predict(&self, i: usize, j: usize, force: f64) -> f64 {
        let (u, v, rho, mu) = (self.u, self.v, self.rho, self.mu);
        let (dx, dy) = (self.dx, self.dy);
        let rho_face = 0.5 * (rho[(i + 1, j)] + rho[(i, j)]);

        let advection = -0.25
            * (((u[(i + 1, j)] + u[(i, j)]).powi(2) - (u[(i, j)] + u[(i - 1, j)]).powi(2)) / dx
                + ((u[(i, j + 1)] + u[(i, j)]) * (v[(i + 1, j)] + v[(i, j)])
                    - (u[(i, j)] + u[(i, j - 1)]) * (v[(i + 1, j - 1)] + v[(i, j - 1)]))
                    / dy);
        let body = force / rho_face + (1.0 - self.reference_density / rho_face) * self.gravity_x;

        let mu_north = 0.25 * (mu[(i, j)] + mu[(i + 1, j)] + mu[(i + 1, j + 1)] + mu[(i, j + 1)]);
        let mu_south = 0.25 * (mu[(i, j)] + mu[(i + 1, j)] + mu[(i + 1, j - 1)] + mu[(i, j - 1)]);
        let diffusion = ((2.0 / dx)
            * (mu[(i + 1, j)] * (u[(i + 1, j)] - u[(i, j)]) / dx
                - mu[(i, j)] * (u[(i, j)] - u[(i - 1, j)]) / dx)
            + (1.0 / dy)
                * (mu_north
                    * ((u[(i, j + 1)] - u[(i, j)]) / dy + (v[(i + 1, j)] - v[(i, j)]) / dx)
                    - mu_south
                        * ((u[(i, j)] - u[(i, j - 1)]) / dy
                            + (v[(i + 1, j - 1)] - v[(i, j - 1)]) / dx)))
            / rho_face;

        u[(i, j)] + self.dt * (advection + body + diffusion)
    }

    fn v_predict(&self, i: usize, j: usize, force: f64) -> f64 {
        let (u, v, rho, mu) = (self.u, self.v, self.rho, self.mu);
        let (dx, dy) = (self.dx, self.dy);
        let rho_face = 0.5 * (rho[(i, j + 1)] + rho[(i, j)]);

        let advection = -0.25
            * (((u[(i, j + 1)] + u[(i, j)]) * (v[(i + 1, j)] + v[(i, j)])
                - (u[(i - 1, j + 1)] + u[(i - 1, j)]) * (v[(i, j)] + v[(i - 1, j)]))
                / dx
                + ((v[(i, j + 1)] + v[(i, j)]).powi(2) - (v[(i, j)] + v[(i, j - 1)]).powi(2))
                    / dy);
        let body = force / rho_face + (1.0 - self.reference_density / rho_face) * self.gravity_y;

        let mu_east = 0.25 * (mu[(i, j)] + mu[(i + 1, j)] + mu[(i + 1, j + 1)] + mu[(i, j + 1)]);
        let mu_west = 0.25 * (mu[(i, j)] + mu[(i, j + 1)] + mu[(i - 1, j + 1)] + mu[(i - 1, j)]);
        let diffusion = ((1.0 / dx)
            * (mu_east * ((u[(i, j + 1)] - u[(i, j)]) / dy + (v[(i + 1, j)] - v[(i, j)]) / dx)
                - mu_west
                    * ((u[(i - 1, j + 1)] - u[(i - 1, j)]) / dy
                        + (v[(i, j)] - v[(i - 1, j)]) / dx))
            + (2.0 / dy)
                * (mu[(i, j + 1)] * (v[(i, j + 1)] - v[(i, j)]) / dy
                    - mu[(i, j)] * (v[(i, j)] - v[(i, j - 1)]) / dy))
            / rho_face;

        v[(i, j)] + self.dt * (advection + body + diffusion)
    }
}
