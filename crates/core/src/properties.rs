//! Density and viscosity from the front geometry
//!
//! Each step the cell-centred material properties are rebuilt from where the
//! fronts are. [`SmoothedIndicator`] computes the signed distance from every cell
//! centre to the nearest front (positive inside), maps it through a smoothstep over
//! a band a few cells wide, and blends the two fluids with the resulting
//! indicator `I ∈ [0, 1]`:
//!
//! ```text
//! ρ = ρ_liquid + (ρ_gas − ρ_liquid)·I
//! μ = μ_liquid + (μ_gas − μ_liquid)·I
//! ```

use crate::config::FluidProperties;
use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use crate::front::Front;
use crate::grid::{CellField, Domain};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Rebuilds cell density and viscosity from the current fronts
pub trait PropertyModel: Send + Sync {
    /// Overwrite `cells.density` and `cells.viscosity`, ghost layer included
    fn update(
        &self,
        domain: &Domain,
        fluid: &FluidProperties,
        fronts: &[Front],
        cells: &mut CellField,
    );
}

/// Indicator smoothing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyParams {
    /// Half-width of the transition band in cells; 0 gives a sharp jump
    pub band_cells: f64,
}

impl Default for PropertyParams {
    fn default() -> Self {
        Self { band_cells: 1.0 }
    }
}

impl PropertyParams {
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a negative or non-finite band width.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.band_cells.is_finite() && self.band_cells >= 0.0) {
            return Err(SimError::invalid_config(
                "band_cells",
                format!("must be finite and non-negative, got {}", self.band_cells),
            ));
        }
        Ok(())
    }
}

/// Smoothstep of the signed distance to the nearest front
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothedIndicator {
    /// Width of the smoothing band
    pub params: PropertyParams,
}

impl SmoothedIndicator {
    /// Indicator with the given band width
    #[must_use]
    pub fn new(params: PropertyParams) -> Self {
        Self { params }
    }

    /// Indicator value at `point`: 1 inside a front, 0 outside, smooth across the band
    #[must_use]
    pub fn indicator(&self, fronts: &[Front], point: Vec2, half_width: f64) -> f64 {
        fronts
            .iter()
            .map(|front| {
                if front.is_far_outside(point, half_width) {
                    0.0
                } else {
                    smoothstep(half_width, front.signed_distance(point))
                }
            })
            .fold(0.0, f64::max)
    }
}

impl PropertyModel for SmoothedIndicator {
    fn update(
        &self,
        domain: &Domain,
        fluid: &FluidProperties,
        fronts: &[Front],
        cells: &mut CellField,
    ) {
        let half_width = self.params.band_cells * domain.dx.max(domain.dy);
        let width = cells.density.width;
        let CellField {
            density, viscosity, ..
        } = cells;

        density
            .as_mut_slice()
            .par_chunks_mut(width)
            .zip(viscosity.as_mut_slice().par_chunks_mut(width))
            .enumerate()
            .for_each(|(j, (rho_row, mu_row))| {
                for (i, (rho, mu)) in rho_row.iter_mut().zip(mu_row.iter_mut()).enumerate() {
                    let indicator = self.indicator(fronts, domain.cell_center(i, j), half_width);
                    *rho = fluid.liquid_density
                        + (fluid.gas_density - fluid.liquid_density) * indicator;
                    *mu = fluid.liquid_viscosity
                        + (fluid.gas_viscosity - fluid.liquid_viscosity) * indicator;
                }
            });
    }
}

/// `0` for `d ≤ −h`, `1` for `d ≥ h`, cubic Hermite in between
fn smoothstep(half_width: f64, distance: f64) -> f64 {
    if half_width <= 0.0 {
        return if distance > 0.0 { 1.0 } else { 0.0 };
    }
    let t = ((distance + half_width) / (2.0 * half_width)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

impl Front {
    /// Even-odd crossing test
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let mut inside = false;
        for i in 0..self.len() {
            let (a, b) = self.segment(i);
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance from `point` to the polyline, positive inside the front
    #[must_use]
    pub fn signed_distance(&self, point: Vec2) -> f64 {
        let distance = (0..self.len())
            .map(|i| {
                let (a, b) = self.segment(i);
                let ab = b - a;
                let length_sq = ab.norm_squared();
                let t = if length_sq > 0.0 {
                    ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (point - (a + t * ab)).norm()
            })
            .fold(f64::INFINITY, f64::min);

        if self.contains_point(point) {
            distance
        } else {
            -distance
        }
    }

    /// Whether `point` lies outside the bounding box grown by `margin`
    fn is_far_outside(&self, point: Vec2, margin: f64) -> bool {
        let (mut min, mut max) = (self.marker(0), self.marker(0));
        for m in self.markers() {
            min = min.inf(m);
            max = max.sup(m);
        }
        !((min.x - margin..=max.x + margin).contains(&point.x)
            && (min.y - margin..=max.y + margin).contains(&point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square() -> Front {
        Front::from_markers(vec![
            Vec2::new(0.25, 0.25),
            Vec2::new(0.75, 0.25),
            Vec2::new(0.75, 0.75),
            Vec2::new(0.25, 0.75),
        ])
        .unwrap()
    }

    #[test]
    fn test_signed_distance_of_square() {
        let front = square();
        assert_abs_diff_eq!(front.signed_distance(Vec2::new(0.5, 0.5)), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(front.signed_distance(Vec2::new(0.5, 0.3)), 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(front.signed_distance(Vec2::new(0.9, 0.5)), -0.15, epsilon = 1e-12);
        // Nearest feature is a corner
        assert_abs_diff_eq!(
            front.signed_distance(Vec2::new(0.85, 0.85)),
            -(0.02_f64).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_smoothstep_band() {
        assert_eq!(smoothstep(0.1, -0.2), 0.0);
        assert_eq!(smoothstep(0.1, 0.2), 1.0);
        assert_abs_diff_eq!(smoothstep(0.1, 0.0), 0.5, epsilon = 1e-12);
        assert_eq!(smoothstep(0.0, 1e-9), 1.0);
        assert_eq!(smoothstep(0.0, -1e-9), 0.0);
    }

    #[test]
    fn test_bubble_properties() {
        let domain = Domain::new(1.0, 1.0, 32, 32, Vec2::zeros()).unwrap();
        let fluid = FluidProperties::default();
        let mut cells = CellField::new(&domain, 0.0, 0.0);
        let fronts = vec![Front::circle(Vec2::new(0.5, 0.5), 0.2, 100).unwrap()];
        SmoothedIndicator::default().update(&domain, &fluid, &fronts, &mut cells);

        // Centre cell (16, 16) sits at (15.5/32, 15.5/32)
        assert_abs_diff_eq!(cells.density[(16, 16)], fluid.gas_density, epsilon = 1e-12);
        assert_abs_diff_eq!(cells.viscosity[(16, 16)], fluid.gas_viscosity, epsilon = 1e-12);
        // Corners and ghosts are liquid
        assert_abs_diff_eq!(cells.density[(0, 0)], fluid.liquid_density, epsilon = 1e-12);
        assert_abs_diff_eq!(cells.density[(33, 20)], fluid.liquid_density, epsilon = 1e-12);

        // Gas volume ≈ bubble area
        let gas: f64 = cells
            .density
            .as_slice()
            .iter()
            .map(|rho| (fluid.liquid_density - rho) / (fluid.liquid_density - fluid.gas_density))
            .sum::<f64>()
            * domain.cell_area();
        assert_abs_diff_eq!(gas, fronts[0].area(), epsilon = 5e-3);
    }

    #[test]
    fn test_overlapping_fronts_take_max() {
        let indicator = SmoothedIndicator::default();
        let fronts = vec![
            Front::circle(Vec2::new(0.3, 0.5), 0.1, 40).unwrap(),
            Front::circle(Vec2::new(0.7, 0.5), 0.1, 40).unwrap(),
        ];
        assert_eq!(indicator.indicator(&fronts, Vec2::new(0.3, 0.5), 0.03), 1.0);
        assert_eq!(indicator.indicator(&fronts, Vec2::new(0.7, 0.5), 0.03), 1.0);
        assert_eq!(indicator.indicator(&fronts, Vec2::new(0.5, 0.5), 0.03), 0.0);
        assert_eq!(indicator.indicator(&[], Vec2::new(0.5, 0.5), 0.03), 0.0);
    }

    #[test]
    fn test_params_validation() {
        assert!(PropertyParams::default().validate().is_ok());
        assert!(PropertyParams { band_cells: -1.0 }.validate().is_err());
    }
}
