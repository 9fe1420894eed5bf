//! Lagrangian ↔ Eulerian transfer on the staggered grid
//!
//! Spreading deposits a point value onto the four faces surrounding the point with
//! bilinear weights; interpolation is the matching gather. Both resolve the stencil
//! through [`Domain::locate`], so a value spread and then interpolated at the same
//! point uses exactly the same four faces and weights.
//!
//! Spreading conserves the deposited total (weights sum to one), but the spatial
//! distribution is only as accurate as bilinear interpolation: there is no exact
//! momentum conservation between the two meshes.

use crate::error::SimResult;
use crate::grid::{Axis, Domain, FieldData};

/// Spread `value` at `(x, y)` onto `field`, accumulating into the four surrounding faces
///
/// The contribution is divided by the cell area so the field holds a force density.
///
/// # Errors
///
/// Returns `InterfaceLeftDomain` if the point is outside the physical domain.
pub fn spread_to_grid(
    domain: &Domain,
    field: &mut FieldData,
    x: f64,
    y: f64,
    value: f64,
    axis: Axis,
) -> SimResult<()> {
    let stencil = domain.locate(x, y, axis)?;
    let density = value / domain.cell_area();
    for (i, j, weight) in stencil.corners() {
        field.add(i, j, weight * density);
    }
    Ok(())
}

/// Interpolate a face velocity component to the point `(x, y)`
///
/// `axis` selects the staggered layout `face_velocity` is stored on.
///
/// # Errors
///
/// Returns `InterfaceLeftDomain` if the point is outside the physical domain.
pub fn interpolate_velocity(
    domain: &Domain,
    face_velocity: &FieldData,
    x: f64,
    y: f64,
    axis: Axis,
) -> SimResult<f64> {
    let stencil = domain.locate(x, y, axis)?;
    Ok(stencil
        .corners()
        .iter()
        .map(|&(i, j, weight)| weight * face_velocity[(i, j)])
        .sum())
}
