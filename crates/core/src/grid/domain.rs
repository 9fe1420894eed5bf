//! Uniform rectangular domain and staggered-grid geometry
//!
//! The domain is split into `nx × ny` cells surrounded by one ghost layer. The two
//! velocity components live on different face layouts (MAC grid):
//!
//! ```text
//!   u(i, j) at (i·dx, (j − ½)·dy)       sized (nx+1) × (ny+2)
//!   v(i, j) at ((i − ½)·dx, j·dy)       sized (nx+2) × (ny+1)
//!   cell(i, j) at ((i − ½)·dx, (j − ½)·dy)   sized (nx+2) × (ny+2)
//! ```
//!
//! Indices address the ghost-inclusive arrays directly, so interior cells run over
//! `1..=nx × 1..=ny`. [`Domain::cell_index`] and [`Domain::weight_coeff`] share the
//! same half-cell offset per layout; spreading and interpolation both go through
//! [`Domain::locate`] so they can never disagree.

use crate::core_types::Vec2;
use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Which velocity component's staggered layout a query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// x-velocity layout (vertical faces)
    X,
    /// y-velocity layout (horizontal faces)
    Y,
}

impl Axis {
    /// Half-cell offsets `(ox, oy)` applied before flooring, in cell units
    #[inline]
    const fn offsets(self) -> (f64, f64) {
        match self {
            Axis::X => (0.0, 0.5),
            Axis::Y => (0.5, 0.0),
        }
    }
}

/// Bilinear stencil of a point: lower-left face index plus fractional weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil {
    /// Lower-left index along x
    pub i: usize,
    /// Lower-left index along y
    pub j: usize,
    /// Fractional offset along x in `[0, 1]`
    pub wx: f64,
    /// Fractional offset along y in `[0, 1]`
    pub wy: f64,
}

impl Stencil {
    /// The four corners with their bilinear weights
    ///
    /// Order: `(i, j)`, `(i+1, j)`, `(i, j+1)`, `(i+1, j+1)`.
    #[must_use]
    pub fn corners(&self) -> [(usize, usize, f64); 4] {
        let (i, j, wx, wy) = (self.i, self.j, self.wx, self.wy);
        [
            (i, j, (1.0 - wx) * (1.0 - wy)),
            (i + 1, j, wx * (1.0 - wy)),
            (i, j + 1, (1.0 - wx) * wy),
            (i + 1, j + 1, wx * wy),
        ]
    }
}

/// Physical domain and grid resolution, immutable for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain extent along x
    pub lx: f64,
    /// Domain extent along y
    pub ly: f64,
    /// Interior cells along x
    pub nx: usize,
    /// Interior cells along y
    pub ny: usize,
    /// Cell size along x
    pub dx: f64,
    /// Cell size along y
    pub dy: f64,
    /// Gravitational acceleration
    pub gravity: Vec2,
}

impl Domain {
    /// Create a validated domain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if an extent is not finite and positive or a
    /// resolution is below 2 cells.
    pub fn new(lx: f64, ly: f64, nx: usize, ny: usize, gravity: Vec2) -> SimResult<Self> {
        for (name, value) in [("lx", lx), ("ly", ly)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::invalid_config(
                    name,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        for (name, value) in [("nx", nx), ("ny", ny)] {
            if value < 2 {
                return Err(SimError::invalid_config(
                    name,
                    format!("must be at least 2, got {value}"),
                ));
            }
        }
        if !(gravity.x.is_finite() && gravity.y.is_finite()) {
            return Err(SimError::invalid_config("gravity", "must be finite"));
        }

        Ok(Self {
            lx,
            ly,
            nx,
            ny,
            dx: lx / nx as f64,
            dy: ly / ny as f64,
            gravity,
        })
    }

    /// Shape `(width, height)` of the face array for `axis`
    #[must_use]
    pub const fn face_shape(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::X => (self.nx + 1, self.ny + 2),
            Axis::Y => (self.nx + 2, self.ny + 1),
        }
    }

    /// Shape `(width, height)` of the cell-centred arrays, ghosts included
    #[must_use]
    pub const fn cell_shape(&self) -> (usize, usize) {
        (self.nx + 2, self.ny + 2)
    }

    /// Cell area `dx · dy`
    #[must_use]
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dy
    }

    /// Lower-left face index of the stencil enclosing `(x, y)` on the `axis` layout
    ///
    /// Unchecked: points outside the domain give indices outside the arrays
    /// (possibly negative). Use [`Domain::locate`] for a bounds-checked stencil.
    #[must_use]
    pub fn cell_index(&self, x: f64, y: f64, axis: Axis) -> (isize, isize) {
        let (ox, oy) = axis.offsets();
        (
            (x / self.dx + ox).floor() as isize,
            (y / self.dy + oy).floor() as isize,
        )
    }

    /// Fractional bilinear weights of `(x, y)` relative to face `(index_x, index_y)`
    ///
    /// Uses the same half-cell offsets as [`Domain::cell_index`]; for the index that
    /// function returns, both weights lie in `[0, 1)`.
    #[must_use]
    pub fn weight_coeff(
        &self,
        x: f64,
        y: f64,
        index_x: isize,
        index_y: isize,
        axis: Axis,
    ) -> (f64, f64) {
        let (ox, oy) = axis.offsets();
        (
            x / self.dx + ox - index_x as f64,
            y / self.dy + oy - index_y as f64,
        )
    }

    /// Bounds-checked stencil for spreading to or interpolating from the `axis` layout
    ///
    /// A point on the far wall is folded into the last cell with weight 1 so the
    /// stencil stays inside the face array.
    ///
    /// # Errors
    ///
    /// Returns `InterfaceLeftDomain` for non-finite points or points outside
    /// `[0, lx] × [0, ly]`.
    pub fn locate(&self, x: f64, y: f64, axis: Axis) -> SimResult<Stencil> {
        if !self.contains(x, y) {
            return Err(SimError::InterfaceLeftDomain { x, y });
        }

        let (width, height) = self.face_shape(axis);
        let (ix, iy) = self.cell_index(x, y, axis);
        let ix = ix.clamp(0, width as isize - 2);
        let iy = iy.clamp(0, height as isize - 2);
        let (wx, wy) = self.weight_coeff(x, y, ix, iy, axis);

        Ok(Stencil {
            i: ix as usize,
            j: iy as usize,
            wx,
            wy,
        })
    }

    /// Whether `(x, y)` lies inside the closed physical domain
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite() && (0.0..=self.lx).contains(&x) && (0.0..=self.ly).contains(&y)
    }

    /// Physical position of u-face `(i, j)`
    #[must_use]
    pub fn u_position(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(i as f64 * self.dx, (j as f64 - 0.5) * self.dy)
    }

    /// Physical position of v-face `(i, j)`
    #[must_use]
    pub fn v_position(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new((i as f64 - 0.5) * self.dx, j as f64 * self.dy)
    }

    /// Physical position of the centre of cell `(i, j)`
    #[must_use]
    pub fn cell_center(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new((i as f64 - 0.5) * self.dx, (j as f64 - 0.5) * self.dy)
    }
}
