//! Eulerian grid: domain geometry, field storage and wall boundary conditions

pub mod boundary;
pub mod cells;
pub mod domain;
pub mod field;
pub mod staggered;

// Re-export main types
pub use boundary::{BoundaryCondition, NoSlipWalls};
pub use cells::CellField;
pub use domain::{Axis, Domain, Stencil};
pub use field::FieldData;
pub use staggered::StaggeredField;
