//! Dense 2D field storage
//!
//! All Eulerian quantities (face velocities, pressure, density, viscosity, forces)
//! are stored as [`FieldData`]: a flat `Vec<f64>` in row-major order where a row
//! runs along x. Rows are contiguous so sweeps can be split across threads with
//! `par_chunks_mut(width)`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Field data container
///
/// Stores 2D field data as a flat `Vec<f64>` in row-major order.
/// `(i, j)` addresses column `i` (x direction) of row `j` (y direction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    /// Field values in row-major order (j * width + i)
    pub data: Vec<f64>,
    /// Number of entries along x
    pub width: usize,
    /// Number of entries along y
    pub height: usize,
}

impl FieldData {
    /// Create a new field with given dimensions, initialized to zero
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, 0.0)
    }

    /// Create a new field with given dimensions, initialized to a value
    ///
    /// # Arguments
    ///
    /// * `width` - Entries along x
    /// * `height` - Entries along y
    /// * `value` - Initial value for all entries
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Create a field by evaluating `f(i, j)` at every entry
    #[must_use]
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let data = (0..width * height)
            .map(|idx| f(idx % width, idx / width))
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Flat index of `(i, j)`
    #[inline]
    #[must_use]
    pub fn index_of(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.width && j < self.height,
            "Coordinates out of bounds"
        );
        self.data[j * self.width + i]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.width && j < self.height,
            "Coordinates out of bounds"
        );
        self.data[j * self.width + i] = value;
    }

    /// Add to the value at grid position
    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self[(i, j)] += value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrite this field with the contents of `other`
    ///
    /// # Panics
    ///
    /// Panics if the two fields have different shapes
    pub fn copy_from(&mut self, other: &FieldData) {
        assert!(
            self.width == other.width && self.height == other.height,
            "Field shape mismatch"
        );
        self.data.copy_from_slice(&other.data);
    }

    /// Largest absolute entry
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Largest absolute entry-wise difference to `other`
    #[must_use]
    pub fn max_abs_diff(&self, other: &FieldData) -> f64 {
        self.data
            .iter()
            .zip(&other.data)
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()))
    }

    /// Sum of all entries
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Row `j` as a slice
    #[must_use]
    pub fn row(&self, j: usize) -> &[f64] {
        &self.data[j * self.width..(j + 1) * self.width]
    }
}

impl Index<(usize, usize)> for FieldData {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(i < self.width && j < self.height);
        &self.data[j * self.width + i]
    }
}

impl IndexMut<(usize, usize)> for FieldData {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(i < self.width && j < self.height);
        &mut self.data[j * self.width + i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = FieldData::new(10, 20);
        assert_eq!(field.width, 10);
        assert_eq!(field.height, 20);
        assert_eq!(field.data.len(), 200);
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set() {
        let mut field = FieldData::new(10, 10);
        field.set(3, 4, 123.45);
        assert_eq!(field.get(3, 4), 123.45);
        assert_eq!(field[(3, 4)], 123.45);

        // Verify row-major indexing
        let index = 4 * 10 + 3;
        assert_eq!(field.data[index], 123.45);
        assert_eq!(field.index_of(3, 4), index);
    }

    #[test]
    fn test_from_fn_and_rows() {
        let field = FieldData::from_fn(3, 2, |i, j| (10 * j + i) as f64);
        assert_eq!(field.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(field.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(field.sum(), 36.0);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut a = FieldData::with_value(4, 4, 1.0);
        let mut b = FieldData::new(4, 4);
        b.copy_from(&a);
        a.fill(7.0);
        assert!(b.data.iter().all(|&v| v == 1.0));
        assert_eq!(a.max_abs_diff(&b), 6.0);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field = FieldData::new(10, 10);
        let _ = field.get(10, 5);
    }

    #[test]
    #[should_panic(expected = "Field shape mismatch")]
    fn test_copy_shape_mismatch() {
        let mut a = FieldData::new(3, 3);
        a.copy_from(&FieldData::new(4, 3));
    }
}
