// Matrix assembly and mode interpretation
// Degrees of freedom are ordered [x0, y0, x1, y1, ...] by position in the mass slice
use crate::prelude::*;

pub mod stiffness;
pub mod mass;
pub mod dynamics;
pub mod interpret;
pub mod animate;
pub mod diagonalize;

/// Sets entries with magnitude below `tolerance` to exactly 0
pub fn clean_small_entries(matrix: &mut DMat, tolerance: Float) {
	for v in matrix.iter_mut() {
		if v.abs() < tolerance {
			*v = 0.0;
		}
	}
}
