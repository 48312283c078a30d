// Tolerances and tunables shared by the modal pipeline
use serde::{Serialize, Deserialize};
use crate::prelude::*;

/// Eigenvalues with a magnitude at or below this are rigid-body modes.
/// Translations and rotations of a free network come out of the solver as round-off around zero, well under this.
pub const EIGENVALUE_TOLERANCE: Float = 1e-6;
/// Matrix entries with a magnitude below this are set to exactly zero after assembly.
/// Normalizing the spring directions leaves residue of this order in entries that should cancel.
pub const MATRIX_CLEAN_TOLERANCE: Float = 1e-10;
/// World units of displacement per unit of user amplitude, mode vectors are unit-ish so this maps them onto screen-sized motion
pub const DEFAULT_AMPLITUDE_SCALE: Float = 40.0;
/// Convergence threshold handed to the symmetric eigensolver
pub const SOLVER_EPSILON: Float = 1e-12;
/// 0 means iterate until convergence
pub const SOLVER_MAX_ITERATIONS: usize = 0;
/// Relative tolerance used when checking that a matrix handed to the symmetric solver is symmetric
pub const SYMMETRY_TOLERANCE: Float = 1e-9;
// Initial ring layout
pub const RING_RADIUS: Float = 150.0;
pub const RING_CENTER: (Float, Float) = (250.0, 200.0);
pub const DEFAULT_MASS: Float = 1.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalSettings {
	pub eigenvalue_tolerance: Float,
	pub clean_tolerance: Float,
	pub amplitude_scale: Float
}

impl Default for ModalSettings {
	fn default() -> Self {
		Self {
			eigenvalue_tolerance: EIGENVALUE_TOLERANCE,
			clean_tolerance: MATRIX_CLEAN_TOLERANCE,
			amplitude_scale: DEFAULT_AMPLITUDE_SCALE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn partial_settings_fill_defaults() {
		let settings: ModalSettings = serde_json::from_str(r#"{"amplitude_scale": 10.0}"#).unwrap();
		assert_eq!(settings.amplitude_scale, 10.0);
		assert_eq!(settings.eigenvalue_tolerance, EIGENVALUE_TOLERANCE);
		assert_eq!(settings.clean_tolerance, MATRIX_CLEAN_TOLERANCE);
	}
}
