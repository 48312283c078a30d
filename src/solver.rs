// Eigensolver seam, the decomposition itself comes from nalgebra
use nalgebra::SymmetricEigen;
use tracing::debug;

use crate::prelude::*;

/// Eigenvalues and matching eigenvector columns, `eigenvalues[i]` belongs to column `i`.
/// No ordering is implied.
#[derive(Clone, Debug, PartialEq)]
pub struct EigenSolution {
	eigenvalues: VDyn,
	eigenvectors: DMat
}

impl EigenSolution {
	pub fn new(eigenvalues: VDyn, eigenvectors: DMat) -> ModalResult<Self> {
		if !eigenvectors.is_square() || eigenvectors.ncols() != eigenvalues.len() {
			return Err(ModalError::DimensionMismatch(format!(
				"{} eigenvalues with a {:?} eigenvector matrix",
				eigenvalues.len(),
				eigenvectors.shape()
			)));
		}
		Ok(Self {
			eigenvalues,
			eigenvectors
		})
	}
	pub fn empty() -> Self {
		Self {
			eigenvalues: VDyn::zeros(0),
			eigenvectors: DMat::zeros(0, 0)
		}
	}
	pub fn eigenvalues(&self) -> &VDyn {
		&self.eigenvalues
	}
	pub fn eigenvectors(&self) -> &DMat {
		&self.eigenvectors
	}
	pub fn len(&self) -> usize {
		self.eigenvalues.len()
	}
	pub fn is_empty(&self) -> bool {
		self.eigenvalues.is_empty()
	}
	pub fn into_parts(self) -> (VDyn, DMat) {
		(self.eigenvalues, self.eigenvectors)
	}
}

pub trait EigenSolver {
	/// Real eigenvalues and eigenvectors (as columns) of a square real matrix
	fn decompose(&self, matrix: &DMat) -> ModalResult<EigenSolution>;
}

/// Symmetric QR via `nalgebra::SymmetricEigen`, eigenvectors come out orthonormal
#[derive(Clone, Debug)]
pub struct SymmetricEigenSolver {
	pub epsilon: Float,
	pub max_iterations: usize,
	pub symmetry_tolerance: Float
}

impl Default for SymmetricEigenSolver {
	fn default() -> Self {
		Self {
			epsilon: SOLVER_EPSILON,
			max_iterations: SOLVER_MAX_ITERATIONS,
			symmetry_tolerance: SYMMETRY_TOLERANCE
		}
	}
}

impl SymmetricEigenSolver {
	fn check_input(&self, matrix: &DMat) -> ModalResult<()> {
		if !matrix.is_square() {
			return Err(ModalError::DecompositionFailure(format!("matrix is {:?}, not square", matrix.shape())));
		}
		if let Some(v) = matrix.iter().find(|v| !v.is_finite()) {
			return Err(ModalError::DecompositionFailure(format!("matrix has non-finite entry {}", v)));
		}
		let scale = matrix.amax().max(1.0);
		let asymmetry = (matrix - matrix.transpose()).amax();
		if asymmetry > self.symmetry_tolerance * scale {
			return Err(ModalError::DecompositionFailure(format!("matrix is not symmetric (max |A - A^T| = {:e})", asymmetry)));
		}
		Ok(())
	}
}

impl EigenSolver for SymmetricEigenSolver {
	fn decompose(&self, matrix: &DMat) -> ModalResult<EigenSolution> {
		if matrix.shape() == (0, 0) {
			return Ok(EigenSolution::empty());
		}
		self.check_input(matrix)?;
		let eigen = SymmetricEigen::try_new(matrix.clone(), self.epsilon, self.max_iterations)
			.ok_or_else(|| ModalError::DecompositionFailure("symmetric eigensolver did not converge".to_owned()))?;
		debug!(size = matrix.nrows(), "decomposed operator");
		EigenSolution::new(eigen.eigenvalues, eigen.eigenvectors)
	}
}
