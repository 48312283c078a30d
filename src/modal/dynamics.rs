// Dynamics operator A = M^-1 K
use tracing::debug;

use crate::prelude::*;
use crate::solver::EigenSolution;

/// A = M^-1 K together with the diagonal of M.
///
/// A is not symmetric once the masses differ, so it is never handed to the eigensolver directly.
/// The solver gets the similar symmetric matrix S = M^-1/2 K M^-1/2 instead (same eigenvalues),
/// and its eigenvectors u are mapped back with v = M^-1/2 u so they are eigenvectors of A.
#[derive(Clone, Debug)]
pub struct DynamicsOperator {
	matrix: DMat,
	mass_diagonal: VDyn
}

impl DynamicsOperator {
	pub fn matrix(&self) -> &DMat {
		&self.matrix
	}
	pub fn mass_diagonal(&self) -> &VDyn {
		&self.mass_diagonal
	}
	pub fn dof_count(&self) -> usize {
		self.mass_diagonal.len()
	}
	/// S[i][j] = K[i][j] / sqrt(m_i * m_j) = A[i][j] * sqrt(m_i / m_j)
	pub fn symmetric_form(&self) -> DMat {
		let sqrt_m = self.mass_diagonal.map(|m| m.sqrt());
		let s = DMat::from_fn(self.matrix.nrows(), self.matrix.ncols(), |i, j| {
			self.matrix[(i, j)] * sqrt_m[i] / sqrt_m[j]
		});
		// Rounding in the scaling can leave it a hair off symmetric
		(&s + s.transpose()) * 0.5
	}
	/// Converts a decomposition of `symmetric_form` into one of A
	pub fn back_transform(&self, solution: EigenSolution) -> ModalResult<EigenSolution> {
		let (eigenvalues, mut eigenvectors) = solution.into_parts();
		if eigenvectors.nrows() != self.dof_count() {
			return Err(ModalError::DimensionMismatch(format!(
				"eigenvectors have {} rows, operator has {} degrees of freedom",
				eigenvectors.nrows(),
				self.dof_count()
			)));
		}
		for (mut row, m) in eigenvectors.row_iter_mut().zip(self.mass_diagonal.iter()) {
			row /= m.sqrt();
		}
		EigenSolution::new(eigenvalues, eigenvectors)
	}
}

/// A[i][j] = K[i][j] / M[i][i]. M must be diagonal with positive entries.
pub fn reduce(k_matrix: &DMat, m_matrix: &DMat) -> ModalResult<DynamicsOperator> {
	if !k_matrix.is_square() || k_matrix.shape() != m_matrix.shape() {
		return Err(ModalError::DimensionMismatch(format!(
			"K is {:?} and M is {:?}, both must be the same square size",
			k_matrix.shape(),
			m_matrix.shape()
		)));
	}
	let n = m_matrix.nrows();
	for i in 0..n {
		for j in 0..n {
			let v = m_matrix[(i, j)];
			if i == j && !(v.is_finite() && v > 0.0) {
				return Err(ModalError::NonPositiveMassEntry{dof: i, value: v});
			}
			if i != j && v != 0.0 {
				return Err(ModalError::DimensionMismatch(format!("mass matrix has off-diagonal entry {} at ({}, {})", v, i, j)));
			}
		}
	}
	let mass_diagonal = m_matrix.diagonal();
	let mut matrix = k_matrix.clone();
	for (mut row, m) in matrix.row_iter_mut().zip(mass_diagonal.iter()) {
		row /= *m;
	}
	debug!(dofs = n, "reduced dynamics operator");
	Ok(DynamicsOperator {
		matrix,
		mass_diagonal
	})
}
