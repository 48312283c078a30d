// P D P^-1 factorization of the operator, used to show that the modes reproduce it
use crate::prelude::*;
use crate::solver::EigenSolution;

#[derive(Clone, Debug)]
pub struct Diagonalization {
	/// Eigenvectors as columns
	pub p: DMat,
	/// Eigenvalues on the diagonal
	pub d: DMat,
	/// P D P^-1
	pub reconstructed: DMat
}

pub fn diagonalize(solution: &EigenSolution) -> ModalResult<Diagonalization> {
	let p = solution.eigenvectors().clone();
	let d = DMat::from_diagonal(solution.eigenvalues());
	let p_inv = p.clone().try_inverse()
		.ok_or_else(|| ModalError::DecompositionFailure("eigenvector matrix is singular".to_owned()))?;
	let reconstructed = &p * &d * p_inv;
	Ok(Diagonalization {
		p,
		d,
		reconstructed
	})
}
