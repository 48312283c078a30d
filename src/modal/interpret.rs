// Turns raw eigenpairs into vibration modes
use std::f64::consts::PI;

use crate::prelude::*;
use crate::solver::EigenSolution;

#[derive(Clone, Debug, PartialEq)]
pub struct Mode {
	/// Position of this eigenpair in the solver output
	pub index: usize,
	pub eigenvalue: Float,
	/// sqrt(|eigenvalue|), rad/s
	pub angular_frequency: Float,
	/// Hz
	pub frequency: Float,
	/// [dx0, dy0, dx1, dy1, ...]
	pub vector: VDyn,
	/// False for rigid-body modes (|eigenvalue| at or below the tolerance)
	pub is_physical: bool
}

impl Mode {
	pub fn new(index: usize, eigenvalue: Float, vector: VDyn, tolerance: Float) -> Self {
		let angular_frequency = eigenvalue.abs().sqrt();
		Self {
			index,
			eigenvalue,
			angular_frequency,
			frequency: angular_frequency / (2.0 * PI),
			vector,
			is_physical: eigenvalue.abs() > tolerance
		}
	}
	/// Displacement direction of the mass stored at `mass_i`, missing components count as 0
	pub fn displacement(&self, mass_i: usize) -> V2 {
		let x_i = dof_x(mass_i);
		V2::new(
			self.vector.get(x_i).copied().unwrap_or(0.0),
			self.vector.get(x_i + 1).copied().unwrap_or(0.0)
		)
	}
}

/// One line of an eigenvalue listing, rigid-body modes are folded into a single entry
#[derive(Clone, Debug, PartialEq)]
pub enum EigenvalueEntry {
	Zero {
		multiplicity: usize
	},
	Value(Float)
}

/// Every mode in solver order, rigid-body ones included
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModeSet {
	modes: Vec<Mode>
}

impl ModeSet {
	pub fn from_solution(solution: &EigenSolution, tolerance: Float) -> Self {
		let modes = solution.eigenvalues().iter()
			.zip(solution.eigenvectors().column_iter())
			.enumerate()
			.map(|(i, (&value, column))| Mode::new(i, value, column.into_owned(), tolerance))
			.collect();
		Self {
			modes
		}
	}
	pub fn modes(&self) -> &[Mode] {
		&self.modes
	}
	pub fn len(&self) -> usize {
		self.modes.len()
	}
	pub fn is_empty(&self) -> bool {
		self.modes.is_empty()
	}
	/// Modes offered for selection and animation
	pub fn physical(&self) -> impl Iterator<Item = &Mode> {
		self.modes.iter().filter(|m| m.is_physical)
	}
	/// `i`th physical mode (counting only physical ones)
	pub fn physical_mode(&self, i: usize) -> Option<&Mode> {
		self.physical().nth(i)
	}
	pub fn physical_count(&self) -> usize {
		self.physical().count()
	}
	pub fn rigid_body_count(&self) -> usize {
		self.modes.len() - self.physical_count()
	}
	/// Eigenvalues in solver order with all rigid-body modes replaced by one `Zero` entry where the first of them was
	pub fn eigenvalue_summary(&self) -> Vec<EigenvalueEntry> {
		let multiplicity = self.rigid_body_count();
		let mut out = Vec::<EigenvalueEntry>::with_capacity(self.modes.len() - multiplicity + 1);
		let mut zero_listed = false;
		for mode in &self.modes {
			if mode.is_physical {
				out.push(EigenvalueEntry::Value(mode.eigenvalue));
			}
			else if !zero_listed {
				out.push(EigenvalueEntry::Zero{multiplicity});
				zero_listed = true;
			}
		}
		out
	}
}

pub fn interpret(eigenvalues: &[Float], eigenvector_columns: &[VDyn]) -> ModalResult<ModeSet> {
	interpret_with_tolerance(eigenvalues, eigenvector_columns, EIGENVALUE_TOLERANCE)
}

/// Builds one mode per eigenvalue, `eigenvector_columns[i]` must belong to `eigenvalues[i]`
pub fn interpret_with_tolerance(eigenvalues: &[Float], eigenvector_columns: &[VDyn], tolerance: Float) -> ModalResult<ModeSet> {
	if eigenvalues.len() != eigenvector_columns.len() {
		return Err(ModalError::DimensionMismatch(format!(
			"{} eigenvalues but {} eigenvectors",
			eigenvalues.len(),
			eigenvector_columns.len()
		)));
	}
	let modes = eigenvalues.iter()
		.zip(eigenvector_columns)
		.enumerate()
		.map(|(i, (&value, vector))| Mode::new(i, value, vector.clone(), tolerance))
		.collect();
	Ok(ModeSet {
		modes
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	fn unit(n: usize, i: usize) -> VDyn {
		VDyn::from_fn(n, |j, _| if i == j {1.0} else {0.0})
	}
	#[test]
	fn derived_quantities() {
		let modes = interpret(&[4.0, -9.0], &[unit(2, 0), unit(2, 1)]).unwrap();
		let first = &modes.modes()[0];
		assert_eq!(first.angular_frequency, 2.0);
		assert_relative_eq!(first.frequency, 1.0 / PI);
		// Negative round-off still gets a real frequency
		assert_eq!(modes.modes()[1].angular_frequency, 3.0);
		assert!(modes.modes().iter().all(|m| m.is_physical));
	}
	#[test]
	fn classification_boundary() {
		let values = [1e-6, -1e-6, 1.1e-6, -2e-6, 0.0];
		let vectors: Vec<VDyn> = (0..5).map(|i| unit(5, i)).collect();
		let modes = interpret(&values, &vectors).unwrap();
		let physical: Vec<bool> = modes.modes().iter().map(|m| m.is_physical).collect();
		assert_eq!(physical, vec![false, false, true, true, false]);
		assert_eq!(modes.rigid_body_count(), 3);
		assert_eq!(modes.physical_count(), 2);
	}
	#[test]
	fn keeps_solver_order() {
		let values = [3.0, 1e-12, 1.0, -4e-15, 2.0];
		let vectors: Vec<VDyn> = (0..5).map(|i| unit(5, i)).collect();
		let modes = interpret(&values, &vectors).unwrap();
		let indices: Vec<usize> = modes.physical().map(|m| m.index).collect();
		assert_eq!(indices, vec![0, 2, 4]);
		assert_eq!(modes.physical_mode(1).unwrap().eigenvalue, 1.0);
		assert!(modes.physical_mode(3).is_none());
		assert_eq!(modes.modes()[3].vector, unit(5, 3));
	}
	#[test]
	fn summary_folds_zero_modes() {
		let values = [3.0, 1e-12, 1.0, -4e-15, 2.0];
		let vectors: Vec<VDyn> = (0..5).map(|i| unit(5, i)).collect();
		let modes = interpret(&values, &vectors).unwrap();
		assert_eq!(
			modes.eigenvalue_summary(),
			vec![
				EigenvalueEntry::Value(3.0),
				EigenvalueEntry::Zero{multiplicity: 2},
				EigenvalueEntry::Value(1.0),
				EigenvalueEntry::Value(2.0)
			]
		);
		let all_physical = interpret(&[5.0], &[unit(1, 0)]).unwrap();
		assert_eq!(all_physical.eigenvalue_summary(), vec![EigenvalueEntry::Value(5.0)]);
	}
	#[test]
	fn short_vectors_displace_nothing() {
		let mode = Mode::new(0, 2.0, VDyn::from_vec(vec![0.5, -0.5, 0.25]), EIGENVALUE_TOLERANCE);
		assert_eq!(mode.displacement(0), V2::new(0.5, -0.5));
		assert_eq!(mode.displacement(1), V2::new(0.25, 0.0));
		assert_eq!(mode.displacement(2), V2::zeros());
	}
	#[test]
	fn mismatched_lengths() {
		assert!(matches!(interpret(&[1.0, 2.0], &[unit(2, 0)]), Err(ModalError::DimensionMismatch(_))));
	}
	#[test]
	fn from_solution_reads_columns() {
		let vectors = DMat::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
		let solution = EigenSolution::new(VDyn::from_vec(vec![0.0, 8.0]), vectors).unwrap();
		let modes = ModeSet::from_solution(&solution, EIGENVALUE_TOLERANCE);
		assert_eq!(modes.modes()[1].vector, VDyn::from_vec(vec![2.0, 4.0]));
		assert!(!modes.modes()[0].is_physical);
		assert_eq!(modes.physical_mode(0).unwrap().index, 1);
	}
}
