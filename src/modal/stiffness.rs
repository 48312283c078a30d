// Stiffness matrix K of a 2D spring network
use nalgebra::Matrix2;
use tracing::{debug, warn};

use crate::prelude::*;
use crate::graph::{validate_masses, validate_springs};
use super::clean_small_entries;

/// Springs that were left out of K without failing the assembly
#[derive(Clone, Debug, PartialEq)]
pub enum AssemblyWarning {
	/// Both ends sit at the same position so the spring has no direction
	CoincidentEndpoints {
		id1: usize,
		id2: usize
	}
}

#[derive(Clone, Debug)]
pub struct StiffnessAssembly {
	pub matrix: DMat,
	pub warnings: Vec<AssemblyWarning>
}

pub fn assemble_stiffness(masses: &[Mass], springs: &[Spring]) -> ModalResult<StiffnessAssembly> {
	assemble_stiffness_with_tolerance(masses, springs, MATRIX_CLEAN_TOLERANCE)
}

/// 2n x 2n stiffness matrix. Each spring adds k*e*e^T to the diagonal blocks of both of its masses and subtracts it from the two blocks coupling them,
/// where e is the unit vector from the first mass to the second.
pub fn assemble_stiffness_with_tolerance(masses: &[Mass], springs: &[Spring], clean_tolerance: Float) -> ModalResult<StiffnessAssembly> {
	let index_lookup = validate_masses(masses)?;
	validate_springs(springs, &index_lookup)?;
	let n_dofs = masses.len() * 2;
	let mut k_matrix = DMat::zeros(n_dofs, n_dofs);
	let mut warnings = Vec::<AssemblyWarning>::new();
	for spring in springs {
		// Both ids were checked by `validate_springs`
		let i = index_lookup[&spring.id1];
		let j = index_lookup[&spring.id2];
		let offset: V2 = masses[j].position - masses[i].position;
		let dist = offset.magnitude();
		if dist == 0.0 {
			warn!(id1 = spring.id1, id2 = spring.id2, "spring endpoints coincide, leaving it out of the stiffness matrix");
			warnings.push(AssemblyWarning::CoincidentEndpoints{id1: spring.id1, id2: spring.id2});
			continue;
		}
		let block = spring_block(offset / dist, spring.k);
		add_block(&mut k_matrix, i, i, &block);
		add_block(&mut k_matrix, j, j, &block);
		add_block(&mut k_matrix, i, j, &-block);
		add_block(&mut k_matrix, j, i, &-block);
	}
	clean_small_entries(&mut k_matrix, clean_tolerance);
	debug!(masses = masses.len(), springs = springs.len(), skipped = warnings.len(), "assembled stiffness matrix");
	// Done
	Ok(StiffnessAssembly {
		matrix: k_matrix,
		warnings
	})
}

/// k * e * e^T for unit direction `e`
pub fn spring_block(e: V2, k: Float) -> Matrix2<Float> {
	(e * e.transpose()) * k
}

fn add_block(matrix: &mut DMat, mass_i: usize, mass_j: usize, block: &Matrix2<Float>) {
	let mut view = matrix.fixed_view_mut::<2, 2>(dof_x(mass_i), dof_x(mass_j));
	view += block;
}
