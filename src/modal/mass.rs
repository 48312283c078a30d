// Diagonal mass matrix M
use crate::prelude::*;
use crate::graph::validate_masses;

/// 2n x 2n diagonal matrix with each mass at both its x and y slots
pub fn assemble_mass(masses: &[Mass]) -> ModalResult<DMat> {
	validate_masses(masses)?;
	Ok(DMat::from_diagonal(&mass_diagonal(masses)))
}

/// Diagonal of M without the zeros
pub fn mass_diagonal(masses: &[Mass]) -> VDyn {
	VDyn::from_iterator(masses.len() * 2, masses.iter().flat_map(|m| [m.mass, m.mass]))
}
