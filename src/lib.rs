/* Normal modes of 2D mass-spring networks
Builds the stiffness and mass matrices of a network, reduces them to the dynamics operator and
interprets the eigen-decomposition as vibration modes that can be animated.
*/

pub mod config;
pub mod error;
pub mod graph;
pub mod modal;
pub mod solver;
pub mod pipeline;
#[cfg(feature = "frame-rendering")]
pub mod render;

pub mod prelude {
	pub use nalgebra::{Vector2, DVector, DMatrix};
	pub type Float = f64;
	pub type V2 = Vector2<Float>;
	pub type VDyn = DVector<Float>;
	pub type DMat = DMatrix<Float>;
	pub const APP_NAME: &str = "Mass-spring normal mode viewer";
	pub use crate::{
		config::*,
		error::{ModalError, ModalResult},
		graph::{Mass, Spring, MassSpringGraph},
		modal::{
			stiffness::{assemble_stiffness, StiffnessAssembly, AssemblyWarning},
			mass::assemble_mass,
			dynamics::{reduce, DynamicsOperator},
			interpret::{interpret, Mode, ModeSet, EigenvalueEntry},
			animate::{ModeAnimator, DisplacedPosition, SpringSegment},
			diagonalize::{diagonalize, Diagonalization}
		},
		solver::{EigenSolver, EigenSolution, SymmetricEigenSolver},
		pipeline::{analyze, ModalAnalysis, ModalSession}
	};
	/// Index of the x degree of freedom of the mass stored at `mass_i`, y is the next one
	pub fn dof_x(mass_i: usize) -> usize {
		mass_i * 2
	}
}
