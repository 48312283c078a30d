//! Error types for the modal pipeline.
//!
//! Every fallible operation returns `ModalResult<T>`.

use thiserror::Error;
use crate::prelude::Float;

#[derive(Debug, Error)]
pub enum ModalError {
	/// Mass values must be strictly positive.
	#[error("Invalid input: mass {id} has non-positive or non-finite value {mass}")]
	NonPositiveMass {
		id: usize,
		mass: Float
	},

	/// Spring constants must be strictly positive.
	#[error("Invalid input: spring {id1}-{id2} has non-positive or non-finite stiffness {k}")]
	NonPositiveStiffness {
		id1: usize,
		id2: usize,
		k: Float
	},

	#[error("Invalid input: spring connects mass {0} to itself")]
	SelfSpring(usize),

	#[error("Invalid input: no mass with id {0}")]
	UnknownMass(usize),

	#[error("Invalid input: mass id {0} is used more than once")]
	DuplicateMass(usize),

	#[error("Invalid input: mass {0} has a non-finite position")]
	NonFinitePosition(usize),

	/// A mass matrix handed to `reduce` directly, indexed by degree of freedom rather than mass id.
	#[error("Invalid input: mass matrix diagonal entry {dof} is non-positive or non-finite ({value})")]
	NonPositiveMassEntry {
		dof: usize,
		value: Float
	},

	/// Every id above the current largest one is taken.
	#[error("No free mass id after {0}")]
	MassIdsExhausted(usize),

	/// Two matrices or vectors that must line up do not.
	#[error("Dimension mismatch: {0}")]
	DimensionMismatch(String),

	/// The eigensolver could not decompose the operator.
	#[error("Decomposition failed: {0}")]
	DecompositionFailure(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[cfg(feature = "frame-rendering")]
	#[error("Image error: {0}")]
	Image(#[from] image::ImageError)
}

impl ModalError {
	/// Whether this error rejects user-supplied graph data (as opposed to a numerical or I/O failure)
	pub fn is_invalid_input(&self) -> bool {
		matches!(
			self,
			Self::NonPositiveMass{..}
			| Self::NonPositiveStiffness{..}
			| Self::SelfSpring(_)
			| Self::UnknownMass(_)
			| Self::DuplicateMass(_)
			| Self::NonFinitePosition(_)
			| Self::NonPositiveMassEntry{..}
		)
	}
}

pub type ModalResult<T> = Result<T, ModalError>;
