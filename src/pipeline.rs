// Graph -> K, M -> A -> eigensolver -> modes, recomputed from scratch for every graph snapshot
use tracing::{debug, error, warn};

use crate::prelude::*;
use crate::modal::stiffness::assemble_stiffness_with_tolerance;

/// Everything derived from one graph snapshot
#[derive(Clone, Debug)]
pub struct ModalAnalysis {
	pub stiffness: DMat,
	pub mass: DMat,
	pub operator: DynamicsOperator,
	/// Decomposition of A (eigenvectors already mapped back from the symmetric form)
	pub solution: EigenSolution,
	pub modes: ModeSet,
	pub warnings: Vec<AssemblyWarning>,
	/// Ids of masses no spring touches, each one adds two rigid-body modes of its own
	pub unattached: Vec<usize>
}

impl ModalAnalysis {
	pub fn diagonalization(&self) -> ModalResult<Diagonalization> {
		diagonalize(&self.solution)
	}
}

pub fn analyze(graph: &MassSpringGraph, solver: &impl EigenSolver, settings: &ModalSettings) -> ModalResult<ModalAnalysis> {
	let masses = graph.masses();
	let StiffnessAssembly{matrix: stiffness, warnings} = assemble_stiffness_with_tolerance(masses, graph.springs(), settings.clean_tolerance)?;
	let mass = assemble_mass(masses)?;
	let operator = reduce(&stiffness, &mass)?;
	let raw = solver.decompose(&operator.symmetric_form())?;
	if raw.len() != operator.dof_count() {
		return Err(ModalError::DecompositionFailure(format!(
			"solver returned {} eigenpairs for a {} x {} operator",
			raw.len(),
			operator.dof_count(),
			operator.dof_count()
		)));
	}
	if raw.eigenvalues().iter().chain(raw.eigenvectors().iter()).any(|v| !v.is_finite()) {
		return Err(ModalError::DecompositionFailure("solver returned non-finite values".to_owned()));
	}
	let solution = operator.back_transform(raw)?;
	let modes = ModeSet::from_solution(&solution, settings.eigenvalue_tolerance);
	let unattached = graph.free_masses();
	if !unattached.is_empty() && !graph.springs().is_empty() {
		warn!(?unattached, "masses without springs");
	}
	debug!(modes = modes.len(), physical = modes.physical_count(), "modal analysis done");
	// Done
	Ok(ModalAnalysis {
		stiffness,
		mass,
		operator,
		solution,
		modes,
		warnings,
		unattached
	})
}

/// Holds the analysis of the latest graph snapshot, or nothing if that snapshot failed
pub struct ModalSession<S: EigenSolver> {
	solver: S,
	settings: ModalSettings,
	analysis: Option<ModalAnalysis>
}

impl Default for ModalSession<SymmetricEigenSolver> {
	fn default() -> Self {
		Self::new(SymmetricEigenSolver::default(), ModalSettings::default())
	}
}

impl<S: EigenSolver> ModalSession<S> {
	pub fn new(solver: S, settings: ModalSettings) -> Self {
		Self {
			solver,
			settings,
			analysis: None
		}
	}
	pub fn settings(&self) -> &ModalSettings {
		&self.settings
	}
	/// An animator using the session's amplitude scale
	pub fn animator(&self) -> ModeAnimator {
		ModeAnimator::new(self.settings.amplitude_scale)
	}
	/// Recomputes everything for `graph`. On failure the previous analysis is dropped as well.
	pub fn refresh(&mut self, graph: &MassSpringGraph) -> ModalResult<&ModalAnalysis> {
		self.analysis = None;
		match analyze(graph, &self.solver, &self.settings) {
			Ok(analysis) => {
				let analysis: &ModalAnalysis = self.analysis.insert(analysis);
				Ok(analysis)
			},
			Err(e) => {
				error!("modal analysis failed, no modes available: {}", e);
				Err(e)
			}
		}
	}
	pub fn analysis(&self) -> Option<&ModalAnalysis> {
		self.analysis.as_ref()
	}
	pub fn modes(&self) -> Option<&ModeSet> {
		self.analysis.as_ref().map(|a| &a.modes)
	}
	pub fn clear(&mut self) {
		self.analysis = None;
	}
}
