// Masses and springs as edited by the user, everything else is derived from snapshots of this
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use serde::{Serialize, Deserialize};

use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mass {
	pub id: usize,
	pub position: V2,
	pub mass: Float
}

impl Mass {
	pub fn new(id: usize, position: V2, mass: Float) -> Self {
		Self {
			id,
			position,
			mass
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
	pub id1: usize,
	pub id2: usize,
	pub k: Float
}

impl Spring {
	pub fn new(id1: usize, id2: usize, k: Float) -> Self {
		Self {
			id1,
			id2,
			k
		}
	}
}

/// Maps mass ids to their position in `masses`, which is also their block index in the assembled matrices.
/// Fails if any mass is invalid or an id is used twice.
pub fn validate_masses(masses: &[Mass]) -> ModalResult<HashMap<usize, usize>> {
	let mut index_lookup = HashMap::<usize, usize>::with_capacity(masses.len());
	for (i, mass) in masses.iter().enumerate() {
		check_mass_value(mass.id, mass.mass)?;
		check_position(mass.id, mass.position)?;
		if index_lookup.insert(mass.id, i).is_some() {
			return Err(ModalError::DuplicateMass(mass.id));
		}
	}
	Ok(index_lookup)
}

/// Every spring must join two distinct existing masses with a positive constant
pub fn validate_springs(springs: &[Spring], index_lookup: &HashMap<usize, usize>) -> ModalResult<()> {
	for spring in springs {
		check_spring(spring, |id| index_lookup.contains_key(&id))?;
	}
	Ok(())
}

fn check_mass_value(id: usize, mass: Float) -> ModalResult<()> {
	if mass.is_finite() && mass > 0.0 {
		Ok(())
	}
	else {
		Err(ModalError::NonPositiveMass{id, mass})
	}
}

fn check_position(id: usize, position: V2) -> ModalResult<()> {
	match position.x.is_finite() && position.y.is_finite() {
		true => Ok(()),
		false => Err(ModalError::NonFinitePosition(id))
	}
}

fn check_spring(spring: &Spring, exists: impl Fn(usize) -> bool) -> ModalResult<()> {
	if spring.id1 == spring.id2 {
		return Err(ModalError::SelfSpring(spring.id1));
	}
	for id in [spring.id1, spring.id2] {
		if !exists(id) {
			return Err(ModalError::UnknownMass(id));
		}
	}
	if !(spring.k.is_finite() && spring.k > 0.0) {
		return Err(ModalError::NonPositiveStiffness{id1: spring.id1, id2: spring.id2, k: spring.k});
	}
	Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts", into = "GraphParts")]
pub struct MassSpringGraph {
	masses: Vec<Mass>,
	springs: Vec<Spring>,
	mass_index_lookup: HashMap<usize, usize>
}

// Wire form, validated on the way in
#[derive(Serialize, Deserialize)]
struct GraphParts {
	masses: Vec<Mass>,
	#[serde(default)]
	springs: Vec<Spring>
}

impl TryFrom<GraphParts> for MassSpringGraph {
	type Error = ModalError;
	fn try_from(parts: GraphParts) -> ModalResult<Self> {
		Self::from_parts(parts.masses, parts.springs)
	}
}

impl From<MassSpringGraph> for GraphParts {
	fn from(graph: MassSpringGraph) -> Self {
		Self {
			masses: graph.masses,
			springs: graph.springs
		}
	}
}

impl MassSpringGraph {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn from_parts(masses: Vec<Mass>, springs: Vec<Spring>) -> ModalResult<Self> {
		let mass_index_lookup = validate_masses(&masses)?;
		validate_springs(&springs, &mass_index_lookup)?;
		Ok(Self {
			masses,
			springs,
			mass_index_lookup
		})
	}
	/// `n` unit masses evenly spaced on a circle, no springs
	pub fn ring(n: usize) -> Self {
		let (center_x, center_y) = RING_CENTER;
		let masses: Vec<Mass> = (0..n).map(|i| {
			let angle = (2.0 * PI * i as Float) / n as Float;
			Mass::new(
				i,
				V2::new(center_x + RING_RADIUS * angle.cos(), center_y + RING_RADIUS * angle.sin()),
				DEFAULT_MASS
			)
		}).collect();
		let mass_index_lookup = masses.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
		Self {
			masses,
			springs: Vec::new(),
			mass_index_lookup
		}
	}
	pub fn masses(&self) -> &[Mass] {
		&self.masses
	}
	pub fn springs(&self) -> &[Spring] {
		&self.springs
	}
	pub fn num_masses(&self) -> usize {
		self.masses.len()
	}
	/// Side length of K, M and A
	pub fn dof_count(&self) -> usize {
		self.masses.len() * 2
	}
	pub fn index_of(&self, id: usize) -> Option<usize> {
		self.mass_index_lookup.get(&id).copied()
	}
	pub fn mass(&self, id: usize) -> Option<&Mass> {
		self.index_of(id).map(|i| &self.masses[i])
	}
	/// Returns the id of the new mass
	pub fn add_mass(&mut self, position: V2, mass: Float) -> ModalResult<usize> {
		let id = match self.masses.iter().map(|m| m.id).max() {
			Some(largest) => largest.checked_add(1).ok_or(ModalError::MassIdsExhausted(largest))?,
			None => 0
		};
		check_mass_value(id, mass)?;
		check_position(id, position)?;
		self.mass_index_lookup.insert(id, self.masses.len());
		self.masses.push(Mass::new(id, position, mass));
		Ok(id)
	}
	pub fn move_mass(&mut self, id: usize, position: V2) -> ModalResult<()> {
		check_position(id, position)?;
		let i = self.index_of(id).ok_or(ModalError::UnknownMass(id))?;
		self.masses[i].position = position;
		Ok(())
	}
	pub fn set_mass(&mut self, id: usize, mass: Float) -> ModalResult<()> {
		check_mass_value(id, mass)?;
		let i = self.index_of(id).ok_or(ModalError::UnknownMass(id))?;
		self.masses[i].mass = mass;
		Ok(())
	}
	pub fn add_spring(&mut self, id1: usize, id2: usize, k: Float) -> ModalResult<()> {
		let spring = Spring::new(id1, id2, k);
		check_spring(&spring, |id| self.mass_index_lookup.contains_key(&id))?;
		self.springs.push(spring);
		Ok(())
	}
	pub fn undo_last_spring(&mut self) -> Option<Spring> {
		self.springs.pop()
	}
	/// Ids of masses that are not attached to any spring
	pub fn free_masses(&self) -> Vec<usize> {
		let attached: HashSet<usize> = self.springs.iter().flat_map(|s| [s.id1, s.id2]).collect();
		self.masses.iter().map(|m| m.id).filter(|id| !attached.contains(id)).collect()
	}
}
