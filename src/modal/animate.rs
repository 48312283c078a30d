// Simple harmonic motion of a single mode, evaluated per frame
use crate::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct DisplacedPosition {
	pub id: usize,
	pub position: V2
}

/// Spring drawn between the displaced positions of its masses
#[derive(Clone, Debug, PartialEq)]
pub struct SpringSegment {
	pub id1: usize,
	pub id2: usize,
	pub start: V2,
	pub end: V2
}

/// Stateless, so the mode and amplitude can change between frames without restarting the clock
#[derive(Clone, Debug, PartialEq)]
pub struct ModeAnimator {
	pub amplitude_scale: Float
}

impl Default for ModeAnimator {
	fn default() -> Self {
		Self {
			amplitude_scale: DEFAULT_AMPLITUDE_SCALE
		}
	}
}

impl ModeAnimator {
	pub fn new(amplitude_scale: Float) -> Self {
		Self {
			amplitude_scale
		}
	}
	/// original + d * amplitude * scale * cos(w * t), so at t = 0 the mass is fully displaced.
	/// Negative or NaN amplitudes are treated as 0.
	/// `mass_i` is the position of the mass in the graph's mass slice (its block in K), not its id.
	pub fn displace(&self, mode: &Mode, mass_i: usize, original: V2, amplitude: Float, time: Float) -> V2 {
		let amplitude = amplitude.max(0.0);
		let phase = (mode.angular_frequency * time).cos();
		original + mode.displacement(mass_i) * (amplitude * self.amplitude_scale * phase)
	}
	/// One displaced position per mass, in slice order
	pub fn displaced_positions(&self, mode: &Mode, masses: &[Mass], amplitude: Float, time: Float) -> Vec<DisplacedPosition> {
		masses.iter().enumerate().map(|(i, mass)| DisplacedPosition {
			id: mass.id,
			position: self.displace(mode, i, mass.position, amplitude, time)
		}).collect()
	}
	/// Springs whose masses can't be found are left out
	pub fn displaced_springs(&self, springs: &[Spring], positions: &[DisplacedPosition]) -> Vec<SpringSegment> {
		let lookup = |id: usize| positions.iter().find(|p| p.id == id).map(|p| p.position);
		springs.iter().filter_map(|s| {
			Some(SpringSegment {
				id1: s.id1,
				id2: s.id2,
				start: lookup(s.id1)?,
				end: lookup(s.id2)?
			})
		}).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use std::f64::consts::PI;
	fn stretch_mode() -> Mode {
		// Two masses moving apart along x, w = 2
		Mode::new(3, 4.0, VDyn::from_vec(vec![-0.5, 0.0, 0.5, 0.0]), EIGENVALUE_TOLERANCE)
	}
	#[test]
	fn phase_convention() {
		let animator = ModeAnimator::new(10.0);
		let mode = stretch_mode();
		let original = V2::new(100.0, 0.0);
		assert_eq!(animator.displace(&mode, 1, original, 1.0, 0.0), V2::new(105.0, 0.0));
		// Quarter period (w = 2, T = pi) passes through equilibrium
		assert_relative_eq!(animator.displace(&mode, 1, original, 1.0, PI / 4.0), original, epsilon = 1e-12);
		assert_relative_eq!(animator.displace(&mode, 1, original, 1.0, PI / 2.0), V2::new(95.0, 0.0), epsilon = 1e-12);
		assert_relative_eq!(animator.displace(&mode, 1, original, 1.0, PI), V2::new(105.0, 0.0), epsilon = 1e-12);
	}
	#[test]
	fn amplitude() {
		let animator = ModeAnimator::new(10.0);
		let mode = stretch_mode();
		let original = V2::new(0.0, 0.0);
		assert_eq!(animator.displace(&mode, 0, original, 0.0, 1.3), original);
		assert_eq!(animator.displace(&mode, 0, original, -2.0, 0.0), original);
		assert_eq!(animator.displace(&mode, 0, original, 3.0, 0.0), V2::new(-15.0, 0.0));
	}
	#[test]
	fn idempotent() {
		let animator = ModeAnimator::default();
		let mode = stretch_mode();
		let a = animator.displace(&mode, 1, V2::new(1.0, 2.0), 0.7, 12.345);
		let b = animator.displace(&mode, 1, V2::new(1.0, 2.0), 0.7, 12.345);
		assert_eq!(a.x.to_bits(), b.x.to_bits());
		assert_eq!(a.y.to_bits(), b.y.to_bits());
	}
	#[test]
	fn missing_components() {
		let animator = ModeAnimator::new(1.0);
		let mode = stretch_mode();
		let original = V2::new(7.0, 7.0);
		assert_eq!(animator.displace(&mode, 5, original, 1.0, 0.0), original);
	}
	#[test]
	fn frame() {
		let animator = ModeAnimator::new(2.0);
		let mode = stretch_mode();
		let masses = vec![
			Mass::new(8, V2::new(0.0, 0.0), 1.0),
			Mass::new(2, V2::new(100.0, 0.0), 1.0)
		];
		let springs = vec![Spring::new(8, 2, 1.0), Spring::new(8, 40, 1.0)];
		let positions = animator.displaced_positions(&mode, &masses, 1.0, 0.0);
		assert_eq!(positions, vec![
			DisplacedPosition{id: 8, position: V2::new(-1.0, 0.0)},
			DisplacedPosition{id: 2, position: V2::new(101.0, 0.0)}
		]);
		assert_eq!(animator.displaced_springs(&springs, &positions), vec![
			SpringSegment{id1: 8, id2: 2, start: V2::new(-1.0, 0.0), end: V2::new(101.0, 0.0)}
		]);
		// Mass id 2 sits at slice position 1
		assert_eq!(animator.displace(&mode, 1, masses[1].position, 1.0, 0.0), positions[1].position);
		assert_eq!(animator.displace(&mode, 2, masses[1].position, 1.0, 0.0), masses[1].position);
	}
}
