// Draws animated mode shapes into images, feature "frame-rendering"
use std::path::{Path, PathBuf};
use image::{ImageBuffer, Rgb, RgbImage};
use nalgebra::Vector2;
use tracing::info;

use crate::prelude::*;

pub type ImgV2 = Vector2<u32>;

/// World (graph) coordinates to pixels. Graph coordinates are screen-like, y grows downwards.
#[derive(Clone, Debug)]
pub struct ImagePosTranslater {
	pub scale: Float,
	/// World position drawn at pixel (0, 0)
	pub origin: V2,
	pub image_size: ImgV2
}

impl ImagePosTranslater {
	pub fn world_to_px_float(&self, pos: V2) -> V2 {
		(pos - self.origin) * self.scale
	}
	/// None if off the image
	pub fn world_to_px(&self, pos: V2) -> Option<ImgV2> {
		let px = self.world_to_px_float(pos);
		if px.x < 0.0 || px.y < 0.0 || px.x >= self.image_size.x as Float || px.y >= self.image_size.y as Float {
			return None;
		}
		Some(ImgV2::new(px.x as u32, px.y as u32))
	}
	/// Fits all `positions` with a `margin` pixel border
	pub fn fit(positions: &[V2], image_size: ImgV2, margin: u32) -> Self {
		let (mut min, mut max) = (V2::repeat(Float::INFINITY), V2::repeat(Float::NEG_INFINITY));
		for p in positions {
			min = min.inf(p);
			max = max.sup(p);
		}
		if positions.is_empty() {
			min = V2::zeros();
			max = V2::zeros();
		}
		let usable = V2::new(
			image_size.x.saturating_sub(margin * 2).max(1) as Float,
			image_size.y.saturating_sub(margin * 2).max(1) as Float
		);
		let extent = max - min;
		let scale = (usable.x / extent.x.max(1e-9)).min(usable.y / extent.y.max(1e-9)).min(1e6);
		Self {
			scale,
			origin: min - V2::repeat(margin as Float / scale),
			image_size
		}
	}
}

pub struct FrameRenderer {
	pub translater: ImagePosTranslater,
	pub background_color: Rgb<u8>,
	pub spring_color: Rgb<u8>,
	pub mass_color: Rgb<u8>,
	/// Disc radius in pixels is sqrt(mass) * this
	pub mass_radius_scale: Float
}

impl FrameRenderer {
	pub fn new(translater: ImagePosTranslater) -> Self {
		Self {
			translater,
			background_color: Rgb([255; 3]),
			spring_color: Rgb([0, 128, 0]),
			mass_color: Rgb([70, 130, 180]),
			mass_radius_scale: 6.0
		}
	}
	pub fn blank(&self) -> RgbImage {
		ImageBuffer::from_pixel(self.translater.image_size.x, self.translater.image_size.y, self.background_color)
	}
	/// Springs first so the masses are drawn over them
	pub fn render_frame(&self, masses: &[Mass], positions: &[DisplacedPosition], segments: &[SpringSegment]) -> RgbImage {
		let mut image = self.blank();
		for segment in segments {
			self.draw_line(&mut image, segment.start, segment.end, self.spring_color);
		}
		for (mass, displaced) in masses.iter().zip(positions) {
			self.draw_disc(&mut image, displaced.position, mass.mass.sqrt() * self.mass_radius_scale, self.mass_color);
		}
		image
	}
	fn put(&self, image: &mut RgbImage, px: V2, color: Rgb<u8>) {
		if px.x >= 0.0 && px.y >= 0.0 && (px.x as u32) < image.width() && (px.y as u32) < image.height() {
			image.put_pixel(px.x as u32, px.y as u32, color);
		}
	}
	fn draw_line(&self, image: &mut RgbImage, start: V2, end: V2, color: Rgb<u8>) {
		let a = self.translater.world_to_px_float(start);
		let b = self.translater.world_to_px_float(end);
		// One sample per pixel along the longer axis
		let steps = (b - a).amax().ceil().max(1.0).min(1e5) as usize;
		for i in 0..=steps {
			let t = i as Float / steps as Float;
			self.put(image, a.lerp(&b, t), color);
		}
	}
	fn draw_disc(&self, image: &mut RgbImage, center: V2, radius_px: Float, color: Rgb<u8>) {
		let c = self.translater.world_to_px_float(center);
		let r = radius_px.max(1.0);
		let r_i = r.min(1e9).ceil() as i64;
		// Only offsets that land on the image
		let (x_min, x_max) = Self::clip(c.x, r_i, image.width());
		let (y_min, y_max) = Self::clip(c.y, r_i, image.height());
		for dx in x_min..=x_max {
			for dy in y_min..=y_max {
				let offset = V2::new(dx as Float, dy as Float);
				if offset.magnitude() <= r {
					self.put(image, c + offset, color);
				}
			}
		}
	}
	/// Offset range in `-r..=r` around `center` that stays within `0..size`, empty when none does
	fn clip(center: Float, r: i64, size: u32) -> (i64, i64) {
		if !center.is_finite() {
			return (1, 0);
		}
		let center = center.clamp(-2e9, 2e9);
		let low = (-center).ceil().max(-r as Float) as i64;
		let high = (size as Float - center).ceil().min(r as Float + 1.0) as i64 - 1;
		(low, high)
	}
}

/// Renders a PNG sequence of one mode oscillating, one file per frame
pub struct ModeVideoCreator<'a> {
	pub graph: &'a MassSpringGraph,
	pub mode: &'a Mode,
	pub animator: ModeAnimator,
	pub amplitude: Float,
	pub num_frames: usize,
	pub frames_per_second: Float,
	pub renderer: FrameRenderer
}

impl<'a> ModeVideoCreator<'a> {
	pub fn frame(&self, frame_i: usize) -> RgbImage {
		let time = frame_i as Float / self.frames_per_second;
		let positions = self.animator.displaced_positions(self.mode, self.graph.masses(), self.amplitude, time);
		let segments = self.animator.displaced_springs(self.graph.springs(), &positions);
		self.renderer.render_frame(self.graph.masses(), &positions, &segments)
	}
	pub fn create(&self, dir: &Path) -> ModalResult<Vec<PathBuf>> {
		std::fs::create_dir_all(dir)?;
		let mut paths = Vec::<PathBuf>::with_capacity(self.num_frames);
		for i in 0..self.num_frames {
			let path = dir.join(format!("mode_{}_frame_{}.png", self.mode.index, i));
			self.frame(i).save(&path)?;
			paths.push(path);
		}
		info!(frames = self.num_frames, dir = %dir.display(), "rendered mode frames");
		Ok(paths)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	fn translater() -> ImagePosTranslater {
		ImagePosTranslater {
			scale: 2.0,
			origin: V2::new(-10.0, -10.0),
			image_size: ImgV2::new(100, 50)
		}
	}
	#[test]
	fn world_to_px() {
		let t = translater();
		assert_eq!(t.world_to_px(V2::new(-10.0, -10.0)), Some(ImgV2::new(0, 0)));
		assert_eq!(t.world_to_px(V2::new(0.0, 0.0)), Some(ImgV2::new(20, 20)));
		assert_eq!(t.world_to_px(V2::new(0.0, 20.0)), None);
		assert_eq!(t.world_to_px(V2::new(-11.0, 0.0)), None);
	}
	#[test]
	fn fit_contains_everything() {
		let positions = vec![V2::new(100.0, 200.0), V2::new(400.0, 200.0), V2::new(250.0, 350.0)];
		let t = ImagePosTranslater::fit(&positions, ImgV2::new(320, 240), 10);
		for p in &positions {
			assert!(t.world_to_px(*p).is_some(), "{:?} fell off the image", p);
		}
	}
	#[test]
	fn frame_draws_masses_and_springs() {
		let mut graph = MassSpringGraph::new();
		graph.add_mass(V2::new(0.0, 0.0), 1.0).unwrap();
		graph.add_mass(V2::new(30.0, 0.0), 1.0).unwrap();
		graph.add_spring(0, 1, 1.0).unwrap();
		let mode = Mode::new(0, 2.0, VDyn::zeros(4), EIGENVALUE_TOLERANCE);
		let renderer = FrameRenderer::new(translater());
		let creator = ModeVideoCreator {
			graph: &graph,
			mode: &mode,
			animator: ModeAnimator::default(),
			amplitude: 1.0,
			num_frames: 1,
			frames_per_second: 30.0,
			renderer
		};
		let image = creator.frame(0);
		// Mass 0 at pixel (20, 20), the spring runs to (80, 20)
		assert_eq!(*image.get_pixel(20, 20), creator.renderer.mass_color);
		assert_eq!(*image.get_pixel(50, 20), creator.renderer.spring_color);
		assert_eq!(*image.get_pixel(50, 40), creator.renderer.background_color);
	}
	#[test]
	fn huge_mass_fills_only_the_image() {
		let renderer = FrameRenderer::new(translater());
		let masses = vec![Mass::new(3, V2::new(0.0, 0.0), 1e12), Mass::new(4, V2::new(1e6, 0.0), 1.0)];
		let positions: Vec<DisplacedPosition> = masses.iter().map(|m| DisplacedPosition{id: m.id, position: m.position}).collect();
		let image = renderer.render_frame(&masses, &positions, &[]);
		assert_eq!(image.dimensions(), (100, 50));
		assert!(image.pixels().all(|p| *p == renderer.mass_color));
	}
	#[test]
	fn clipped_offsets() {
		// Center at pixel 20.5 on a 50 px axis with radius 100
		assert_eq!(FrameRenderer::clip(20.5, 100, 50), (-20, 29));
		assert_eq!(FrameRenderer::clip(20.0, 3, 50), (-3, 3));
		let (low, high) = FrameRenderer::clip(-500.0, 10, 50);
		assert!(low > high);
		let (low, high) = FrameRenderer::clip(Float::NAN, 10, 50);
		assert!(low > high);
	}
}
