// Command line front end, mostly for playing around with the pipeline
use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use spring_modes::prelude::*;
use spring_modes::render::{FrameRenderer, ImagePosTranslater, ImgV2, ModeVideoCreator};

#[derive(Parser)]
#[command(name = "spring_modes")]
#[command(version, about = APP_NAME)]
struct Cli {
	#[command(subcommand)]
	command: Commands
}

#[derive(Args)]
struct GraphSource {
	/// JSON file with "masses" and "springs"
	#[arg(short, long)]
	graph: Option<PathBuf>,
	/// Without a graph file, use this many masses on a ring with a spring between neighbours
	#[arg(short, long, default_value_t = 3)]
	ring: usize,
	/// Spring constant for the ring springs
	#[arg(short, long, default_value_t = 1.0)]
	k: Float,
	/// JSON file with modal settings, missing fields take their defaults
	#[arg(short, long)]
	settings: Option<PathBuf>
}

#[derive(Subcommand)]
enum Commands {
	/// Print the eigenvalues and physical modes
	Modes {
		#[command(flatten)]
		source: GraphSource
	},
	/// Write PNG frames of one physical mode oscillating
	Render {
		#[command(flatten)]
		source: GraphSource,
		/// Index among the physical modes
		#[arg(short, long, default_value_t = 0)]
		mode: usize,
		#[arg(long, default_value_t = 1.0)]
		amplitude: Float,
		#[arg(long, default_value_t = 120)]
		frames: usize,
		#[arg(long, default_value_t = 30.0)]
		fps: Float,
		#[arg(long, default_value_t = 600)]
		width: u32,
		#[arg(long, default_value_t = 400)]
		height: u32,
		#[arg(short, long, default_value = "frames")]
		out: PathBuf
	}
}

fn ring_with_springs(n: usize, k: Float) -> ModalResult<MassSpringGraph> {
	let mut graph = MassSpringGraph::ring(n);
	match n {
		0 | 1 => {},
		2 => graph.add_spring(0, 1, k)?,
		_ => for i in 0..n {
			graph.add_spring(i, (i + 1) % n, k)?;
		}
	}
	Ok(graph)
}

fn load(source: &GraphSource) -> ModalResult<(MassSpringGraph, ModalSettings)> {
	let graph = match &source.graph {
		Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
		None => ring_with_springs(source.ring, source.k)?
	};
	let settings = match &source.settings {
		Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
		None => ModalSettings::default()
	};
	Ok((graph, settings))
}

fn print_modes(source: &GraphSource) -> ModalResult<()> {
	let (graph, settings) = load(source)?;
	let mut session = ModalSession::new(SymmetricEigenSolver::default(), settings);
	let analysis = session.refresh(&graph)?;
	for warning in &analysis.warnings {
		println!("warning: {:?}", warning);
	}
	if !analysis.unattached.is_empty() {
		let ids: Vec<String> = analysis.unattached.iter().map(|id| id.to_string()).collect();
		println!("warning: masses without springs: {}", ids.join(", "));
	}
	let summary: Vec<String> = analysis.modes.eigenvalue_summary().iter().map(|entry| match entry {
		EigenvalueEntry::Zero{multiplicity} => format!("0 (multiplicity {})", multiplicity),
		EigenvalueEntry::Value(v) => format!("{:.4}", v)
	}).collect();
	println!("Eigenvalues: [{}]", summary.join(", "));
	for (i, mode) in analysis.modes.physical().enumerate() {
		let vector: Vec<String> = mode.vector.iter().map(|v| format!("{:.3}", v)).collect();
		println!(
			"Mode {}: lambda = {:.4}, omega = {:.4} rad/s, f = {:.4} Hz, v = [{}]",
			i,
			mode.eigenvalue,
			mode.angular_frequency,
			mode.frequency,
			vector.join(", ")
		);
	}
	Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render(source: &GraphSource, mode_i: usize, amplitude: Float, frames: usize, fps: Float, width: u32, height: u32, out: &PathBuf) -> ModalResult<()> {
	let (graph, settings) = load(source)?;
	let mut session = ModalSession::new(SymmetricEigenSolver::default(), settings);
	let animator = session.animator();
	let analysis = session.refresh(&graph)?;
	let mode = analysis.modes.physical_mode(mode_i).ok_or_else(|| ModalError::DimensionMismatch(format!(
		"there are {} physical modes, no mode {}",
		analysis.modes.physical_count(),
		mode_i
	)))?;
	// Leave room for the largest excursion
	let positions: Vec<V2> = graph.masses().iter().enumerate().flat_map(|(i, m)| {
		let d = mode.displacement(i) * amplitude.max(0.0) * animator.amplitude_scale;
		[m.position + d, m.position - d]
	}).collect();
	let translater = ImagePosTranslater::fit(&positions, ImgV2::new(width, height), 20);
	let creator = ModeVideoCreator {
		graph: &graph,
		mode,
		animator,
		amplitude,
		num_frames: frames,
		frames_per_second: fps,
		renderer: FrameRenderer::new(translater)
	};
	let paths = creator.create(out)?;
	println!("Wrote {} frames to {}", paths.len(), out.display());
	Ok(())
}

fn main() {
	tracing_subscriber::fmt::init();
	let cli = Cli::parse();
	let result = match &cli.command {
		Commands::Modes{source} => print_modes(source),
		Commands::Render{source, mode, amplitude, frames, fps, width, height, out} => render(source, *mode, *amplitude, *frames, *fps, *width, *height, out)
	};
	if let Err(e) = result {
		eprintln!("Error: {e}");
		std::process::exit(1);
	}
}
