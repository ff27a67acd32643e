use std::{fs::File, io::BufReader, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, trace};

use tmb::config::SceneConfig;
use tmb::prelude::*;

#[derive(Parser, Debug)]
#[command(about = "Plays a scene file headless at a fixed tick rate")]
struct Args {
	/// Scene YAML to load
	#[arg(short, long, default_value = "scenes/test.yaml")]
	scene: PathBuf,

	/// Stop after this many ticks
	#[arg(short, long, default_value_t = 600)]
	ticks: u64,

	/// Sleep between ticks to follow the wall clock
	#[arg(short, long)]
	realtime: bool,

	/// Log positions every this many ticks
	#[arg(long, default_value_t = 60)]
	report_every: u64,

	#[arg(long, default_value = "info")]
	log_level: log::LevelFilter,
}

// Stands in for the music player: it only follows world changes.
struct Announcer;

impl WorldListener for Announcer {
	fn on_load(&mut self, world: &World) {
		info!("entering '{}'", world.name);
	}

	fn on_unload(&mut self, world: &World) {
		info!("leaving '{}'", world.name);
	}
}

fn setup_logging(level: log::LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!(
				"{}[{}][{}] {}",
				chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
				record.target(),
				record.level(),
				message
			))
		})
		.level(level)
		.chain(std::io::stdout())
		.apply()?;
	Ok(())
}

fn load_scene(path: &PathBuf) -> Result<SceneConfig> {
	let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
	let cfg = SceneConfig::from_reader(BufReader::new(file))?;
	debug!("loaded {:?}", cfg);
	Ok(cfg)
}

fn main() -> Result<()> {
	let args = Args::parse();
	setup_logging(args.log_level)?;

	let scene = load_scene(&args.scene)?.build()?;
	let frame = scene.step.frame_duration()?;

	let mut sim = Simulation::with_detector(scene.step, scene.detector);
	sim.add_listener(Announcer);
	sim.play(scene.world);

	for _ in 0..args.ticks {
		let start_time = Instant::now();
		let report = sim.tick()?;
		trace!("{:?}", report);

		if args.report_every > 0 && sim.elapsed_ticks() % args.report_every == 0 {
			for (id, pos) in sim.positions() {
				info!("tick {} body {} at ({:.3}, {:.3})", sim.elapsed_ticks(), id, pos.x, pos.y);
			}
		}

		if args.realtime {
			if let Some(rest) = frame.checked_sub(start_time.elapsed()) {
				std::thread::sleep(rest);
			}
		}
	}

	sim.end();
	Ok(())
}
