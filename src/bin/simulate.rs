use std::process::ExitCode;

use glam::Vec2;
use tilefall::*;

// ---------- Defaults ----------
const DEFAULT_FRAMES: u32 = 120;
const DEFAULT_DT: f32 = 1.0 / 60.0;
const DEFAULT_LEVELS_DIR: &str = "levels";
const WALK_SPEED: f32 = 30.0;

// ---------- Demo behaviors ----------
// Turns around when blocked sideways.
#[derive(Debug)]
struct Walker {
	speed: f32,
}

impl Behavior for Walker {
	fn update(&mut self, body: &mut Body, _dt: f32, _ctx: &LevelContext<'_>) -> Result<(), BehaviorError> {
		body.vel.x = self.speed;
		Ok(())
	}

	fn obstruct(&mut self, _body: &mut Body, side: Side) {
		if matches!(side, Side::Left | Side::Right) {
			self.speed = -self.speed;
		}
	}

	fn collides(&mut self, body: &mut Body, other: &Body) {
		if other.pos.x > body.pos.x {
			self.speed = -self.speed.abs();
		} else {
			self.speed = self.speed.abs();
		}
	}
}

#[derive(Debug)]
struct Inert;

impl Behavior for Inert {
	fn update(&mut self, _body: &mut Body, _dt: f32, _ctx: &LevelContext<'_>) -> Result<(), BehaviorError> {
		Ok(())
	}
}

fn demo_factory() -> EntityFactory {
	let mut factory = EntityFactory::new();
	factory.register("walker", || Entity::new("walker", Vec2::splat(16.0), Walker { speed: -WALK_SPEED }));
	factory.register("inert", || Entity::new("inert", Vec2::splat(16.0), Inert));
	factory
}

// ---------- Arguments ----------
#[derive(Debug)]
struct Args {
	level: String,
	frames: u32,
	dt: f32,
	config: Option<String>,
	levels_dir: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
	let mut level = None;
	let mut frames = DEFAULT_FRAMES;
	let mut dt = DEFAULT_DT;
	let mut config = None;
	let mut levels_dir = DEFAULT_LEVELS_DIR.to_string();
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"--frames" => {
				let v = args.next().ok_or("--frames needs a value")?;
				frames = v.parse().map_err(|e| format!("bad --frames {v}: {e}"))?;
			}
			"--dt" => {
				let v = args.next().ok_or("--dt needs a value")?;
				dt = v.parse().map_err(|e| format!("bad --dt {v}: {e}"))?;
			}
			"--config" => config = Some(args.next().ok_or("--config needs a path")?),
			"--levels" => levels_dir = args.next().ok_or("--levels needs a directory")?,
			_ if level.is_none() => level = Some(arg),
			_ => return Err(format!("unexpected argument: {arg}")),
		}
	}
	Ok(Args {
		level: level.ok_or("usage: simulate <level.json | NAME> [--levels DIR] [--frames N] [--dt SECONDS] [--config PATH]")?,
		frames,
		dt,
		config,
		levels_dir,
	})
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
	let config = match &args.config {
		Some(path) => LevelConfig::from_json(&std::fs::read_to_string(path)?)?,
		None => LevelConfig::default(),
	};
	let factory = demo_factory();
	// A bare name is looked up in the levels directory.
	let mut loaded = if args.level.ends_with(".json") {
		load_level_json(&std::fs::read_to_string(&args.level)?, &factory, config)?
	} else {
		load_level_by_name(&args.levels_dir, &args.level, &factory, config)?
	};
	if let Some(grid) = loaded.level.collision_grid() {
		let solid_types = &loaded.level.config().solid_types;
		let solid = grid
			.iter()
			.filter(|(_, tile)| tile.kind.as_ref().is_some_and(|k| solid_types.contains(k)))
			.count();
		println!("{}: {} cells, {} solid", args.level, grid.len(), solid);
	}

	for _ in 0..args.frames {
		loaded.level.update(args.dt)?;
	}

	println!("t = {:.3}s after {} frames", loaded.level.total_time(), args.frames);
	for (id, entity) in loaded.level.entities().iter() {
		let (pos, vel) = (entity.pos(), entity.vel());
		println!(
			"{} {:<8} pos=({:.1}, {:.1}) vel=({:.1}, {:.1})",
			id, entity.name, pos.x, pos.y, vel.x, vel.y
		);
	}
	Ok(())
}

// ---------- Entry ----------
fn main() -> ExitCode {
	env_logger::init();
	let args = match parse_args(std::env::args().skip(1)) {
		Ok(args) => args,
		Err(msg) => {
			eprintln!("{msg}");
			return ExitCode::from(2);
		}
	};
	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("simulation failed: {e}");
			eprintln!("error: {e}");
			ExitCode::FAILURE
		}
	}
}
