use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use glam::Vec2;

use crate::config::LevelConfig;
use crate::entity::Entity;
use crate::error::LevelError;
use crate::grid::{BackgroundGrid, build_background_grids, build_collision_grid};
use crate::level::Level;
use crate::level_spec::LevelSpec;

type Constructor = Box<dyn Fn() -> Entity>;

#[derive(Default)]
pub struct EntityFactory {
	constructors: HashMap<String, Constructor>,
}

impl fmt::Debug for EntityFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names: Vec<_> = self.constructors.keys().collect();
		names.sort();
		f.debug_struct("EntityFactory").field("names", &names).finish()
	}
}

impl EntityFactory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, name: impl Into<String>, constructor: impl Fn() -> Entity + 'static) {
		self.constructors.insert(name.into(), Box::new(constructor));
	}

	pub fn contains(&self, name: &str) -> bool {
		self.constructors.contains_key(name)
	}

	pub fn create(&self, name: &str) -> Result<Entity, LevelError> {
		let constructor = self
			.constructors
			.get(name)
			.ok_or_else(|| LevelError::UnknownEntity(name.to_string()))?;
		Ok(constructor())
	}
}

#[derive(Debug)]
pub struct LoadedLevel {
	pub level: Level,
	pub sprite_sheet: String,
	pub backgrounds: Vec<BackgroundGrid>,
}

pub fn load_level(spec: &LevelSpec, factory: &EntityFactory, config: LevelConfig) -> Result<LoadedLevel, LevelError> {
	let mut level = Level::with_config(config);

	let collision = build_collision_grid(&spec.merged_tiles(), &spec.patterns)?;
	level.install_collision_grid(collision);

	let backgrounds = build_background_grids(&spec.layers, &spec.patterns)?;

	for es in &spec.entities {
		let mut entity = factory.create(&es.name)?;
		entity.body.pos = Vec2::new(es.pos[0], es.pos[1]);
		level.add_entity(entity);
	}

	log::info!(
		"loaded level: {} layers, {} entities, sprite sheet {}",
		backgrounds.len(),
		level.entities().len(),
		spec.sprite_sheet
	);
	Ok(LoadedLevel {
		level,
		sprite_sheet: spec.sprite_sheet.clone(),
		backgrounds,
	})
}

pub fn load_level_json(json: &str, factory: &EntityFactory, config: LevelConfig) -> Result<LoadedLevel, LevelError> {
	let spec = LevelSpec::from_json(json)?;
	load_level(&spec, factory, config)
}

// Reads `<dir>/<name>.json`.
pub fn load_level_by_name(
	dir: impl AsRef<Path>,
	name: &str,
	factory: &EntityFactory,
	config: LevelConfig,
) -> Result<LoadedLevel, LevelError> {
	let path = dir.as_ref().join(format!("{name}.json"));
	log::debug!("loading level {} from {}", name, path.display());
	let json = std::fs::read_to_string(&path)?;
	load_level_json(&json, factory, config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entity::{Behavior, Body};
	use crate::error::BehaviorError;
	use crate::level::LevelContext;
	use serde_json::json;

	#[derive(Debug)]
	struct Still;

	impl Behavior for Still {
		fn update(&mut self, _body: &mut Body, _dt: f32, _ctx: &LevelContext<'_>) -> Result<(), BehaviorError> {
			Ok(())
		}
	}

	fn factory() -> EntityFactory {
		let mut f = EntityFactory::new();
		f.register("crate", || Entity::new("crate", Vec2::splat(16.0), Still));
		f
	}

	#[test]
	fn factory_creates_registered_entities() {
		let f = factory();
		assert!(f.contains("crate"));
		assert_eq!(f.create("crate").unwrap().name, "crate");
		assert!(matches!(f.create("ghost"), Err(LevelError::UnknownEntity(n)) if n == "ghost"));
	}

	#[test]
	fn load_places_entities_and_grids() {
		let spec: LevelSpec = serde_json::from_value(json!({
			"spriteSheet": "overworld",
			"layers": [
				{ "tiles": [{ "name": "sky", "ranges": [[0, 4, 0, 4]] }] },
				{ "tiles": [{ "type": "ground", "name": "ground", "ranges": [[0, 4, 3]] }] }
			],
			"patterns": {},
			"entities": [
				{ "name": "crate", "pos": [16, 0] },
				{ "name": "crate", "pos": [32, 0] }
			]
		}))
		.unwrap();
		let loaded = load_level(&spec, &factory(), LevelConfig::default()).unwrap();
		assert_eq!(loaded.sprite_sheet, "overworld");
		assert_eq!(loaded.backgrounds.len(), 2);
		assert_eq!(loaded.backgrounds[0].len(), 16);
		assert_eq!(loaded.backgrounds[1].len(), 4);

		let grid = loaded.level.collision_grid().unwrap();
		assert_eq!(grid.len(), 16);
		assert_eq!(grid.get(2, 3).unwrap().kind.as_deref(), Some("ground"));
		assert_eq!(grid.get(2, 2).unwrap().kind, None);

		let xs: Vec<f32> = loaded.level.entities().iter().map(|(_, e)| e.pos().x).collect();
		assert_eq!(xs, vec![16.0, 32.0]);
	}

	#[test]
	fn unknown_entity_fails_load() {
		let json = r#"{ "spriteSheet": "s", "layers": [], "entities": [{ "name": "ghost", "pos": [0, 0] }] }"#;
		assert!(matches!(
			load_level_json(json, &factory(), LevelConfig::default()),
			Err(LevelError::UnknownEntity(_))
		));
	}

	#[test]
	fn load_by_name_reads_json_from_dir() {
		let dir = std::env::temp_dir().join(format!("tilefall-levels-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();
		let json = r#"{ "spriteSheet": "underworld", "layers": [{ "tiles": [{ "type": "ground", "ranges": [[0, 2, 0]] }] }], "entities": [{ "name": "crate", "pos": [0, -16] }] }"#;
		std::fs::write(dir.join("1-2.json"), json).unwrap();

		let loaded = load_level_by_name(&dir, "1-2", &factory(), LevelConfig::default()).unwrap();
		assert_eq!(loaded.sprite_sheet, "underworld");
		assert_eq!(loaded.level.collision_grid().unwrap().len(), 2);
		assert_eq!(loaded.level.entities().len(), 1);

		let missing = load_level_by_name(&dir, "9-9", &factory(), LevelConfig::default());
		assert!(matches!(missing, Err(LevelError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound));
		std::fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn malformed_json_fails_load() {
		assert!(matches!(
			load_level_json("{ not json", &factory(), LevelConfig::default()),
			Err(LevelError::Parse(_))
		));
	}
}
