use crate::collision::{EntityCollider, TileCollider};
use crate::config::LevelConfig;
use crate::entity::{Body, Entity, EntityId, EntitySet};
use crate::error::LevelError;
use crate::grid::CollisionGrid;

// Read-only view of the level handed to behaviors.
#[derive(Debug, Clone, Copy)]
pub struct LevelContext<'a> {
	pub gravity: f32,
	pub total_time: f32,
	pub grid: &'a CollisionGrid,
}

#[derive(Debug)]
pub enum GridState {
	Uninitialized,
	Ready(TileCollider),
}

#[derive(Debug)]
pub struct Level {
	total_time: f32,
	config: LevelConfig,
	entities: EntitySet,
	grid: GridState,
	entity_collider: EntityCollider,
}

impl Default for Level {
	fn default() -> Self {
		Self::new()
	}
}

impl Level {
	pub fn new() -> Self {
		Self::with_config(LevelConfig::default())
	}

	pub fn with_config(config: LevelConfig) -> Self {
		Self {
			total_time: 0.0,
			config,
			entities: EntitySet::new(),
			grid: GridState::Uninitialized,
			entity_collider: EntityCollider,
		}
	}

	pub fn install_collision_grid(&mut self, grid: CollisionGrid) {
		if self.is_ready() {
			log::info!("replacing collision grid ({} cells)", grid.len());
		} else {
			log::debug!("installing collision grid ({} cells)", grid.len());
		}
		let collider = TileCollider::new(grid, self.config.tile_size, self.config.solid_types.clone());
		self.grid = GridState::Ready(collider);
	}

	pub fn is_ready(&self) -> bool {
		matches!(self.grid, GridState::Ready(_))
	}

	pub fn collision_grid(&self) -> Option<&CollisionGrid> {
		match &self.grid {
			GridState::Ready(collider) => Some(collider.grid()),
			GridState::Uninitialized => None,
		}
	}

	pub fn add_entity(&mut self, entity: Entity) -> EntityId {
		log::debug!("adding entity {}", entity.name);
		self.entities.insert(entity)
	}

	pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
		self.entities.remove(id)
	}

	pub fn entities(&self) -> &EntitySet {
		&self.entities
	}

	pub fn entity(&self, id: EntityId) -> Option<&Entity> {
		self.entities.get(id)
	}

	pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
		self.entities.get_mut(id)
	}

	pub fn gravity(&self) -> f32 {
		self.config.gravity
	}

	pub fn total_time(&self) -> f32 {
		self.total_time
	}

	pub fn config(&self) -> &LevelConfig {
		&self.config
	}

	pub fn update(&mut self, dt: f32) -> Result<(), LevelError> {
		let GridState::Ready(tiles) = &self.grid else {
			return Err(LevelError::InvalidState);
		};
		let gravity = self.config.gravity;
		let ctx = LevelContext {
			gravity,
			total_time: self.total_time,
			grid: tiles.grid(),
		};

		for (id, entity) in self.entities.iter_mut() {
			let (body, behavior) = entity.parts();
			behavior.update(body, dt, &ctx).map_err(|source| LevelError::Behavior {
				entity: format!("{} {}", entity.name, id),
				source,
			})?;

			entity.body.pos.x += entity.body.vel.x * dt;
			tiles.check_x(entity);

			entity.body.pos.y += entity.body.vel.y * dt;
			tiles.check_y(entity);

			// After collision: this frame's fall shows up next frame.
			entity.body.vel.y += gravity * dt;
		}

		// Only once everyone has moved.
		let snapshot: Vec<(EntityId, Body)> = self.entities.iter().map(|(id, e)| (id, e.body)).collect();
		for (id, entity) in self.entities.iter_mut() {
			self.entity_collider.check(id, entity, &snapshot);
		}

		self.total_time += dt;
		log::trace!("frame done at t={:.3} with {} entities", self.total_time, self.entities.len());
		Ok(())
	}
}
