use std::ops::RangeInclusive;

use crate::entity::{Body, Entity, EntityId, Side};
use crate::grid::{CollisionGrid, CollisionTile};

// Widest run of tiles one lookup may walk along an axis.
const MAX_SCAN_TILES: i32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMatch<'a> {
	pub tile: &'a CollisionTile,
	pub x1: f32,
	pub x2: f32,
	pub y1: f32,
	pub y2: f32,
}

#[derive(Debug, Clone)]
pub struct TileResolver {
	grid: CollisionGrid,
	tile_size: f32,
}

impl TileResolver {
	pub fn new(grid: CollisionGrid, tile_size: f32) -> Self {
		Self { grid, tile_size }
	}

	pub fn grid(&self) -> &CollisionGrid {
		&self.grid
	}

	pub fn to_index(&self, pos: f32) -> i32 {
		(pos / self.tile_size).floor() as i32
	}

	// Tiles touched by [pos1, pos2); never empty. Positions outside i32 tile space
	// saturate at its edges.
	pub fn to_index_range(&self, pos1: f32, pos2: f32) -> RangeInclusive<i32> {
		let first = self.to_index(pos1);
		let last = ((pos2 / self.tile_size).ceil() as i32)
			.saturating_sub(1)
			.max(first)
			.min(first.saturating_add(MAX_SCAN_TILES - 1));
		first..=last
	}

	pub fn get_by_index(&self, x: i32, y: i32) -> Option<TileMatch<'_>> {
		let tile = self.grid.get(x, y)?;
		let x1 = x as f32 * self.tile_size;
		let y1 = y as f32 * self.tile_size;
		Some(TileMatch {
			tile,
			x1,
			x2: x1 + self.tile_size,
			y1,
			y2: y1 + self.tile_size,
		})
	}

	pub fn search_by_position(&self, x: f32, y: f32) -> Option<TileMatch<'_>> {
		self.get_by_index(self.to_index(x), self.to_index(y))
	}

	pub fn search_by_range(&self, x1: f32, x2: f32, y1: f32, y2: f32) -> Vec<TileMatch<'_>> {
		let mut matches = Vec::new();
		for x in self.to_index_range(x1, x2) {
			for y in self.to_index_range(y1, y2) {
				if let Some(m) = self.get_by_index(x, y) {
					matches.push(m);
				}
			}
		}
		matches
	}
}

#[derive(Debug, Clone)]
pub struct TileCollider {
	resolver: TileResolver,
	solid_types: Vec<String>,
}

impl TileCollider {
	pub fn new(grid: CollisionGrid, tile_size: f32, solid_types: Vec<String>) -> Self {
		Self { resolver: TileResolver::new(grid, tile_size), solid_types }
	}

	pub fn grid(&self) -> &CollisionGrid {
		self.resolver.grid()
	}

	pub fn resolver(&self) -> &TileResolver {
		&self.resolver
	}

	fn is_solid(&self, tile: &CollisionTile) -> bool {
		tile.kind
			.as_deref()
			.is_some_and(|kind| self.solid_types.iter().any(|s| s == kind))
	}

	pub fn check_x(&self, entity: &mut Entity) {
		let (body, behavior) = entity.parts();
		let x = if body.vel.x > 0.0 {
			body.right()
		} else if body.vel.x < 0.0 {
			body.left()
		} else {
			return;
		};

		for m in self.resolver.search_by_range(x, x, body.top(), body.bottom()) {
			if !self.is_solid(m.tile) {
				continue;
			}
			if body.vel.x > 0.0 {
				if body.right() > m.x1 {
					body.pos.x = m.x1 - body.size.x;
					body.vel.x = 0.0;
					behavior.obstruct(body, Side::Right);
				}
			} else if body.vel.x < 0.0 && body.left() < m.x2 {
				body.pos.x = m.x2;
				body.vel.x = 0.0;
				behavior.obstruct(body, Side::Left);
			}
		}
	}

	pub fn check_y(&self, entity: &mut Entity) {
		let (body, behavior) = entity.parts();
		let y = if body.vel.y > 0.0 {
			body.bottom()
		} else if body.vel.y < 0.0 {
			body.top()
		} else {
			return;
		};

		for m in self.resolver.search_by_range(body.left(), body.right(), y, y) {
			if !self.is_solid(m.tile) {
				continue;
			}
			if body.vel.y > 0.0 {
				if body.bottom() > m.y1 {
					body.pos.y = m.y1 - body.size.y;
					body.vel.y = 0.0;
					behavior.obstruct(body, Side::Bottom);
				}
			} else if body.vel.y < 0.0 && body.top() < m.y2 {
				body.pos.y = m.y2;
				body.vel.y = 0.0;
				behavior.obstruct(body, Side::Top);
			}
		}
	}
}

// Subjects are live; everyone else is compared by their snapshot body.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityCollider;

impl EntityCollider {
	pub fn check(&self, id: EntityId, subject: &mut Entity, snapshot: &[(EntityId, Body)]) {
		let (body, behavior) = subject.parts();
		for (other_id, other) in snapshot {
			if *other_id == id {
				continue;
			}
			if body.overlaps(other) {
				behavior.collides(body, other);
			}
		}
	}
}
