use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::BehaviorError;
use crate::level::LevelContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
	Top,
	Bottom,
	Left,
	Right,
}

// `pos` is the top-left corner; +y points down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
	pub pos: Vec2,
	pub vel: Vec2,
	pub size: Vec2,
}

impl Body {
	pub fn new(size: Vec2) -> Self {
		Self { pos: Vec2::ZERO, vel: Vec2::ZERO, size }
	}

	pub fn left(&self) -> f32 {
		self.pos.x
	}
	pub fn right(&self) -> f32 {
		self.pos.x + self.size.x
	}
	pub fn top(&self) -> f32 {
		self.pos.y
	}
	pub fn bottom(&self) -> f32 {
		self.pos.y + self.size.y
	}

	pub fn overlaps(&self, other: &Body) -> bool {
		self.bottom() > other.top()
			&& self.top() < other.bottom()
			&& self.left() < other.right()
			&& self.right() > other.left()
	}
}

pub trait Behavior: fmt::Debug {
	fn update(&mut self, body: &mut Body, dt: f32, ctx: &LevelContext<'_>) -> Result<(), BehaviorError>;

	// Body is already clamped when this runs.
	fn obstruct(&mut self, _body: &mut Body, _side: Side) {}

	fn collides(&mut self, _body: &mut Body, _other: &Body) {}
}

#[derive(Debug)]
pub struct Entity {
	pub name: String,
	pub body: Body,
	behavior: Box<dyn Behavior>,
}

impl Entity {
	pub fn new(name: impl Into<String>, size: Vec2, behavior: impl Behavior + 'static) -> Self {
		Self {
			name: name.into(),
			body: Body::new(size),
			behavior: Box::new(behavior),
		}
	}

	pub fn pos(&self) -> Vec2 {
		self.body.pos
	}

	pub fn vel(&self) -> Vec2 {
		self.body.vel
	}

	pub(crate) fn parts(&mut self) -> (&mut Body, &mut dyn Behavior) {
		(&mut self.body, self.behavior.as_mut())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug, Default)]
pub struct EntitySet {
	slots: Vec<(EntityId, Entity)>,
	index: HashMap<EntityId, usize>,
	next_id: u32,
}

impl EntitySet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, entity: Entity) -> EntityId {
		let id = EntityId(self.next_id);
		self.next_id += 1;
		self.index.insert(id, self.slots.len());
		self.slots.push((id, entity));
		id
	}

	pub fn contains(&self, id: EntityId) -> bool {
		self.index.contains_key(&id)
	}

	pub fn get(&self, id: EntityId) -> Option<&Entity> {
		self.index.get(&id).map(|&i| &self.slots[i].1)
	}

	pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
		let i = *self.index.get(&id)?;
		Some(&mut self.slots[i].1)
	}

	pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
		let i = self.index.remove(&id)?;
		let (_, entity) = self.slots.remove(i);
		for (j, (other, _)) in self.slots.iter().enumerate().skip(i) {
			self.index.insert(*other, j);
		}
		Some(entity)
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
		self.slots.iter().map(|(id, _)| *id)
	}

	pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
		self.slots.iter().map(|(id, e)| (*id, e))
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
		self.slots.iter_mut().map(|(id, e)| (*id, e))
	}
}
