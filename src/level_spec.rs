use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coords::Span;
use crate::error::LevelError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSpec {
	pub sprite_sheet: String,
	#[serde(default)]
	pub layers: Vec<LayerSpec>,
	#[serde(default)]
	pub patterns: PatternLibrary,
	#[serde(default)]
	pub entities: Vec<EntitySpec>,
}

impl LevelSpec {
	pub fn from_json(s: &str) -> Result<Self, LevelError> {
		Ok(serde_json::from_str(s)?)
	}

	// Layer identity is dropped; order is kept.
	pub fn merged_tiles(&self) -> Vec<TileEntry> {
		self.layers.iter().flat_map(|l| l.tiles.iter().cloned()).collect()
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSpec {
	#[serde(default)]
	pub tiles: Vec<TileEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSpec {
	#[serde(default)]
	pub tiles: Vec<TileEntry>,
}

pub type PatternLibrary = HashMap<String, PatternSpec>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpec {
	pub name: String,
	pub pos: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileEntry {
	Pattern {
		pattern: String,
		ranges: Vec<Range>,
	},
	Leaf {
		#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
		kind: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		name: Option<String>,
		ranges: Vec<Range>,
	},
}

impl TileEntry {
	pub fn leaf(kind: Option<&str>, name: Option<&str>, ranges: Vec<Range>) -> Self {
		TileEntry::Leaf {
			kind: kind.map(str::to_owned),
			name: name.map(str::to_owned),
			ranges,
		}
	}

	pub fn pattern(id: &str, ranges: Vec<Range>) -> Self {
		TileEntry::Pattern { pattern: id.to_owned(), ranges }
	}

	pub fn ranges(&self) -> &[Range] {
		match self {
			TileEntry::Pattern { ranges, .. } | TileEntry::Leaf { ranges, .. } => ranges,
		}
	}
}

// `[x, y]`, `[x, width, y]` or `[x, width, y, height]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Range(pub Vec<i32>);

impl Range {
	pub fn span(&self) -> Result<Span, LevelError> {
		let (x, width, y, height) = match self.0.as_slice() {
			&[x, width, y, height] => (x, width, y, height),
			&[x, width, y] => (x, width, y, 1),
			&[x, y] => (x, 1, y, 1),
			other => return Err(LevelError::InvalidRange { arity: other.len() }),
		};
		Span::checked(x, width, y, height).ok_or_else(|| LevelError::CoordinateOverflow(self.0.clone()))
	}
}

impl From<&[i32]> for Range {
	fn from(values: &[i32]) -> Self {
		Range(values.to_vec())
	}
}

impl<const N: usize> From<[i32; N]> for Range {
	fn from(values: [i32; N]) -> Self {
		Range(values.to_vec())
	}
}
