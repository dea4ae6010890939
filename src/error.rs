use thiserror::Error;

pub type BehaviorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LevelError {
	#[error("Level updated before a collision grid was installed")]
	InvalidState,
	#[error("Invalid range: expected 2, 3 or 4 values, got {arity}")]
	InvalidRange { arity: usize },
	#[error("Range {0:?} reaches past the tile coordinate limits")]
	CoordinateOverflow(Vec<i32>),
	#[error("Pattern {0} is placed past the tile coordinate limits")]
	OffsetOverflow(String),
	#[error("Unknown pattern: {0}")]
	UnknownPattern(String),
	#[error("Pattern references itself: {0}")]
	PatternCycle(String),
	#[error("No factory registered for entity: {0}")]
	UnknownEntity(String),
	#[error("Behavior of entity {entity} failed")]
	Behavior {
		entity: String,
		#[source]
		source: BehaviorError,
	},
	#[error("Cannot read level file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Malformed level data: {0}")]
	Parse(#[from] serde_json::Error),
}
