pub mod collision;
pub mod config;
pub mod coords;
pub mod entity;
pub mod error;
pub mod expand;
pub mod grid;
pub mod level;
pub mod level_spec;
pub mod loader;

// Re-exports for convenience in tests and integration users.
pub use collision::{EntityCollider, TileCollider, TileResolver};
pub use config::LevelConfig;
pub use coords::{Span, TileCoord};
pub use entity::{Behavior, Body, Entity, EntityId, EntitySet, Side};
pub use error::{BehaviorError, LevelError};
pub use expand::{ExpandedTile, expand_tiles};
pub use grid::{BackgroundGrid, CollisionGrid, Matrix, build_background_grids, build_collision_grid};
pub use level::{Level, LevelContext};
pub use level_spec::{LevelSpec, PatternLibrary, Range, TileEntry};
pub use loader::{EntityFactory, LoadedLevel, load_level, load_level_by_name, load_level_json};
