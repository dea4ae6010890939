use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;
use crate::error::LevelError;
use crate::expand::expand_tiles;
use crate::level_spec::{LayerSpec, PatternLibrary, TileEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    cells: BTreeMap<TileCoord, T>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self { cells: BTreeMap::new() }
    }
}

impl<T> Matrix<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.cells.get(&TileCoord::new(x, y))
    }

    // Last write wins.
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        self.cells.insert(TileCoord::new(x, y), value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        self.cells.iter().map(|(c, v)| (*c, v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionTile {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackgroundTile {
    pub name: Option<String>,
}

pub type CollisionGrid = Matrix<CollisionTile>;
pub type BackgroundGrid = Matrix<BackgroundTile>;

pub fn build_collision_grid(tiles: &[TileEntry], patterns: &PatternLibrary) -> Result<CollisionGrid, LevelError> {
    let mut grid = CollisionGrid::new();
    for tile in expand_tiles(tiles, patterns) {
        let tile = tile?;
        grid.set(tile.pos.x, tile.pos.y, CollisionTile { kind: tile.kind.map(str::to_owned) });
    }
    log::debug!("collision grid built: {} cells", grid.len());
    Ok(grid)
}

pub fn build_background_grid(tiles: &[TileEntry], patterns: &PatternLibrary) -> Result<BackgroundGrid, LevelError> {
    let mut grid = BackgroundGrid::new();
    for tile in expand_tiles(tiles, patterns) {
        let tile = tile?;
        grid.set(tile.pos.x, tile.pos.y, BackgroundTile { name: tile.name.map(str::to_owned) });
    }
    Ok(grid)
}

// Layer order is draw order.
pub fn build_background_grids(layers: &[LayerSpec], patterns: &PatternLibrary) -> Result<Vec<BackgroundGrid>, LevelError> {
    let grids = layers
        .iter()
        .map(|layer| build_background_grid(&layer.tiles, patterns))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("background grids built for {} layers", grids.len());
    Ok(grids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_spec::{PatternSpec, Range};

    #[test]
    fn later_placement_overwrites() {
        let tiles = vec![
            TileEntry::leaf(Some("ground"), Some("ground"), vec![Range::from([0, 3, 0])]),
            TileEntry::leaf(None, Some("sky"), vec![Range::from([1, 0])]),
        ];
        let patterns = PatternLibrary::new();
        let collision = build_collision_grid(&tiles, &patterns).unwrap();
        assert_eq!(collision.len(), 3);
        assert_eq!(collision.get(0, 0).unwrap().kind.as_deref(), Some("ground"));
        assert_eq!(collision.get(1, 0).unwrap().kind, None);
        let background = build_background_grid(&tiles, &patterns).unwrap();
        assert_eq!(background.get(1, 0).unwrap().name.as_deref(), Some("sky"));
        assert_eq!(background.get(2, 0).unwrap().name.as_deref(), Some("ground"));
    }

    #[test]
    fn layers_stay_separate_for_backgrounds() {
        let layers = vec![
            LayerSpec { tiles: vec![TileEntry::leaf(None, Some("sky"), vec![Range::from([0, 2, 0, 2])])] },
            LayerSpec { tiles: vec![TileEntry::leaf(Some("ground"), Some("brick"), vec![Range::from([0, 1])])] },
        ];
        let patterns = PatternLibrary::new();
        let grids = build_background_grids(&layers, &patterns).unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].len(), 4);
        assert_eq!(grids[0].get(0, 1).unwrap().name.as_deref(), Some("sky"));
        assert_eq!(grids[1].len(), 1);
        assert_eq!(grids[1].get(0, 1).unwrap().name.as_deref(), Some("brick"));
    }

    #[test]
    fn patterns_land_in_grid() {
        let mut patterns = PatternLibrary::new();
        patterns.insert(
            "step".into(),
            PatternSpec { tiles: vec![TileEntry::leaf(Some("ground"), Some("chance"), vec![Range::from([0, 2, 0, 1])])] },
        );
        let tiles = vec![TileEntry::pattern("step", vec![Range::from([10, 4])])];
        let grid = build_collision_grid(&tiles, &patterns).unwrap();
        assert!(grid.get(10, 4).is_some());
        assert!(grid.get(11, 4).is_some());
        assert!(grid.get(12, 4).is_none());
    }

    #[test]
    fn expansion_errors_propagate() {
        let tiles = vec![TileEntry::pattern("nowhere", vec![Range::from([0, 0])])];
        let patterns = PatternLibrary::new();
        assert!(matches!(build_collision_grid(&tiles, &patterns), Err(LevelError::UnknownPattern(_))));
    }

    #[test]
    fn range_past_i32_fails_the_build() {
        let tiles = vec![TileEntry::leaf(Some("ground"), None, vec![Range::from([i32::MAX, 2, 0])])];
        let patterns = PatternLibrary::new();
        assert!(matches!(build_collision_grid(&tiles, &patterns), Err(LevelError::CoordinateOverflow(_))));
        let layers = vec![LayerSpec { tiles }];
        assert!(matches!(build_background_grids(&layers, &patterns), Err(LevelError::CoordinateOverflow(_))));
    }

    #[test]
    fn iter_walks_cells_in_coordinate_order() {
        let mut grid = Matrix::new();
        grid.set(1, 0, 'b');
        grid.set(0, 5, 'a');
        grid.set(1, 0, 'c');
        let cells: Vec<_> = grid.iter().collect();
        assert_eq!(cells, vec![(TileCoord::new(0, 5), &'a'), (TileCoord::new(1, 0), &'c')]);
    }
}
