use crate::coords::{SpanCells, TileCoord};
use crate::error::LevelError;
use crate::level_spec::{PatternLibrary, TileEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedTile<'a> {
	pub pos: TileCoord,
	pub kind: Option<&'a str>,
	pub name: Option<&'a str>,
}

// Entry order, then range order, then cell order; a pattern is walked as soon
// as one of its offsets comes up. Callers let later placements overwrite.
pub fn expand_tiles<'a>(tiles: &'a [TileEntry], patterns: &'a PatternLibrary) -> ExpandTiles<'a> {
	ExpandTiles {
		patterns,
		stack: vec![Frame::new(tiles, TileCoord::default(), None)],
	}
}

#[derive(Debug)]
struct Frame<'a> {
	tiles: &'a [TileEntry],
	offset: TileCoord,
	// Pattern this frame expands; None for the root list.
	pattern: Option<&'a str>,
	entry: usize,
	range: usize,
	cells: Option<SpanCells>,
}

impl<'a> Frame<'a> {
	fn new(tiles: &'a [TileEntry], offset: TileCoord, pattern: Option<&'a str>) -> Self {
		Self { tiles, offset, pattern, entry: 0, range: 0, cells: None }
	}
}

#[derive(Debug)]
pub struct ExpandTiles<'a> {
	patterns: &'a PatternLibrary,
	stack: Vec<Frame<'a>>,
}

impl<'a> ExpandTiles<'a> {
	fn fail(&mut self, err: LevelError) -> Option<Result<ExpandedTile<'a>, LevelError>> {
		self.stack.clear();
		Some(Err(err))
	}
}

impl<'a> Iterator for ExpandTiles<'a> {
	type Item = Result<ExpandedTile<'a>, LevelError>;

	fn next(&mut self) -> Option<Self::Item> {
		let patterns = self.patterns;
		loop {
			let frame = self.stack.last_mut()?;
			let tiles = frame.tiles;

			let Some(cell) = frame.cells.as_mut().and_then(Iterator::next) else {
				// Current range exhausted: move to the next range or entry.
				let Some(entry) = tiles.get(frame.entry) else {
					self.stack.pop();
					continue;
				};
				match entry.ranges().get(frame.range) {
					Some(range) => match range.span() {
						Ok(span) => {
							frame.cells = Some(span.iter_cells());
							frame.range += 1;
						}
						Err(err) => return self.fail(err),
					},
					None => {
						frame.entry += 1;
						frame.range = 0;
						frame.cells = None;
					}
				}
				continue;
			};

			let Some(pos) = cell.checked_add(frame.offset) else {
				let owner = frame.pattern.unwrap_or_default().to_owned();
				return self.fail(LevelError::OffsetOverflow(owner));
			};
			match &tiles[frame.entry] {
				TileEntry::Leaf { kind, name, .. } => {
					return Some(Ok(ExpandedTile {
						pos,
						kind: kind.as_deref(),
						name: name.as_deref(),
					}));
				}
				TileEntry::Pattern { pattern, .. } => {
					let Some(spec) = patterns.get(pattern) else {
						return self.fail(LevelError::UnknownPattern(pattern.clone()));
					};
					if self.stack.iter().any(|f| f.pattern == Some(pattern.as_str())) {
						return self.fail(LevelError::PatternCycle(pattern.clone()));
					}
					self.stack.push(Frame::new(&spec.tiles, pos, Some(pattern.as_str())));
				}
			}
		}
	}
}
