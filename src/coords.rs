use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn checked_add(self, rhs: TileCoord) -> Option<TileCoord> {
        Some(TileCoord::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub origin: TileCoord,
    pub width: i32,
    pub height: i32,
}

impl Span {
    pub fn new(x: i32, width: i32, y: i32, height: i32) -> Self {
        Self {
            origin: TileCoord::new(x, y),
            width,
            height,
        }
    }

    // None when the far edge would not fit in an i32.
    pub fn checked(x: i32, width: i32, y: i32, height: i32) -> Option<Self> {
        x.checked_add(width.max(0))?;
        y.checked_add(height.max(0))?;
        Some(Self::new(x, width, y, height))
    }

    pub fn len(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Column by column: x outer, y inner.
    pub fn iter_cells(&self) -> SpanCells {
        SpanCells {
            span: *self,
            dx: 0,
            dy: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpanCells {
    span: Span,
    dx: i32,
    dy: i32,
}

impl Iterator for SpanCells {
    type Item = TileCoord;

    fn next(&mut self) -> Option<TileCoord> {
        if self.span.height <= 0 {
            return None;
        }
        if self.dy >= self.span.height {
            self.dy = 0;
            self.dx += 1;
        }
        if self.dx >= self.span.width {
            return None;
        }
        let c = TileCoord::new(
            self.span.origin.x.checked_add(self.dx)?,
            self.span.origin.y.checked_add(self.dy)?,
        );
        self.dy += 1;
        Some(c)
    }
}
