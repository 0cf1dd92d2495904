/// Geometry and a very small block layout for surfaces on a page

use serde::{Deserialize, Serialize};

/// A position in client or surface-local space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

pub const PAGE_MARGIN: f32 = 8.0;
pub const BLOCK_SPACING: f32 = 8.0;

/// Compute page-space boxes for a sequence of elements in document order.
/// - Sized elements (surfaces) stack vertically, separated by `BLOCK_SPACING`
/// - Unsized elements get an empty box at the current flow position
pub fn layout_blocks(sizes: &[Option<(u32, u32)>]) -> Vec<Rect> {
    let mut y = PAGE_MARGIN;
    let mut boxes = Vec::with_capacity(sizes.len());

    for size in sizes {
        match size {
            Some((w, h)) => {
                boxes.push(Rect::new(PAGE_MARGIN, y, *w as f32, *h as f32));
                y += *h as f32 + BLOCK_SPACING;
            }
            None => boxes.push(Rect::new(PAGE_MARGIN, y, 0.0, 0.0)),
        }
    }

    boxes
}
