/// Paint commands issued by the 2D context

use crate::rendering::layout::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// One stroked straight segment
    Line { from: Point, to: Point },
    /// Pixels inside `rect` reset to transparent black
    Clear { rect: Rect },
}

impl PaintCommand {
    pub fn is_line(&self) -> bool {
        matches!(self, PaintCommand::Line { .. })
    }
}
