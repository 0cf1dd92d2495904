//! The stateful 2D drawing context bound to a surface
//!
//! Mirrors the subset of `CanvasRenderingContext2D` a signature pad needs:
//! stroke attributes plus "stroke one straight segment" and "clear a
//! rectangle". Invalid attribute values are ignored the way a browser
//! ignores them, leaving the previous value in place.

use crate::rendering::layout::{Point, Rect};
use crate::rendering::paint::PaintCommand;
use crate::rendering::raster;
use crate::{Error, Result, StrokeStyle};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Context2d {
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    stroke_color: [u8; 4],
}

impl Default for Context2d {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            stroke_color: [0, 0, 0, 255],
        }
    }
}

impl Context2d {
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Stroke color as non-premultiplied RGBA
    pub fn stroke_color(&self) -> [u8; 4] {
        self.stroke_color
    }

    /// Zero, negative and non-finite widths are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        } else {
            log::debug!("ignoring invalid line width {}", width);
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    /// Set the stroke color from a CSS color string such as `#000` or
    /// `rgb(30, 64, 175)`. On error the current color is kept.
    pub fn set_stroke_style(&mut self, css: &str) -> Result<()> {
        let color = csscolorparser::parse(css)
            .map_err(|e| Error::InvalidStyle(format!("{:?}: {}", css, e)))?;
        self.stroke_color = color.to_rgba8();
        Ok(())
    }

    /// Apply a whole stroke style. The color is validated first so a bad
    /// style leaves the context untouched.
    pub fn apply(&mut self, style: &StrokeStyle) -> Result<()> {
        self.set_stroke_style(&style.color)?;
        self.set_line_width(style.line_width);
        self.set_line_cap(style.line_cap);
        self.set_line_join(style.line_join);
        Ok(())
    }

    /// Stroke a single straight segment as its own path (begin, move, line,
    /// stroke). A surface without pixels still yields the command.
    pub fn stroke_line(&self, pixmap: Option<&mut Pixmap>, from: Point, to: Point) -> PaintCommand {
        if let Some(pixmap) = pixmap {
            raster::stroke_line(pixmap, self, from, to);
        }
        PaintCommand::Line { from, to }
    }

    pub fn clear_rect(&self, pixmap: Option<&mut Pixmap>, rect: Rect) -> PaintCommand {
        if let Some(pixmap) = pixmap {
            raster::clear_rect(pixmap, rect);
        }
        PaintCommand::Clear { rect }
    }
}
