/// Rasterization of paint commands onto surface pixels, plus PNG export

use crate::rendering::context::{Context2d, LineCap, LineJoin};
use crate::rendering::layout::{Point, Rect};
use crate::{Error, Result};
use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};
use tiny_skia::{BlendMode, Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Prefix of every exported image
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// What a surface without pixels (zero width or height) exports as
pub const EMPTY_DATA_URL: &str = "data:,";

/// Allocate a transparent surface. Returns `None` for zero-sized surfaces.
pub fn new_surface(width: u32, height: u32) -> Option<Pixmap> {
    Pixmap::new(width, height)
}

fn pen(ctx: &Context2d) -> Paint<'static> {
    let [r, g, b, a] = ctx.stroke_color();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn sk_stroke(ctx: &Context2d) -> Stroke {
    let mut stroke = Stroke::default();
    stroke.width = ctx.line_width();
    stroke.line_cap = match ctx.line_cap() {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    };
    stroke.line_join = match ctx.line_join() {
        LineJoin::Miter => tiny_skia::LineJoin::Miter,
        LineJoin::Round => tiny_skia::LineJoin::Round,
        LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
    };
    stroke
}

/// Stroke the segment `from -> to` with the context's current pen.
pub fn stroke_line(pixmap: &mut Pixmap, ctx: &Context2d, from: Point, to: Point) {
    let paint = pen(ctx);

    // A zero-length segment is only visible through its caps.
    if from == to {
        stroke_dot(pixmap, ctx, &paint, from);
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    let Some(path) = pb.finish() else {
        log::debug!("skipping degenerate segment {:?} -> {:?}", from, to);
        return;
    };

    pixmap.stroke_path(&path, &paint, &sk_stroke(ctx), Transform::identity(), None);
}

fn stroke_dot(pixmap: &mut Pixmap, ctx: &Context2d, paint: &Paint<'_>, at: Point) {
    let half = ctx.line_width() / 2.0;
    match ctx.line_cap() {
        LineCap::Butt => {}
        LineCap::Round => {
            if let Some(circle) = PathBuilder::from_circle(at.x, at.y, half) {
                pixmap.fill_path(&circle, paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        LineCap::Square => {
            let width = ctx.line_width();
            if let Some(square) = tiny_skia::Rect::from_xywh(at.x - half, at.y - half, width, width) {
                pixmap.fill_rect(square, paint, Transform::identity(), None);
            }
        }
    }
}

/// Reset every pixel inside `rect` to transparent black.
pub fn clear_rect(pixmap: &mut Pixmap, rect: Rect) {
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    if rect.x <= 0.0 && rect.y <= 0.0 && rect.x + rect.width >= w && rect.y + rect.height >= h {
        pixmap.fill(Color::TRANSPARENT);
        return;
    }

    let Some(area) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
        return;
    };
    let mut paint = Paint::default();
    paint.blend_mode = BlendMode::Clear;
    paint.anti_alias = false;
    pixmap.fill_rect(area, &paint, Transform::identity(), None);
}

pub fn is_fully_transparent(pixmap: &Pixmap) -> bool {
    pixmap.pixels().iter().all(|p| p.alpha() == 0)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    pixmap
        .encode_png()
        .map_err(|e| Error::EncodeError(e.to_string()))
}

/// Wrap PNG bytes as `data:image/png;base64,<payload>`.
pub fn png_data_url(png: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png);
    format!("{}{}", PNG_DATA_URL_PREFIX, payload)
}

/// Recover the PNG bytes from a data URL produced by [`png_data_url`].
pub fn decode_png_data_url(url: &str) -> Option<Vec<u8>> {
    let payload = url.strip_prefix(PNG_DATA_URL_PREFIX)?;
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}

/// Hex SHA-256 of encoded image bytes, used to compare exports.
pub fn png_digest(png: &[u8]) -> String {
    hex::encode(Sha256::digest(png))
}
