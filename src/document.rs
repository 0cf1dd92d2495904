//! Host document: the elements a signature pad can be bound to.
//!
//! A `Document` is parsed once from HTML. Every element gets an
//! [`ElementHandle`] in document order; `<canvas>` elements additionally own a
//! [`Canvas`] (pixel buffer, lazily created 2D context and origin-clean flag).
//! Element boxes come from the block layout in [`crate::rendering::layout`]
//! and are reported in client space, i.e. shifted by the scroll offset.

use crate::rendering::context::Context2d;
use crate::rendering::layout::{layout_blocks, Point, Rect};
use crate::rendering::paint::PaintCommand;
use crate::rendering::{
    raster, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH, MAX_SURFACE_AREA, MAX_SURFACE_DIMENSION,
};
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use tiny_skia::Pixmap;

/// Non-owning reference to an element of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A drawing-capable surface
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
    context: Option<Context2d>,
    origin_clean: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixmap: raster::new_surface(width, height),
            context: None,
            origin_clean: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Acquire the 2D context, creating it on first use. Later calls return
    /// the same context with whatever attributes were set on it.
    pub fn get_context_2d(&mut self) -> &mut Context2d {
        self.context.get_or_insert_with(Context2d::default)
    }

    /// The context, if one was acquired
    pub fn context_2d(&self) -> Option<&Context2d> {
        self.context.as_ref()
    }

    /// Stroke one segment with the bound context. Returns `None` when no
    /// context has been acquired yet.
    pub fn stroke_line(&mut self, from: Point, to: Point) -> Option<PaintCommand> {
        let ctx = self.context.as_ref()?;
        Some(ctx.stroke_line(self.pixmap.as_mut(), from, to))
    }

    /// Erase the whole surface to transparent black.
    pub fn clear(&mut self) -> PaintCommand {
        let rect = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
        let ctx = self.context.get_or_insert_with(Context2d::default);
        ctx.clear_rect(self.pixmap.as_mut(), rect)
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// True when every pixel is transparent (or there are no pixels).
    pub fn is_blank(&self) -> bool {
        self.pixmap.as_ref().map_or(true, raster::is_fully_transparent)
    }

    pub fn is_origin_clean(&self) -> bool {
        self.origin_clean
    }

    /// Mark the surface as holding cross-origin content; it can no longer be
    /// read back.
    pub fn taint(&mut self) {
        self.origin_clean = false;
    }

    /// Encode the pixels as a PNG data URL.
    pub fn to_data_url(&self) -> Result<String> {
        if !self.is_origin_clean() {
            return Err(Error::SecurityError(
                "the surface has been tainted by cross-origin data".into(),
            ));
        }
        match &self.pixmap {
            Some(pixmap) => Ok(raster::png_data_url(&raster::encode_png(pixmap)?)),
            None => Ok(raster::EMPTY_DATA_URL.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct Element {
    tag: String,
    id: Option<String>,
    rect: Rect,
    canvas: Option<Canvas>,
}

impl Element {
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether a 2D context can be acquired on this element
    pub fn is_drawable(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut Canvas> {
        self.canvas.as_mut()
    }

    /// Short human-readable description for log messages
    pub fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("<{} id=\"{}\">", self.tag, id),
            None => format!("<{}>", self.tag),
        }
    }
}

#[derive(Debug)]
pub struct Document {
    html: Html,
    elements: Vec<Element>,
    scroll: Point,
}

// Depth-first traversal preserving document order. Element handles are
// indices into this order.
fn document_order(html: &Html) -> Vec<ElementRef<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![html.root_element()];
    while let Some(node) = stack.pop() {
        let children: Vec<_> = node.children().filter_map(ElementRef::wrap).collect();
        out.push(node);
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    out
}

// HTML "rules for parsing non-negative integers": leading whitespace, an
// optional '+', then as many ASCII digits as follow. "200px" is 200.
fn parse_non_negative_integer(raw: &str) -> Option<u64> {
    let s = raw.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

fn surface_dimension(value: Option<&str>, default: u32, name: &str) -> u32 {
    let Some(v) = value.and_then(parse_non_negative_integer) else {
        return default;
    };
    if v <= u64::from(MAX_SURFACE_DIMENSION) {
        v as u32
    } else {
        log::warn!("canvas {} {} exceeds {}; using {}", name, v, MAX_SURFACE_DIMENSION, default);
        default
    }
}

fn surface_size(width: Option<&str>, height: Option<&str>) -> (u32, u32) {
    let w = surface_dimension(width, DEFAULT_SURFACE_WIDTH, "width");
    let h = surface_dimension(height, DEFAULT_SURFACE_HEIGHT, "height");
    if u64::from(w) * u64::from(h) > MAX_SURFACE_AREA {
        log::warn!(
            "canvas {}x{} exceeds {} pixels; using {}x{}",
            w,
            h,
            MAX_SURFACE_AREA,
            DEFAULT_SURFACE_WIDTH,
            DEFAULT_SURFACE_HEIGHT
        );
        return (DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT);
    }
    (w, h)
}

impl Document {
    /// Parse a document and lay out its surfaces.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);

        let mut elements = Vec::new();
        let mut sizes = Vec::new();
        for node in document_order(&html) {
            let value = node.value();
            let tag = value.name().to_string();
            let canvas = (tag == "canvas").then(|| {
                let (width, height) = surface_size(value.attr("width"), value.attr("height"));
                Canvas::new(width, height)
            });
            sizes.push(canvas.as_ref().map(|c| (c.width(), c.height())));
            elements.push(Element {
                tag,
                id: value.attr("id").map(|s| s.to_string()),
                rect: Rect::default(),
                canvas,
            });
        }

        for (element, rect) in elements.iter_mut().zip(layout_blocks(&sizes)) {
            element.rect = rect;
        }

        log::debug!(
            "parsed document: {} elements, {} surfaces",
            elements.len(),
            elements.iter().filter(|e| e.is_drawable()).count()
        );

        Self {
            html,
            elements,
            scroll: Point::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `handle` refers to an element of this document
    pub fn contains(&self, handle: ElementHandle) -> bool {
        handle.0 < self.elements.len()
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle.0)
    }

    pub fn element_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.elements.get_mut(handle.0)
    }

    pub fn canvas(&self, handle: ElementHandle) -> Option<&Canvas> {
        self.element(handle)?.canvas()
    }

    pub fn canvas_mut(&mut self, handle: ElementHandle) -> Option<&mut Canvas> {
        self.element_mut(handle)?.canvas_mut()
    }

    /// First element whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(ElementHandle)
    }

    /// First element in document order matching a CSS selector
    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>> {
        let sel = Selector::parse(selector)
            .map_err(|e| Error::InvalidSelector(format!("{}: {:?}", selector, e)))?;
        Ok(document_order(&self.html)
            .iter()
            .position(|el| sel.matches(el))
            .map(ElementHandle))
    }

    /// Box of the element in client space (page box minus scroll offset)
    pub fn bounding_client_rect(&self, handle: ElementHandle) -> Option<Rect> {
        let rect = self.element(handle)?.rect;
        Some(rect.translate(-self.scroll.x, -self.scroll.y))
    }

    /// Move an element's box to a page position, keeping its size.
    pub fn set_position(&mut self, handle: ElementHandle, x: f32, y: f32) -> Result<()> {
        let element = self
            .element_mut(handle)
            .ok_or_else(|| Error::SurfaceNotFound(format!("element #{}", handle.0)))?;
        element.rect.x = x;
        element.rect.y = y;
        Ok(())
    }

    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.scroll = Point::new(x, y);
    }
}
