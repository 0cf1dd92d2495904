//! The signature pad widget: a stroke state machine bound to one surface.
//!
//! ```text
//! Idle     -> Drawing   (stroke start: pointer down / touch start)
//! Drawing  -> Drawing   (move: one segment from the last point, last = current)
//! Any      -> Idle      (stroke end: pointer up / leave, touch end / cancel)
//! ```
//!
//! Moves while idle are ignored. The last recorded point lives inside
//! `StrokeState::Drawing`, so it cannot be used outside a stroke.

use crate::document::{Document, ElementHandle};
use crate::input::{InputEvent, Phase};
use crate::rendering::layout::Point;
use crate::rendering::paint::PaintCommand;
use crate::{Error, Result, StrokeStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing {
        /// Last recorded point, surface-local
        last: Point,
    },
}

#[derive(Debug, Clone)]
pub struct SignaturePad {
    surface: ElementHandle,
    state: StrokeState,
}

impl SignaturePad {
    /// Bind a pad to `surface`: acquire its 2D context and apply `style`.
    pub fn attach(document: &mut Document, surface: ElementHandle, style: &StrokeStyle) -> Result<Self> {
        let element = document
            .element_mut(surface)
            .ok_or_else(|| Error::SurfaceNotFound(format!("element #{}", surface.index())))?;
        let description = element.describe();
        let canvas = element
            .canvas_mut()
            .ok_or(Error::NotDrawable(description))?;
        canvas.get_context_2d().apply(style)?;

        Ok(Self {
            surface,
            state: StrokeState::Idle,
        })
    }

    pub fn surface(&self) -> ElementHandle {
        self.surface
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Advance the state machine with one event. Returns the segment drawn,
    /// if any.
    pub fn handle_event(&mut self, document: &mut Document, event: &InputEvent) -> Option<PaintCommand> {
        match event.kind.phase() {
            Phase::Start => {
                // Every stroke start resets the tracking state; a start
                // without coordinates leaves the pad idle.
                self.state = match self.local_position(document, event) {
                    Some(last) => StrokeState::Drawing { last },
                    None => StrokeState::Idle,
                };
                None
            }
            Phase::Move => {
                let StrokeState::Drawing { last } = self.state else {
                    return None;
                };
                let current = self.local_position(document, event)?;
                let cmd = document
                    .canvas_mut(self.surface)?
                    .stroke_line(last, current)?;
                self.state = StrokeState::Drawing { last: current };
                Some(cmd)
            }
            Phase::End => {
                self.state = StrokeState::Idle;
                None
            }
        }
    }

    fn local_position(&self, document: &Document, event: &InputEvent) -> Option<Point> {
        let rect = document.bounding_client_rect(self.surface)?;
        event.local_position(&rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<body><p id="note">x</p><canvas id="pad" width="100" height="60"></canvas></body>"#;

    fn setup() -> (Document, SignaturePad, Point) {
        let mut doc = Document::parse(PAGE);
        let handle = doc.get_element_by_id("pad").unwrap();
        let pad = SignaturePad::attach(&mut doc, handle, &StrokeStyle::default()).unwrap();
        let origin = doc.bounding_client_rect(handle).unwrap().origin();
        (doc, pad, origin)
    }

    #[test]
    fn attach_applies_stroke_style() {
        let (doc, pad, _) = setup();
        let ctx = doc.canvas(pad.surface()).unwrap().context_2d().unwrap();
        assert_eq!(ctx.line_width(), 2.0);
        assert_eq!(pad.state(), StrokeState::Idle);
    }

    #[test]
    fn attach_rejects_non_drawable_elements() {
        let mut doc = Document::parse(PAGE);
        let note = doc.get_element_by_id("note").unwrap();
        let err = SignaturePad::attach(&mut doc, note, &StrokeStyle::default()).unwrap_err();
        assert!(matches!(err, Error::NotDrawable(_)));
    }

    #[test]
    fn stroke_lifecycle() {
        let (mut doc, mut pad, o) = setup();

        assert!(pad
            .handle_event(&mut doc, &InputEvent::pointer_move(o.x + 5.0, o.y + 5.0))
            .is_none());

        pad.handle_event(&mut doc, &InputEvent::pointer_down(o.x + 10.0, o.y + 10.0));
        assert_eq!(pad.state(), StrokeState::Drawing { last: Point::new(10.0, 10.0) });

        let cmd = pad
            .handle_event(&mut doc, &InputEvent::pointer_move(o.x + 40.0, o.y + 10.0))
            .unwrap();
        assert_eq!(
            cmd,
            PaintCommand::Line { from: Point::new(10.0, 10.0), to: Point::new(40.0, 10.0) }
        );
        assert_eq!(pad.state(), StrokeState::Drawing { last: Point::new(40.0, 10.0) });

        pad.handle_event(&mut doc, &InputEvent::pointer_leave());
        assert!(!pad.is_drawing());
        assert!(!doc.canvas(pad.surface()).unwrap().is_blank());
    }

    #[test]
    fn start_without_coordinates_stays_idle() {
        let (mut doc, mut pad, o) = setup();
        pad.handle_event(&mut doc, &InputEvent::pointer_down(o.x, o.y));
        pad.handle_event(&mut doc, &InputEvent::touch_start(&[]));
        assert_eq!(pad.state(), StrokeState::Idle);
    }

    #[test]
    fn move_without_coordinates_keeps_last_point() {
        let (mut doc, mut pad, o) = setup();
        pad.handle_event(&mut doc, &InputEvent::touch_start(&[(o.x + 1.0, o.y + 2.0)]));
        assert!(pad.handle_event(&mut doc, &InputEvent::touch_move(&[])).is_none());
        assert_eq!(pad.state(), StrokeState::Drawing { last: Point::new(1.0, 2.0) });
    }
}
