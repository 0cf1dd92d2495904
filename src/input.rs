//! Input events delivered by the host and their translation to surface space
//!
//! Pointer and touch events share one shape: an [`EventKind`], optional
//! client coordinates (pointer events) and the list of active touch points
//! (touch events). Events (de)serialize as JSON, which is the format of the
//! CLI event scripts:
//!
//! ```json
//! {"kind": "pointer_down", "client": {"x": 18, "y": 18}}
//! {"kind": "touch_move", "touches": [{"x": 58, "y": 18}]}
//! ```

use crate::rendering::layout::{Point, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Pointer,
    Touch,
}

/// Where an event sits in the stroke lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    /// The pointer left the surface bounds
    PointerLeave,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

impl EventKind {
    pub fn modality(self) -> Modality {
        match self {
            EventKind::PointerDown
            | EventKind::PointerMove
            | EventKind::PointerUp
            | EventKind::PointerLeave => Modality::Pointer,
            EventKind::TouchStart
            | EventKind::TouchMove
            | EventKind::TouchEnd
            | EventKind::TouchCancel => Modality::Touch,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            EventKind::PointerDown | EventKind::TouchStart => Phase::Start,
            EventKind::PointerMove | EventKind::TouchMove => Phase::Move,
            EventKind::PointerUp
            | EventKind::PointerLeave
            | EventKind::TouchEnd
            | EventKind::TouchCancel => Phase::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Client-space pointer position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Point>,
    /// Active touch points in client space, first contact first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub touches: Vec<Point>,
}

impl InputEvent {
    fn pointer(kind: EventKind, client: Option<Point>) -> Self {
        Self { kind, client, touches: Vec::new() }
    }

    fn touch(kind: EventKind, touches: &[(f32, f32)]) -> Self {
        Self {
            kind,
            client: None,
            touches: touches.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::pointer(EventKind::PointerDown, Some(Point::new(x, y)))
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::pointer(EventKind::PointerMove, Some(Point::new(x, y)))
    }

    pub fn pointer_up() -> Self {
        Self::pointer(EventKind::PointerUp, None)
    }

    pub fn pointer_leave() -> Self {
        Self::pointer(EventKind::PointerLeave, None)
    }

    pub fn touch_start(touches: &[(f32, f32)]) -> Self {
        Self::touch(EventKind::TouchStart, touches)
    }

    pub fn touch_move(touches: &[(f32, f32)]) -> Self {
        Self::touch(EventKind::TouchMove, touches)
    }

    pub fn touch_end() -> Self {
        Self::touch(EventKind::TouchEnd, &[])
    }

    pub fn touch_cancel() -> Self {
        Self::touch(EventKind::TouchCancel, &[])
    }

    pub fn modality(&self) -> Modality {
        self.kind.modality()
    }

    /// Client position of the event: the pointer coordinates when present,
    /// otherwise the first active touch point.
    pub fn client_position(&self) -> Option<Point> {
        self.client.or_else(|| self.touches.first().copied())
    }

    /// Event position relative to the top-left of `surface` (a client rect).
    pub fn local_position(&self, surface: &Rect) -> Option<Point> {
        self.client_position().map(|p| to_local(p, surface))
    }
}

/// Translate a client-space point into the space of the surface whose client
/// rect is `surface`.
pub fn to_local(client: Point, surface: &Rect) -> Point {
    client - surface.origin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_phases_and_modalities() {
        assert_eq!(EventKind::PointerLeave.phase(), Phase::End);
        assert_eq!(EventKind::TouchCancel.phase(), Phase::End);
        assert_eq!(EventKind::TouchMove.phase(), Phase::Move);
        assert_eq!(EventKind::PointerDown.modality(), Modality::Pointer);
        assert_eq!(EventKind::TouchStart.modality(), Modality::Touch);
    }

    #[test]
    fn pointer_coordinates_take_priority_over_touches() {
        let mut ev = InputEvent::touch_start(&[(5.0, 6.0), (100.0, 100.0)]);
        assert_eq!(ev.client_position(), Some(Point::new(5.0, 6.0)));
        ev.client = Some(Point::new(1.0, 2.0));
        assert_eq!(ev.client_position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(InputEvent::touch_end().client_position(), None);
    }

    #[test]
    fn zero_client_coordinate_is_a_real_position() {
        let ev = InputEvent {
            kind: EventKind::PointerDown,
            client: Some(Point::new(0.0, 0.0)),
            touches: vec![Point::new(40.0, 40.0)],
        };
        assert_eq!(ev.client_position(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn local_position_subtracts_surface_origin() {
        let rect = Rect::new(8.0, 116.0, 400.0, 150.0);
        let ev = InputEvent::pointer_move(58.0, 126.0);
        assert_eq!(ev.local_position(&rect), Some(Point::new(50.0, 10.0)));
    }

    #[test]
    fn events_deserialize_from_script_json() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                {"kind": "pointer_down", "client": {"x": 18, "y": 18}},
                {"kind": "touch_move", "touches": [{"x": 58, "y": 18}]},
                {"kind": "pointer_leave"}
            ]"#,
        )
        .unwrap();
        assert_eq!(events[0], InputEvent::pointer_down(18.0, 18.0));
        assert_eq!(events[1], InputEvent::touch_move(&[(58.0, 18.0)]));
        assert_eq!(events[2], InputEvent::pointer_leave());
    }
}
