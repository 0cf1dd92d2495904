//! RFox Signature Pad
//!
//! A headless freehand signature-capture widget. A host document (parsed from
//! HTML) provides `<canvas>` surfaces; the widget binds pointer and touch input
//! on a surface, draws strokes as an incremental polyline and exports the
//! result as a `data:image/png;base64,...` URI.
//!
//! # Example
//!
//! ```no_run
//! use rfsignature::{InputEvent, SignatureConfig, SignatureHost};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = r#"<body><canvas id="pad" width="200" height="100"></canvas></body>"#;
//! let mut host = SignatureHost::from_html(html, SignatureConfig::default());
//! let pad = host.try_initialize("pad")?;
//!
//! let origin = host.document().bounding_client_rect(pad).unwrap().origin();
//! host.dispatch(pad, &InputEvent::pointer_down(origin.x + 10.0, origin.y + 10.0));
//! host.dispatch(pad, &InputEvent::pointer_move(origin.x + 50.0, origin.y + 10.0));
//! host.dispatch(pad, &InputEvent::pointer_up());
//!
//! let data_url = host.export_image("pad");
//! assert!(data_url.unwrap().starts_with("data:image/png;base64,"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod document;
pub mod host;
pub mod input;
pub mod pad;
pub mod rendering;

pub use document::{Canvas, Document, Element, ElementHandle};
pub use host::{DispatchOutcome, SignatureHost, SurfaceIdentifier};
pub use input::{EventKind, InputEvent, Modality};
pub use pad::{SignaturePad, StrokeState};
pub use rendering::context::{Context2d, LineCap, LineJoin};
pub use rendering::layout::{Point, Rect};
pub use rendering::paint::PaintCommand;

/// Selectors tried, in order, when a surface identifier does not name an
/// element directly.
pub const DEFAULT_FALLBACK_SELECTORS: [&str; 2] = ["canvas.signature-pad", "canvas"];

/// Stroke attributes applied to the 2D context when a pad is initialized
///
/// The defaults produce a 2-unit solid black pen with round caps and joins.
///
/// # Examples
///
/// ```
/// let style = rfsignature::StrokeStyle::default();
/// assert_eq!(style.line_width, 2.0);
/// assert_eq!(style.color, "#000");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    /// Line width in surface units
    pub line_width: f32,
    /// Shape drawn at both ends of every segment
    pub line_cap: LineCap,
    /// Shape drawn where segments of one path meet
    pub line_join: LineJoin,
    /// CSS color string used for the stroke
    pub color: String,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            color: "#000".to_string(),
        }
    }
}

/// How a surface identifier that does not name an element is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Fall back to the first element matching one of the fallback selectors
    #[default]
    Permissive,
    /// Never guess: unresolvable identifiers are an error
    Strict,
}

/// Configuration for a signature host
///
/// Loaded from JSON by the CLI; every field is optional there and falls back
/// to the value from [`SignatureConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Pen applied to every surface this host initializes
    pub stroke: StrokeStyle,
    /// Surface resolution policy
    pub resolution: ResolutionPolicy,
    /// Fallback lookup order used by [`ResolutionPolicy::Permissive`]
    pub fallback_selectors: Vec<String>,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::default(),
            resolution: ResolutionPolicy::default(),
            fallback_selectors: DEFAULT_FALLBACK_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SignatureConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SignatureConfig::default();
        assert_eq!(config.stroke.line_width, 2.0);
        assert_eq!(config.stroke.line_cap, LineCap::Round);
        assert_eq!(config.stroke.line_join, LineJoin::Round);
        assert_eq!(config.resolution, ResolutionPolicy::Permissive);
        assert_eq!(config.fallback_selectors, vec!["canvas.signature-pad", "canvas"]);
    }

    #[test]
    fn test_partial_json_config() {
        let config =
            SignatureConfig::from_json(r##"{"stroke":{"color":"#1e40af"},"resolution":"strict"}"##)
                .unwrap();
        assert_eq!(config.stroke.color, "#1e40af");
        assert_eq!(config.stroke.line_width, 2.0);
        assert_eq!(config.resolution, ResolutionPolicy::Strict);
        assert_eq!(config.fallback_selectors.len(), 2);
    }

    #[test]
    fn test_invalid_json_config() {
        let err = SignatureConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
