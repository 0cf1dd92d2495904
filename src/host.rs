//! Host binding layer: the entry points a hosting application calls.
//!
//! `SignatureHost` owns the document and every pad registered on it. It
//! resolves loosely-typed surface identifiers (an id, a handle, or something
//! the host could not make sense of) and dispatches input events to the pads
//! listening on the target surface.
//!
//! `initialize`, `clear` and `export_image` never fail: problems are logged
//! with `log::warn!` and turned into a no-op or `None`. The `try_*` variants
//! return the underlying [`Error`] instead.

use crate::document::{Document, ElementHandle};
use crate::input::{InputEvent, Modality};
use crate::pad::SignaturePad;
use crate::rendering::paint::PaintCommand;
use crate::{Error, ResolutionPolicy, Result, SignatureConfig};
use log::{debug, warn};

/// What the host passes to identify a surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SurfaceIdentifier {
    /// Nothing was passed
    #[default]
    Unspecified,
    /// An element id
    Id(String),
    /// A direct element reference
    Element(ElementHandle),
    /// A reference the host could not turn into an element (for example a
    /// proxy object that lost its target)
    Opaque,
}

impl From<&str> for SurfaceIdentifier {
    fn from(id: &str) -> Self {
        SurfaceIdentifier::Id(id.to_string())
    }
}

impl From<String> for SurfaceIdentifier {
    fn from(id: String) -> Self {
        SurfaceIdentifier::Id(id)
    }
}

impl From<ElementHandle> for SurfaceIdentifier {
    fn from(handle: ElementHandle) -> Self {
        SurfaceIdentifier::Element(handle)
    }
}

impl<T: Into<SurfaceIdentifier>> From<Option<T>> for SurfaceIdentifier {
    fn from(value: Option<T>) -> Self {
        value.map_or(SurfaceIdentifier::Unspecified, Into::into)
    }
}

/// Result of dispatching one input event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Number of listeners that received the event
    pub listeners: usize,
    /// Paint commands issued while handling the event, in order
    pub painted: Vec<PaintCommand>,
    /// The platform default action (scrolling, zooming) was suppressed
    pub default_prevented: bool,
}

impl DispatchOutcome {
    /// Number of line segments drawn
    pub fn segments(&self) -> usize {
        self.painted.iter().filter(|c| c.is_line()).count()
    }
}

#[derive(Debug)]
pub struct SignatureHost {
    document: Document,
    config: SignatureConfig,
    listeners: Vec<SignaturePad>,
}

impl SignatureHost {
    pub fn new(document: Document, config: SignatureConfig) -> Self {
        Self {
            document,
            config,
            listeners: Vec::new(),
        }
    }

    pub fn from_html(markup: &str, config: SignatureConfig) -> Self {
        Self::new(Document::parse(markup), config)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &SignatureConfig {
        &self.config
    }

    /// Resolve an identifier to an element.
    ///
    /// - `Id`: the element with that id, no fallback
    /// - `Element`: the handle itself when it belongs to this document
    /// - a stale handle or `Opaque`: the fallback selectors, in order, unless
    ///   the policy is [`ResolutionPolicy::Strict`]
    /// - `Unspecified` or an empty id: nothing
    pub fn resolve(&self, identifier: &SurfaceIdentifier) -> Result<ElementHandle> {
        match identifier {
            SurfaceIdentifier::Unspecified => {
                Err(Error::SurfaceNotFound("no surface identifier given".into()))
            }
            SurfaceIdentifier::Id(id) if id.is_empty() => {
                Err(Error::SurfaceNotFound("empty surface id".into()))
            }
            SurfaceIdentifier::Id(id) => self
                .document
                .get_element_by_id(id)
                .ok_or_else(|| Error::SurfaceNotFound(format!("no element with id {:?}", id))),
            SurfaceIdentifier::Element(handle) if self.document.contains(*handle) => Ok(*handle),
            SurfaceIdentifier::Element(_) | SurfaceIdentifier::Opaque => self.fallback(identifier),
        }
    }

    fn fallback(&self, identifier: &SurfaceIdentifier) -> Result<ElementHandle> {
        if self.config.resolution == ResolutionPolicy::Strict {
            return Err(Error::SurfaceNotFound(format!(
                "{:?} does not name an element and fallback lookup is disabled",
                identifier
            )));
        }
        for selector in &self.config.fallback_selectors {
            if let Some(handle) = self.document.query_selector(selector)? {
                debug!("resolved {:?} through fallback selector {:?}", identifier, selector);
                return Ok(handle);
            }
        }
        Err(Error::SurfaceNotFound(format!(
            "{:?} does not name an element and no fallback surface matched",
            identifier
        )))
    }

    /// Bind a signature pad to a surface. Failures are logged and leave the
    /// surface without a listener.
    ///
    /// There is no matching teardown: initializing the same surface again
    /// registers a second listener, and both react to every event.
    pub fn initialize(&mut self, identifier: impl Into<SurfaceIdentifier>) {
        if let Err(e) = self.try_initialize(identifier) {
            warn!("initialize: {}", e);
        }
    }

    pub fn try_initialize(&mut self, identifier: impl Into<SurfaceIdentifier>) -> Result<ElementHandle> {
        let handle = self.resolve(&identifier.into())?;
        let pad = SignaturePad::attach(&mut self.document, handle, &self.config.stroke)?;
        self.listeners.push(pad);

        let count = self.listener_count(handle);
        if count > 1 {
            debug!("surface #{} now has {} signature listeners", handle.index(), count);
        }
        Ok(handle)
    }

    /// Erase a surface to transparent. No-op when it cannot be resolved.
    pub fn clear(&mut self, identifier: impl Into<SurfaceIdentifier>) {
        if let Err(e) = self.try_clear(identifier) {
            warn!("clear: {}", e);
        }
    }

    pub fn try_clear(&mut self, identifier: impl Into<SurfaceIdentifier>) -> Result<()> {
        let handle = self.resolve(&identifier.into())?;
        let element = self
            .document
            .element_mut(handle)
            .ok_or_else(|| Error::SurfaceNotFound(format!("element #{}", handle.index())))?;
        let description = element.describe();
        element
            .canvas_mut()
            .ok_or(Error::NotDrawable(description))?
            .clear();
        Ok(())
    }

    /// Export a surface as `data:image/png;base64,...`, or `None` when it
    /// cannot be resolved or encoded.
    pub fn export_image(&self, identifier: impl Into<SurfaceIdentifier>) -> Option<String> {
        self.try_export_image(identifier)
            .map_err(|e| warn!("export_image failed: {}", e))
            .ok()
    }

    pub fn try_export_image(&self, identifier: impl Into<SurfaceIdentifier>) -> Result<String> {
        let handle = self.resolve(&identifier.into())?;
        let element = self
            .document
            .element(handle)
            .ok_or_else(|| Error::SurfaceNotFound(format!("element #{}", handle.index())))?;
        element
            .canvas()
            .ok_or_else(|| Error::NotDrawable(element.describe()))?
            .to_data_url()
    }

    /// Deliver an event to every pad listening on `target`, in registration
    /// order. Touch events handled by at least one pad have their default
    /// action suppressed.
    pub fn dispatch(&mut self, target: ElementHandle, event: &InputEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for pad in self.listeners.iter_mut().filter(|p| p.surface() == target) {
            outcome.listeners += 1;
            if let Some(cmd) = pad.handle_event(&mut self.document, event) {
                outcome.painted.push(cmd);
            }
        }
        outcome.default_prevented = outcome.listeners > 0 && event.modality() == Modality::Touch;
        outcome
    }

    /// Dispatch a recorded sequence of events to `target` and return the
    /// number of line segments drawn.
    pub fn replay(&mut self, target: ElementHandle, events: &[InputEvent]) -> usize {
        events.iter().map(|event| self.dispatch(target, event).segments()).sum()
    }

    /// Number of pads registered on `target`
    pub fn listener_count(&self, target: ElementHandle) -> usize {
        self.listeners.iter().filter(|p| p.surface() == target).count()
    }

    /// The first pad registered on `target`
    pub fn pad(&self, target: ElementHandle) -> Option<&SignaturePad> {
        self.listeners.iter().find(|p| p.surface() == target)
    }
}
