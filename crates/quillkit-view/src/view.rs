//! Per-node media views: layout snapshots for the host to paint, plus the
//! pointer handlers that drive resizing through the command layer.

use quillkit_engine::{
    AspectRatio, Cmd, Dimension, Document, MediaAttrs, MediaKind, NodeId, Patch,
};

use crate::resize::{PointerEvent, Rect, ResizeCommit, ResizeInteraction};
use crate::theme::ViewTheme;

/// The square drag affordance in the element's corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeHandle {
    pub size_px: u32,
    pub color: String,
}

/// What to paint for the media element itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaElement {
    pub tag: &'static str,
    pub src: Option<String>,
    /// `width`/`height` attribute values, pre-formatted (`"640"`, `"100%"`,
    /// `"auto"`).
    pub width: Option<String>,
    pub height: Option<String>,
    pub style: String,
    pub controls: bool,
    pub allow_fullscreen: bool,
    pub alt: Option<String>,
    pub title: Option<String>,
}

/// A render-ready snapshot of one media node view.
///
/// Computed fresh from the document on every paint; the view holds no copy
/// of node attributes, so a layout can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewLayout {
    pub wrapper_tag: &'static str,
    pub wrapper_style: String,
    pub element: MediaElement,
    /// Present only when the node is highlighted and the surface is
    /// editable.
    pub handle: Option<ResizeHandle>,
}

/// The interactive view bound to one media node.
///
/// Reads go straight to the [`Document`]; writes go through
/// [`Cmd::UpdateMediaAttrs`]. After [`MediaView::unmount`] every handler is
/// a no-op, so late pointer events from the host are harmless.
pub struct MediaView {
    node: NodeId,
    kind: MediaKind,
    theme: ViewTheme,
    interaction: ResizeInteraction,
    mounted: bool,
}

impl MediaView {
    pub fn new(node: NodeId, kind: MediaKind, theme: ViewTheme) -> Self {
        Self {
            node,
            kind,
            theme,
            interaction: ResizeInteraction::for_kind(kind),
            mounted: true,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    /// Pointer-down on the resize handle. Returns whether a drag started:
    /// it does not when the view is unmounted, the surface is read-only, or
    /// the node is gone.
    pub fn pointer_down(&mut self, doc: &Document, origin: Rect) -> bool {
        if !self.mounted || !doc.is_editable() || doc.media_attrs(self.node).is_none() {
            return false;
        }
        self.interaction.pointer_down(origin);
        true
    }

    /// Pointer-move during a drag. Commits the throttled candidate size, if
    /// this event fires.
    pub fn pointer_move(&mut self, doc: &mut Document, event: PointerEvent) -> Option<Patch> {
        if !self.mounted {
            return None;
        }
        let commit = self.interaction.pointer_move(event)?;
        self.apply_commit(doc, commit)
    }

    /// Pointer-up anywhere in the document: ends the drag and commits the
    /// trailing throttled position, if one is pending.
    pub fn pointer_up(&mut self, doc: &mut Document) -> Option<Patch> {
        if !self.mounted {
            return None;
        }
        let commit = self.interaction.pointer_up()?;
        self.apply_commit(doc, commit)
    }

    /// Tear the view down: abandon any in-flight drag and drop its pending
    /// commit. Idempotent, and safe whether or not the node still exists.
    pub fn unmount(&mut self) {
        self.interaction.cancel();
        self.mounted = false;
    }

    /// Compute the render-ready layout for the current document state.
    ///
    /// `selected` is the host's node-selection flag; dragging highlights the
    /// view too. Returns `None` when the view is unmounted or the node no
    /// longer exists as this view's kind.
    pub fn layout(&self, doc: &Document, selected: bool) -> Option<ViewLayout> {
        if !self.mounted {
            return None;
        }
        let media = doc.node(self.node)?.as_media()?;
        if media.kind != self.kind {
            return None;
        }
        let spec = doc.schema().get(self.kind)?;
        let highlighted = selected || self.is_dragging();

        let wrapper_tag = if spec.options.inline { "span" } else { "div" };
        let mut wrapper_style = String::from("position: relative");
        if let Some(align) = media.attrs.text_align {
            wrapper_style.push_str(&format!("; text-align: {align}"));
        }

        let handle = (highlighted && doc.is_editable()).then(|| ResizeHandle {
            size_px: self.theme.handle_size_px,
            color: self.theme.accent_color.clone(),
        });

        Some(ViewLayout {
            wrapper_tag,
            wrapper_style,
            element: element_layout(self.kind, &media.attrs, highlighted, &self.theme),
            handle,
        })
    }

    fn apply_commit(&self, doc: &mut Document, commit: ResizeCommit) -> Option<Patch> {
        if doc.media_attrs(self.node).is_none() {
            log::debug!("dropping resize commit for removed node {:?}", self.node);
            return None;
        }
        let mut patch = MediaAttrs {
            width: Some(Dimension::Px(commit.width)),
            height: Some(Dimension::Px(commit.height)),
            ..MediaAttrs::default()
        };
        // The iframe keeps its fixed embed ratio; video and image record the
        // committed ratio so CSS preserves it before media loads.
        if self.kind != MediaKind::Youtube {
            patch.aspect_ratio = Some(AspectRatio::new(commit.width, commit.height));
        }
        doc.apply(Cmd::UpdateMediaAttrs {
            node: self.node,
            patch,
        })
    }
}

fn element_layout(
    kind: MediaKind,
    attrs: &MediaAttrs,
    highlighted: bool,
    theme: &ViewTheme,
) -> MediaElement {
    let tag = match kind {
        MediaKind::Image => "img",
        MediaKind::Video => "video",
        MediaKind::Youtube => "iframe",
    };

    let mut style = String::from("max-width: 100%");
    let ratio = attrs
        .aspect_ratio
        .map(|r| r.to_string())
        .or_else(|| match kind {
            // Fixed-ratio variants fall back to the 16:9 the resize
            // interaction enforces.
            MediaKind::Video | MediaKind::Youtube => Some("16/9".to_string()),
            MediaKind::Image => None,
        });
    if let Some(ratio) = ratio {
        style.push_str(&format!("; aspect-ratio: {ratio}"));
    }
    if highlighted {
        style.push_str(&format!("; outline: 3px solid {}", theme.accent_color));
    }

    MediaElement {
        tag,
        src: attrs.src.clone(),
        width: attrs.width.map(|w| w.to_string()),
        height: attrs.height.map(|h| h.to_string()),
        style,
        controls: attrs.controls.unwrap_or(false),
        allow_fullscreen: attrs.allow_fullscreen.unwrap_or(false),
        alt: attrs.alt.clone(),
        title: attrs.title.clone(),
    }
}
