/*!
 * Media node schema: per-variant node type descriptors with attribute
 * defaults, parse rules, render rules and typed-text input rules.
 *
 * Extension is composition-based: a base [`NodeSpec`] plus an explicit
 * [`NodeSpec::extend`] merge that layers attribute defaults field-wise and
 * swaps rule lists, with no inheritance chain to trace through. Variant
 * modules ([`video`], [`image`], [`youtube`]) each build their spec as a
 * plain base layered with a "resizable" extension.
 */

pub mod gate;
pub mod image;
pub mod input_rules;
pub mod video;
pub mod youtube;

use thiserror::Error;

use crate::html::HtmlElement;
use crate::models::{MediaAttrs, MediaKind};

pub use gate::SourceGate;
pub use input_rules::InputRule;

/// Behavior switches shared by all media node specs.
#[derive(Debug, Clone)]
pub struct MediaOptions {
    /// Allow `data:` URIs in `src`. When false, tag matchers exclude base64
    /// sources regardless of what the gate says.
    pub allow_base64: bool,
    /// Source restriction predicate; see [`SourceGate`].
    pub gate: SourceGate,
    /// Also consult the gate on programmatic insert commands. Off by
    /// default: gating is a parse/paste concern, and hosts issuing commands
    /// are trusted unless they opt in.
    pub gate_commands: bool,
    /// Render node views inline (wrapper becomes a `span`) rather than as
    /// block-level atoms.
    pub inline: bool,
}

impl Default for MediaOptions {
    fn default() -> Self {
        Self {
            allow_base64: false,
            gate: SourceGate::default(),
            gate_commands: false,
            inline: false,
        }
    }
}

/// A single element-matching rule for HTML parsing.
///
/// `matches` decides whether the rule claims an element; `extract` then
/// produces the attribute set, or `None` to reject ("do not create this node
/// from this markup" — e.g. a gate-refused source). Rejection is not an
/// error and does not fall through to later rules.
pub struct ParseRule {
    pub matches: fn(&HtmlElement, &MediaOptions) -> bool,
    pub extract: fn(&HtmlElement, &MediaOptions) -> Option<MediaAttrs>,
}

type RenderFn = fn(&MediaAttrs, &MediaOptions) -> HtmlElement;

/// A registered media node type: attribute defaults plus parse/render/input
/// rules.
pub struct NodeSpec {
    pub kind: MediaKind,
    pub options: MediaOptions,
    pub defaults: MediaAttrs,
    pub parse_rules: Vec<ParseRule>,
    pub render_fn: RenderFn,
    pub input_rule: Option<InputRule>,
}

/// An extension layer merged over a base spec by [`NodeSpec::extend`].
#[derive(Default)]
pub struct SpecLayer {
    /// Defaults layered over the base's (set fields win).
    pub defaults: MediaAttrs,
    /// Replacement parse rule list, if the layer overrides parsing.
    pub parse_rules: Option<Vec<ParseRule>>,
    /// Replacement render rule, if the layer overrides rendering.
    pub render_fn: Option<RenderFn>,
    /// Input rule added or replaced by the layer.
    pub input_rule: Option<InputRule>,
}

impl NodeSpec {
    /// Layer an extension over this spec.
    pub fn extend(mut self, layer: SpecLayer) -> Self {
        self.defaults = layer.defaults.with_defaults(&self.defaults);
        if let Some(rules) = layer.parse_rules {
            self.parse_rules = rules;
        }
        if let Some(render_fn) = layer.render_fn {
            self.render_fn = render_fn;
        }
        if layer.input_rule.is_some() {
            self.input_rule = layer.input_rule;
        }
        self
    }

    /// Try this spec's parse rules against an element, in order.
    ///
    /// Returns the attribute set (with defaults layered in) when a rule
    /// matches and accepts, `None` when no rule matches or the matching rule
    /// rejects.
    pub fn parse(&self, el: &HtmlElement) -> Option<MediaAttrs> {
        for rule in &self.parse_rules {
            if (rule.matches)(el, &self.options) {
                return (rule.extract)(el, &self.options)
                    .map(|attrs| attrs.with_defaults(&self.defaults));
            }
        }
        None
    }

    /// Render an attribute set to markup. Deterministic.
    pub fn render(&self, attrs: &MediaAttrs) -> HtmlElement {
        (self.render_fn)(attrs, &self.options)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("node type `{0}` is already registered")]
    DuplicateNode(MediaKind),
}

/// Ordered registry of node specs consulted by HTML parsing and input rules.
pub struct SchemaSet {
    specs: Vec<NodeSpec>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    /// Registry with the three built-in media specs (image, video, youtube).
    pub fn with_default_media(options: MediaOptions) -> Self {
        let mut set = Self::new();
        // Fresh registry, the unwraps cannot collide.
        set.register(image::spec(options.clone())).unwrap();
        set.register(video::spec(options.clone())).unwrap();
        set.register(youtube::spec(options)).unwrap();
        set
    }

    pub fn register(&mut self, spec: NodeSpec) -> Result<(), SchemaError> {
        if self.specs.iter().any(|s| s.kind == spec.kind) {
            return Err(SchemaError::DuplicateNode(spec.kind));
        }
        self.specs.push(spec);
        Ok(())
    }

    pub fn get(&self, kind: MediaKind) -> Option<&NodeSpec> {
        self.specs.iter().find(|s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeSpec> {
        self.specs.iter()
    }

    /// First spec whose parse rules accept this element, in registration
    /// order.
    pub fn parse_element(&self, el: &HtmlElement) -> Option<(MediaKind, MediaAttrs)> {
        for spec in &self.specs {
            for rule in &spec.parse_rules {
                if (rule.matches)(el, &spec.options) {
                    // A matching rule that rejects consumes the element.
                    return (rule.extract)(el, &spec.options)
                        .map(|attrs| (spec.kind, attrs.with_defaults(&spec.defaults)));
                }
            }
        }
        None
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::with_default_media(MediaOptions::default())
    }
}

/// Whether a `src` value uses the `data:` scheme (base64 inlining).
pub(crate) fn is_data_uri(src: &str) -> bool {
    src.trim_start().starts_with("data:")
}
