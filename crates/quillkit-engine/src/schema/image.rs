//! The `image` node type: standard `<img>` parsing extended with a `width`
//! attribute and an `aspect-ratio` style written by the resize interaction.

use crate::html::HtmlElement;
use crate::models::{AspectRatio, Dimension, MediaAttrs, MediaKind};

use super::{InputRule, MediaOptions, NodeSpec, ParseRule, SpecLayer, is_data_uri};

/// Resizes below this width are clamped.
pub const IMAGE_MINIMUM_WIDTH_PX: u32 = 100;

/// The plain image node.
pub fn base_spec(options: MediaOptions) -> NodeSpec {
    NodeSpec {
        kind: MediaKind::Image,
        options,
        defaults: MediaAttrs::default(),
        parse_rules: vec![ParseRule {
            matches: |el, _| el.tag == "img" && el.attr("src").is_some(),
            extract: |el, _| Some(attrs_from_element(el)),
        }],
        render_fn: render,
        input_rule: None,
    }
}

/// The resizable image node used by the default schema.
pub fn spec(options: MediaOptions) -> NodeSpec {
    base_spec(options).extend(SpecLayer {
        parse_rules: Some(vec![ParseRule {
            matches: |el, options| {
                el.tag == "img"
                    && el
                        .attr("src")
                        .is_some_and(|src| options.allow_base64 || !is_data_uri(src))
            },
            extract: |el, options| {
                if !options.gate.allows(el.attr("src")) {
                    return None;
                }
                Some(attrs_from_element(el))
            },
        }]),
        input_rule: Some(InputRule::media_reference(MediaKind::Image)),
        ..SpecLayer::default()
    })
}

fn attrs_from_element(el: &HtmlElement) -> MediaAttrs {
    MediaAttrs {
        src: el.attr("src").map(str::to_string),
        alt: el.attr("alt").map(str::to_string),
        title: el.attr("title").map(str::to_string),
        width: el.attr("width").and_then(|w| Dimension::parse_or(w, None)),
        height: el.attr("height").and_then(|h| Dimension::parse_or(h, None)),
        aspect_ratio: el
            .style_property("aspect-ratio")
            .and_then(|r| r.parse::<AspectRatio>().ok()),
        ..MediaAttrs::default()
    }
}

fn render(attrs: &MediaAttrs, _options: &MediaOptions) -> HtmlElement {
    let mut el = HtmlElement::new("img");
    if let Some(src) = &attrs.src {
        el = el.with_attr("src", src.clone());
    }
    if let Some(alt) = &attrs.alt {
        el = el.with_attr("alt", alt.clone());
    }
    if let Some(title) = &attrs.title {
        el = el.with_attr("title", title.clone());
    }
    if let Some(width) = attrs.width {
        el = el.with_attr("width", width.to_string());
    }
    if let Some(height) = attrs.height {
        el = el.with_attr("height", height.to_string());
    }
    if let Some(ratio) = attrs.aspect_ratio {
        el = el.with_style("aspect-ratio", &ratio.to_string());
    }
    el
}
