//! The `video` node type: a plain base spec plus the resizable layer that
//! adds width/aspect-ratio handling, source gating and the typed-text rule.

use crate::html::HtmlElement;
use crate::models::{AspectRatio, Dimension, MediaAttrs, MediaKind};

use super::{InputRule, MediaOptions, NodeSpec, ParseRule, SpecLayer, is_data_uri};

/// Resizes below this width are clamped.
pub const VIDEO_MINIMUM_WIDTH_PX: u32 = 100;

/// The plain video node: `<video>` in, `<video>` out, no gating.
pub fn base_spec(options: MediaOptions) -> NodeSpec {
    NodeSpec {
        kind: MediaKind::Video,
        options,
        defaults: MediaAttrs {
            controls: Some(true),
            width: Some(Dimension::Percent(100)),
            height: Some(Dimension::Auto),
            ..MediaAttrs::default()
        },
        parse_rules: vec![ParseRule {
            matches: |el, _| el.tag == "video" && el.attr("src").is_some(),
            extract: |el, _| Some(attrs_from_element(el)),
        }],
        render_fn: render_plain,
        input_rule: None,
    }
}

/// The resizable video node used by the default schema.
///
/// Layers over [`base_spec`]: the parse rule excludes `data:` sources unless
/// `allow_base64` and consults the gate; rendering always defaults
/// `height="auto"`; the input rule converts typed media references with
/// video file extensions.
pub fn spec(options: MediaOptions) -> NodeSpec {
    base_spec(options).extend(SpecLayer {
        parse_rules: Some(vec![ParseRule {
            matches: |el, options| {
                el.tag == "video"
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
        render_fn: Some(render_resizable),
        input_rule: Some(InputRule::media_reference(MediaKind::Video)),
        ..SpecLayer::default()
    })
}

fn attrs_from_element(el: &HtmlElement) -> MediaAttrs {
    MediaAttrs {
        src: el.attr("src").map(str::to_string),
        controls: Some(el.has_attr("controls")),
        width: el.attr("width").and_then(|w| Dimension::parse_or(w, None)),
        height: el.attr("height").and_then(|h| Dimension::parse_or(h, None)),
        aspect_ratio: el
            .style_property("aspect-ratio")
            .and_then(|r| r.parse::<AspectRatio>().ok()),
        ..MediaAttrs::default()
    }
}

fn render_plain(attrs: &MediaAttrs, _options: &MediaOptions) -> HtmlElement {
    let mut el = HtmlElement::new("video");
    if let Some(src) = &attrs.src {
        el = el.with_attr("src", src.clone());
    }
    if attrs.controls == Some(true) {
        el = el.with_bare_attr("controls");
    }
    if let Some(width) = attrs.width {
        el = el.with_attr("width", width.to_string());
    }
    if let Some(height) = attrs.height {
        el = el.with_attr("height", height.to_string());
    }
    el
}

fn render_resizable(attrs: &MediaAttrs, options: &MediaOptions) -> HtmlElement {
    // Always emit a height (defaulting to "auto") since resizing controls
    // the width and the auto height maintains the aspect ratio.
    let mut effective = attrs.clone();
    effective.height = Some(attrs.height.unwrap_or(Dimension::Auto));
    let mut el = render_plain(&effective, options);
    if let Some(ratio) = attrs.aspect_ratio {
        el = el.with_style("aspect-ratio", &ratio.to_string());
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SourceGate;
    use pretty_assertions::assert_eq;

    fn video_element(src: &str) -> HtmlElement {
        HtmlElement::new("video").with_attr("src", src)
    }

    #[test]
    fn parses_width_only_markup_with_default_height() {
        let spec = spec(MediaOptions::default());
        let el = video_element("https://x/y.mp4").with_attr("width", "300");
        let attrs = spec.parse(&el).unwrap();
        assert_eq!(attrs.width, Some(Dimension::Px(300)));
        assert_eq!(attrs.height, Some(Dimension::Auto));
        // Bare markup carries no `controls`, so parse records false rather
        // than letting the default paper over it.
        assert_eq!(attrs.controls, Some(false));
    }

    #[test]
    fn render_defaults_height_to_auto() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://x/y.mp4".into()),
            width: Some(Dimension::Px(300)),
            ..MediaAttrs::default()
        };
        let html = spec.render(&attrs).to_html();
        assert!(html.contains(r#"height="auto""#), "got: {html}");
    }

    #[test]
    fn render_emits_aspect_ratio_style_when_set() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://x/y.mp4".into()),
            width: Some(Dimension::Px(640)),
            height: Some(Dimension::Px(360)),
            aspect_ratio: Some(AspectRatio::new(640, 360)),
            ..MediaAttrs::default()
        };
        let html = spec.render(&attrs).to_html();
        assert!(html.contains("aspect-ratio: 640/360"), "got: {html}");
    }

    #[test]
    fn element_without_src_never_matches() {
        let spec = spec(MediaOptions::default());
        assert_eq!(spec.parse(&HtmlElement::new("video")), None);
    }

    #[test]
    fn data_uri_src_is_excluded_unless_allowed() {
        let el = video_element("data:video/mp4;base64,AAAA");

        let strict = spec(MediaOptions::default());
        assert_eq!(strict.parse(&el), None);

        let permissive = spec(MediaOptions {
            allow_base64: true,
            ..MediaOptions::default()
        });
        assert!(permissive.parse(&el).is_some());
    }

    #[test]
    fn gate_rejection_creates_no_node() {
        let options = MediaOptions {
            gate: SourceGate::restricting(|src| !src.contains("blocked")),
            ..MediaOptions::default()
        };
        let spec = spec(options);
        assert_eq!(spec.parse(&video_element("https://blocked/x.mp4")), None);
        assert!(spec.parse(&video_element("https://ok/x.mp4")).is_some());
    }
}
