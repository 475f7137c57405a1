//! The `youtube` embed node type.
//!
//! Rendered markup wraps the iframe in a `div[data-youtube-video]` container
//! because alignment cannot be expressed on the iframe itself; parsing
//! extracts the source from the nested iframe and alignment/fluid width from
//! the wrapper's inline style.

use std::sync::OnceLock;

use regex::Regex;

use crate::html::HtmlElement;
use crate::models::{Dimension, MediaAttrs, MediaKind, TextAlign};

use super::{MediaOptions, NodeSpec, ParseRule};

/// Resizes below this width are clamped.
pub const YOUTUBE_MINIMUM_WIDTH_PX: u32 = 200;

/// Canonical iframe size when no explicit pixel size is set.
pub const YOUTUBE_DEFAULT_WIDTH_PX: u32 = 640;
pub const YOUTUBE_DEFAULT_HEIGHT_PX: u32 = 360;

/// The youtube node spec used by the default schema.
pub fn spec(options: MediaOptions) -> NodeSpec {
    NodeSpec {
        kind: MediaKind::Youtube,
        options,
        defaults: MediaAttrs {
            width: Some(Dimension::Px(YOUTUBE_DEFAULT_WIDTH_PX)),
            height: Some(Dimension::Px(YOUTUBE_DEFAULT_HEIGHT_PX)),
            controls: Some(true),
            allow_fullscreen: Some(true),
            ..MediaAttrs::default()
        },
        parse_rules: vec![ParseRule {
            matches: |el, _| el.tag == "div" && el.has_attr("data-youtube-video"),
            extract: |el, options| {
                let iframe = el.find_child("iframe")?;
                let raw_src = iframe.attr("src")?;
                if !options.gate.allows(Some(raw_src)) {
                    return None;
                }
                let controls = !raw_src.contains("controls=0");
                Some(MediaAttrs {
                    src: Some(canonical_src(&strip_controls_param(raw_src))),
                    controls: Some(controls),
                    // Fluid width lives on the wrapper's inline style; pixel
                    // width on the iframe.
                    width: el
                        .style_property("width")
                        .and_then(|w| Dimension::parse_or(w, None))
                        .or_else(|| {
                            iframe
                                .attr("width")
                                .and_then(|w| Dimension::parse_or(w, None))
                        }),
                    height: iframe
                        .attr("height")
                        .and_then(|h| Dimension::parse_or(h, None))
                        .or(Some(Dimension::Px(YOUTUBE_DEFAULT_HEIGHT_PX))),
                    allow_fullscreen: Some(iframe.has_attr("allowfullscreen")),
                    text_align: el
                        .style_property("text-align")
                        .and_then(|a| a.parse::<TextAlign>().ok()),
                    ..MediaAttrs::default()
                })
            },
        }],
        render_fn: render,
        input_rule: None,
    }
}

fn render(attrs: &MediaAttrs, _options: &MediaOptions) -> HtmlElement {
    let mut wrapper = HtmlElement::new("div").with_bare_attr("data-youtube-video");
    if let Some(align) = attrs.text_align {
        wrapper = wrapper.with_style("text-align", align.as_str());
    }
    if let Some(Dimension::Percent(pct)) = attrs.width {
        wrapper = wrapper.with_style("width", &format!("{pct}%"));
    }

    let src = attrs.src.as_deref().unwrap_or_default();
    let mut embed = canonical_src(src);
    if attrs.controls == Some(false) {
        embed.push(if embed.contains('?') { '&' } else { '?' });
        embed.push_str("controls=0");
    }

    let mut iframe = HtmlElement::new("iframe")
        .with_attr("src", embed)
        .with_attr(
            "width",
            attrs
                .width
                .and_then(|w| w.as_px())
                .unwrap_or(YOUTUBE_DEFAULT_WIDTH_PX)
                .to_string(),
        )
        .with_attr(
            "height",
            attrs
                .height
                .and_then(|h| h.as_px())
                .unwrap_or(YOUTUBE_DEFAULT_HEIGHT_PX)
                .to_string(),
        );
    if attrs.allow_fullscreen == Some(true) {
        iframe = iframe.with_bare_attr("allowfullscreen");
    }
    wrapper.with_child(iframe)
}

/// Normalize a YouTube URL to the embed form.
///
/// Handles `watch?v=`, `youtu.be/` and already-embed URLs; anything else
/// passes through unchanged so hosts can embed from other frontends.
pub fn canonical_src(src: &str) -> String {
    static VIDEO_ID: OnceLock<Regex> = OnceLock::new();
    let re = VIDEO_ID.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/(?:watch\?(?:[^#]*?&)?v=|embed/)|youtu\.be/)([A-Za-z0-9_-]+)")
            .expect("video id pattern is valid")
    });
    match re.captures(src) {
        Some(caps) => format!("https://www.youtube.com/embed/{}", &caps[1]),
        None => src.to_string(),
    }
}

/// Remove the `controls=0` parameter rendering appends, leaving the rest of
/// the query intact so passthrough sources keep their own parameters.
fn strip_controls_param(src: &str) -> String {
    let Some((base, query)) = src.split_once('?') else {
        return src.to_string();
    };
    let kept: Vec<&str> = query.split('&').filter(|p| *p != "controls=0").collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SourceGate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=abc123")]
    #[case("https://youtu.be/abc123")]
    #[case("https://www.youtube.com/watch?list=PL0&v=abc123")]
    #[case("https://www.youtube.com/embed/abc123")]
    fn canonicalizes_known_url_forms(#[case] src: &str) {
        assert_eq!(canonical_src(src), "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn unknown_urls_pass_through() {
        assert_eq!(
            canonical_src("https://vimeo.com/12345"),
            "https://vimeo.com/12345"
        );
    }

    #[test]
    fn render_wraps_iframe_with_alignment_on_the_wrapper() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://youtu.be/abc123".into()),
            text_align: Some(TextAlign::Center),
            ..MediaAttrs::default()
        }
        .with_defaults(&spec.defaults);
        let html = spec.render(&attrs).to_html();
        assert!(html.starts_with("<div data-youtube-video"));
        assert!(html.contains("text-align: center"));
        assert!(html.contains("https://www.youtube.com/embed/abc123"));
        assert!(html.contains(r#"width="640""#));
        assert!(html.contains(r#"height="360""#));
        assert!(html.contains("allowfullscreen"));
    }

    #[test]
    fn parse_reads_iframe_src_and_wrapper_style() {
        let spec = spec(MediaOptions::default());
        let el = HtmlElement::new("div")
            .with_bare_attr("data-youtube-video")
            .with_style("text-align", "right")
            .with_child(
                HtmlElement::new("iframe")
                    .with_attr("src", "https://www.youtube.com/embed/abc123")
                    .with_attr("width", "640")
                    .with_bare_attr("allowfullscreen"),
            );
        let attrs = spec.parse(&el).unwrap();
        assert_eq!(
            attrs.src.as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(attrs.width, Some(Dimension::Px(640)));
        // No height attribute: parse falls back to the canonical default.
        assert_eq!(attrs.height, Some(Dimension::Px(360)));
        assert_eq!(attrs.text_align, Some(TextAlign::Right));
        assert_eq!(attrs.allow_fullscreen, Some(true));
    }

    #[test]
    fn controls_round_trip_through_the_embed_query() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://youtu.be/abc123".into()),
            controls: Some(false),
            ..MediaAttrs::default()
        }
        .with_defaults(&spec.defaults);
        let rendered = spec.render(&attrs);
        assert!(rendered.to_html().contains("?controls=0"));
        let parsed = spec.parse(&rendered).unwrap();
        assert_eq!(parsed.controls, Some(false));
        assert_eq!(
            parsed.src.as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn passthrough_src_keeps_its_own_query_through_a_round_trip() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://example.com/player?id=5".into()),
            ..MediaAttrs::default()
        }
        .with_defaults(&spec.defaults);
        let rendered = spec.render(&attrs);
        assert_eq!(
            rendered.find_child("iframe").unwrap().attr("src"),
            Some("https://example.com/player?id=5")
        );
        let parsed = spec.parse(&rendered).unwrap();
        assert_eq!(parsed.src.as_deref(), Some("https://example.com/player?id=5"));
        assert_eq!(parsed.controls, Some(true));
    }

    #[test]
    fn controls_flag_joins_an_existing_query_with_an_ampersand() {
        let spec = spec(MediaOptions::default());
        let attrs = MediaAttrs {
            src: Some("https://example.com/player?id=5".into()),
            controls: Some(false),
            ..MediaAttrs::default()
        }
        .with_defaults(&spec.defaults);
        let rendered = spec.render(&attrs);
        assert_eq!(
            rendered.find_child("iframe").unwrap().attr("src"),
            Some("https://example.com/player?id=5&controls=0")
        );
        let parsed = spec.parse(&rendered).unwrap();
        assert_eq!(parsed.src.as_deref(), Some("https://example.com/player?id=5"));
        assert_eq!(parsed.controls, Some(false));
    }

    #[test]
    fn watch_form_iframe_src_parses_to_the_embed_form() {
        let spec = spec(MediaOptions::default());
        let el = HtmlElement::new("div")
            .with_bare_attr("data-youtube-video")
            .with_child(
                HtmlElement::new("iframe")
                    .with_attr("src", "https://www.youtube.com/watch?v=abc123"),
            );
        let attrs = spec.parse(&el).unwrap();
        assert_eq!(
            attrs.src.as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
    }

    #[test]
    fn wrapper_without_iframe_never_matches() {
        let spec = spec(MediaOptions::default());
        let el = HtmlElement::new("div").with_bare_attr("data-youtube-video");
        assert_eq!(spec.parse(&el), None);
    }

    #[test]
    fn gate_rejects_embedded_source() {
        let options = MediaOptions {
            gate: SourceGate::restricting(|src| !src.contains("abc123")),
            ..MediaOptions::default()
        };
        let spec = spec(options);
        let el = HtmlElement::new("div")
            .with_bare_attr("data-youtube-video")
            .with_child(
                HtmlElement::new("iframe")
                    .with_attr("src", "https://www.youtube.com/embed/abc123"),
            );
        assert_eq!(spec.parse(&el), None);
    }
}
