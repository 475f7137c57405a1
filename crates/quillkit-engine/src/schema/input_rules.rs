//! Typed-text auto-conversion rules.
//!
//! A markdown-like media reference (`![alt](src "title")`) typed at the end
//! of a paragraph converts into a media node. The gate is consulted before
//! converting; a rejected source leaves the raw text untouched — a silent
//! policy decision, not a failure.

use std::ops::Range;

use regex::Regex;

use crate::models::{MediaAttrs, MediaKind};

use super::MediaOptions;

/// Extensions claimed by the video rule, so the image and video rules never
/// compete for the same typed text.
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".ogg", ".ogv", ".mov"];

/// A pattern-triggered transformation of typed text into a media node.
pub struct InputRule {
    find: Regex,
    kind: MediaKind,
}

impl InputRule {
    /// The markdown-like media reference rule for the given node kind.
    pub fn media_reference(kind: MediaKind) -> Self {
        // Anchored at the end: the rule fires as the closing paren is typed.
        let find = Regex::new(r#"!\[([^\]]*)\]\((\S+?)(?:\s+["']([^"']*)["'])?\)$"#)
            .expect("media reference pattern is valid");
        Self { find, kind }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Match this rule against the tail of a paragraph's text.
    ///
    /// Returns the byte range of the matched reference and the extracted
    /// attributes, or `None` when the pattern does not match, the source
    /// belongs to another variant, or the gate rejects it.
    pub fn try_match(&self, text: &str, options: &MediaOptions) -> Option<(Range<usize>, MediaAttrs)> {
        let caps = self.find.captures(text)?;
        let src = caps.get(2).map(|m| m.as_str())?;
        if !self.claims(src) {
            return None;
        }
        if !options.gate.allows(Some(src)) {
            return None;
        }
        let full = caps.get(0).map(|m| m.range())?;
        let alt = caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty());
        let title = caps.get(3).map(|m| m.as_str()).filter(|s| !s.is_empty());
        Some((
            full,
            MediaAttrs {
                src: Some(src.to_string()),
                alt: alt.map(str::to_string),
                title: title.map(str::to_string),
                ..MediaAttrs::default()
            },
        ))
    }

    fn claims(&self, src: &str) -> bool {
        let path = src.split(['?', '#']).next().unwrap_or(src).to_ascii_lowercase();
        let is_video = VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
        match self.kind {
            MediaKind::Video => is_video,
            MediaKind::Image => !is_video,
            MediaKind::Youtube => false,
        }
    }
}
