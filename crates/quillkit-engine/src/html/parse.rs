//! HTML → document parsing (the load and paste path).
//!
//! Fragments are parsed leniently with an HTML5 parser; top-level elements
//! are offered to the schema's parse rules in registration order. Media
//! markup that no rule accepts — missing `src`, disallowed `data:` URI,
//! gate-rejected source — is dropped without error.

use scraper::{ElementRef, Html};

use crate::editing::Node;
use crate::html::dom::{HtmlElement, HtmlNode};
use crate::schema::SchemaSet;

/// Parse an HTML fragment into document nodes.
pub fn parse_nodes(html: &str, schema: &SchemaSet) -> Vec<Node> {
    let fragment = Html::parse_fragment(html);
    let mut out = Vec::new();
    for child in fragment.root_element().children() {
        if let Some(el) = ElementRef::wrap(child) {
            push_element(element_from(el), schema, &mut out);
        } else if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                out.push(Node::paragraph(text));
            }
        }
    }
    out
}

fn push_element(el: HtmlElement, schema: &SchemaSet, out: &mut Vec<Node>) {
    if let Some((kind, attrs)) = schema.parse_element(&el) {
        out.push(Node::media(kind, attrs));
        return;
    }
    // Rejected or unmatched media markup is dropped; anything else keeps its
    // text content as a paragraph.
    if is_media_markup(&el) {
        return;
    }
    let text = el.text_content();
    let text = text.trim();
    if !text.is_empty() {
        out.push(Node::paragraph(text));
    }
}

fn is_media_markup(el: &HtmlElement) -> bool {
    matches!(el.tag.as_str(), "video" | "img" | "iframe")
        || (el.tag == "div" && el.has_attr("data-youtube-video"))
}

/// Convert a parsed DOM element into the schema's markup tree.
fn element_from(el: ElementRef<'_>) -> HtmlElement {
    let mut out = HtmlElement::new(el.value().name());
    for (name, value) in el.value().attrs() {
        out.attrs.push((name.to_string(), value.to_string()));
    }
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            out.children.push(HtmlNode::Element(element_from(child_el)));
        } else if let Some(text) = child.value().as_text() {
            out.children.push(HtmlNode::Text(text.to_string()));
        }
    }
    out
}
