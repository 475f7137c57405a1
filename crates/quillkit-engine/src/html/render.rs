//! Document → HTML serialization.
//!
//! Rendering is deterministic: node order and attribute order are fixed by
//! the schema render rules, so the same document always serializes to the
//! same markup.

use crate::editing::{Document, NodeBody};
use crate::html::dom::{HtmlElement, HtmlNode};

/// Serialize the whole document to markup.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    for node in doc.nodes() {
        match &node.body {
            NodeBody::Paragraph(text) => {
                let mut p = HtmlElement::new("p");
                p.children.push(HtmlNode::Text(text.clone()));
                out.push_str(&p.to_html());
            }
            NodeBody::Media(media) => {
                // A media kind without a registered spec has no markup form.
                if let Some(spec) = doc.schema().get(media.kind) {
                    out.push_str(&spec.render(&media.attrs).to_html());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::editing::Document;
    use crate::models::MediaAttrs;
    use crate::schema::SchemaSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn rendering_is_deterministic() {
        let mut doc = Document::new(SchemaSet::default());
        assert!(
            doc.chain()
                .insert_text("intro")
                .set_video(MediaAttrs::with_src("https://x/y.mp4"))
                .run()
        );
        assert_eq!(doc.to_html(), doc.to_html());
    }

    #[test]
    fn paragraph_text_is_escaped() {
        let mut doc = Document::new(SchemaSet::default());
        assert!(doc.chain().insert_text("a < b & c").run());
        assert_eq!(doc.to_html(), "<p>a &lt; b &amp; c</p>");
    }
}
