use std::fmt::Write as _;

/// A node in a lightweight markup tree.
///
/// Node specs produce and consume this tree rather than raw strings, so
/// parse and render rules share one representation (the equivalent of the
/// `[tag, attrs, children]` tuples the rules were modeled on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

/// An element with ordered attributes and children.
///
/// Boolean attributes (`controls`, `allowfullscreen`, `data-youtube-video`)
/// are stored with an empty value and serialized bare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "source"];

impl HtmlElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    /// Add a boolean attribute (serialized without a value).
    pub fn with_bare_attr(self, name: &str) -> Self {
        self.with_attr(name, "")
    }

    /// Append a `prop: value` pair to the inline `style` attribute.
    pub fn with_style(mut self, prop: &str, value: &str) -> Self {
        match self.attrs.iter_mut().find(|(name, _)| name == "style") {
            Some((_, style)) => {
                if !style.is_empty() {
                    style.push_str("; ");
                }
                let _ = write!(style, "{prop}: {value}");
            }
            None => self.attrs.push(("style".to_string(), format!("{prop}: {value}"))),
        }
        self
    }

    pub fn with_child(mut self, child: HtmlElement) -> Self {
        self.children.push(HtmlNode::Element(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    /// Look up a property in the inline `style` attribute. Declarations
    /// without a colon (empty segments, pasted junk) are skipped.
    pub fn style_property(&self, prop: &str) -> Option<&str> {
        let style = self.attr("style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(prop)
                .then(|| value.trim())
        })
    }

    /// First direct child element with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&HtmlElement> {
        self.children.iter().find_map(|child| match child {
            HtmlNode::Element(el) if el.tag == tag => Some(el),
            _ => None,
        })
    }

    /// Concatenated text content of this element's subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Serialize to markup, escaping attribute values and text.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            match child {
                HtmlNode::Element(el) => el.write_html(out),
                HtmlNode::Text(text) => out.push_str(&html_escape::encode_text(text)),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn collect_text(nodes: &[HtmlNode], out: &mut String) {
    for node in nodes {
        match node {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_bare_and_valued_attributes() {
        let el = HtmlElement::new("video")
            .with_attr("src", "https://x/y.mp4")
            .with_bare_attr("controls")
            .with_attr("width", "300");
        assert_eq!(
            el.to_html(),
            r#"<video src="https://x/y.mp4" controls width="300"></video>"#
        );
    }

    #[test]
    fn escapes_attribute_values_and_text() {
        let mut el = HtmlElement::new("p");
        el.children
            .push(HtmlNode::Text("a < b & \"c\"".to_string()));
        let el = el.with_attr("title", "say \"hi\"");
        let html = el.to_html();
        assert!(html.contains("&quot;hi&quot;"));
        assert!(html.contains("a &lt; b &amp;"));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let el = HtmlElement::new("img").with_attr("src", "a.png");
        assert_eq!(el.to_html(), r#"<img src="a.png">"#);
    }

    #[test]
    fn style_helpers_accumulate_and_read_back() {
        let el = HtmlElement::new("div")
            .with_style("text-align", "center")
            .with_style("width", "100%");
        assert_eq!(el.style_property("text-align"), Some("center"));
        assert_eq!(el.style_property("width"), Some("100%"));
        assert_eq!(el.style_property("height"), None);
    }

    #[test]
    fn style_lookup_skips_malformed_declarations() {
        let el = HtmlElement::new("div")
            .with_attr("style", "color: red;; junk ;text-align: center;");
        assert_eq!(el.style_property("text-align"), Some("center"));
        assert_eq!(el.style_property("junk"), None);
    }

    #[test]
    fn find_child_matches_direct_children_only() {
        let el = HtmlElement::new("div")
            .with_child(HtmlElement::new("span").with_child(HtmlElement::new("iframe")))
            .with_child(HtmlElement::new("iframe").with_attr("src", "x"));
        assert_eq!(el.find_child("iframe").unwrap().attr("src"), Some("x"));
    }
}
