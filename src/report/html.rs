//! Minimal typed HTML builder
//!
//! Text and attribute values are always escaped; only static markup (the
//! stylesheet) goes through [`Node::Raw`].

use std::borrow::Cow;

/// Elements rendered without a closing tag
const VOID_ELEMENTS: [&str; 3] = ["br", "meta", "hr"];

/// Escape text for use in element content and quoted attribute values
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A node in the document tree
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(&'static str),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An HTML element with attributes and children
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn raw(mut self, markup: &'static str) -> Self {
        self.children.push(Node::Raw(markup));
        self
    }

    /// Render this element and its subtree into `out`
    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Element(element) => element.render_into(out),
                Node::Text(text) => out.push_str(&escape(text)),
                Node::Raw(markup) => out.push_str(markup),
            }
        }

        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    #[cfg(test)]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough_borrows() {
        assert!(matches!(escape("plain-repo_name"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_element_renders_escaped_text_and_attrs() {
        let html = Element::new("a")
            .attr("href", "https://example.com/?a=1&b=\"2\"")
            .text("<b>")
            .render();

        assert_eq!(
            html,
            "<a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;</a>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let html = Element::new("p")
            .text("one")
            .child(Element::new("br"))
            .text("two")
            .render();

        assert_eq!(html, "<p>one<br>two</p>");
    }

    #[test]
    fn test_raw_is_not_escaped() {
        let html = Element::new("style").raw("a > b { color: red; }").render();
        assert_eq!(html, "<style>a > b { color: red; }</style>");
    }
}
