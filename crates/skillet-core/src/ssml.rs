//! A minimal SSML element tree.
//!
//! The response object accepts either plain text or structured speech
//! markup. This module is the bundled markup collaborator: a small element
//! tree with a canonical string rendering. Rendering is a pure function of
//! the tree; the dispatch engine never inspects the grammar.
//!
//! ```rust
//! use skillet_core::ssml::{Tag, speak};
//!
//! let markup = speak()
//!     .text("Take a deep breath.")
//!     .child(Tag::new("break").attr("time", "1s"))
//!     .text("Now relax.");
//! assert!(markup.render().starts_with("<speak>"));
//! ```
//!
//! Canonical rendering rules: empty elements self-close (`<speak/>`),
//! attributes appear in insertion order, and text content escapes `&`,
//! `<` and `>`.

/// One SSML element with attributes and child content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Tag(Tag),
    Text(String),
}

/// Shorthand for the root `<speak>` element.
pub fn speak() -> Tag {
    Tag::new("speak")
}

impl Tag {
    /// Creates an empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Replaces the tag name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an attribute. Attributes render in insertion order.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Appends a text node.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: Tag) -> Self {
        self.children.push(Node::Tag(child));
        self
    }

    /// Renders the tree to its canonical string form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            push_escaped(out, value);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Tag(tag) => tag.render_into(out),
                Node::Text(text) => push_escaped(out, text),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_element_self_closes() {
        assert_eq!(speak().render(), "<speak/>");
    }

    #[test]
    fn text_content_renders_inline() {
        assert_eq!(speak().text("hello").render(), "<speak>hello</speak>");
    }

    #[test]
    fn nested_elements_render_in_order() {
        let markup = speak()
            .text("one ")
            .child(Tag::new("break").attr("time", "1s"))
            .text(" two");
        assert_eq!(
            markup.render(),
            "<speak>one <break time=\"1s\"/> two</speak>"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            speak().text("fish & chips <3").render(),
            "<speak>fish &amp; chips &lt;3</speak>"
        );
    }
}
