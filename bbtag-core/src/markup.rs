//! Serialize a tree back to bracket markup.
//!
//! The output re-parses to the same tree. Attribute values are quoted only
//! when the unquoted form would read differently, and block tags always get
//! a line break after their opener and closer, which the parser swallows
//! again. Foreign nodes have no markup form and are skipped.

use crate::attrs::Attributes;
use crate::registry::TagRegistry;
use crate::tree::{Document, Element, Node};

impl<'a, F> Document<'a, F> {
    /// Render the document as markup, using `registry` to tell block tags.
    pub fn to_markup<R: TagRegistry + ?Sized>(&self, registry: &R) -> String {
        let mut out = String::new();
        write_nodes(&mut out, self.children(), registry);
        out
    }
}

impl<'a, F> Node<'a, F> {
    pub fn to_markup<R: TagRegistry + ?Sized>(&self, registry: &R) -> String {
        let mut out = String::new();
        write_node(&mut out, self, registry);
        out
    }
}

fn write_nodes<F, R: TagRegistry + ?Sized>(out: &mut String, nodes: &[Node<'_, F>], registry: &R) {
    for node in nodes {
        write_node(out, node, registry);
    }
}

fn write_node<F, R: TagRegistry + ?Sized>(out: &mut String, node: &Node<'_, F>, registry: &R) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => write_element(out, element, registry),
        Node::Foreign(_) => {}
    }
}

fn write_element<F, R: TagRegistry + ?Sized>(out: &mut String, element: &Element<'_, F>, registry: &R) {
    let block = registry.is_block(&element.name);

    out.push('[');
    out.push_str(&element.name);
    write_attrs(out, &element.attrs);
    out.push(']');
    if block {
        out.push('\n');
    }

    write_nodes(out, &element.children, registry);

    out.push_str("[/");
    out.push_str(&element.name);
    out.push(']');
    if block {
        out.push('\n');
    }
}

fn write_attrs(out: &mut String, attrs: &Attributes<'_>) {
    match attrs {
        Attributes::None => {}
        Attributes::Scalar(value) => {
            out.push('=');
            write_value(out, value, needs_quotes_scalar(value));
        }
        Attributes::Keyed(pairs) => {
            for (key, value) in pairs {
                out.push(' ');
                out.push_str(key);
                out.push('=');
                write_value(out, value, needs_quotes_keyed(value));
            }
        }
    }
}

fn starts_with_quote(value: &str) -> bool {
    value.starts_with('"') || value.starts_with('\'')
}

fn needs_quotes_scalar(value: &str) -> bool {
    starts_with_quote(value) || value.contains(']')
}

fn needs_quotes_keyed(value: &str) -> bool {
    starts_with_quote(value) || value.contains(|c: char| c == ' ' || c == ']')
}

fn write_value(out: &mut String, value: &str, quoted: bool) {
    if !quoted {
        out.push_str(value);
        return;
    }
    // No escapes exist; pick the delimiter the value does not contain.
    let quote = if value.contains('"') { '\'' } else { '"' };
    out.push(quote);
    out.push_str(value);
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::registry::TagSet;
    use pretty_assertions::assert_eq;

    fn tags() -> TagSet {
        TagSet::new()
            .inline("b")
            .and_then(|t| t.inline("url"))
            .and_then(|t| t.inline("video"))
            .and_then(|t| t.block("left"))
            .unwrap()
    }

    fn normalize(src: &str) -> String {
        let tags = tags();
        Parser::new(&tags).parse(src).to_markup(&tags)
    }

    fn assert_round_trip(src: &str) {
        let tags = tags();
        let parser = Parser::new(&tags);
        let first = parser.parse(src);
        let markup = first.to_markup(&tags);
        assert_eq!(parser.parse(&markup), first, "markup: {:?}", markup);
    }

    #[test]
    fn test_plain_markup_is_unchanged() {
        assert_eq!(normalize("a [b]bold[/b] c"), "a [b]bold[/b] c");
        assert_eq!(normalize("[B]x[/B]"), "[b]x[/b]");
        assert_eq!(normalize("[b][url=y]x[/url][/b]"), "[b][url=y]x[/url][/b]");
    }

    #[test]
    fn test_attribute_quoting() {
        assert_eq!(normalize("[url=http://x]y[/url]"), "[url=http://x]y[/url]");
        assert_eq!(normalize("[url='a]b']y[/url]"), "[url=\"a]b\"]y[/url]");
        assert_eq!(normalize("[url='\"q']y[/url]"), "[url='\"q']y[/url]");
        assert_eq!(
            normalize("[video W=1 title='a b']v[/video]"),
            "[video w=1 title=\"a b\"]v[/video]"
        );
    }

    #[test]
    fn test_block_tags_get_line_breaks() {
        assert_eq!(normalize("[left]x[/left]y"), "[left]\nx[/left]\ny");
        assert_eq!(normalize("[left]\n\nx[/left]"), "[left]\n\nx[/left]\n");
    }

    #[test]
    fn test_round_trips() {
        for src in [
            "",
            "plain",
            "[b]x[/b]",
            "[b][b]x[/b][/b]",
            "[b][url=x]y[/b][/url]",
            "[left]\n\nx[/left]\n\ny",
            "[url=\"a]b\"]c[/url]",
            "[video a= b=\"x y\"]v[/video]",
            "[left]unclosed\n[b]x[/b]",
        ] {
            assert_round_trip(src);
        }
    }
}
