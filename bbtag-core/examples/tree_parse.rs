//! Example: Parse a forum post to a tree and navigate it.
//!
//! Run with: cargo run --example tree_parse

use bbtag_core::{Attributes, Node, Parser, StandardTags};

fn main() {
    let input = "[quote=Alice]
Has anyone tried [url=https://example.com/recipe]this recipe[/url]?
[/quote]
Yes! It is [b]great[/b], though the [i]sauce[/b] is tricky.
[video width=640 height=360]dQw4w9WgXcQ[/video]
";

    let parser = Parser::new(&StandardTags);
    let doc = parser.parse(input);

    println!("=== Document Tree ===\n");
    for node in doc.children() {
        print_node(node, 0);
    }

    println!("\n=== Element Details ===\n");
    for node in doc.children() {
        if let Some(el) = node.as_element() {
            println!("Element: {}", el.name);
            match &el.attrs {
                Attributes::None => {}
                Attributes::Scalar(value) => println!("  = {:?}", value),
                Attributes::Keyed(_) => {
                    for (key, value) in el.attrs.pairs() {
                        println!("  {} = {:?}", key, value);
                    }
                }
            }
            println!("  text: {:?}", el.text());
            println!();
        }
    }

    println!("=== Text Only ===\n");
    println!("{}", parser.parse_text_only(input));

    println!("=== Markup ===\n");
    println!("{}", doc.to_markup(&StandardTags));
}

fn print_node(node: &Node<'_>, depth: usize) {
    let indent = "  ".repeat(depth);

    match node {
        Node::Text(text) => println!("{}{:?}", indent, text),
        Node::Element(el) => {
            println!("{}[{}]", indent, el.name);
            for child in &el.children {
                print_node(child, depth + 1);
            }
        }
        Node::Foreign(never) => match *never {},
    }
}
