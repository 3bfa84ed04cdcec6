//! Example: Parse stdin and dump the event stream and tree.
//!
//! Run with: RUST_LOG=bbtag_core=trace cargo run --example stdin_parse < post.txt

use std::io::Read;

use bbtag_core::{Parser, StandardTags};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> std::io::Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let parser = Parser::new(&StandardTags);
    for event in parser.scan(&input) {
        eprintln!("EVENT: {:?}", event);
    }
    println!("{:#?}", parser.parse(&input));
    Ok(())
}
