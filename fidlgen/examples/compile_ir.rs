//! Compiles a JSON IR file and prints the resolved tree as JSON.
//!
//! Run with: `cargo run --example compile_ir -- path/to/library.fidl.json`
//!
//! Without an argument the bundled shapes library is compiled. Set
//! `RUST_LOG=debug` to see one line per compiled declaration.

use fidlgen::prelude::*;
use std::path::PathBuf;

const BUNDLED_IR: &str = include_str!("../demos/example.fidl.json");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let tree = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            tracing::info!(path = %path.display(), "compiling IR file");
            compile_from_file(&path)?
        }
        None => compile_from_json(BUNDLED_IR)?,
    };

    for union in tree.unions() {
        eprintln!(
            "union {} ({:?}): tags [{}]",
            union.name,
            union.strictness,
            union.tags.join(", ")
        );
    }

    println!("{}", tree.to_json()?);
    Ok(())
}
