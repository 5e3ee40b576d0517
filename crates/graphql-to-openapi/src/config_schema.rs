//! Binary that prints the JSON Schema of graphql-to-openapi config files,
//! for editor completion and validation of those files

// Only the config types of the runtime module are used here
#![allow(unused_imports, dead_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod runtime;

/// Print the JSON Schema of the config file accepted by `graphql-to-openapi --config`
#[derive(Debug, clap::Parser)]
struct Args {
    /// Write the schema to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let schema = serde_json::to_string_pretty(&runtime::Config::json_schema())
        .context("Failed to serialize the config schema")?;

    match args.output {
        Some(path) => std::fs::write(&path, format!("{schema}\n"))
            .with_context(|| format!("Failed to write config schema to {}", path.display())),
        None => {
            println!("{schema}");
            Ok(())
        }
    }
}
