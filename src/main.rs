//! Command-line entry point for the template converter.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use tplconv::convert_tree;

/// Converts legacy XML form/report templates into normalized YAML.
#[derive(Parser, Debug)]
#[command(name = "tplconv")]
#[command(about = "Converts legacy XML form/report templates into normalized YAML")]
struct Args {
    /// Root directory scanned recursively for .xml templates
    #[arg(default_value = "./input")]
    input: PathBuf,

    /// Root directory receiving the mirrored .yml tree
    #[arg(default_value = "./out")]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match convert_tree(&args.input, &args.output) {
        Ok(count) => {
            info!("converted {} template(s) into {}", count, args.output.display());
        }
        Err(err) => {
            error!("{err:#}");
            process::exit(1);
        }
    }
}
