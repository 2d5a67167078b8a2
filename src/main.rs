//! Spring API doc extractor - Command-line tool for documenting Spring REST APIs.
//!
//! This binary reads Java source files, extracts every `@RestController` with its
//! endpoints, resolves the DTOs those endpoints exchange, and prints the result as
//! YAML or JSON.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] <PATH>
//! ```
//!
//! # Examples
//!
//! Document every controller in a project:
//! ```bash
//! apidoc-from-source ./my-service -o api.yaml
//! ```
//!
//! Document a single endpoint as JSON, looking DTOs up in the whole source tree:
//! ```bash
//! apidoc-from-source src/main/java/com/example/web/OrderController.java \
//!     -m src/main/java -e createOrder -f json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidoc-from-source ./my-service -v
//! ```

use anyhow::Result;
use apidoc_from_source::cli::{self, CliArgs};
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    cli::init_logger(args.verbose);
    info!("Spring API doc extractor starting...");

    cli::run(cli::parse_args_from_parsed(args)?)?;

    info!("API documentation extracted successfully");
    Ok(())
}
