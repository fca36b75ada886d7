//! Print the OpenAPI document as JSON or YAML.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, ValueEnum};
use poi_backend::doc::ApiDoc;
use utoipa::OpenApi;

/// Output encoding for the document.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the POI catalogue OpenAPI document",
    version
)]
struct CliArgs {
    /// Document encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn render(format: Format) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().map_err(io::Error::other),
        Format::Yaml => doc.to_yaml().map_err(io::Error::other),
    }
}

fn write_to(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{} has no file name", path.display())))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.write(file_name, contents)
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let document = render(args.format)?;
    match args.output {
        Some(path) => write_to(&path, &document),
        None => writeln!(io::stdout().lock(), "{document}"),
    }
}
