// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for jsdoc-tooltips.
//!
//! This binary provides the `jsdoc-tooltips` command, which turns the JSON
//! output of a JSDoc parser into a JavaScript tooltip module.

use jsdoc_tooltips::{parser, renderer};
use lexopt::prelude::*;
use snafu::prelude::*;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where to read the parser output from.
enum InputSource {
    /// Read from the given file.
    File(PathBuf),
    /// Read from stdin.
    Stdin,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Where to write the generated module.
enum OutputTarget {
    /// Write to the specified file.
    File(PathBuf),
    /// Write to stdout.
    Stdout,
}

struct Cli {
    input: InputSource,
    output: OutputTarget,
    render: renderer::RenderOptions,
    quiet: bool,
    dry_run: bool,
    force: bool,
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to read stdin: {source}"))]
    ReadStdin { source: std::io::Error },

    #[snafu(display("failed to process {input}: {source}"))]
    InvalidInput {
        input: String,
        source: parser::ParseError,
    },

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn print_help() {
    println!(
        "\
{name} {version}
Generate HTML tooltip modules from JSDoc parameter metadata

Usage: {name} [OPTIONS] <INPUT>

Arguments:
  <INPUT>  JSDoc parser output (JSON file, or - for stdin)

Options:
  -o, --output <OUTPUT>       Output file (default: - for stdout)
      --export-name <NAME>    Name of the exported constant (default: tooltips)
      --docs-link <URL>       Documentation link shown in every tooltip
      --max-width <PX>        Max width of the description container (default: 400)
      --image-width <PX>      Width forced onto description images (default: 400)
      --image-height <PX>     Height forced onto description images (default: 200)

Merging and cleanup:
      --first-wins            Keep the first of duplicate parameters (default)
      --last-wins             Keep the last of duplicate parameters
      --strip-language <LANG> Language tag of code blocks to strip (default: javascript)
      --strip-per-block       Strip each code block separately instead of greedily

Other options:
  -q, --quiet                 Suppress progress messages and warnings
  -n, --dry-run               Show what would be written without writing
  -f, --force                 Overwrite an existing output file
  -h, --help                  Print help
  -V, --version               Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

/// Reads a pixel value, rejecting zero.
fn parse_pixels(parser: &mut lexopt::Parser, flag: &str) -> Result<u32, lexopt::Error> {
    let val: u32 = parser
        .value()?
        .parse()
        .map_err(|_| format!("{flag} must be a positive number"))?;
    if val == 0 {
        return Err(format!("{flag} must be a positive number").into());
    }
    Ok(val)
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input: Option<InputSource> = None;
    let mut output = OutputTarget::Stdout;
    let mut render = renderer::RenderOptions::default();
    let mut quiet = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::File(val)
                };
            }
            Long("export-name") => render.export_name = parser.value()?.parse()?,
            Long("docs-link") => render.docs_link = parser.value()?.parse()?,
            Long("max-width") => render.max_width = parse_pixels(&mut parser, "max-width")?,
            Long("image-width") => render.image_width = parse_pixels(&mut parser, "image-width")?,
            Long("image-height") => {
                render.image_height = parse_pixels(&mut parser, "image-height")?;
            }
            // Merge policy flags - last one wins
            Long("first-wins") => render.merge = renderer::MergePolicy::FirstWins,
            Long("last-wins") => render.merge = renderer::MergePolicy::LastWins,
            Long("strip-language") => render.code_language = parser.value()?.parse()?,
            Long("strip-per-block") => render.strip = renderer::StripMode::PerBlock,
            Short('q') | Long("quiet") => quiet = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if input.is_none() => {
                let path: PathBuf = val.parse()?;
                input = Some(if path == Path::new("-") {
                    InputSource::Stdin
                } else {
                    InputSource::File(path)
                });
            }
            Value(_) => return Err("only one input may be given".into()),
            _ => return Err(arg.unexpected()),
        }
    }

    if render.export_name.is_empty() {
        return Err("export-name must not be empty".into());
    }
    if render.code_language.is_empty() {
        return Err("strip-language must not be empty".into());
    }

    Ok(Cli {
        input: input.ok_or("missing required argument: <INPUT>")?,
        output,
        render,
        quiet,
        dry_run,
        force,
    })
}

#[snafu::report]
fn main() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;

    let json = read_input(&cli.input)?;
    let params = parser::parse_params(&json).context(InvalidInputSnafu {
        input: cli.input.to_string(),
    })?;

    let tooltips = renderer::merge_all(&params, &cli.render);
    if !cli.quiet {
        report_duplicates(&tooltips, cli.render.merge);
    }

    let module = renderer::render_module(&tooltips, &cli.render);
    write_output(&module, tooltips.len(), &cli)
}

/// Reads the whole input into memory.
fn read_input(input: &InputSource) -> Result<String, Error> {
    match input {
        InputSource::File(path) => std::fs::read_to_string(path).context(ReadFileSnafu { path }),
        InputSource::Stdin => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context(ReadStdinSnafu)?;
            Ok(json)
        }
    }
}

/// Prints a warning for every parameter name that occurred more than once.
fn report_duplicates(tooltips: &renderer::Tooltips, policy: renderer::MergePolicy) {
    let kept = match policy {
        renderer::MergePolicy::FirstWins => "first",
        renderer::MergePolicy::LastWins => "last",
    };
    for name in tooltips.duplicates() {
        eprintln!("warning: duplicate parameter `{name}` (kept {kept} occurrence)");
    }
}

/// Writes the module to stdout or to the output file.
fn write_output(module: &str, count: usize, cli: &Cli) -> Result<(), Error> {
    match &cli.output {
        OutputTarget::Stdout => {
            if cli.dry_run {
                if !cli.quiet {
                    eprintln!("Would output {count} tooltips");
                }
            } else {
                print!("{module}");
            }
        }
        OutputTarget::File(path) => {
            if cli.dry_run {
                if !cli.quiet {
                    eprintln!("Would write {} ({count} tooltips)", path.display());
                }
            } else if path.exists() && !cli.force {
                if !cli.quiet {
                    eprintln!(
                        "Skipping {} (already exists, use --force to overwrite)",
                        path.display()
                    );
                }
            } else {
                // Create parent directory if needed
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).context(CreateOutputDirSnafu)?;
                }
                std::fs::write(path, module).context(WriteFileSnafu { path })?;
                if !cli.quiet {
                    eprintln!("Wrote {} ({count} tooltips)", path.display());
                }
            }
        }
    }

    Ok(())
}
