//! hpp2cpp: writes a `.cpp` file with stub definitions for the public member
//! functions of the class declared in a C++ header.
//!
//! - **file mode**: `hpp2cpp include/widget.hpp` writes `include/widget.cpp`
//! - **stdin mode**: `hpp2cpp --name widget.hpp < widget.hpp` prints the result

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use hpp2cpp::{GenerateError, Generated, GeneratorOptions, try_generate};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hpp2cpp",
    version,
    about = "Generate out-of-line stub definitions from a C++ class header"
)]
struct Cli {
    /// Header file. If omitted, reads from stdin and prints to stdout.
    header: Option<PathBuf>,

    /// Directory to write the .cpp file to (default: the header's directory)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Overwrite an existing .cpp file
    #[arg(short = 'f', long)]
    force: bool,

    /// Do not generate stubs for `= default`, `= delete` and `= 0` declarations
    #[arg(long)]
    skip_special: bool,

    /// Accepted header extension. Can be given multiple times.
    #[arg(long = "ext", default_value = "hpp")]
    extensions: Vec<String>,

    /// Header file name used for the #include line in stdin mode
    #[arg(long, default_value = "header.hpp")]
    name: String,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = GeneratorOptions {
        skip_special: cli.skip_special,
    };

    match &cli.header {
        Some(header) => file_mode(&cli, header, &options),
        None => stdin_mode(&cli, &options),
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hpp2cpp={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn generate(source: &Path, text: &str, options: &GeneratorOptions) -> Result<Generated> {
    match try_generate(source, text, options) {
        Ok(generated) => Ok(generated),
        Err(error @ GenerateError::NoClassFound) => {
            print!("{}", error.as_comment());
            bail!("{}: {error}", source.display())
        }
    }
}

/// stdin mode: read a header from stdin, print the generated file to stdout.
fn stdin_mode(cli: &Cli, options: &GeneratorOptions) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let generated = generate(Path::new(&cli.name), &input, options)?;
    print!("{}", generated.text);
    Ok(())
}

/// file mode: generate `<stem>.cpp` next to the header or in `--output-dir`.
fn file_mode(cli: &Cli, header: &Path, options: &GeneratorOptions) -> Result<()> {
    check_extension(header, &cli.extensions)?;

    let text = fs::read_to_string(header)
        .with_context(|| format!("failed to read {}", header.display()))?;
    let generated = generate(header, &text, options)?;

    if cli.stdout {
        print!("{}", generated.text);
        return Ok(());
    }

    let output_dir = match &cli.output_dir {
        Some(dir) => dir.clone(),
        None => header
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };

    let out_path = output_dir.join(&generated.file_name);
    if out_path.exists() && !cli.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            out_path.display()
        );
    }

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;
    fs::write(&out_path, &generated.text)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(path = %out_path.display(), "wrote stubs");
    println!("{}", out_path.display());
    Ok(())
}

fn check_extension(header: &Path, accepted: &[String]) -> Result<()> {
    let extension = header.extension().and_then(|e| e.to_str()).unwrap_or("");
    let accepted: Vec<&str> = accepted.iter().map(|e| e.trim_start_matches('.')).collect();

    if accepted.contains(&extension) {
        return Ok(());
    }

    let expected: Vec<String> = accepted.iter().map(|e| format!(".{e}")).collect();
    bail!(
        "{} is not a header (expected {})",
        header.display(),
        expected.join(", ")
    )
}
