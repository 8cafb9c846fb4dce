use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{CommandFactory, Parser};
use std::io;
use std::path::{Path, PathBuf};

use sasswrap::{CompileOptions, OutputStyle, Sass};

mod mode;
mod output;

use mode::UsageError;

#[derive(Parser, Debug)]
#[command(name = "sasswrap")]
#[command(about = "Converts SCSS to CSS with libsass")]
#[command(version)]
pub struct Cli {
    /// Read the stylesheet from standard input
    #[arg(short = 's', long)]
    pub stdin: bool,

    /// Output style: nested, expanded, compact or compressed
    #[arg(short = 't', long, value_name = "STYLE", default_value = "nested")]
    pub style: OutputStyle,

    /// Input stylesheet file or directory
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file or directory (stdout when omitted or empty)
    #[arg(short, long, value_name = "PATH", value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub output: Option<PathBuf>,

    /// Add line number comments to the output
    #[arg(short = 'c', long)]
    pub source_comments: bool,

    /// Directory to search for @import targets (repeatable)
    #[arg(short = 'I', long = "include-path", value_name = "DIR", action = clap::ArgAction::Append)]
    pub include_paths: Vec<PathBuf>,

    /// Decimal places kept for numbers
    #[arg(long, value_name = "N")]
    pub precision: Option<u8>,

    /// libsass shared library to load instead of the system one
    #[arg(long, value_name = "PATH")]
    pub library: Option<PathBuf>,
}

impl Cli {
    pub fn options(&self) -> CompileOptions {
        let options = CompileOptions::new()
            .with_style(self.style)
            .with_source_comments(self.source_comments)
            .with_include_paths(&self.include_paths);
        match self.precision {
            Some(precision) => options.with_precision(precision),
            None => options,
        }
    }

    /// The output path, with an empty `-o ""` treated as absent.
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error("Error reading standard input: {0}")]
    Stdin(#[source] io::Error),

    /// Compile failures display as libsass's message, unchanged.
    #[error(transparent)]
    Sass(#[from] sasswrap::Error),

    #[error("Error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing to stdout: {0}")]
    Stdout(#[source] io::Error),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {}
        Err(CliError::Usage(e)) => {
            eprintln!("Error: {e}\n");
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mode = mode::select(cli)?;
    let request = mode
        .into_request(cli.options(), io::stdin().lock())
        .map_err(CliError::Stdin)?;

    let sass = match &cli.library {
        Some(path) => Sass::open(path)?,
        None => Sass::load()?,
    };
    log::debug!("compiling with libsass {}", sass.version());

    let compiled = sass.compile(&request)?;
    output::write(&compiled, cli.output_path(), io::stdout().lock())
}
