//! Choosing what to compile from the parsed flags.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sasswrap::{CompileOptions, CompileRequest};

use crate::Cli;

/// The flags do not name anything compilable.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("no input given; pass --stdin or --input")]
    MissingInput,

    #[error("cannot read input {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input {} is a directory; --output must name an existing directory", path.display())]
    NeedsOutputDirectory { path: PathBuf },

    #[error("input {} is neither a regular file nor a directory", path.display())]
    Unsupported { path: PathBuf },
}

/// Which of the three compile modes the flags select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Stdin,
    File(PathBuf),
    Directory {
        search_path: PathBuf,
        output_path: PathBuf,
    },
}

/// Pick a mode: stdin first, then a regular input file, then an input
/// directory paired with an output directory.
pub fn select(cli: &Cli) -> Result<Mode, UsageError> {
    if cli.stdin {
        return Ok(Mode::Stdin);
    }

    let input = cli.input.as_deref().ok_or(UsageError::MissingInput)?;
    let meta = fs::metadata(input).map_err(|source| UsageError::Unreadable {
        path: input.to_path_buf(),
        source,
    })?;

    if meta.is_file() {
        return Ok(Mode::File(input.to_path_buf()));
    }

    if meta.is_dir() {
        return match cli.output_path().filter(|out| is_dir(out)) {
            Some(output) => Ok(Mode::Directory {
                search_path: input.to_path_buf(),
                output_path: output.to_path_buf(),
            }),
            None => Err(UsageError::NeedsOutputDirectory {
                path: input.to_path_buf(),
            }),
        };
    }

    Err(UsageError::Unsupported {
        path: input.to_path_buf(),
    })
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_dir())
}

impl Mode {
    /// Build the request, reading all of `stdin` in stdin mode.
    pub fn into_request(
        self,
        options: CompileOptions,
        mut stdin: impl Read,
    ) -> io::Result<CompileRequest> {
        Ok(match self {
            Mode::Stdin => {
                let mut source = String::new();
                stdin.read_to_string(&mut source)?;
                CompileRequest::text(source, options)
            }
            Mode::File(path) => CompileRequest::file(path, options),
            Mode::Directory {
                search_path,
                output_path,
            } => CompileRequest::directory(search_path, output_path, options),
        })
    }
}
