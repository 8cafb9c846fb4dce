//! sasswrap
//!
//! Safe bindings to the libsass stylesheet compiler. A [`Sass`] value owns the
//! loaded library; each compile call allocates its own native context, copies
//! the result out, and tears the context down before returning.
//!
//! ```text
//! CompileRequest → Sass::compile() → CompileResult<Compiled>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sasswrap::{CompileOptions, OutputStyle, Sass};
//!
//! let sass = Sass::load()?;
//! let options = CompileOptions::new().with_style(OutputStyle::Compressed);
//! let css = sass.compile_string("a { b { color: red; } }", &options)?;
//! assert_eq!(css, "a b{color:red}\n");
//! # Ok::<(), sasswrap::Error>(())
//! ```

mod context;
mod folder;
pub mod options;
pub mod request;
mod sass;

#[cfg(test)]
mod fake;

use std::path::{Path, PathBuf};

pub use options::{CompileOptions, OutputStyle, ParseStyleError};
pub use request::{CompileMode, CompileRequest, Compiled};
pub use sass::Sass;

/// Outcome of a compile call.
pub type CompileResult<T = String> = Result<T, Error>;

/// Binding error.
///
/// [`Error::Compile`] is the library's own failure report and displays as the
/// bare message. Everything else is raised by the binding itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not load libsass (tried {})", tried.join(", "))]
    Load {
        tried: Vec<String>,
        #[source]
        source: libloading::Error,
    },

    #[error(transparent)]
    Symbol(#[from] sasswrap_sys::MissingSymbol),

    #[error("{message}")]
    Compile { message: String },

    #[error("libsass could not allocate {what}")]
    Allocation { what: &'static str },

    #[error("{what} contains a NUL byte")]
    InteriorNul { what: &'static str },

    #[error("path is not valid UTF-8: {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Whether libsass itself rejected the input.
    pub fn is_compile_failure(&self) -> bool {
        matches!(self, Error::Compile { .. })
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
