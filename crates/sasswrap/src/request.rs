//! Compile requests and their outcomes.

use std::path::PathBuf;

use crate::CompileOptions;

/// What to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileMode {
    /// Stylesheet source held in memory.
    Text { source: String },
    /// A single stylesheet on disk.
    File { path: PathBuf },
    /// Every stylesheet under `search_path`, written below `output_path`.
    Directory {
        search_path: PathBuf,
        output_path: PathBuf,
    },
}

/// One compile call: a mode plus the options to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub mode: CompileMode,
    pub options: CompileOptions,
}

impl CompileRequest {
    pub fn text(source: impl Into<String>, options: CompileOptions) -> Self {
        Self {
            mode: CompileMode::Text {
                source: source.into(),
            },
            options,
        }
    }

    pub fn file(path: impl Into<PathBuf>, options: CompileOptions) -> Self {
        Self {
            mode: CompileMode::File { path: path.into() },
            options,
        }
    }

    pub fn directory(
        search_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        options: CompileOptions,
    ) -> Self {
        Self {
            mode: CompileMode::Directory {
                search_path: search_path.into(),
                output_path: output_path.into(),
            },
            options,
        }
    }
}

/// A successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// Generated CSS for text and file requests.
    Css(String),
    /// A directory request; the CSS was written to disk.
    Tree,
}

impl Compiled {
    pub fn css(&self) -> Option<&str> {
        match self {
            Compiled::Css(css) => Some(css),
            Compiled::Tree => None,
        }
    }
}
