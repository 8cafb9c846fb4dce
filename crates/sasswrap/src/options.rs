//! Compile options and their native encoding.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sasswrap_sys::{
    Sass_Output_Style, SASS_STYLE_COMPACT, SASS_STYLE_COMPRESSED, SASS_STYLE_EXPANDED,
    SASS_STYLE_NESTED,
};

/// Formatting of the generated CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputStyle {
    #[default]
    Nested,
    Expanded,
    Compact,
    Compressed,
}

impl OutputStyle {
    pub const ALL: [OutputStyle; 4] = [
        OutputStyle::Nested,
        OutputStyle::Expanded,
        OutputStyle::Compact,
        OutputStyle::Compressed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }

    /// The `Sass_Output_Style` value libsass expects.
    pub fn native_code(self) -> Sass_Output_Style {
        match self {
            OutputStyle::Nested => SASS_STYLE_NESTED,
            OutputStyle::Expanded => SASS_STYLE_EXPANDED,
            OutputStyle::Compact => SASS_STYLE_COMPACT,
            OutputStyle::Compressed => SASS_STYLE_COMPRESSED,
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An output style name that is not one of the four libsass styles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid output style `{name}` (expected nested, expanded, compact or compressed)")]
pub struct ParseStyleError {
    pub name: String,
}

impl FromStr for OutputStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| ParseStyleError { name: s.into() })
    }
}

/// Options applied to every context a compile call creates.
///
/// Built once with the `with_*` methods and then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    style: OutputStyle,
    source_comments: bool,
    image_path: Option<PathBuf>,
    include_paths: Vec<PathBuf>,
    precision: Option<u8>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    /// Emit `/* line N, file */` comments before each rule.
    pub fn with_source_comments(mut self, enabled: bool) -> Self {
        self.source_comments = enabled;
        self
    }

    /// Base path for `image-url()`. libsass 3 no longer reads it.
    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Append a directory to the `@import` search list.
    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Decimal places kept for numbers. libsass defaults to 10.
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn style(&self) -> OutputStyle {
        self.style
    }

    pub fn source_comments(&self) -> bool {
        self.source_comments
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn precision(&self) -> Option<u8> {
        self.precision
    }
}
