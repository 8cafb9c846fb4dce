//! The loaded compiler.

use std::ffi::{CStr, OsStr};
use std::path::Path;

use libloading::Library;
use sasswrap_sys::{SassApi, LIBRARY_NAMES};

use crate::context::{DataContext, FileContext, NativeContext};
use crate::{folder, CompileMode, CompileOptions, CompileRequest, CompileResult, Compiled, Error};

/// A handle to libsass.
///
/// Holds the open library and its resolved symbols. Every compile call makes
/// and deletes its own native context, so one `Sass` can serve any number of
/// sequential calls.
pub struct Sass {
    api: SassApi,
    // Keeps the symbols in `api` valid.
    _library: Option<Library>,
}

impl std::fmt::Debug for Sass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sass")
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

impl Sass {
    /// Locate libsass by its platform file names and open it.
    pub fn load() -> Result<Self, Error> {
        let mut last_error = None;
        for name in LIBRARY_NAMES {
            match Self::open(name) {
                Ok(sass) => return Ok(sass),
                Err(Error::Load { source, .. }) => {
                    log::debug!("libsass not found as {name}: {source}");
                    last_error = Some(source);
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::Load {
            tried: LIBRARY_NAMES.iter().map(|n| n.to_string()).collect(),
            source: last_error.unwrap_or(libloading::Error::DlOpenUnknown),
        })
    }

    /// Open libsass from an explicit file name or path.
    pub fn open(path: impl AsRef<OsStr>) -> Result<Self, Error> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|source| Error::Load {
            tried: vec![path.to_string_lossy().into_owned()],
            source,
        })?;
        let api = unsafe { SassApi::load(&library) }?;
        let sass = Self {
            api,
            _library: Some(library),
        };
        log::debug!(
            "loaded libsass {} from {}",
            sass.version(),
            path.to_string_lossy()
        );
        Ok(sass)
    }

    #[cfg(test)]
    pub(crate) fn from_api(api: SassApi) -> Self {
        Self {
            api,
            _library: None,
        }
    }

    /// The version string libsass reports.
    pub fn version(&self) -> String {
        let ptr = unsafe { (self.api.libsass_version)() };
        if ptr.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    /// Compile stylesheet source held in memory.
    pub fn compile_string(&self, source: &str, options: &CompileOptions) -> CompileResult<String> {
        DataContext::new(&self.api, source)?.compile(options)
    }

    /// Compile a single stylesheet file.
    ///
    /// The path is not checked up front; a missing or unreadable file is
    /// reported by libsass as a compile failure.
    pub fn compile_file(&self, path: &Path, options: &CompileOptions) -> CompileResult<String> {
        FileContext::new(&self.api, path)?.compile(options)
    }

    /// Compile every stylesheet under `search_path` into `output_path`.
    ///
    /// Produces no output string; the CSS lands on disk.
    pub fn compile_dir(
        &self,
        search_path: &Path,
        output_path: &Path,
        options: &CompileOptions,
    ) -> CompileResult<()> {
        folder::compile_tree(self, search_path, output_path, options)
    }

    /// Compile whatever `request` describes.
    pub fn compile(&self, request: &CompileRequest) -> CompileResult<Compiled> {
        let options = &request.options;
        match &request.mode {
            CompileMode::Text { source } => self.compile_string(source, options).map(Compiled::Css),
            CompileMode::File { path } => self.compile_file(path, options).map(Compiled::Css),
            CompileMode::Directory {
                search_path,
                output_path,
            } => self
                .compile_dir(search_path, output_path, options)
                .map(|()| Compiled::Tree),
        }
    }
}
