//! Directory compilation.
//!
//! libsass 3 dropped its folder entry point, so the tree walk lives here,
//! below the public adapter surface: each stylesheet goes through its own
//! file context and the CSS is written at the same relative path under the
//! output directory.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{CompileOptions, CompileResult, Error, Sass};

const STYLESHEET_EXTENSIONS: &[&str] = &["scss", "sass"];

/// Whether `path` is a stylesheet that compiles on its own.
///
/// Partials (`_name.scss`) are only ever imported.
fn is_entry_stylesheet(path: &Path) -> bool {
    let is_partial = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'));
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| STYLESHEET_EXTENSIONS.contains(&e));
    has_extension && !is_partial
}

pub(crate) fn compile_tree(
    sass: &Sass,
    search_path: &Path,
    output_path: &Path,
    options: &CompileOptions,
) -> CompileResult<()> {
    if !search_path.is_dir() {
        return Err(Error::NotADirectory {
            path: search_path.to_path_buf(),
        });
    }

    let mut compiled = 0usize;
    for entry in WalkDir::new(search_path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_entry_stylesheet(path) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(search_path) else {
            continue;
        };

        let css = sass.compile_file(path, options)?;

        let target = output_path.join(relative).with_extension("css");
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&target, css).map_err(|e| Error::io(&target, e))?;
        log::debug!("{} -> {}", path.display(), target.display());
        compiled += 1;
    }

    log::info!(
        "compiled {compiled} stylesheet(s) from {} into {}",
        search_path.display(),
        output_path.display()
    );
    Ok(())
}
