//! Writing a successful compile to its destination.

use std::fs;
use std::io::Write;
use std::path::Path;

use sasswrap::Compiled;

use crate::CliError;

/// Send compiled CSS to `output`, or to `stdout` when no output is given.
///
/// Directory compiles have already written their files.
pub fn write(compiled: &Compiled, output: Option<&Path>, mut stdout: impl Write) -> Result<(), CliError> {
    let Compiled::Css(css) = compiled else {
        return Ok(());
    };

    match output {
        None => {
            stdout.write_all(css.as_bytes()).map_err(CliError::Stdout)?;
            stdout.flush().map_err(CliError::Stdout)
        }
        Some(path) if path.is_dir() => {
            log::warn!("{} is a directory; output not written", path.display());
            Ok(())
        }
        Some(path) => fs::write(path, css).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
