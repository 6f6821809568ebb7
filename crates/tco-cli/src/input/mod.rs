pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use std::error::Error;

/// Resolve typed command input.
///
/// Precedence: `--input` file, then JSON piped on stdin, then the value
/// assembled from individual flags.
pub fn resolve<T, F>(path: Option<&str>, from_flags: F) -> Result<T, Box<dyn Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn Error>>,
{
    if let Some(path) = path {
        tracing::info!(path, "reading input file");
        return file::read_json(path);
    }
    if let Some(value) = stdin::read_stdin()? {
        tracing::info!("read input from stdin");
        return Ok(value);
    }
    tracing::info!("building input from flags");
    from_flags()
}
