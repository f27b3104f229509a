//! Output writers: the JSON dataset and the Markdown report.
//!
//! Both writers replace the whole target file. Content goes to a hidden
//! temporary file next to the target first and is then renamed over it, so
//! a failed write leaves the previous output in place.

mod json;
mod markdown;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

pub use json::{to_json_string, write_json};
pub use markdown::{render_markdown, write_markdown};

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;

    let mut tmp_name = OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}
