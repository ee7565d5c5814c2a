use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::diagram::{FENCE, FENCE_CLOSE};

/// Writes the fenced diagram plus a trailing newline, replacing any previous file.
pub fn write_artifact(path: &Path, diagram: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", diagram))?;
    info!("ERD written to {}", path.display());
    Ok(())
}

/// Reads the stored artifact and strips the fence lines.
///
/// Returns `Ok(None)` when nothing has been generated yet.
pub fn read_diagram(path: &Path) -> io::Result<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut lines: Vec<&str> = content.trim().lines().collect();
    if lines.first().is_some_and(|l| l.starts_with(FENCE)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == FENCE_CLOSE) {
        lines.pop();
    }
    Ok(Some(lines.join("\n")))
}
