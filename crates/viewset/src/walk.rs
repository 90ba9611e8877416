//! Directory walking, extension matching and name derivation.
//!
//! Files are matched by the *full* dot-suffix of their root-relative path,
//! not just the last segment:
//!
//! | Relative path | Extension |
//! |---------------|-----------|
//! | `index.html` | `.html` |
//! | `card.tpl.html` | `.tpl.html` |
//! | `v1.2/index.html` | `.2/index.html` |
//! | `Makefile` | (none) |
//!
//! With extensions `[".html"]`, `card.tpl.html` is skipped; it only matches
//! when `.tpl.html` itself is configured. A dot anywhere in a directory name
//! makes every file below it unmatchable.
//!
//! The template name is the path relative to the root, minus the extension,
//! with components joined by `/` on every platform:
//!
//! | Relative path | Name |
//! |---------------|------|
//! | `index.html` | `"index"` |
//! | `partials/nav.html` | `"partials/nav"` |

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ViewError;

/// A template file discovered during directory walking.
///
/// Captures where a template lives and what it will be called, without
/// reading its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Registry name (e.g. `"partials/nav"`)
    pub name: String,
    /// The configured extension that matched (e.g. `".html"`)
    pub extension: String,
    /// Path to the file, as visited under the root
    pub path: PathBuf,
}

impl TemplateFile {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            path: path.into(),
        }
    }
}

/// Returns the longest dot-suffix of a `/`-separated relative path.
///
/// Everything from the first `.` onward is the extension; a path without a
/// dot has the empty extension.
///
/// ```rust
/// use viewset::template_extension;
///
/// assert_eq!(template_extension("index.html"), ".html");
/// assert_eq!(template_extension("cards/user.tpl.html"), ".tpl.html");
/// assert_eq!(template_extension("v1.2/index.html"), ".2/index.html");
/// assert_eq!(template_extension("README"), "");
/// ```
pub fn template_extension(relative: &str) -> &str {
    match relative.find('.') {
        Some(idx) => &relative[idx..],
        None => "",
    }
}

/// Derives a template name from a root-relative path and its matched extension.
///
/// Returns `None` if the path does not end with `extension`.
pub fn template_name(relative: &Path, extension: &str) -> Option<String> {
    slash_path(relative)
        .strip_suffix(extension)
        .map(|name| name.to_string())
}

fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walks `root` recursively and collects every file whose extension is in
/// `extensions`.
///
/// Entries are visited in file-name order so the result is deterministic.
/// Symlinks are followed. The first filesystem error (unreadable directory,
/// broken link, missing root) aborts the walk.
///
/// # Example
///
/// ```rust,ignore
/// let files = walk_template_dir("./app/views", &[".html".to_string()])?;
/// for file in &files {
///     println!("{} -> {}", file.name, file.path.display());
/// }
/// ```
pub fn walk_template_dir(
    root: impl AsRef<Path>,
    extensions: &[String],
) -> Result<Vec<TemplateFile>, ViewError> {
    let root = root.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| ViewError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(file) = match_file(entry.path(), root, extensions) {
            files.push(file);
        }
    }

    Ok(files)
}

/// Returns a [`TemplateFile`] if `path` carries one of `extensions`.
fn match_file(path: &Path, root: &Path, extensions: &[String]) -> Option<TemplateFile> {
    let relative = slash_path(path.strip_prefix(root).ok()?);
    let ext = template_extension(&relative);
    if ext.is_empty() {
        return None;
    }

    let extension = extensions.iter().find(|e| e.as_str() == ext)?;
    let name = relative.strip_suffix(extension.as_str())?;

    Some(TemplateFile::new(name, extension.as_str(), path))
}
