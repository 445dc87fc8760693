//! Filesystem glue: finding Markdown sources and writing components.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A Markdown file found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path to read from.
    pub path: PathBuf,
    /// Path relative to the input root; mirrored under the output root.
    pub relative: PathBuf,
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(ext)))
}

/// Collects Markdown files from `input`, which may be a single file or a
/// folder searched recursively. Results are sorted by relative path.
pub fn collect_markdown_files(input: &Path) -> Result<Vec<SourceFile>> {
    let metadata = fs::metadata(input)
        .with_context(|| format!("cannot read input path {}", input.display()))?;

    if metadata.is_file() {
        let relative = input
            .file_name()
            .map(PathBuf::from)
            .with_context(|| format!("input path {} has no file name", input.display()))?;
        return Ok(vec![SourceFile {
            path: input.to_path_buf(),
            relative,
        }]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        let entry = entry.with_context(|| format!("cannot walk {}", input.display()))?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(input)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        files.push(SourceFile {
            path: entry.path().to_path_buf(),
            relative,
        });
    }
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

/// Component name for a source file: its stem in PascalCase.
///
/// Names that would not start with a letter are prefixed with `Page`.
pub fn component_name(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = String::with_capacity(stem.len());
    for word in stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    if !name.starts_with(|c: char| c.is_alphabetic()) {
        name.insert_str(0, "Page");
    }
    name
}

/// Where the component for `relative` is written.
pub fn output_path(output_root: &Path, relative: &Path) -> PathBuf {
    output_root.join(relative).with_extension("jsx")
}

/// Splits `sources` into those with a free output path and those whose
/// output path an earlier source already claimed (`a.markdown` and `a.md`
/// both become `a.jsx`). The first source in order wins.
pub fn split_output_collisions(sources: Vec<SourceFile>) -> (Vec<SourceFile>, Vec<SourceFile>) {
    let mut claimed = HashSet::new();
    sources
        .into_iter()
        .partition(|source| claimed.insert(source.relative.with_extension("jsx")))
}

/// Creates the output folder, emptying it first when asked to.
pub fn prepare_output_dir(output_root: &Path, delete_existing: bool) -> Result<()> {
    if delete_existing && output_root.exists() {
        log::debug!("Deleting existing output folder {}", output_root.display());
        fs::remove_dir_all(output_root)
            .with_context(|| format!("cannot delete {}", output_root.display()))?;
    }
    fs::create_dir_all(output_root)
        .with_context(|| format!("cannot create {}", output_root.display()))
}

/// Writes one component, creating parent folders as needed.
pub fn write_component(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    fs::write(path, code).with_context(|| format!("cannot write {}", path.display()))
}
