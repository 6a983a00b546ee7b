//! # Build File Sanitization
//!
//! Code extracted from its origin repository inevitably references sibling
//! projects and shared build files that do not exist in the new workspace;
//! leaving those references in place makes the extracted project
//! unbuildable. This module rewrites a .NET project descriptor to remove:
//!
//! - project-to-project references (`<ProjectReference>`) whose path is
//!   relative and escapes the project directory,
//! - import directives (`<Import>`) pointing at build-customization files
//!   outside the workspace, which covers the directory-wide
//!   `Directory.Build.props`/`.targets` convention,
//! - linked source/content items (`<Compile>`, `<Content>`, `<None>`,
//!   `<EmbeddedResource>`) whose include path escapes.
//!
//! A path escapes iff it begins with `..`, `./`, or `.\`. Everything else
//! is preserved untouched: sanitization must be conservative, and
//! references to files that remain inside the new workspace round-trip
//! byte-identical.
//!
//! The rewrite parses the descriptor with `roxmltree` and splices the
//! offending elements out of the original text by byte range, so the file's
//! formatting survives. After removals, now-empty `<ItemGroup>` and
//! `<ImportGroup>` elements are pruned.

use std::fs;
use std::ops::Range;
use std::path::Path;

use roxmltree::{Document, Node};

use crate::error::{Error, Result};

/// Item elements whose `Include` attribute may link files from outside the
/// project directory.
const LINKED_ITEM_TAGS: &[&str] = &["Compile", "Content", "None", "EmbeddedResource"];

/// Grouping elements pruned when removals leave them empty.
const GROUP_TAGS: &[&str] = &["ItemGroup", "ImportGroup"];

/// Sanitize a project descriptor on disk.
///
/// Returns `Ok(true)` iff the file was modified. Malformed markup surfaces
/// as `Error::ProjectFileParse`; the caller is expected to downgrade it to
/// a warning and leave the file alone.
pub fn sanitize_project_file(path: &Path) -> Result<bool> {
    let input = fs::read_to_string(path)?;
    match sanitize_project_source(&input).map_err(|message| Error::ProjectFileParse {
        path: path.display().to_string(),
        message,
    })? {
        Some(output) => {
            fs::write(path, output)?;
            log::debug!("sanitized {}", path.display());
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Pure sanitization core: `Some(rewritten)` when anything was removed,
/// `None` when the descriptor is already clean.
pub fn sanitize_project_source(input: &str) -> std::result::Result<Option<String>, String> {
    let removals = {
        let doc = Document::parse(input).map_err(|e| e.to_string())?;
        collect_escaping_references(&doc)
    };

    if removals.is_empty() {
        return Ok(None);
    }

    let stripped = splice_out(input, removals);

    // Re-parse to find grouping elements the removals emptied out.
    let pruned = {
        let doc = Document::parse(&stripped)
            .map_err(|e| format!("descriptor no longer parses after rewrite: {}", e))?;
        let empty_groups = collect_empty_groups(&doc);
        splice_out(&stripped, empty_groups)
    };

    Ok(Some(pruned))
}

/// True iff `path` is relative and climbs out of the current directory.
pub fn is_escaping_path(path: &str) -> bool {
    path.starts_with("..") || path.starts_with("./") || path.starts_with(".\\")
}

fn collect_escaping_references(doc: &Document) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();

    for node in doc.root().descendants().filter(Node::is_element) {
        let tag = node.tag_name().name();

        let reference = if tag == "ProjectReference" {
            node.attribute("Include")
        } else if tag == "Import" {
            node.attribute("Project")
        } else if LINKED_ITEM_TAGS.contains(&tag) {
            node.attribute("Include")
        } else {
            None
        };

        if let Some(path) = reference {
            if is_escaping_path(path) {
                log::debug!("removing escaping reference <{} {}>", tag, path);
                ranges.push(node.range());
            }
        }
    }

    ranges
}

fn collect_empty_groups(doc: &Document) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();

    for node in doc.root().descendants().filter(Node::is_element) {
        if !GROUP_TAGS.contains(&node.tag_name().name()) {
            continue;
        }
        // Comments are content worth keeping; only whitespace counts as empty.
        let empty = node.children().all(|child| {
            child.is_text() && child.text().is_some_and(|t| t.trim().is_empty())
        });
        if empty {
            ranges.push(node.range());
        }
    }

    ranges
}

/// Remove the given byte ranges from `input`, swallowing each range's line
/// when the element was alone on it.
fn splice_out(input: &str, mut ranges: Vec<Range<usize>>) -> String {
    ranges.sort_by_key(|r| r.start);

    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    for range in ranges {
        let expanded = expand_to_line(input, &range);
        if expanded.start < cursor {
            continue;
        }
        output.push_str(&input[cursor..expanded.start]);
        cursor = expanded.end;
    }
    output.push_str(&input[cursor..]);
    output
}

/// Widen `range` to cover its whole line when the surrounding line content
/// is blank, so removals do not leave empty indented lines behind.
fn expand_to_line(input: &str, range: &Range<usize>) -> Range<usize> {
    let line_start = input[..range.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let leading_blank = input[line_start..range.start]
        .chars()
        .all(|c| c == ' ' || c == '\t');

    let line_end = input[range.end..]
        .find('\n')
        .map(|i| range.end + i + 1)
        .unwrap_or(input.len());
    let trailing_blank = input[range.end..line_end].trim().is_empty();

    if leading_blank && trailing_blank {
        line_start..line_end
    } else {
        range.clone()
    }
}
