//! Discovery and parsing of replacement specifications.
//!
//! A replacement spec is a JSON object file keyed by placeholder token,
//! whose values are directive strings. Specs live under the replacements
//! root in the subdirectory mirroring the template's own directory, and
//! apply to every template sharing their basename (minus extension).

use crate::error::TransformError;
use crate::files::FileSource;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Load the merged placeholder-to-directive mapping for a response template.
///
/// Every matching file is parsed as a JSON object and merged; files are
/// visited in ascending path order, and when two define the same key the
/// later one wins. A missing replacements directory or no matching file
/// yields an empty mapping, which signals that no directive substitution
/// is needed.
pub fn load_directives(
    template_path: &str,
    replacements: &FileSource,
) -> Result<BTreeMap<String, String>, TransformError> {
    let folder = source_directory(template_path, replacements);
    let stem = template_stem(template_path);

    let mut directives = BTreeMap::new();
    for file in folder.list_files_recursively() {
        if file.file_stem().and_then(|s| s.to_str()) != Some(stem) {
            continue;
        }

        let relative = file.to_string_lossy();
        let display_path = folder.root().join(&file).display().to_string();
        let content =
            folder
                .read_text(&relative)
                .map_err(|e| TransformError::MalformedReplacementSpec {
                    path: display_path.clone(),
                    reason: e.to_string(),
                    source: None,
                })?;

        debug!(spec = %display_path, "merging replacement specification");
        for (key, directive) in parse_spec(&content, &display_path)? {
            directives.insert(key, directive);
        }
    }
    Ok(directives)
}

/// Parse one replacement-spec file: a JSON object whose values are all
/// directive strings. Entries come back in file order.
pub fn parse_spec(
    content: &str,
    display_path: &str,
) -> Result<Vec<(String, String)>, TransformError> {
    let parsed: Value =
        serde_json::from_str(content).map_err(|source| TransformError::MalformedReplacementSpec {
            path: display_path.to_string(),
            reason: "invalid json".to_string(),
            source: Some(source),
        })?;

    let object = match parsed {
        Value::Object(map) => map,
        _ => {
            return Err(TransformError::MalformedReplacementSpec {
                path: display_path.to_string(),
                reason: "the spec is not a json object".to_string(),
                source: None,
            })
        }
    };

    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::String(directive) => entries.push((key, directive)),
            _ => {
                return Err(TransformError::MalformedReplacementSpec {
                    path: display_path.to_string(),
                    reason: format!("the directive for [{key}] is not a string"),
                    source: None,
                })
            }
        }
    }
    Ok(entries)
}

/// The replacements subdirectory mirroring the template's directory. A
/// template path with no directory component reads the root itself.
fn source_directory(template_path: &str, base: &FileSource) -> FileSource {
    match template_path.rsplit_once('/') {
        Some((directory, _)) if !directory.is_empty() => base.child(directory),
        _ => base.clone(),
    }
}

fn template_stem(template_path: &str) -> &str {
    Path::new(template_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}
