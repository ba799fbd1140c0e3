//! Dynamic response materialization.
//!
//! Takes the response definition selected by stub matching and, when it
//! references a body file, loads the template, resolves the random-id
//! marker and every replacement directive against the current request,
//! and returns the definition with the finalized body inlined.

use crate::config::{ResponseDefinition, TransformerConfig};
use crate::directive::{ContentKind, Directive};
use crate::error::TransformError;
use crate::files::FileSource;
use crate::replacements::load_directives;
use crate::request::Request;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Marker token always replaced with a fresh hyphen-free random identifier,
/// independent of any replacement spec.
pub const UUID_WITHOUT_HYPHEN_MARKER: &str = "%uuid.without.hyphen%";

/// Resolves placeholders in response body files against the current request.
///
/// Both content roots are injected at construction and never change; each
/// call re-reads templates and specs from disk, so edits apply immediately.
/// The transformer holds no per-request state and can be shared freely
/// across threads.
pub struct DynamicResponseTransformer {
    files: FileSource,
    replacements: FileSource,
}

impl DynamicResponseTransformer {
    /// Create a transformer over the given content roots.
    pub fn new(files: FileSource, replacements: FileSource) -> Self {
        Self {
            files,
            replacements,
        }
    }

    /// Create a transformer from a loaded configuration.
    pub fn from_config(config: &TransformerConfig) -> Self {
        Self::new(
            FileSource::new(&config.files_root),
            FileSource::new(&config.replacements_root),
        )
    }

    /// Materialize a response definition for the given request.
    ///
    /// Definitions without a body-file reference pass through untouched.
    /// When the replacements root exists but defines nothing for this
    /// template and the template carries no random marker, the original
    /// definition is returned unchanged, body-file reference included.
    /// Otherwise the returned definition has `body_file_name` cleared and
    /// `body` set to the substituted text.
    ///
    /// Substitution is a literal find/replace-all of each bare placeholder
    /// key, so keys that also occur as unrelated text in the template will
    /// be replaced too.
    pub fn transform(
        &self,
        request: &Request,
        response: &ResponseDefinition,
    ) -> Result<ResponseDefinition, TransformError> {
        match response.body_file_name.as_deref() {
            Some(body_file) => self.evaluate(request, response, body_file),
            None => {
                info!("not evaluating a dynamic response, the mapping does not use a body file");
                Ok(response.clone())
            }
        }
    }

    fn evaluate(
        &self,
        request: &Request,
        response: &ResponseDefinition,
        body_file: &str,
    ) -> Result<ResponseDefinition, TransformError> {
        info!(
            method = %request.method(),
            url = %request.url(),
            "evaluating dynamic response"
        );

        let mut body = self.read_template(body_file)?;

        let has_marker = body.contains(UUID_WITHOUT_HYPHEN_MARKER);
        if has_marker {
            // One identifier per transformation, shared by every occurrence.
            let identifier = random_hex_identifier();
            body = body.replace(UUID_WITHOUT_HYPHEN_MARKER, &identifier);
        }

        if self.replacements.exists() {
            let directives = load_directives(body_file, &self.replacements)?;
            if directives.is_empty() && !has_marker {
                info!(template = %body_file, "no replacements defined for template");
                return Ok(response.clone());
            }

            let kind = ContentKind::from_template_path(body_file);
            let values = resolve_directives(&directives, request, kind)?;
            for (key, value) in &values {
                debug!(key = %key, value = %value, "substituting placeholder");
                body = body.replace(key.as_str(), value);
            }
        }

        let mut materialized = response.clone();
        materialized.body_file_name = None;
        materialized.body = Some(body);
        Ok(materialized)
    }

    fn read_template(&self, body_file: &str) -> Result<String, TransformError> {
        self.files
            .read_text(body_file)
            .map_err(|source| TransformError::TemplateNotFound {
                path: body_file.to_string(),
                source,
            })
    }
}

/// Resolve every directive before any substitution happens, so a failing
/// directive aborts the transformation with the body untouched.
fn resolve_directives(
    directives: &BTreeMap<String, String>,
    request: &Request,
    kind: Option<ContentKind>,
) -> Result<BTreeMap<String, String>, TransformError> {
    let mut values = BTreeMap::new();
    for (key, raw) in directives {
        let directive = Directive::classify(raw)?;
        values.insert(key.clone(), directive.resolve(request, kind)?);
    }
    Ok(values)
}

/// 128 random bits as 32 lowercase hex characters.
fn random_hex_identifier() -> String {
    let mut rng = rand::thread_rng();
    format!("{:032x}", rng.gen::<u128>())
}
