//! Replacement-directive classification and evaluation.
//!
//! A directive string tells the engine where to source the value for one
//! placeholder: a field inside the request body, a positional URL segment,
//! or the name of a key inside the request body. Classification happens
//! once per directive; evaluation is a pure function of the directive, the
//! request, and the template's content kind.

use crate::error::TransformError;
use crate::request::Request;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};
use std::path::Path;

const REQUEST_KEY_PREFIX: &str = "request.key.";
const REQUEST_BODY_PREFIX: &str = "request.body.";
const REQUEST_URL_PARAM_PREFIX: &str = "request.url.param.";

/// How request-body lookups parse the request payload.
///
/// Inferred from the response template's file extension. Templates with
/// any other extension have no body-lookup support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Xml,
}

impl ContentKind {
    /// Infer the content kind from a template's logical path.
    pub fn from_template_path(path: &str) -> Option<ContentKind> {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("json") => Some(ContentKind::Json),
            Some("xml") => Some(ContentKind::Xml),
            _ => None,
        }
    }
}

/// A classified replacement directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `request.key.<path>.<n>`: the name of the n-th field of an object
    /// inside the request body
    KeyIndex { path: String },
    /// `request.body.<path>`: a value read out of the request body
    BodyPath { path: String },
    /// `request.url.param.<n>`: a positional URL path segment
    UrlParam { index_text: String },
}

impl Directive {
    /// Classify a raw directive string.
    ///
    /// Prefixes are tried in a fixed priority order: `request.key.` before
    /// `request.body.` before `request.url.param.`. Anything else is
    /// unsupported.
    pub fn classify(raw: &str) -> Result<Directive, TransformError> {
        if let Some(path) = raw.strip_prefix(REQUEST_KEY_PREFIX) {
            Ok(Directive::KeyIndex {
                path: path.to_string(),
            })
        } else if let Some(path) = raw.strip_prefix(REQUEST_BODY_PREFIX) {
            Ok(Directive::BodyPath {
                path: path.to_string(),
            })
        } else if let Some(index_text) = raw.strip_prefix(REQUEST_URL_PARAM_PREFIX) {
            Ok(Directive::UrlParam {
                index_text: index_text.to_string(),
            })
        } else {
            Err(TransformError::UnsupportedDirective {
                directive: raw.to_string(),
            })
        }
    }

    /// Resolve this directive to its substitution value.
    pub fn resolve(
        &self,
        request: &Request,
        kind: Option<ContentKind>,
    ) -> Result<String, TransformError> {
        match self {
            Directive::KeyIndex { path } => resolve_key_index(path, request),
            Directive::BodyPath { path } => resolve_body_path(path, request, kind),
            Directive::UrlParam { index_text } => resolve_url_param(index_text, request),
        }
    }
}

fn resolve_url_param(index_text: &str, request: &Request) -> Result<String, TransformError> {
    let index: usize =
        index_text
            .parse()
            .map_err(|_| TransformError::UnsupportedDirective {
                directive: format!("{REQUEST_URL_PARAM_PREFIX}{index_text}"),
            })?;
    let segments: Vec<&str> = request.url().split('/').collect();
    if index >= segments.len() {
        // The leading '/' produces an empty first segment; it is excluded
        // from the count reported to the user.
        return Err(TransformError::UrlParamOutOfRange {
            available: segments.len() - 1,
            directive: format!("{REQUEST_URL_PARAM_PREFIX}{index_text}"),
        });
    }
    Ok(segments[index].to_string())
}

fn resolve_body_path(
    path: &str,
    request: &Request,
    kind: Option<ContentKind>,
) -> Result<String, TransformError> {
    match kind {
        Some(ContentKind::Json) => json_value_at(path, request.body_as_string()),
        Some(ContentKind::Xml) => xml_element_text(path, request.body_as_string()),
        None => Err(TransformError::UnsupportedDirective {
            directive: format!("{REQUEST_BODY_PREFIX}{path}"),
        }),
    }
}

/// Walk a dotted path through nested JSON objects and read the final
/// segment as a string field.
fn json_value_at(path: &str, body: &str) -> Result<String, TransformError> {
    let root = parse_json_object(body)?;
    let segments: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = match segments.split_last() {
        Some(parts) => parts,
        None => {
            return Err(TransformError::MissingField {
                field: path.to_string(),
            })
        }
    };

    let object = descend(&root, intermediate)?;
    object
        .get(*last)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TransformError::MissingField {
            field: (*last).to_string(),
        })
}

/// Walk a dotted path, then return the name of the field addressed by the
/// final segment, counting keys in encounter order.
fn resolve_key_index(path: &str, request: &Request) -> Result<String, TransformError> {
    let root = parse_json_object(request.body_as_string())?;
    let segments: Vec<&str> = path.split('.').collect();
    let (last, intermediate) = match segments.split_last() {
        Some(parts) => parts,
        None => {
            return Err(TransformError::MissingField {
                field: path.to_string(),
            })
        }
    };

    let object = descend(&root, intermediate)?;
    let wanted: i64 = last.parse().map_err(|_| TransformError::InvalidKeyIndex {
        segment: (*last).to_string(),
    })?;

    // Pre-increment scan: consume keys until the counter reaches the
    // wanted index or the object runs out, keeping the last consumed name.
    // An index past the end therefore yields the last key, and an empty
    // object yields an empty string.
    let mut index: i64 = -1;
    let mut value = String::new();
    let mut names = object.keys();
    while index != wanted {
        match names.next() {
            Some(name) => {
                value = name.clone();
                index += 1;
            }
            None => break,
        }
    }
    Ok(value)
}

fn parse_json_object(body: &str) -> Result<Map<String, Value>, TransformError> {
    let value: Value =
        serde_json::from_str(body).map_err(|source| TransformError::MalformedBody {
            reason: "invalid json".to_string(),
            source: Some(Box::new(source)),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TransformError::MalformedBody {
            reason: "the request body is not a json object".to_string(),
            source: None,
        }),
    }
}

fn descend<'a>(
    mut object: &'a Map<String, Value>,
    segments: &[&str],
) -> Result<&'a Map<String, Value>, TransformError> {
    for segment in segments {
        object = object
            .get(*segment)
            .and_then(Value::as_object)
            .ok_or_else(|| TransformError::MissingField {
                field: (*segment).to_string(),
            })?;
    }
    Ok(object)
}

/// Return the text content of the first element in document order whose
/// tag name equals `element`, including descendant text, untrimmed.
fn xml_element_text(element: &str, body: &str) -> Result<String, TransformError> {
    let mut reader = Reader::from_str(body);

    let mut text = String::new();
    let mut depth_inside: usize = 0;
    let mut found = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if depth_inside > 0 {
                    depth_inside += 1;
                } else if start.name().as_ref() == element.as_bytes() {
                    found = true;
                    depth_inside = 1;
                }
            }
            Ok(Event::End(_)) if depth_inside > 0 => {
                depth_inside -= 1;
                if depth_inside == 0 {
                    break;
                }
            }
            Ok(Event::Text(chunk)) if depth_inside > 0 => {
                let decoded = chunk
                    .unescape()
                    .map_err(|source| malformed_xml(element, source))?;
                text.push_str(&decoded);
            }
            Ok(Event::CData(chunk)) if depth_inside > 0 => {
                text.push_str(&String::from_utf8_lossy(&chunk.into_inner()));
            }
            Ok(Event::Empty(empty)) => {
                if depth_inside == 0 && empty.name().as_ref() == element.as_bytes() {
                    found = true;
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(source) => return Err(malformed_xml(element, source)),
        }
    }

    if found {
        Ok(text)
    } else {
        Err(TransformError::MalformedBody {
            reason: format!("could not read the value for xml node [{element}]"),
            source: None,
        })
    }
}

fn malformed_xml(element: &str, source: impl std::error::Error + Send + Sync + 'static) -> TransformError {
    TransformError::MalformedBody {
        reason: format!("could not read the value for xml node [{element}]"),
        source: Some(Box::new(source)),
    }
}
