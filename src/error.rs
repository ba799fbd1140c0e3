//! Error taxonomy for the response transformation pipeline.

use thiserror::Error;

/// Errors raised while materializing a dynamic response body.
///
/// Every variant is fatal to the transformation that raised it: the caller
/// receives the error instead of a partially substituted body. No retries
/// happen inside the engine.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The response body file named by the definition could not be read.
    #[error("could not read the response body file [{path}]")]
    TemplateNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The request body could not be parsed in the format a directive expects.
    #[error("could not process the request body: {reason}")]
    MalformedBody {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A JSON field named by a directive does not exist at the expected path.
    #[error("the request body does not contain the value [{field}]")]
    MissingField { field: String },

    /// The final segment of a `request.key.` directive is not an integer.
    #[error("the value \"{segment}\" is not a number, check the replacement file")]
    InvalidKeyIndex { segment: String },

    /// A `request.url.param.` index addresses a segment the URL does not have.
    #[error(
        "the current url contains [{available}] url parameters, \
         but the replacement value is configured to evaluate [{directive}]"
    )]
    UrlParamOutOfRange { available: usize, directive: String },

    /// The directive string matches none of the recognized forms.
    #[error("dynamic response is not supported for a value like [{directive}]")]
    UnsupportedDirective { directive: String },

    /// A replacement-spec file is not a JSON object of string directives.
    #[error("could not process the replacement file [{path}]: {reason}")]
    MalformedReplacementSpec {
        path: String,
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = TransformError::MissingField {
            field: "order.id".to_string(),
        };
        assert!(err.to_string().contains("order.id"));

        let err = TransformError::UrlParamOutOfRange {
            available: 3,
            directive: "request.url.param.9".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("[3]"));
        assert!(message.contains("request.url.param.9"));
    }

    #[test]
    fn test_template_not_found_carries_cause() {
        use std::error::Error;

        let err = TransformError::TemplateNotFound {
            path: "folder/missing.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("folder/missing.json"));
    }
}
