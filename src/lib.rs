//! Dynamic Response Transformer
//!
//! A response-body templating engine for stub servers. Given a response
//! definition that references a body template file and the incoming
//! request, it resolves embedded placeholders into concrete values and
//! returns the definition with the finalized body inlined.
//!
//! # Features
//!
//! - **Random identifiers**: the marker `%uuid.without.hyphen%` is always
//!   replaced with one freshly generated 32-character hex value, shared by
//!   every occurrence in the template
//! - **Request-derived values**: replacement specs map placeholder tokens
//!   to `request.body.`, `request.url.param.` and `request.key.` directives
//! - **Mirrored spec discovery**: specs live under a replacements root
//!   mirroring the template tree and apply by basename
//! - **All-or-nothing resolution**: any directive failure aborts the
//!   transformation; no partially substituted body is ever returned
//!
//! # Example replacement specification
//!
//! For a template `folder/order-confirmation.json`, the spec at
//! `replacements/folder/order-confirmation.json`:
//!
//! ```json
//! {
//!   "ORDER_ID": "request.url.param.2",
//!   "CUSTOMER_NAME": "request.body.customer.name",
//!   "FIRST_FIELD": "request.key.order.0"
//! }
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod files;
pub mod replacements;
pub mod request;
pub mod transformer;

pub use config::{ResponseDefinition, TransformerConfig};
pub use error::TransformError;
pub use files::FileSource;
pub use request::Request;
pub use transformer::DynamicResponseTransformer;
