//! Security module for cxbot: reversible PII redaction.
//!
//! Provides:
//! - **Redactor**: masks phone numbers and email addresses with unique
//!   placeholders before user text leaves the trust boundary
//! - **RedactionMap**: the per-request placeholder table used to restore them

pub mod redact;

pub use redact::{PiiClass, RedactionMap, Redactor};
