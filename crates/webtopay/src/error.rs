use std::fmt;
use thiserror::Error;

/// Which declarative constraint an outbound request field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field is absent.
    Missing,
    /// Value is longer than the allowed number of bytes.
    MaxLength,
    /// Value does not match the field pattern.
    Pattern,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::Missing => f.write_str("missing"),
            ValidationErrorKind::MaxLength => f.write_str("maxlen"),
            ValidationErrorKind::Pattern => f.write_str("pattern"),
        }
    }
}

/// Why an inbound callback was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackErrorKind {
    /// The sign checker reported the payload as not authentic.
    InvalidSign,
    /// `data` or the signature field is absent.
    MissingData,
    /// Payload is structurally invalid (undecodable, wrong project, ...).
    Invalid,
}

impl fmt::Display for CallbackErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackErrorKind::InvalidSign => f.write_str("invalid sign"),
            CallbackErrorKind::MissingData => f.write_str("missing data"),
            CallbackErrorKind::Invalid => f.write_str("invalid"),
        }
    }
}

/// Errors returned by webtopay operations.
///
/// All variants are terminal for the operation that raised them; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum WebToPayError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("validation error ({kind}) on '{field}': {message}")]
    Validation {
        kind: ValidationErrorKind,
        field: String,
        message: String,
    },

    #[error("callback error ({kind}): {detail}")]
    Callback {
        kind: CallbackErrorKind,
        detail: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("sms answer rejected: {0}")]
    SmsAnswer(String),

    #[error(
        "field {field} is not as expected (expected {expected}, got {})",
        actual.as_deref().unwrap_or("nothing")
    )]
    UnexpectedField {
        field: String,
        expected: String,
        actual: Option<String>,
    },
}

impl WebToPayError {
    pub(crate) fn validation(
        kind: ValidationErrorKind,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        WebToPayError::Validation {
            kind,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn callback(kind: CallbackErrorKind, detail: impl Into<String>) -> Self {
        WebToPayError::Callback {
            kind,
            detail: detail.into(),
        }
    }

    /// Kind of a callback rejection, if this is one.
    pub fn callback_kind(&self) -> Option<CallbackErrorKind> {
        match self {
            WebToPayError::Callback { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Kind and field of a request validation failure, if this is one.
    pub fn validation_failure(&self) -> Option<(ValidationErrorKind, &str)> {
        match self {
            WebToPayError::Validation { kind, field, .. } => Some((*kind, field.as_str())),
            _ => None,
        }
    }
}

/// Shorthand for results carrying [`WebToPayError`].
pub type Result<T> = std::result::Result<T, WebToPayError>;
