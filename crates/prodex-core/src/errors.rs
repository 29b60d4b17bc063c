use thiserror::Error;

/// Result type alias using PxError
pub type Result<T> = std::result::Result<T, PxError>;

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the Prodex system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PxErrorKind {
    /// Unknown product or revision number; surfaced as a lookup failure, never retried
    NotFound,
    /// Missing required summary or malformed proposed state; surfaced immediately
    Validation,
    /// Duplicate baseline revision, or a per-product write race detected by the
    /// optimistic check (one internal retry happens before this surfaces)
    Conflict,
    /// The underlying persistence layer failed mid-transaction
    Storage,

    // Integration
    Serialization,
    Io,

    // Auth boundary (moderation gate only; the revision service never checks)
    Forbidden,

    // Internal
    Internal,
}

impl PxErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PxErrorKind::NotFound => "ERR_NOT_FOUND",
            PxErrorKind::Validation => "ERR_VALIDATION",
            PxErrorKind::Conflict => "ERR_CONFLICT",
            PxErrorKind::Storage => "ERR_STORAGE",
            PxErrorKind::Serialization => "ERR_SERIALIZATION",
            PxErrorKind::Io => "ERR_IO",
            PxErrorKind::Forbidden => "ERR_FORBIDDEN",
            PxErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Provides a structured representation of errors with classification fields
/// for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct PxError {
    kind: PxErrorKind,
    op: Option<String>,
    product_id: Option<String>,
    revision: Option<u32>,
    message: String,
    source: Option<Box<PxError>>,
}

impl PxError {
    /// Create a new error with the specified kind
    pub fn new(kind: PxErrorKind) -> Self {
        Self {
            kind,
            op: None,
            product_id: None,
            revision: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add product ID context
    pub fn with_product_id(mut self, id: impl Into<String>) -> Self {
        self.product_id = Some(id.into());
        self
    }

    /// Add revision number context
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: PxError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> PxErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the product ID context, if any
    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    /// Get the revision number context, if any
    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&PxError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for PxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(product_id) = &self.product_id {
            write!(f, " (product_id: {})", product_id)?;
        }
        if let Some(revision) = self.revision {
            write!(f, " (revision: {})", revision)?;
        }
        Ok(())
    }
}

impl std::error::Error for PxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Decode failure for a moderation-gate change payload.
///
/// The gate decodes the raw payload exactly once at the boundary; everything
/// past the gate works with typed values.
#[derive(Debug, Error)]
pub enum ChangeDecodeError {
    /// Payload is not valid JSON, or does not match the tagged change shape
    #[error("change payload is not a valid proposed change: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ChangeDecodeError> for PxError {
    fn from(err: ChangeDecodeError) -> Self {
        PxError::new(PxErrorKind::Validation)
            .with_op("decode_change")
            .with_message(err.to_string())
    }
}

impl From<serde_json::Error> for PxError {
    fn from(err: serde_json::Error) -> Self {
        PxError::new(PxErrorKind::Serialization).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (PxErrorKind::NotFound, "ERR_NOT_FOUND"),
            (PxErrorKind::Validation, "ERR_VALIDATION"),
            (PxErrorKind::Conflict, "ERR_CONFLICT"),
            (PxErrorKind::Storage, "ERR_STORAGE"),
            (PxErrorKind::Forbidden, "ERR_FORBIDDEN"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = PxError::new(PxErrorKind::NotFound)
            .with_op("get_revision")
            .with_product_id("prod:1")
            .with_revision(4)
            .with_message("revision not found");
        let rendered = err.to_string();
        assert!(rendered.contains("ERR_NOT_FOUND"));
        assert!(rendered.contains("get_revision"));
        assert!(rendered.contains("prod:1"));
        assert!(rendered.contains("revision: 4"));
    }

    #[test]
    fn test_decode_error_maps_to_validation() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err: PxError = ChangeDecodeError::Json(bad.unwrap_err()).into();
        assert_eq!(err.kind(), PxErrorKind::Validation);
    }
}
