use serde::{Deserialize, Serialize};

use crate::{ProviderId, UtcDateTime, ValidationError};

/// Schema version stamped on every envelope.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Error code for a dashboard cycle that produced no price data.
pub const MARKET_UNAVAILABLE_CODE: &str = "market.unavailable";

/// JSON wrapper for machine-readable `sentimeter` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        for error in &errors {
            error.validate()?;
        }

        Ok(Self { meta, data, errors })
    }
}

/// Per-response metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        source_chain: Vec<ProviderId>,
        latency_ms: u64,
        cache_hit: bool,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            trace_id: None,
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: UtcDateTime::now(),
            source_chain,
            latency_ms,
            cache_hit,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Result<Self, ValidationError> {
        let trace_id = trace_id.into();
        if !is_valid_trace_id(&trace_id) {
            return Err(ValidationError::InvalidTraceId);
        }
        self.trace_id = Some(trace_id);
        Ok(self)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }

        if let Some(trace_id) = &self.trace_id {
            if !is_valid_trace_id(trace_id) {
                return Err(ValidationError::InvalidTraceId);
            }
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        if self.source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }

        Ok(())
    }
}

/// Structured error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderId>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let error = Self {
            code: code.into(),
            message: message.into(),
            source: None,
        };
        error.validate()?;
        Ok(error)
    }

    pub fn with_source(mut self, source: ProviderId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }
        Ok(())
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}

/// 32 hex characters, not all zero.
pub fn is_valid_trace_id(value: &str) -> bool {
    value.len() == 32
        && value.chars().all(|ch| ch.is_ascii_hexdigit())
        && value.chars().any(|ch| ch != '0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_schema_version() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 11, true)
            .expect("meta should be valid");
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert!(is_valid_schema_version(&meta.schema_version));
        assert!(!is_valid_schema_version("1.0.0"));
        assert!(!is_valid_schema_version("v1.0"));
    }

    #[test]
    fn rejects_short_request_id_and_empty_chain() {
        assert!(matches!(
            EnvelopeMeta::new("abc", vec![ProviderId::Yahoo], 0, false),
            Err(ValidationError::InvalidRequestId)
        ));
        assert!(matches!(
            EnvelopeMeta::new("request-12345", Vec::new(), 0, false),
            Err(ValidationError::EmptySourceChain)
        ));
    }

    #[test]
    fn rejects_invalid_trace_id() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 1, false)
            .expect("meta must be valid");

        assert!(matches!(
            meta.clone().with_trace_id("not-a-trace-id"),
            Err(ValidationError::InvalidTraceId)
        ));
        assert!(matches!(
            meta.with_trace_id("0".repeat(32)),
            Err(ValidationError::InvalidTraceId)
        ));
    }

    #[test]
    fn errors_carry_code_and_source() {
        let error = EnvelopeError::new("source.rate_limited", "too many requests")
            .expect("valid error")
            .with_source(ProviderId::Newsapi);
        assert_eq!(error.code, "source.rate_limited");
        assert_eq!(error.source, Some(ProviderId::Newsapi));
        assert!(matches!(
            EnvelopeError::new("", "message"),
            Err(ValidationError::EmptyErrorCode)
        ));
    }

    #[test]
    fn serializes_without_empty_collections() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 3, false)
            .expect("meta must be valid");
        let json = serde_json::to_value(Envelope::success(meta, 7)).expect("serializes");
        assert_eq!(json["data"], 7);
        assert_eq!(json["meta"]["source_chain"][0], "yahoo");
        assert!(json.get("errors").is_none());
        assert!(json["meta"].get("warnings").is_none());
    }
}
