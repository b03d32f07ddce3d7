use thiserror::Error;

/// Validation and contract errors exposed by `sentimeter-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no ticker symbol given")]
    EmptySymbol,
    #[error("ticker '{symbol}' is longer than {max} characters")]
    SymbolTooLong { symbol: String, max: usize },
    #[error("ticker '{symbol}' must begin with a letter, optionally after '^'")]
    SymbolNeedsLetter { symbol: String },
    #[error("ticker '{symbol}' has unexpected '{ch}' at position {position}")]
    MalformedSymbol {
        symbol: String,
        ch: char,
        position: usize,
    },

    #[error("invalid period '{value}', expected one of 1mo, 5d, 3mo, 6mo")]
    InvalidPeriod { value: String },
    #[error("invalid source '{value}', expected one of yahoo, newsapi")]
    InvalidSource { value: String },
    #[error("invalid sentiment model '{value}', expected one of vader, vader-finance")]
    InvalidSentimentModel { value: String },
    #[error("invalid value '{value}' for setting {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("epoch seconds out of range: {value}")]
    EpochOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("price point high must be >= low")]
    InvalidPriceRange,

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
