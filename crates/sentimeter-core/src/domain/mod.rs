//! # Domain Models
//!
//! Canonical domain types for the sentiment dashboard.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`Period`] | Analysis window (`1mo`, `5d`, `3mo`, `6mo`) |
//! | [`PricePoint`] | One daily OHLCV row |
//! | [`PriceHistory`] | Chronological price series for a symbol/period |
//! | [`IssuerInfo`] | Opaque issuer metadata mapping |
//! | [`Headline`] | News item normalized across providers |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Price rows enforce their invariants at construction time:
//!
//! ```rust
//! use sentimeter_core::{PricePoint, UtcDateTime, ValidationError};
//!
//! let ts = UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap();
//! let invalid = PricePoint::new(ts, 100.0, 95.0, 105.0, 102.0, 1_000);
//! assert!(matches!(invalid, Err(ValidationError::InvalidPriceRange)));
//! ```

mod models;
mod period;
mod symbol;
mod timestamp;

pub use models::{Headline, IssuerInfo, PriceHistory, PricePoint};
pub use period::Period;
pub use symbol::Symbol;
pub use timestamp::{format_minute, parse_published, UtcDateTime};
