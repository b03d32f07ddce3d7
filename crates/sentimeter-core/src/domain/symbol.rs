use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker accepted, long enough for exchange-suffixed and futures symbols.
pub const MAX_SYMBOL_LEN: usize = 15;

/// Marks an index ticker such as `^GSPC`; only valid in first position.
const INDEX_MARKER: char = '^';

/// Joins alphanumeric runs: share class (`BRK.B`, `BRK-B`), exchange (`SHOP.TO`) and
/// pair or futures suffix (`EURUSD=X`, `GC=F`).
const SEPARATORS: [char; 3] = ['.', '-', '='];

/// Ticker in the upper-case spelling Yahoo Finance expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trims and upper-cases `input`, then checks it against the ticker grammar: an optional
    /// `^`, a letter, then alphanumerics with single separators between them.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if ticker.chars().count() > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                symbol: ticker,
                max: MAX_SYMBOL_LEN,
            });
        }

        let body_start = usize::from(ticker.starts_with(INDEX_MARKER));
        let body: Vec<char> = ticker.chars().skip(body_start).collect();
        if !body.first().is_some_and(char::is_ascii_alphabetic) {
            return Err(ValidationError::SymbolNeedsLetter { symbol: ticker });
        }

        let mut previous = body[0];
        for (offset, &ch) in body.iter().enumerate().skip(1) {
            let is_last = offset + 1 == body.len();
            let fits = ch.is_ascii_alphanumeric()
                || (SEPARATORS.contains(&ch) && previous.is_ascii_alphanumeric() && !is_last);
            if !fits {
                return Err(ValidationError::MalformedSymbol {
                    position: body_start + offset,
                    ch,
                    symbol: ticker,
                });
            }
            previous = ch;
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
