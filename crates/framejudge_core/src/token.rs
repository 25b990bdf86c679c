//! Secret tokens.
//!
//! A token is ASCII alphanumeric and starts with a letter, so it can be embedded unescaped in the string literals and
//! file names of every supported target language.

use std::fmt;

/// Characters a token may start with.
pub const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Characters a token may contain after the first one.
pub const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shortest accepted token.
pub const MIN_TOKEN_LENGTH: usize = 8;

/// Length of generated tokens.
pub const DEFAULT_TOKEN_LENGTH: usize = 12;

/// Error returned when a string is not a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    TooShort { length: usize },
    LeadingNonLetter(char),
    InvalidCharacter(char),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::TooShort { length } => write!(
                f,
                "token has {} characters, at least {} are required",
                length, MIN_TOKEN_LENGTH
            ),
            TokenError::LeadingNonLetter(c) => write!(f, "token must start with a letter, found {:?}", c),
            TokenError::InvalidCharacter(c) => write!(f, "token contains non-alphanumeric character {:?}", c),
        }
    }
}

impl std::error::Error for TokenError {}

/// A validated secret token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Validate `raw` as a token.
    ///
    /// ## Examples
    /// ```rust
    /// use framejudge_core::token::Token;
    ///
    /// assert!(Token::parse("EjgkIhoLX").is_ok());
    /// assert!(Token::parse("9abcdefgh").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        let length = raw.chars().count();
        if length < MIN_TOKEN_LENGTH {
            return Err(TokenError::TooShort { length });
        }
        let mut chars = raw.chars();
        if let Some(first) = chars.next() {
            if !first.is_ascii_alphabetic() {
                return Err(TokenError::LeadingNonLetter(first));
            }
        }
        if let Some(bad) = chars.find(|c| !c.is_ascii_alphanumeric()) {
            return Err(TokenError::InvalidCharacter(bad));
        }
        Ok(Token(raw.to_string()))
    }

    /// Build a token of `length` characters by asking `pick` for indices.
    ///
    /// `pick(n)` must return a value in `0..n`; out-of-range values are wrapped. The result is valid by construction
    /// as long as `length >= MIN_TOKEN_LENGTH` (shorter lengths are raised to the minimum).
    pub fn from_indices(length: usize, mut pick: impl FnMut(usize) -> usize) -> Self {
        let length = length.max(MIN_TOKEN_LENGTH);
        let mut out = String::with_capacity(length);
        out.push(LETTERS[pick(LETTERS.len()) % LETTERS.len()] as char);
        for _ in 1..length {
            out.push(ALPHANUMERIC[pick(ALPHANUMERIC.len()) % ALPHANUMERIC.len()] as char);
        }
        Token(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The frame literal for this token.
    pub fn frame(&self) -> String {
        crate::framing::frame(&self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::parse(s)
    }
}
