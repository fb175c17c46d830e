//! Multiplicity algebra.
//!
//! Parses the compact bound notation used on relationship lists into a
//! normalized `(lower, upper)` pair and checks collection sizes against it.
//!
//! ```text
//! ""      → 1..1
//! "*"     → 0..*
//! "N"     → N..N
//! "N..M"  → N..M
//! "N..*"  → N..*
//! ```
//!
//! Finite upper bounds must be positive and never below the lower bound.
//! A surrounding `[ ]` pair, as written in SysML declarations, is accepted.

mod lexer;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use lexer::{Token, TokenKind};

/// Bounds declared for relationship lists that carry a cardinality rule.
pub mod bounds {
    /// A connection joins at least two end features.
    pub const CONNECTION_ENDS: &str = "2..*";
    /// An interface needs at least one end feature.
    pub const INTERFACE_ENDS: &str = "1..*";
    /// An allocation relates at least two ends.
    pub const ALLOCATION_ENDS: &str = "2..*";
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failures raised by the multiplicity algebra.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MultiplicityError {
    /// The bound text does not follow the notation.
    #[error("malformed multiplicity '{text}': {reason}")]
    Malformed { text: String, reason: String },

    /// A collection size falls outside its declared bound.
    #[error("{label} has {actual} element(s), expected {bound}")]
    Violation {
        label: String,
        actual: usize,
        bound: Multiplicity,
    },
}

impl MultiplicityError {
    fn malformed(text: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Upper end of a multiplicity range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpperBound {
    Finite(u64),
    Unbounded,
}

/// A normalized cardinality bound.
///
/// The fields are only set through [`Multiplicity::new`] and
/// [`Multiplicity::parse`], so every value renders to text that parses back
/// to it. Serialized as that canonical text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Multiplicity {
    lower: u64,
    upper: UpperBound,
}

impl Multiplicity {
    /// `1..1`, the bound of an absent multiplicity.
    pub const EXACTLY_ONE: Self = Self {
        lower: 1,
        upper: UpperBound::Finite(1),
    };
    /// `0..*`
    pub const ZERO_OR_MORE: Self = Self {
        lower: 0,
        upper: UpperBound::Unbounded,
    };
    /// `1..*`
    pub const ONE_OR_MORE: Self = Self {
        lower: 1,
        upper: UpperBound::Unbounded,
    };

    /// Build a bound, rejecting a zero or inverted finite upper.
    pub fn new(lower: u64, upper: UpperBound) -> Result<Self, MultiplicityError> {
        let candidate = Self { lower, upper };
        candidate.check_well_formed(&candidate.to_string())?;
        Ok(candidate)
    }

    /// Parse the bound notation.
    pub fn parse(text: &str) -> Result<Self, MultiplicityError> {
        let tokens = lexer::tokenize(text).map_err(|(slice, offset)| {
            MultiplicityError::malformed(
                text,
                format!("unexpected '{slice}' at offset {offset}"),
            )
        })?;
        let bound = BoundParser::new(text, &tokens).parse()?;
        bound.check_well_formed(text)?;
        Ok(bound)
    }

    fn check_well_formed(&self, text: &str) -> Result<(), MultiplicityError> {
        match self.upper {
            UpperBound::Finite(0) => Err(MultiplicityError::malformed(
                text,
                "upper bound must be positive",
            )),
            UpperBound::Finite(upper) if self.lower > upper => Err(MultiplicityError::malformed(
                text,
                format!("lower bound {} exceeds upper bound {upper}", self.lower),
            )),
            _ => Ok(()),
        }
    }

    pub fn lower(&self) -> u64 {
        self.lower
    }

    pub fn upper(&self) -> UpperBound {
        self.upper
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper == UpperBound::Unbounded
    }

    /// Whether a collection of `size` elements satisfies this bound.
    pub fn contains(&self, size: usize) -> bool {
        let size = size as u64;
        if size < self.lower {
            return false;
        }
        match self.upper {
            UpperBound::Finite(upper) => size <= upper,
            UpperBound::Unbounded => true,
        }
    }

    /// Fail with a violation naming `label` unless `size` satisfies this bound.
    pub fn check_size(&self, size: usize, label: &str) -> Result<(), MultiplicityError> {
        if self.contains(size) {
            Ok(())
        } else {
            Err(MultiplicityError::Violation {
                label: label.to_string(),
                actual: size,
                bound: *self,
            })
        }
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::EXACTLY_ONE
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (0, UpperBound::Unbounded) => write!(f, "*"),
            (lower, UpperBound::Unbounded) => write!(f, "{lower}..*"),
            (lower, UpperBound::Finite(upper)) if lower == upper => write!(f, "{lower}"),
            (lower, UpperBound::Finite(upper)) => write!(f, "{lower}..{upper}"),
        }
    }
}

impl FromStr for Multiplicity {
    type Err = MultiplicityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Multiplicity> for String {
    fn from(bound: Multiplicity) -> Self {
        bound.to_string()
    }
}

impl TryFrom<String> for Multiplicity {
    type Error = MultiplicityError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

/// Parse the bound notation. See [`Multiplicity::parse`].
pub fn parse(text: &str) -> Result<Multiplicity, MultiplicityError> {
    Multiplicity::parse(text)
}

/// Check a collection size against a bound. See [`Multiplicity::check_size`].
pub fn check_size(size: usize, bound: &Multiplicity, label: &str) -> Result<(), MultiplicityError> {
    bound.check_size(size, label)
}

// ============================================================================
// PARSER
// ============================================================================

/// Recursive-descent parser over the token stream.
///
/// ```text
/// bound  = "[" range "]" | range
/// range  = ε | "*" | int | int ".." upper
/// upper  = int | "*"
/// ```
struct BoundParser<'t, 'a> {
    text: &'a str,
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> BoundParser<'t, 'a> {
    fn new(text: &'a str, tokens: &'t [Token<'a>]) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> MultiplicityError {
        MultiplicityError::malformed(self.text, reason)
    }

    fn parse(mut self) -> Result<Multiplicity, MultiplicityError> {
        let bracketed = self.eat(TokenKind::LBracket);
        let bound = self.parse_range()?;
        if bracketed && !self.eat(TokenKind::RBracket) {
            return Err(self.error("missing closing ']'"));
        }
        if let Some(extra) = self.peek() {
            return Err(self.error(format!(
                "unexpected '{}' at offset {}",
                extra.text, extra.offset
            )));
        }
        Ok(bound)
    }

    fn parse_range(&mut self) -> Result<Multiplicity, MultiplicityError> {
        let Some(first) = self.peek().copied() else {
            return Ok(Multiplicity::EXACTLY_ONE);
        };
        match first.kind {
            TokenKind::RBracket => Ok(Multiplicity::EXACTLY_ONE),
            TokenKind::Star => {
                self.bump();
                if self.peek().is_some_and(|t| t.kind == TokenKind::DotDot) {
                    return Err(self.error("lower bound must be a non-negative integer"));
                }
                Ok(Multiplicity::ZERO_OR_MORE)
            }
            TokenKind::Integer => {
                self.bump();
                let lower = self.integer(first.text)?;
                if !self.eat(TokenKind::DotDot) {
                    return Ok(Multiplicity {
                        lower,
                        upper: UpperBound::Finite(lower),
                    });
                }
                let upper = self.parse_upper()?;
                Ok(Multiplicity { lower, upper })
            }
            _ => Err(self.error("lower bound must be a non-negative integer")),
        }
    }

    fn parse_upper(&mut self) -> Result<UpperBound, MultiplicityError> {
        match self.bump() {
            Some(Token {
                kind: TokenKind::Star,
                ..
            }) => Ok(UpperBound::Unbounded),
            Some(Token {
                kind: TokenKind::Integer,
                text,
                ..
            }) => Ok(UpperBound::Finite(self.integer(text)?)),
            _ => Err(self.error("upper bound must be a positive integer or '*'")),
        }
    }

    fn integer(&self, text: &str) -> Result<u64, MultiplicityError> {
        text.parse::<u64>()
            .map_err(|_| self.error(format!("integer '{text}' is out of range")))
    }
}
