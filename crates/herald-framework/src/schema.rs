//! Argument schemas and the validator/parser that checks tokens against them.
//!
//! A [`Schema`] is an ordered list of [`ArgSlot`]s. Parsing walks the slots
//! in lock-step with the tokens:
//!
//! - [`ArgSlot::Required`] fails when its token is missing.
//! - [`ArgSlot::Optional`] is skipped when its token is missing.
//! - [`ArgSlot::Variadic`] absorbs every remaining token (possibly none) and
//!   ends the walk. It can only be the last slot.
//!
//! Tokens beyond a schema without a tail are kept in [`Arguments::extra`]
//! and do not fail [`Schema::parse`]; [`Schema::parse_strict`] rejects them.
//!
//! ```rust,ignore
//! use herald_framework::schema::{ArgSlot, ArgType, Schema};
//!
//! let schema = Schema::new([
//!     ArgSlot::Required(ArgType::Text),
//!     ArgSlot::Optional(ArgType::Integer),
//! ])?;
//!
//! let args = schema.parse(&["123456", "7"])?;
//! assert_eq!(args.text(0), Some("123456"));
//! assert_eq!(args.integer(1), Some(7));
//! ```

use std::fmt;

use crate::error::{ArgError, SchemaError};

/// Largest magnitude an integer argument may have.
///
/// Integers are exchanged with systems that store numbers as IEEE doubles, so
/// only values that survive that round trip exactly are accepted.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Element type of an argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    /// A base-10 integer within [`MAX_SAFE_INTEGER`].
    Integer,
    /// Any non-empty token.
    Text,
}

impl ArgType {
    /// Returns the name used in help text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }

    /// Checks one token against this type and converts it.
    pub fn parse(&self, index: usize, token: &str) -> Result<ArgValue, ArgError> {
        match self {
            Self::Text if token.is_empty() => Err(ArgError::EmptyText { index }),
            Self::Text => Ok(ArgValue::Text(token.to_string())),
            Self::Integer => parse_integer(token)
                .map(ArgValue::Integer)
                .ok_or_else(|| ArgError::NotAnInteger {
                    index,
                    token: token.to_string(),
                }),
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an optionally signed run of ASCII digits within the safe range.
fn parse_integer(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i64 = token.parse().ok()?;
    (value.unsigned_abs() <= MAX_SAFE_INTEGER.unsigned_abs()).then_some(value)
}

/// One position in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgSlot {
    /// A token that must be present.
    Required(ArgType),
    /// A token that may be absent.
    Optional(ArgType),
    /// Zero or more trailing tokens of one type.
    Variadic(ArgType),
}

impl ArgSlot {
    /// Returns the element type of this slot.
    pub fn arg_type(&self) -> ArgType {
        match self {
            Self::Required(ty) | Self::Optional(ty) | Self::Variadic(ty) => *ty,
        }
    }

    /// Returns `true` for [`ArgSlot::Variadic`].
    pub fn is_variadic(&self) -> bool {
        matches!(self, Self::Variadic(_))
    }
}

/// A validated, ordered list of argument slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    slots: Vec<ArgSlot>,
}

impl Schema {
    /// Builds a schema, rejecting any slot placed after a variadic tail.
    pub fn new(slots: impl IntoIterator<Item = ArgSlot>) -> Result<Self, SchemaError> {
        let slots: Vec<ArgSlot> = slots.into_iter().collect();

        if let Some(tail) = slots.iter().position(ArgSlot::is_variadic)
            && tail + 1 < slots.len()
        {
            return Err(SchemaError::SlotAfterVariadic { index: tail + 1 });
        }

        Ok(Self { slots })
    }

    /// A schema that takes no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the slots in order.
    pub fn slots(&self) -> &[ArgSlot] {
        &self.slots
    }

    /// Returns the number of [`ArgSlot::Required`] slots.
    pub fn required_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, ArgSlot::Required(_)))
            .count()
    }

    /// Returns `true` if the schema ends with a variadic tail.
    pub fn has_variadic(&self) -> bool {
        self.slots.last().is_some_and(ArgSlot::is_variadic)
    }

    /// Returns `true` if `tokens` satisfy this schema.
    pub fn validate<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.parse(tokens).is_ok()
    }

    /// Checks `tokens` against the schema and converts them to typed values.
    ///
    /// Extra tokens beyond a schema without a tail are tolerated and kept in
    /// [`Arguments::extra`].
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Arguments, ArgError> {
        let mut values = Vec::with_capacity(self.slots.len());

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                ArgSlot::Variadic(ty) => {
                    let rest = tokens
                        .iter()
                        .enumerate()
                        .skip(index)
                        .map(|(i, token)| ty.parse(i, token.as_ref()))
                        .collect::<Result<Vec<_>, _>>()?;

                    return Ok(Arguments {
                        values,
                        rest,
                        extra: Vec::new(),
                    });
                }
                ArgSlot::Required(ty) | ArgSlot::Optional(ty) => match tokens.get(index) {
                    Some(token) => values.push(Some(ty.parse(index, token.as_ref())?)),
                    None if matches!(slot, ArgSlot::Optional(_)) => values.push(None),
                    None => {
                        return Err(ArgError::Missing {
                            index,
                            expected: *ty,
                        });
                    }
                },
            }
        }

        let extra = tokens
            .iter()
            .skip(self.slots.len())
            .map(|token| token.as_ref().to_string())
            .collect();

        Ok(Arguments {
            values,
            rest: Vec::new(),
            extra,
        })
    }

    /// Like [`parse`](Self::parse), but rejects tokens beyond the schema.
    pub fn parse_strict<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Arguments, ArgError> {
        let args = self.parse(tokens)?;
        match args.extra.len() {
            0 => Ok(args),
            count => Err(ArgError::Unexpected { count }),
        }
    }
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Parsed from an [`ArgType::Integer`] slot.
    Integer(i64),
    /// Taken verbatim from an [`ArgType::Text`] slot.
    Text(String),
}

impl ArgValue {
    /// Returns the integer, if this is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The typed result of a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    /// One entry per fixed slot; `None` for an absent optional slot.
    values: Vec<Option<ArgValue>>,
    /// Values absorbed by the variadic tail.
    rest: Vec<ArgValue>,
    /// Tokens beyond a schema without a tail.
    extra: Vec<String>,
}

impl Arguments {
    /// Returns the value of fixed slot `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Returns fixed slot `index` as text.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(ArgValue::as_text)
    }

    /// Returns fixed slot `index` as an integer.
    pub fn integer(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(ArgValue::as_integer)
    }

    /// Returns the values absorbed by the variadic tail.
    pub fn rest(&self) -> &[ArgValue] {
        &self.rest
    }

    /// Returns the tail values that are text.
    pub fn rest_texts(&self) -> impl Iterator<Item = &str> {
        self.rest.iter().filter_map(ArgValue::as_text)
    }

    /// Returns tokens that fell beyond the schema.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    /// Returns the number of fixed slots that received a value.
    pub fn len(&self) -> usize {
        self.values.iter().flatten().count()
    }

    /// Returns `true` if no fixed slot and no tail received a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.rest.is_empty()
    }
}
