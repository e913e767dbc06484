//! Shared token micro-grammars
//!
//! A criterion token has the shape `<category>.<definition>[.<modifier>]*`.
//! Decimal values use `p` for the decimal point (`1p5` = `1.5`) so that `.`
//! stays an unambiguous field separator.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:p(\d+))?$").expect("Invalid decimal regex"));

static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Log|Linear)(\d+)$").expect("Invalid range regex"));

static SWARM_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Z(\d+)$").expect("Invalid swarm size regex"));

/// Token split into its category and `.`-separated fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) category: &'a str,
    pub(crate) fields: Vec<&'a str>,
}

impl<'a> Token<'a> {
    pub(crate) fn split(token: &'a str) -> Result<Self, ParseError> {
        let mut parts = token.split('.');
        let category = parts.next().unwrap_or_default();
        if category.is_empty() {
            return Err(ParseError::grammar(token, "<category>.<definition>"));
        }
        let fields: Vec<&str> = parts.collect();
        if let Some(empty) = fields.iter().position(|f| f.is_empty()) {
            return Err(ParseError::grammar(
                token,
                if empty == 0 {
                    "<category>.<definition>"
                } else {
                    "non-empty modifier after '.'"
                },
            ));
        }
        Ok(Self { category, fields })
    }
}

/// Parse `1p5`-style decimal
pub(crate) fn decimal(fragment: &str, expected: &'static str) -> Result<f64, ParseError> {
    let caps = DECIMAL
        .captures(fragment)
        .ok_or_else(|| ParseError::grammar(fragment, expected))?;
    let text = match caps.get(2) {
        Some(frac) => format!("{}.{}", &caps[1], frac.as_str()),
        None => caps[1].to_string(),
    };
    text.parse()
        .map_err(|_| ParseError::grammar(fragment, expected))
}

/// Parse unsigned integer following a fixed prefix (`I16`, `C4`)
pub(crate) fn prefixed_usize(
    fragment: &str,
    prefix: &str,
    expected: &'static str,
) -> Result<usize, ParseError> {
    fragment
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|rest| rest.parse().ok())
        .ok_or_else(|| ParseError::grammar(fragment, expected))
}

/// Parse `1p5`-style decimal following a fixed prefix (`CD1p0`, `F2p0`)
pub(crate) fn prefixed_decimal(
    fragment: &str,
    prefix: &str,
    expected: &'static str,
) -> Result<f64, ParseError> {
    let rest = fragment
        .strip_prefix(prefix)
        .ok_or_else(|| ParseError::grammar(fragment, expected))?;
    decimal(rest, expected).map_err(|_| ParseError::grammar(fragment, expected))
}

/// Progression used by range criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    /// Powers of two up to the maximum
    Log,
    /// Ten equal steps up to the maximum
    Linear,
}

/// `Log<max>` or `Linear<max>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// Progression
    pub increment: Increment,
    /// Largest value
    pub max: usize,
}

impl RangeSpec {
    const EXPECTED: &'static str = "Log<max> or Linear<max> (Linear needs max >= 10)";

    /// Number of steps in a linear progression
    pub const LINEAR_STEPS: usize = 10;

    pub(crate) fn parse(fragment: &str) -> Result<Self, ParseError> {
        let caps = RANGE
            .captures(fragment)
            .ok_or_else(|| ParseError::grammar(fragment, Self::EXPECTED))?;
        let max: usize = caps[2]
            .parse()
            .map_err(|_| ParseError::grammar(fragment, Self::EXPECTED))?;
        let increment = if &caps[1] == "Log" {
            Increment::Log
        } else {
            Increment::Linear
        };

        let valid = match increment {
            Increment::Log => max >= 1,
            Increment::Linear => max >= Self::LINEAR_STEPS,
        };
        if !valid {
            return Err(ParseError::grammar(fragment, Self::EXPECTED));
        }
        Ok(Self { increment, max })
    }

    /// Values of the progression, ascending
    ///
    /// `Log`: `2^k` for `k = 0..=floor(log2(max))`.
    /// `Linear`: `(max / 10) * k` for `k = 1..=10`.
    #[must_use]
    pub fn values(&self) -> Vec<usize> {
        match self.increment {
            Increment::Log => (0..=self.max.ilog2()).map(|k| 1usize << k).collect(),
            Increment::Linear => {
                let step = self.max / Self::LINEAR_STEPS;
                (1..=Self::LINEAR_STEPS).map(|k| step * k).collect()
            }
        }
    }
}

/// Trailing optional `Z<n>` swarm-size modifier
///
/// `rest` holds every field after the definition; anything other than
/// nothing or a single `Z<n>` with `n >= 1` is rejected.
pub(crate) fn optional_swarm_size(rest: &[&str]) -> Result<Option<usize>, ParseError> {
    const EXPECTED: &str = "optional .Z<swarm size >= 1>";
    match rest {
        [] => Ok(None),
        [field] => {
            let n: usize = SWARM_SIZE
                .captures(field)
                .and_then(|caps| caps[1].parse().ok())
                .filter(|&n| n >= 1)
                .ok_or_else(|| ParseError::grammar(*field, EXPECTED))?;
            Ok(Some(n))
        }
        [_, extra, ..] => Err(ParseError::grammar(*extra, EXPECTED)),
    }
}
