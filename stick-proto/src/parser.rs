//! Text command parser.
//!
//! One command per frame:
//! - Explicit axes: `movedrone:<roll>,<throttle>,<yaw>,<pitch>`
//! - Named action: `yaw+`, `yaw-`, `right`, `left`, `forward`, `backward`,
//!   `up`, `down`, `takeoff`, `land`, `s`, `enable`, `disable`, `h`
//!
//! Matching is case-insensitive and ignores surrounding whitespace.

use core::fmt::{self, Write};

use crate::types::{Command, NamedAction};

/// Prefix of the explicit four-axis command (already case-folded).
pub const MOVE_PREFIX: &str = "movedrone:";

/// Number of comma-separated fields after [`MOVE_PREFIX`].
pub const MOVE_FIELD_COUNT: usize = 4;

/// Why a frame did not produce a usable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// `movedrone:` payload without exactly four numeric fields.
    InvalidParameters,
    /// Token not in the named-action table.
    UnknownCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameters => write!(f, "invalid moveDrone parameters"),
            Self::UnknownCommand => write!(f, "unknown command"),
        }
    }
}

/// A frame with surrounding whitespace removed, compared case-insensitively.
///
/// Borrows the frame text, so frames of any length are handled. `Display`
/// writes the case-folded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<'a>(&'a str);

impl<'a> Normalized<'a> {
    /// Trimmed text, case as received.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Whole-frame match against a case-folded token.
    #[inline]
    #[must_use]
    pub fn eq_token(&self, token: &str) -> bool {
        self.0.eq_ignore_ascii_case(token)
    }

    /// Strip a case-folded prefix, returning the rest as received.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &str) -> Option<&'a str> {
        let head = self.0.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        self.0.get(prefix.len()..)
    }
}

impl fmt::Display for Normalized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            f.write_char(ch.to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Trim surrounding whitespace; matching on the result folds ASCII case.
///
/// Folding is locale-independent: only `A-Z` change, every other character
/// passes through untouched.
#[must_use]
pub fn normalize(text: &str) -> Normalized<'_> {
    Normalized(text.trim())
}

/// Parse one inbound frame.
///
/// Never fails: rejected frames come back as [`Command::Unknown`] carrying the
/// received text and the reason. A frame with the `movedrone:` prefix and bad
/// parameters is never matched against the named-action table.
///
/// # Example
///
/// ```
/// use stick_proto::{parse_command, Command, NamedAction};
///
/// assert_eq!(parse_command(" TAKEOFF "), Command::Action(NamedAction::Takeoff));
/// assert!(matches!(
///     parse_command("MoveDrone: 0.5, -0.3, 0.0, 1.0"),
///     Command::Move { roll, .. } if roll == 0.5
/// ));
/// ```
pub fn parse_command(text: &str) -> Command<'_> {
    let normalized = normalize(text);

    if let Some(parameters) = normalized.strip_prefix(MOVE_PREFIX) {
        return match parse_move_parameters(parameters) {
            Ok([roll, throttle, yaw, pitch]) => Command::Move {
                roll,
                throttle,
                yaw,
                pitch,
            },
            Err(reason) => Command::Unknown { raw: text, reason },
        };
    }

    match NamedAction::from_token(normalized.as_str()) {
        Some(action) => Command::Action(action),
        None => Command::Unknown {
            raw: text,
            reason: ParseError::UnknownCommand,
        },
    }
}

/// Parse the comma-separated payload of a `movedrone:` frame.
///
/// Returns `[roll, throttle, yaw, pitch]` in wire order.
pub fn parse_move_parameters(parameters: &str) -> Result<[f32; MOVE_FIELD_COUNT], ParseError> {
    let mut values = [0.0f32; MOVE_FIELD_COUNT];
    let mut fields = parameters.trim().split(',');

    for slot in values.iter_mut() {
        let field = fields.next().ok_or(ParseError::InvalidParameters)?;
        *slot = parse_axis(field)?;
    }

    // Should have no more fields
    if fields.next().is_some() {
        return Err(ParseError::InvalidParameters);
    }

    Ok(values)
}

/// Parse one axis value. Non-finite values (`nan`, `inf`) are rejected.
#[inline]
fn parse_axis(field: &str) -> Result<f32, ParseError> {
    let value: f32 = field
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidParameters)?;
    if !value.is_finite() {
        return Err(ParseError::InvalidParameters);
    }
    Ok(value)
}
