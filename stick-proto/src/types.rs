//! Core stick types: StickPosition, StickIntent, NamedAction, Command.

use crate::parser::ParseError;

/// Largest absolute stick deflection accepted by the flight controller.
///
/// Every axis of a [`StickIntent`] lies within
/// `[-MAX_STICK_POSITION_ABS, MAX_STICK_POSITION_ABS]`.
pub const MAX_STICK_POSITION_ABS: i16 = 660;

/// Which virtual stick a position belongs to.
///
/// The left stick carries yaw (x) and throttle (y), the right stick carries
/// roll (x) and pitch (y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StickSide {
    Left,
    Right,
}

impl StickSide {
    /// Lowercase name used in status frames (`Joystick left: ...`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One virtual stick with X/Y axes.
///
/// Range: [-660, 660] once produced by the mapper.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickPosition {
    pub x: i16,
    pub y: i16,
}

impl StickPosition {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub const NEUTRAL: Self = Self { x: 0, y: 0 };

    /// Check if both axes are centered.
    #[inline]
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Complete stick intent: both virtual sticks.
///
/// Produced fresh by every mapping call and consumed once by the flight sink.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickIntent {
    pub left: StickPosition,
    pub right: StickPosition,
}

impl StickIntent {
    /// Both sticks centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            left: StickPosition::NEUTRAL,
            right: StickPosition::NEUTRAL,
        }
    }

    #[must_use]
    pub const fn new(left: StickPosition, right: StickPosition) -> Self {
        Self { left, right }
    }

    /// Position of the given stick.
    #[inline]
    #[must_use]
    pub const fn position(&self, side: StickSide) -> StickPosition {
        match side {
            StickSide::Left => self.left,
            StickSide::Right => self.right,
        }
    }

    /// Replace one stick, leaving the other untouched.
    #[inline]
    pub fn apply_update(&mut self, update: StickUpdate) {
        match update.side {
            StickSide::Left => self.left = update.position,
            StickSide::Right => self.right = update.position,
        }
    }

    /// Check if every axis is centered.
    #[inline]
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.left.is_neutral() && self.right.is_neutral()
    }
}

/// A single-stick change, as produced by an analog joystick sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct StickUpdate {
    pub side: StickSide,
    pub position: StickPosition,
}

impl StickUpdate {
    pub const fn new(side: StickSide, position: StickPosition) -> Self {
        Self { side, position }
    }
}

/// Fixed-vocabulary remote command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NamedAction {
    YawPlus,
    YawMinus,
    Right,
    Left,
    Forward,
    Backward,
    Up,
    Down,
    Takeoff,
    Land,
    Stop,
    EnableStick,
    DisableStick,
    ShowHeight,
}

impl NamedAction {
    /// Every named action, in wire-table order.
    pub const ALL: [NamedAction; 14] = [
        Self::YawPlus,
        Self::YawMinus,
        Self::Right,
        Self::Left,
        Self::Takeoff,
        Self::ShowHeight,
        Self::Stop,
        Self::Land,
        Self::EnableStick,
        Self::DisableStick,
        Self::Forward,
        Self::Backward,
        Self::Up,
        Self::Down,
    ];

    /// Wire token for this action (already case-folded).
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::YawPlus => "yaw+",
            Self::YawMinus => "yaw-",
            Self::Right => "right",
            Self::Left => "left",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Up => "up",
            Self::Down => "down",
            Self::Takeoff => "takeoff",
            Self::Land => "land",
            Self::Stop => "s",
            Self::EnableStick => "enable",
            Self::DisableStick => "disable",
            Self::ShowHeight => "h",
        }
    }

    /// Exact match of a trimmed token against the action table, ignoring
    /// ASCII case.
    ///
    /// No partial matching: `"takeof"` and `"takeoff now"` both return `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| token.eq_ignore_ascii_case(action.token()))
    }

    /// Whether this action only moves the sticks (as opposed to calling one
    /// of the sink's asynchronous flight operations).
    #[must_use]
    pub const fn is_stick_action(self) -> bool {
        matches!(
            self,
            Self::YawPlus
                | Self::YawMinus
                | Self::Right
                | Self::Left
                | Self::Forward
                | Self::Backward
                | Self::Up
                | Self::Down
                | Self::Stop
        )
    }
}

/// One parsed inbound frame.
///
/// Borrows from the frame text it was parsed from; consumed immediately by
/// the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Explicit four-axis command (`movedrone:r,t,y,p`), each nominally in [-1, 1].
    Move {
        roll: f32,
        throttle: f32,
        yaw: f32,
        pitch: f32,
    },
    /// One of the fixed named actions.
    Action(NamedAction),
    /// Anything else. `raw` is the frame text as received, before normalization.
    Unknown { raw: &'a str, reason: ParseError },
}

impl Command<'_> {
    /// Check if this command was rejected by the parser.
    #[inline]
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}
