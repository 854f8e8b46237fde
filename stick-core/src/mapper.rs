//! Analog sample and command to stick mapping.
//!
//! Everything here is pure: same input, same output, no side effects.
//!
//! Inputs are nominally in [-1, 1]. Values outside that range are clamped
//! before scaling, so every produced axis stays within `[-max_stick, max_stick]`.

use stick_proto::{
    Command, NamedAction, StickIntent, StickPosition, StickSide, StickUpdate,
    MAX_STICK_POSITION_ABS,
};

/// Analog magnitude below which an axis is treated as centered.
pub const DEFAULT_DEADZONE: f32 = 0.02;

/// Yaw deflection for `yaw+` / `yaw-`.
pub const YAW_STEP: f32 = 0.1;

/// Roll/pitch deflection for `right` / `left` / `forward` / `backward`.
pub const TRANSLATE_STEP: f32 = 0.05;

/// Throttle deflection for `up` / `down`.
pub const THROTTLE_STEP: f32 = 0.1;

/// Mapping parameters.
///
/// Customize at compile-time by creating your own const, or at runtime from
/// the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MapperConfig {
    /// Analog deadzone, applied per axis.
    pub deadzone: f32,
    /// Stick units corresponding to a normalized value of 1.0.
    pub max_stick: i16,
    /// Normalized deflection for yaw actions.
    pub yaw_step: f32,
    /// Normalized deflection for roll/pitch actions.
    pub translate_step: f32,
    /// Normalized deflection for throttle actions.
    pub throttle_step: f32,
}

/// Default mapping matching the flight controller's stick range.
pub const DEFAULT_MAPPER_CONFIG: MapperConfig = MapperConfig {
    deadzone: DEFAULT_DEADZONE,
    max_stick: MAX_STICK_POSITION_ABS,
    yaw_step: YAW_STEP,
    translate_step: TRANSLATE_STEP,
    throttle_step: THROTTLE_STEP,
};

impl Default for MapperConfig {
    fn default() -> Self {
        DEFAULT_MAPPER_CONFIG
    }
}

#[inline]
fn abs_f32(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Zero an axis whose magnitude is below `deadzone`, pass it through otherwise.
#[inline]
#[must_use]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if abs_f32(value) < deadzone {
        0.0
    } else {
        value
    }
}

/// Convert a normalized axis to stick units, truncating toward zero.
///
/// `value` is clamped to [-1, 1] first.
#[inline]
#[must_use]
pub fn scale_axis(value: f32, max_stick: i16) -> i16 {
    let clamped = value.clamp(-1.0, 1.0);
    // `as` truncates toward zero and maps NaN to 0
    (clamped * max_stick as f32) as i16
}

#[inline]
fn scale_position(x: f32, y: f32, max_stick: i16) -> StickPosition {
    StickPosition::new(scale_axis(x, max_stick), scale_axis(y, max_stick))
}

/// Map one analog joystick sample to a single-stick update.
///
/// Each axis is deadzone-filtered independently, then scaled.
#[must_use]
pub fn map_analog(side: StickSide, px: f32, py: f32, config: &MapperConfig) -> StickUpdate {
    let x = apply_deadzone(px, config.deadzone);
    let y = apply_deadzone(py, config.deadzone);
    StickUpdate::new(side, scale_position(x, y, config.max_stick))
}

/// Map an explicit four-axis command.
///
/// Left stick carries (yaw, throttle), right stick carries (roll, pitch).
/// No deadzone is applied.
#[must_use]
pub fn map_move(
    roll: f32,
    throttle: f32,
    yaw: f32,
    pitch: f32,
    config: &MapperConfig,
) -> StickIntent {
    StickIntent::new(
        scale_position(yaw, throttle, config.max_stick),
        scale_position(roll, pitch, config.max_stick),
    )
}

/// Map a named action to a full intent.
///
/// Each stick action deflects exactly one axis; every other axis is neutral.
/// Returns `None` for actions that are not stick movements (takeoff, land,
/// enable/disable, height).
#[must_use]
pub fn map_named(action: NamedAction, config: &MapperConfig) -> Option<StickIntent> {
    let (left, right) = match action {
        NamedAction::YawPlus => ((config.yaw_step, 0.0), (0.0, 0.0)),
        NamedAction::YawMinus => ((-config.yaw_step, 0.0), (0.0, 0.0)),
        NamedAction::Right => ((0.0, 0.0), (config.translate_step, 0.0)),
        NamedAction::Left => ((0.0, 0.0), (-config.translate_step, 0.0)),
        NamedAction::Forward => ((0.0, 0.0), (0.0, config.translate_step)),
        NamedAction::Backward => ((0.0, 0.0), (0.0, -config.translate_step)),
        NamedAction::Up => ((0.0, config.throttle_step), (0.0, 0.0)),
        NamedAction::Down => ((0.0, -config.throttle_step), (0.0, 0.0)),
        NamedAction::Stop => return Some(StickIntent::neutral()),
        NamedAction::Takeoff
        | NamedAction::Land
        | NamedAction::EnableStick
        | NamedAction::DisableStick
        | NamedAction::ShowHeight => return None,
    };

    Some(StickIntent::new(
        scale_position(left.0, left.1, config.max_stick),
        scale_position(right.0, right.1, config.max_stick),
    ))
}

/// Map any parsed command to an intent, if it moves the sticks.
#[must_use]
pub fn map_command(command: &Command<'_>, config: &MapperConfig) -> Option<StickIntent> {
    match *command {
        Command::Move {
            roll,
            throttle,
            yaw,
            pitch,
        } => Some(map_move(roll, throttle, yaw, pitch, config)),
        Command::Action(action) => map_named(action, config),
        Command::Unknown { .. } => None,
    }
}
