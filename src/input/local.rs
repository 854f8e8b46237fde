//! Local joystick reader.
//!
//! Reads one sample per line, `left <x> <y>` or `right <x> <y>`, axes in
//! [-1, 1]. Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use log::{debug, warn};
use stick_core::{AnalogSample, InputEvent, StickSide};
use thiserror::Error;
use tokio::sync::mpsc;

use super::Event;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StickLineError {
    #[error("expected `left <x> <y>` or `right <x> <y>`")]
    Syntax,
    #[error("unknown stick `{0}`")]
    UnknownSide(String),
    #[error("invalid axis value `{0}`")]
    Axis(String),
}

fn parse_side(word: &str) -> Result<StickSide, StickLineError> {
    if word.eq_ignore_ascii_case("left") {
        Ok(StickSide::Left)
    } else if word.eq_ignore_ascii_case("right") {
        Ok(StickSide::Right)
    } else {
        Err(StickLineError::UnknownSide(word.to_owned()))
    }
}

fn parse_axis(word: &str) -> Result<f32, StickLineError> {
    match word.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(StickLineError::Axis(word.to_owned())),
    }
}

/// Parse one `left|right <x> <y>` line.
pub fn parse_stick_line(line: &str) -> Result<AnalogSample, StickLineError> {
    let mut words = line.split_whitespace();
    let (Some(side), Some(x), Some(y), None) =
        (words.next(), words.next(), words.next(), words.next())
    else {
        return Err(StickLineError::Syntax);
    };
    let side = parse_side(side)?;
    Ok(AnalogSample::new(side, parse_axis(x)?, parse_axis(y)?))
}

/// Read samples from `reader` until EOF and push them into the event queue.
///
/// Blocking; run it on its own thread. Returns early if the queue closes.
pub fn read_local_sticks<R: BufRead>(
    reader: R,
    events: mpsc::Sender<Event>,
) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_stick_line(line) {
            Ok(sample) => {
                let event = Ok(InputEvent::Analog(sample));
                if events.blocking_send(event).is_err() {
                    debug!("event queue closed, local stick reader stopping");
                    return Ok(());
                }
            }
            Err(e) => warn!("ignoring local stick line {:?}: {}", line, e),
        }
    }
    debug!("local stick input ended");
    Ok(())
}
