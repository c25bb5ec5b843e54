//! Text scripts of normalized input events, one event per line.
//!
//! ```text
//! # draw an L
//! key l
//! move 0 0
//! down 0 0
//! up 0 0
//! move 50 0
//! down 50 0
//! up 50 0
//! key Enter shift
//! ```
//!
//! `move` accepts a `primary` flag for a held button; every event accepts
//! `shift`/`alt`/`meta` modifier flags. Blank lines and `#` comments are
//! skipped.

use polysketch_core::{Buttons, InputEvent, Modifiers, Point};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown event {word:?}")]
    UnknownEvent { line: usize, word: String },
    #[error("line {line}: expected integer coordinates")]
    BadCoordinates { line: usize },
    #[error("line {line}: missing key name")]
    MissingKey { line: usize },
    #[error("line {line}: unknown flag {flag:?}")]
    UnknownFlag { line: usize, flag: String },
}

fn parse_flags(
    words: &[&str],
    allow_buttons: bool,
    line: usize,
) -> Result<(Buttons, Modifiers), ScriptError> {
    let mut buttons = Buttons::NONE;
    let mut modifiers = Modifiers::default();
    for &flag in words {
        match flag {
            "primary" if allow_buttons => buttons = Buttons::PRIMARY,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            "meta" => modifiers.meta = true,
            _ => {
                return Err(ScriptError::UnknownFlag {
                    line,
                    flag: flag.to_string(),
                });
            }
        }
    }
    Ok((buttons, modifiers))
}

fn parse_pos(words: &[&str], line: usize) -> Result<(Point, usize), ScriptError> {
    let bad = ScriptError::BadCoordinates { line };
    let x = words.first().ok_or(bad.clone())?.parse().map_err(|_| bad.clone())?;
    let y = words.get(1).ok_or(bad.clone())?.parse().map_err(|_| bad)?;
    Ok((Point::new(x, y), 2))
}

/// Parse a whole script into the event sequence it describes.
pub fn parse(text: &str) -> Result<Vec<InputEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let event = match words[0] {
            "move" => {
                let (pos, used) = parse_pos(&words[1..], line)?;
                let (buttons, modifiers) = parse_flags(&words[1 + used..], true, line)?;
                InputEvent::PointerMove {
                    pos,
                    buttons,
                    modifiers,
                }
            }
            "down" => {
                let (pos, used) = parse_pos(&words[1..], line)?;
                let (_, modifiers) = parse_flags(&words[1 + used..], false, line)?;
                InputEvent::PointerDown { pos, modifiers }
            }
            "up" => {
                let (pos, used) = parse_pos(&words[1..], line)?;
                let (_, modifiers) = parse_flags(&words[1 + used..], false, line)?;
                InputEvent::PointerUp { pos, modifiers }
            }
            "key" => {
                let key = words.get(1).ok_or(ScriptError::MissingKey { line })?;
                let (_, modifiers) = parse_flags(&words[2..], false, line)?;
                InputEvent::KeyDown {
                    key: (*key).to_string(),
                    modifiers,
                }
            }
            word => {
                return Err(ScriptError::UnknownEvent {
                    line,
                    word: word.to_string(),
                });
            }
        };
        events.push(event);
    }
    Ok(events)
}
