use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::KeymapError;

/// Modifier keys held down with a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.meta)
    }
}

/// A single key press with modifiers, e.g. `ctrl+shift+k`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    modifiers: Modifiers,
    key: String,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: normalize_key(&key.into()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, KeymapError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(KeymapError::EmptyChord);
        }

        // `+` as the key itself: "+", "ctrl++".
        let (head, plus_key) = if raw == "+" {
            ("", true)
        } else if let Some(head) = raw.strip_suffix("++") {
            (head, true)
        } else {
            (raw, false)
        };

        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        if !head.is_empty() {
            for token in head.split('+').map(str::trim) {
                if token.is_empty() {
                    return Err(KeymapError::MissingKey(raw.to_string()));
                }
                match token.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" => modifiers.ctrl = true,
                    "alt" | "option" => modifiers.alt = true,
                    "shift" => modifiers.shift = true,
                    "meta" | "cmd" | "super" => modifiers.meta = true,
                    _ => {
                        if key.is_some() {
                            return Err(KeymapError::MultipleKeys(raw.to_string()));
                        }
                        key = Some(normalize_key(token));
                    }
                }
            }
        }

        if plus_key {
            if key.is_some() {
                return Err(KeymapError::MultipleKeys(raw.to_string()));
            }
            key = Some("+".to_string());
        }

        let key = key.ok_or_else(|| KeymapError::MissingKey(raw.to_string()))?;
        Ok(Self { modifiers, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Modifiers {
            ctrl,
            alt,
            shift,
            meta,
        } = self.modifiers;
        for (held, name) in [(ctrl, "ctrl"), (alt, "alt"), (shift, "shift"), (meta, "meta")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

fn normalize_key(key: &str) -> String {
    let lower = key.trim().to_lowercase();
    match lower.as_str() {
        "esc" => "escape".to_string(),
        "return" => "enter".to_string(),
        "del" => "delete".to_string(),
        "spacebar" => "space".to_string(),
        _ => lower,
    }
}
