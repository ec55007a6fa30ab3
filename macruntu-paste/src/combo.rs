//! Key combo parsing ("ctrl+shift+v" → modifiers + key)

use std::fmt;

/// Modifier keys accepted in a combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Super,
}

impl Modifier {
    /// Recognize a lowercase combo token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" => Some(Self::Alt),
            "super" => Some(Self::Super),
            _ => None,
        }
    }

    /// Symbolic name, as wtype and xdotool expect it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
            Self::Super => "super",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed key combination
///
/// `modifiers` keeps the order the user wrote them in. Backends press them in
/// that order and release them in reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    /// The final, non-modifier key (lowercase)
    pub key: String,
    /// Modifiers in press order, without duplicates
    pub modifiers: Vec<Modifier>,
}

impl KeyCombo {
    /// Parse a combo string like `"ctrl+shift+v"`.
    ///
    /// The last token is always the key. Preceding tokens that are not one of
    /// ctrl/shift/alt/super are dropped rather than rejected, so `"foo+v"`
    /// still yields `v`. Returns `None` only when no token is left.
    pub fn parse(combo: &str) -> Option<Self> {
        let mut tokens: Vec<String> = combo
            .split('+')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect();

        let key = tokens.pop()?;

        let mut modifiers = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if let Some(modifier) = Modifier::from_token(token) {
                if !modifiers.contains(&modifier) {
                    modifiers.push(modifier);
                }
            }
        }

        Some(Self { key, modifiers })
    }

    /// Modifiers in release order (reverse of press order)
    pub fn release_order(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().rev().copied()
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ctrl_shift_v() {
        let combo = KeyCombo::parse("ctrl+shift+v").unwrap();
        assert_eq!(combo.key, "v");
        assert_eq!(combo.modifiers, vec![Modifier::Ctrl, Modifier::Shift]);
    }

    #[test]
    fn test_parse_empty_and_blank() {
        assert_eq!(KeyCombo::parse(""), None);
        assert_eq!(KeyCombo::parse("   "), None);
        assert_eq!(KeyCombo::parse("+ + +"), None);
    }

    #[test]
    fn test_unknown_modifier_dropped() {
        let combo = KeyCombo::parse("foo+v").unwrap();
        assert_eq!(combo.key, "v");
        assert!(combo.modifiers.is_empty());
    }

    #[test]
    fn test_case_and_whitespace() {
        let combo = KeyCombo::parse(" Ctrl + ALT +  Delete ").unwrap();
        assert_eq!(combo.key, "delete");
        assert_eq!(combo.modifiers, vec![Modifier::Ctrl, Modifier::Alt]);
    }

    #[test]
    fn test_order_preserved_and_deduplicated() {
        let combo = KeyCombo::parse("shift+meta+ctrl+shift+super+x").unwrap();
        assert_eq!(combo.key, "x");
        assert_eq!(
            combo.modifiers,
            vec![Modifier::Shift, Modifier::Ctrl, Modifier::Super]
        );
    }

    #[test]
    fn test_single_token_is_key() {
        // Even a modifier name is the key when it is the last token
        let combo = KeyCombo::parse("ctrl").unwrap();
        assert_eq!(combo.key, "ctrl");
        assert!(combo.modifiers.is_empty());
    }

    #[test]
    fn test_release_order_reversed() {
        let combo = KeyCombo::parse("ctrl+alt+shift+t").unwrap();
        let released: Vec<_> = combo.release_order().collect();
        assert_eq!(released, vec![Modifier::Shift, Modifier::Alt, Modifier::Ctrl]);
    }

    #[test]
    fn test_display_is_canonical() {
        let combo = KeyCombo::parse("CTRL + foo + Shift + V").unwrap();
        assert_eq!(combo.to_string(), "ctrl+shift+v");
    }
}
