//! Linux input-event-codes for ydotool
//!
//! ydotool injects through uinput and only understands raw keycodes, so every
//! key name has to be mapped here. xdotool and wtype take symbolic names and
//! never consult this table.

use crate::combo::Modifier;

/// Keycode for a lowercase key name, or `None` if ydotool cannot type it.
pub fn keycode_for(key: &str) -> Option<u16> {
    if let Some(n) = key.strip_prefix('f').and_then(function_key_number) {
        return (1..=12).contains(&n).then(|| 58 + (n - 1));
    }

    let code = match key {
        // Letters
        "a" => 30,
        "b" => 48,
        "c" => 46,
        "d" => 32,
        "e" => 18,
        "f" => 33,
        "g" => 34,
        "h" => 35,
        "i" => 23,
        "j" => 36,
        "k" => 37,
        "l" => 38,
        "m" => 50,
        "n" => 49,
        "o" => 24,
        "p" => 25,
        "q" => 16,
        "r" => 19,
        "s" => 31,
        "t" => 20,
        "u" => 22,
        "v" => 47,
        "w" => 17,
        "x" => 45,
        "y" => 21,
        "z" => 44,

        // Digits: top row runs 1..9 then 0
        "1" => 2,
        "2" => 3,
        "3" => 4,
        "4" => 5,
        "5" => 6,
        "6" => 7,
        "7" => 8,
        "8" => 9,
        "9" => 10,
        "0" => 11,

        // Named keys
        "enter" => 28,
        "tab" => 15,
        "space" => 57,
        "esc" | "escape" => 1,
        "backspace" => 14,
        "delete" => 111,
        "insert" => 110,
        "home" => 102,
        "end" => 107,
        "pageup" => 104,
        "pagedown" => 109,
        "up" => 103,
        "down" => 108,
        "left" => 105,
        "right" => 106,

        _ => return None,
    };

    Some(code)
}

/// Keycode of the left-hand variant of a modifier
pub fn modifier_code(modifier: Modifier) -> u16 {
    match modifier {
        Modifier::Ctrl => 29,
        Modifier::Shift => 42,
        Modifier::Alt => 56,
        Modifier::Super => 125,
    }
}

/// Keycode for a modifier given by name
pub fn modifier_code_for(modifier: &str) -> Option<u16> {
    Modifier::from_token(modifier).map(modifier_code)
}

/// Numeric suffix of "f<digits>"; anything else is not a function key
fn function_key_number(suffix: &str) -> Option<u16> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overlong suffixes like "f99999" are simply out of range
    Some(suffix.parse::<u16>().unwrap_or(u16::MAX))
}
