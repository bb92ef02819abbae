//! script.rs - Mixed-script detection heuristic.
//!
//! Detects messages that mix characters from incompatible writing systems,
//! a common homograph/spoofing technique. The check is a case-mapping
//! heuristic, not a full Unicode script-property classifier: every non-ASCII
//! alphabetic code point is bucketed by whether it has an upper/lower case
//! form at all. Scripts with no case concept (CJK, Arabic, Hebrew, ...) all
//! land in the same caseless bucket, which is the intended conservative
//! behavior.
//!
//! License: MIT OR APACHE 2.0

/// The two buckets the heuristic distinguishes. `Latin` means "has a case
/// mapping, Latin-like"; `NonLatin` means alphabetic but caseless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptClass {
    Latin,
    NonLatin,
}

fn classify(ch: char) -> ScriptClass {
    if ch.is_lowercase() || ch.is_uppercase() {
        ScriptClass::Latin
    } else {
        ScriptClass::NonLatin
    }
}

/// Reports whether `text` contains alphabetic characters from both script
/// buckets.
///
/// ASCII code points are never considered part of a script, and
/// non-alphabetic code points (digits, punctuation, symbols, emoji) never
/// affect the result. Returns `false` for empty input. Short-circuits on the
/// first collision.
pub fn is_mixed_script(text: &str) -> bool {
    let mut detected: Option<ScriptClass> = None;

    for ch in text.chars() {
        if (ch as u32) < 128 {
            continue;
        }
        if !ch.is_alphabetic() {
            continue;
        }

        let current = classify(ch);
        match detected {
            None => detected = Some(current),
            Some(first) if first != current => return true,
            Some(_) => {}
        }
    }

    false
}
