//! classifier.rs - The allow/deny decision for message content.
//!
//! Composes the pattern catalog into the single `is_allowed` policy.
//! Deliberately independent of mixed-script detection: a mixed-script
//! Latin-lookalike message can consist entirely of individually "allowed"
//! characters, so the two checks are combined only at the pipeline level.
//!
//! License: MIT OR APACHE 2.0

use crate::catalog::PatternCatalog;

/// Decides whether the characters of a message are permitted at all.
#[derive(Debug, Clone, Copy)]
pub struct ContentClassifier<'a> {
    catalog: &'a PatternCatalog,
}

impl<'a> ContentClassifier<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Policy, in order:
    ///
    /// 1. Printable ASCII (every byte in 32..=126, empty included) is
    ///    always allowed.
    /// 2. Otherwise, text the allow-list pattern fires on is allowed.
    /// 3. Otherwise, emoji-only or emoticon-only text is allowed.
    ///
    /// Anything else is not allowed. Total over any `&str`.
    pub fn is_allowed(&self, text: &str) -> bool {
        if text.bytes().all(|b| (32..=126).contains(&b)) {
            return true;
        }

        if self.catalog.matches_allowlist(text) {
            return true;
        }

        self.catalog.is_emoji_only(text) || self.catalog.is_emoticon_only(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::config::PatternSources;

    fn classifier_catalog() -> std::sync::Arc<PatternCatalog> {
        catalog::get_or_compile(&PatternSources::default()).unwrap()
    }

    #[test]
    fn printable_ascii_is_always_allowed() {
        let catalog = classifier_catalog();
        let classifier = ContentClassifier::new(&catalog);
        assert!(classifier.is_allowed("hello, world! 123 ~"));
        assert!(classifier.is_allowed(""));
    }

    #[test]
    fn control_characters_are_not_ascii_fast_path() {
        let catalog = classifier_catalog();
        let classifier = ContentClassifier::new(&catalog);
        // A tab fails the printable-ASCII check but is in \p{Common}, so the
        // allow-list decides. The default allow-list is anchored on the full
        // string and accepts it.
        assert!(classifier.is_allowed("a\tb"));
    }

    #[test]
    fn latin_accents_pass_via_allowlist() {
        let catalog = classifier_catalog();
        let classifier = ContentClassifier::new(&catalog);
        assert!(classifier.is_allowed("héllo wörld"));
    }

    #[test]
    fn emoji_only_text_is_allowed() {
        let catalog = classifier_catalog();
        let classifier = ContentClassifier::new(&catalog);
        assert!(classifier.is_allowed("😀🎉"));
    }

    #[test]
    fn unlisted_scripts_are_not_allowed() {
        let catalog = classifier_catalog();
        let classifier = ContentClassifier::new(&catalog);
        assert!(!classifier.is_allowed("привет"));
        assert!(!classifier.is_allowed("hello 中国"));
    }
}
