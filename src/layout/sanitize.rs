//! Reduces arbitrary text to the characters the active fonts can draw.
//!
//! Typographic punctuation is first folded to its closest ASCII stand-in, then
//! anything the fonts still can't render becomes `?`. The mapping is strictly
//! one character in, one character out, so word boundaries and character counts
//! survive sanitization. Hard line breaks pass through untouched.

use crate::font::{FontMetrics, FontWeight};

/// Placeholder drawn for characters with no rendering in the active fonts
pub const PLACEHOLDER: char = '?';

/// The fixed typographic folding table
pub fn typographic_replacement(ch: char) -> Option<char> {
    let replacement = match ch {
        // arrows
        '\u{2190}' | '\u{21D0}' | '\u{27F5}' => '<',
        '\u{2192}' | '\u{21D2}' | '\u{27F6}' | '\u{279C}' | '\u{27A1}' => '>',
        '\u{2191}' => '^',
        '\u{2193}' => 'v',
        '\u{2194}' | '\u{21D4}' => '-',
        // single quotes and primes
        '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' | '\u{00B4}' => '\'',
        '\u{201A}' => ',',
        // double quotes
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => '"',
        // dashes and hyphens
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => '-',
        // ellipsis
        '\u{2026}' => '.',
        // spacing
        '\t' | '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2007}' | '\u{2009}' | '\u{202F}' => {
            ' '
        }
        _ => return None,
    };
    Some(replacement)
}

/// Sanitize `text` against a predicate describing which characters can be drawn.
/// The predicate must accept [`PLACEHOLDER`].
pub fn sanitize_with<F: Fn(char) -> bool>(text: &str, supports: F) -> String {
    text.chars()
        .map(|ch| {
            if ch == '\n' || ch == '\r' {
                return ch;
            }
            let ch = match typographic_replacement(ch) {
                Some(replacement) => replacement,
                // any other separator still separates words
                None if ch.is_whitespace() => ' ',
                None => ch,
            };
            if supports(ch) {
                ch
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

/// Sanitizes text for the faces a document is set in. A character survives only
/// if every face can draw it, so sanitized text may be set in any weight.
pub struct TextSanitizer<M> {
    metrics: M,
}

impl<M: FontMetrics> TextSanitizer<M> {
    pub fn new(metrics: M) -> Self {
        TextSanitizer { metrics }
    }

    pub fn supports(&self, ch: char) -> bool {
        self.metrics.supports(FontWeight::Regular, ch) && self.metrics.supports(FontWeight::Bold, ch)
    }

    pub fn sanitize(&self, text: &str) -> String {
        sanitize_with(text, |ch| self.supports(ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSet;

    fn helvetica() -> TextSanitizer<FontSet> {
        TextSanitizer::new(FontSet::helvetica())
    }

    #[test]
    fn folds_dashes_and_curly_quotes() {
        let sanitizer = helvetica();
        assert_eq!(
            sanitizer.sanitize("well\u{2014}known \u{2018}quote\u{2019}"),
            "well-known 'quote'"
        );
        assert_eq!(
            sanitizer.sanitize("\u{201C}Series A\u{201D} \u{2013} 2024\u{2026}"),
            "\"Series A\" - 2024."
        );
    }

    #[test]
    fn unmapped_characters_become_placeholders() {
        let sanitizer = helvetica();
        assert_eq!(sanitizer.sanitize("\u{6F22}"), "?");
        assert_eq!(sanitizer.sanitize("caf\u{E9} \u{1F680}"), "caf\u{E9} ?");
        assert_eq!(sanitizer.sanitize("Se\u{0301}oul \u{0100}"), "Se?oul ?");
        assert_eq!(sanitizer.sanitize("a\u{0007}b"), "a?b");
    }

    #[test]
    fn win_ansi_letters_and_symbols_survive() {
        let sanitizer = helvetica();
        assert_eq!(
            sanitizer.sanitize("Z\u{FC}rich, S\u{E3}o Paulo, \u{20AC}5M, \u{A9}2024"),
            "Z\u{FC}rich, S\u{E3}o Paulo, \u{20AC}5M, \u{A9}2024"
        );
        assert_eq!(sanitizer.sanitize("\u{C6}sir \u{2122} \u{B1}3%"), "\u{C6}sir \u{2122} \u{B1}3%");
    }

    #[test]
    fn arrows_fold_to_single_characters() {
        let sanitizer = helvetica();
        assert_eq!(
            sanitizer.sanitize("growth \u{2192} scale \u{2190} seed"),
            "growth > scale < seed"
        );
    }

    #[test]
    fn hard_breaks_and_bullets_survive() {
        let sanitizer = helvetica();
        assert_eq!(sanitizer.sanitize("one\ntwo\r\n"), "one\ntwo\r\n");
        assert_eq!(sanitizer.sanitize("\u{2022} item"), "\u{2022} item");
        assert_eq!(sanitizer.sanitize("tab\there"), "tab here");
        assert_eq!(sanitizer.sanitize("ideographic\u{3000}space"), "ideographic space");
    }

    #[test]
    fn sanitizing_is_idempotent_and_total() {
        let sanitizer = helvetica();
        let samples = [
            "plain ascii text",
            "\u{201C}quoted\u{201D} \u{2014} dashed \u{2026} \u{2192}",
            "\u{6F22}\u{5B57} mixed \u{E9}\u{FC}\u{DF} \u{1F4C8}",
            "\u{00A0}\u{2009}\u{202F}\t\n\r",
            "",
        ];
        for sample in samples {
            let once = sanitizer.sanitize(sample);
            assert_eq!(sanitizer.sanitize(&once), once);
            assert_eq!(once.chars().count(), sample.chars().count());
            assert!(once
                .chars()
                .all(|ch| ch == '\n' || ch == '\r' || sanitizer.supports(ch)));
        }

        // every code point in the first planes folds to something drawable
        let all: String = (0u32..0x3000).filter_map(char::from_u32).collect();
        let once = sanitizer.sanitize(&all);
        assert_eq!(sanitizer.sanitize(&once), once);
        assert!(once
            .chars()
            .all(|ch| ch == '\n' || ch == '\r' || sanitizer.supports(ch)));
    }

    #[test]
    fn replacements_the_font_lacks_fall_back_to_placeholder() {
        // a font that only has lowercase letters and '?'
        let supports = |ch: char| ch.is_ascii_lowercase() || ch == PLACEHOLDER;
        let once = sanitize_with("a\u{2014}b", supports);
        assert_eq!(once, "a?b");
        assert_eq!(sanitize_with(&once, supports), once);
    }
}
