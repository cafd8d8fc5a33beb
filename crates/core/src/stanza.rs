//! Splitting lyric text into stanzas.
//!
//! A stanza is a block of text delimited by a blank line. Each stanza
//! becomes exactly one slide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter between stanzas: a fully blank line.
pub const STANZA_DELIMITER: &str = "\n\n";

/// A blank-line-delimited block of text, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stanza(String);

impl Stanza {
    /// Create a stanza, trimming surrounding whitespace.
    pub fn new(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    /// The stanza text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Whether the stanza holds no text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Stanza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Stanza {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Splits raw editor text into ordered stanzas.
#[derive(Debug, Clone, Default)]
pub struct StanzaSplitter;

impl StanzaSplitter {
    /// Create a new stanza splitter.
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into stanzas.
    ///
    /// The whole text is trimmed, split on blank lines, and each piece
    /// trimmed again. Runs of extra blank lines yield empty stanzas, which
    /// are kept. Empty input yields a single empty stanza.
    pub fn split(&self, text: &str) -> Vec<Stanza> {
        let text = normalize_line_endings(text);

        let stanzas: Vec<Stanza> = text
            .trim()
            .split(STANZA_DELIMITER)
            .map(Stanza::new)
            .collect();

        let empty = stanzas.iter().filter(|s| s.is_empty()).count();
        if empty > 0 && stanzas.len() > 1 {
            log::debug!(
                "{} of {} stanzas are empty and will produce blank slides",
                empty,
                stanzas.len()
            );
        }

        stanzas
    }

    /// Rejoin stanzas with the blank-line delimiter.
    pub fn join(&self, stanzas: &[Stanza]) -> String {
        stanzas
            .iter()
            .map(Stanza::text)
            .collect::<Vec<_>>()
            .join(STANZA_DELIMITER)
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(stanzas: &[Stanza]) -> Vec<&str> {
        stanzas.iter().map(Stanza::text).collect()
    }

    #[test]
    fn test_split_two_stanzas() {
        let splitter = StanzaSplitter::new();
        assert_eq!(texts(&splitter.split("A\n\nB")), vec!["A", "B"]);
    }

    #[test]
    fn test_split_single_stanza() {
        let splitter = StanzaSplitter::new();
        assert_eq!(texts(&splitter.split("A")), vec!["A"]);
        assert_eq!(
            texts(&splitter.split("Line one\nLine two")),
            vec!["Line one\nLine two"]
        );
    }

    #[test]
    fn test_split_keeps_empty_stanza_between_blank_lines() {
        let splitter = StanzaSplitter::new();
        assert_eq!(texts(&splitter.split("A\n\n\n\nB")), vec!["A", "", "B"]);
    }

    #[test]
    fn test_split_odd_blank_run_is_trimmed_away() {
        let splitter = StanzaSplitter::new();
        assert_eq!(texts(&splitter.split("A\n\n\nB")), vec!["A", "B"]);
    }

    #[test]
    fn test_split_empty_input() {
        let splitter = StanzaSplitter::new();
        assert_eq!(texts(&splitter.split("")), vec![""]);
        assert_eq!(texts(&splitter.split("  \n\n \t ")), vec![""]);
    }

    #[test]
    fn test_split_trims_outer_and_inner_whitespace() {
        let splitter = StanzaSplitter::new();
        let stanzas = splitter.split("\n\n  Amazing grace  \n\n  How sweet the sound \n\n");
        assert_eq!(texts(&stanzas), vec!["Amazing grace", "How sweet the sound"]);
    }

    #[test]
    fn test_split_normalizes_crlf() {
        let splitter = StanzaSplitter::new();
        assert_eq!(
            texts(&splitter.split("A\r\nB\r\n\r\nC")),
            vec!["A\nB", "C"]
        );
    }

    #[test]
    fn test_join_reconstructs_trimmed_text() {
        let splitter = StanzaSplitter::new();
        let input = "  Verse one\nline two\n\nVerse two\n\n\n\nVerse three  ";
        let stanzas = splitter.split(input);
        assert_eq!(splitter.join(&stanzas), input.trim());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// A line that neither starts nor ends with whitespace.
        fn line_strategy() -> impl Strategy<Value = String> {
            "[a-zA-Z0-9',.!?]([a-zA-Z0-9 ',.!?]{0,20}[a-zA-Z0-9',.!?])?"
        }

        /// A stanza of one to four lines.
        fn stanza_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec(line_strategy(), 1..4).prop_map(|lines| lines.join("\n"))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_split_then_join_reconstructs_input(
                stanzas in prop::collection::vec(stanza_strategy(), 1..6),
                padding in "[ \n\t]{0,3}",
            ) {
                let splitter = StanzaSplitter::new();
                let body = stanzas.join(STANZA_DELIMITER);
                let input = format!("{padding}{body}{padding}");

                let split = splitter.split(&input);

                prop_assert_eq!(split.len(), stanzas.len());
                prop_assert_eq!(splitter.join(&split), input.trim());
            }
        }
    }
}
