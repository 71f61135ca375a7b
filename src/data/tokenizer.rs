// ============================================================
// Layer 4 — Tokenizer
// ============================================================
// Splits one line of text into tokens.
//
// Two flavours are used by the corpora in this crate:
//   Filtered   — whitespace split, then drop treebank artifacts
//                such as `--lrb--` (left bracket) and a bare `.`
//   Whitespace — plain whitespace split, for `.toks` files that
//                were tokenised upstream
//
// Example:
//   "what is -- photosynthesis ."
//     Filtered   → ["what", "is", "photosynthesis"]
//     Whitespace → ["what", "is", "--", "photosynthesis", "."]
//
// Reference: Rust Book §8 (Strings), §13 (Iterators)

use serde::{Deserialize, Serialize};

/// Tokens removed by the filtered tokenizer. Matching is exact
/// and case-sensitive: `--LRB--` is kept, `--lrb--` is dropped.
pub const DENYLIST: [&str; 6] = ["--lrb--", "--rrb--", "``", "''", "--", "."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tokenizer {
    /// Whitespace split followed by the denylist filter
    #[default]
    Filtered,
    /// Whitespace split only
    Whitespace,
}

impl Tokenizer {
    pub fn tokenize(&self, line: &str) -> Vec<String> {
        match self {
            Tokenizer::Filtered   => tokenize(line),
            Tokenizer::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Split `line` on whitespace and drop denylisted tokens.
/// An empty or blank line yields an empty Vec.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace()
        .filter(|word| !is_denylisted(word))
        .map(str::to_string)
        .collect()
}

fn is_denylisted(word: &str) -> bool {
    DENYLIST.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_denylisted_tokens() {
        assert_eq!(
            tokenize("what is -- photosynthesis ."),
            vec!["what", "is", "photosynthesis"]
        );
    }

    #[test]
    fn test_drops_bracket_and_quote_markers() {
        let line = "`` it --lrb-- really --rrb-- works ''";
        assert_eq!(tokenize(line), vec!["it", "really", "works"]);
    }

    #[test]
    fn test_denylist_is_case_sensitive_and_exact() {
        // Only whole-token matches are removed
        assert_eq!(
            tokenize("--LRB-- end. --- a.b"),
            vec!["--LRB--", "end.", "---", "a.b"]
        );
    }

    #[test]
    fn test_empty_line_gives_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t \n").is_empty());
    }

    #[test]
    fn test_whitespace_tokenizer_keeps_everything() {
        let toks = Tokenizer::Whitespace.tokenize("a -- b .");
        assert_eq!(toks, vec!["a", "--", "b", "."]);
    }

    #[test]
    fn test_default_is_filtered() {
        assert_eq!(Tokenizer::default().tokenize("a . b"), vec!["a", "b"]);
    }
}
