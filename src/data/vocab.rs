// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Maps every distinct token to a dense integer id.
//
// Algorithm:
//   1. Union all tokens from all input streams into a set
//   2. Sort the distinct tokens (plain `str` ordering)
//   3. Enumerate: first token → 0, second → 1, ...
//
// Because ids come from the sorted set and not from encounter
// order, shuffling the input lines never changes the mapping.
//
// Example:
//   ["a b", "b c"]  →  {"a": 0, "b": 1, "c": 2}
//
// A relation vocabulary (labels such as `film/film/genre`) is
// built with the same rule but kept as a separate Vocabulary.
//
// Reference: Rust Book §8 (Hash Maps), std::collections::BTreeSet

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable token → id mapping with ids `0..len()`.
///
/// Serialises as a plain JSON object `{"token": id, ...}`.
/// Deserialising rejects maps whose ids are not exactly `0..N-1`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Vocabulary {
    stoi: BTreeMap<String, u32>,
    itos: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from any number of token streams.
    pub fn build<I, S, T>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut distinct = BTreeSet::new();
        for stream in streams {
            collect_into(&mut distinct, stream);
        }
        Self::from_distinct(distinct)
    }

    /// Build a word vocabulary and a relation vocabulary in one pass.
    /// Each record is `(relation label, question tokens)`.
    pub fn build_with_relations<I, R, S, T>(records: I) -> (Self, Self)
    where
        I: IntoIterator<Item = (R, S)>,
        R: AsRef<str>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut words     = BTreeSet::new();
        let mut relations = BTreeSet::new();

        for (relation, tokens) in records {
            relations.insert(relation.as_ref().to_string());
            collect_into(&mut words, tokens);
        }

        (Self::from_distinct(words), Self::from_distinct(relations))
    }

    // BTreeSet iterates in sorted order, so enumerate gives the ids
    fn from_distinct(distinct: BTreeSet<String>) -> Self {
        let itos: Vec<String> = distinct.into_iter().collect();
        let stoi = itos
            .iter()
            .enumerate()
            .map(|(id, tok)| (tok.clone(), id as u32))
            .collect();
        Self { stoi, itos }
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.stoi.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.itos.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.stoi.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    /// Tokens with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.itos
            .iter()
            .enumerate()
            .map(|(id, tok)| (tok.as_str(), id as u32))
    }

    /// Look up each token; unknown tokens map to `None`.
    pub fn encode<T: AsRef<str>>(&self, tokens: &[T]) -> Vec<Option<u32>> {
        tokens.iter().map(|t| self.id(t.as_ref())).collect()
    }
}

fn collect_into<S, T>(set: &mut BTreeSet<String>, tokens: S)
where
    S: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    for tok in tokens {
        let tok = tok.as_ref();
        if !set.contains(tok) {
            set.insert(tok.to_string());
        }
    }
}

impl From<Vocabulary> for BTreeMap<String, u32> {
    fn from(v: Vocabulary) -> Self {
        v.stoi
    }
}

impl TryFrom<BTreeMap<String, u32>> for Vocabulary {
    type Error = String;

    fn try_from(stoi: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        let mut slots: Vec<Option<String>> = vec![None; stoi.len()];

        for (tok, &id) in &stoi {
            let slot = slots
                .get_mut(id as usize)
                .ok_or_else(|| format!("id {id} for '{tok}' is outside 0..{}", stoi.len()))?;
            if let Some(prev) = slot {
                return Err(format!("id {id} assigned to both '{prev}' and '{tok}'"));
            }
            *slot = Some(tok.clone());
        }

        // Every slot is filled once the checks above pass
        let itos = slots.into_iter().flatten().collect();
        Ok(Self { stoi, itos })
    }
}

/// The persisted pair: word vocabulary plus relation vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VocabPair {
    pub words:     Vocabulary,
    pub relations: Vocabulary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::tokenize;

    #[test]
    fn test_sorted_ids() {
        let lines = ["a b", "b c"];
        let vocab = Vocabulary::build(lines.iter().map(|l| tokenize(l)));

        assert_eq!(vocab.id("a"), Some(0));
        assert_eq!(vocab.id("b"), Some(1));
        assert_eq!(vocab.id("c"), Some(2));
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_permuted_input_gives_same_mapping() {
        let forward  = ["the cat sat", "on the mat", "a dog"];
        let shuffled = ["a dog", "the cat sat", "on the mat"];
        let reversed_words: Vec<Vec<String>> = forward
            .iter()
            .map(|l| tokenize(l).into_iter().rev().collect())
            .collect();

        let v1 = Vocabulary::build(forward.iter().map(|l| tokenize(l)));
        let v2 = Vocabulary::build(shuffled.iter().map(|l| tokenize(l)));
        let v3 = Vocabulary::build(reversed_words);

        assert_eq!(v1, v2);
        assert_eq!(v1, v3);
    }

    #[test]
    fn test_duplicates_collapse() {
        let vocab = Vocabulary::build([vec!["x", "x", "x"], vec!["x"]]);
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.token(0), Some("x"));
    }

    #[test]
    fn test_empty_input() {
        let vocab = Vocabulary::build(Vec::<Vec<String>>::new());
        assert!(vocab.is_empty());
        assert_eq!(vocab.id("anything"), None);
    }

    #[test]
    fn test_relations_stay_separate() {
        let records = vec![
            ("film/film/genre", vec!["what", "genre"]),
            ("people/person/place_of_birth", vec!["where", "born"]),
            ("film/film/genre", vec!["which", "genre"]),
        ];
        let (words, relations) = Vocabulary::build_with_relations(records);

        assert_eq!(relations.len(), 2);
        assert_eq!(relations.id("film/film/genre"), Some(0));
        assert_eq!(relations.id("people/person/place_of_birth"), Some(1));
        assert!(!words.contains("film/film/genre"));
        assert_eq!(words.len(), 5);
        assert_eq!(words.id("born"), Some(0));
    }

    #[test]
    fn test_iter_and_encode() {
        let vocab = Vocabulary::build([vec!["b", "a"]]);
        let pairs: Vec<_> = vocab.iter().collect();
        assert_eq!(pairs, vec![("a", 0), ("b", 1)]);
        assert_eq!(vocab.encode(&["b", "zzz"]), vec![Some(1), None]);
    }

    #[test]
    fn test_json_round_trip() {
        let vocab = Vocabulary::build([vec!["b", "a", "c"]]);
        let json  = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"{"a":0,"b":1,"c":2}"#);

        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vocab);
        assert_eq!(back.token(2), Some("c"));
    }

    #[test]
    fn test_rejects_sparse_ids() {
        let err = serde_json::from_str::<Vocabulary>(r#"{"a":0,"b":5}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = serde_json::from_str::<Vocabulary>(r#"{"a":1,"b":1}"#);
        assert!(err.is_err());
    }
}
