// ============================================================
// Layer 2 — RetrieveUseCase
// ============================================================
// Sends one query, or every query of a topics file, to the
// passage retriever and collects the ranked passages.
//
// The retriever is injected as a trait object so the workflow
// runs the same against the external engine and a test fake.
//
// Reference: Rust Book §17 (Trait Objects)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{io::BufRead, path::Path};

use crate::data::open_reader;
use crate::domain::{
    passage::{PassageQuery, ScoredPassage},
    traits::PassageRetriever,
};

// ─── Retrieval Configuration ─────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Search index location
    pub index: String,
    /// Optional word-vector index used by embedding scorers
    pub embeddings: Option<String>,
    /// Optional file with one query per line
    pub topics: Option<String>,
    /// Optional single query
    pub query: Option<String>,
    /// Documents fetched before passage scoring
    pub hits: usize,
    /// Named passage scoring strategy
    pub scorer: String,
    /// Passages returned per query
    pub k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index:      String::new(),
            embeddings: None,
            topics:     None,
            query:      None,
            hits:       100,
            scorer:     "Idf".to_string(),
            k:          1,
        }
    }
}

/// Ranked passages for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query:    String,
    pub passages: Vec<ScoredPassage>,
}

pub struct RetrieveUseCase {
    config:    RetrievalConfig,
    retriever: Box<dyn PassageRetriever>,
}

impl RetrieveUseCase {
    pub fn new(config: RetrievalConfig, retriever: Box<dyn PassageRetriever>) -> Self {
        Self { config, retriever }
    }

    /// Queries from `--query` first, then from the topics file.
    fn queries(&self) -> Result<Vec<String>> {
        let mut queries: Vec<String> = self.config.query.iter().cloned().collect();

        if let Some(topics) = &self.config.topics {
            let reader = open_reader(Path::new(topics))?;
            for line in reader.lines() {
                let line = line.with_context(|| format!("Cannot read topics '{topics}'"))?;
                let line = line.trim();
                if !line.is_empty() {
                    queries.push(line.to_string());
                }
            }
        }

        if queries.is_empty() {
            bail!("nothing to retrieve: give a query or a topics file");
        }
        Ok(queries)
    }

    pub fn execute(&self) -> Result<Vec<QueryResult>> {
        let cfg = &self.config;
        let mut results = Vec::new();

        for query in self.queries()? {
            let request  = PassageQuery::new(query.as_str(), cfg.index.as_str(), cfg.hits, cfg.k);
            let passages = self
                .retriever
                .ranked_passages(&request)
                .with_context(|| format!("Retrieval failed for '{query}'"))?;

            tracing::info!("'{}': {} passages", query, passages.len());
            results.push(QueryResult { query, passages });
        }

        Ok(results)
    }

    /// Term-IDF summary of the most recent lookup.
    pub fn term_idf_json(&self) -> Result<String> {
        self.retriever.term_idf_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    /// Returns `k` fixed passages and records every query.
    #[derive(Default)]
    struct FakeRetriever {
        seen: RefCell<Vec<PassageQuery>>,
    }

    impl PassageRetriever for FakeRetriever {
        fn ranked_passages(&self, query: &PassageQuery) -> Result<Vec<ScoredPassage>> {
            self.seen.borrow_mut().push(query.clone());
            Ok((0..query.k)
                .map(|i| ScoredPassage::new(format!("{} #{i}", query.query), 1.0 / (i + 1) as f64))
                .collect())
        }

        fn term_idf_json(&self) -> Result<String> {
            Ok(r#"{"photosynthesis":3.2}"#.to_string())
        }
    }

    /// Shared handle so a test can inspect the fake after handing it over.
    impl PassageRetriever for Rc<FakeRetriever> {
        fn ranked_passages(&self, query: &PassageQuery) -> Result<Vec<ScoredPassage>> {
            self.as_ref().ranked_passages(query)
        }

        fn term_idf_json(&self) -> Result<String> {
            self.as_ref().term_idf_json()
        }
    }

    fn fake() -> Rc<FakeRetriever> {
        Rc::default()
    }

    #[test]
    fn test_single_query() {
        let retriever = fake();
        let config = RetrievalConfig {
            index: "idx".into(),
            query: Some("What is photosynthesis?".into()),
            hits:  10,
            k:     3,
            ..RetrievalConfig::default()
        };

        let results = RetrieveUseCase::new(config, Box::new(Rc::clone(&retriever))).execute().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passages.len(), 3);
        assert_eq!(results[0].passages[0].passage, "What is photosynthesis? #0");

        let seen = retriever.seen.borrow();
        assert_eq!(seen[0], PassageQuery::new("What is photosynthesis?", "idx", 10, 3));
    }

    #[test]
    fn test_topics_file() {
        let dir    = tempfile::tempdir().unwrap();
        let topics = dir.path().join("topics.txt");
        fs::write(&topics, "How long is the Amazon River\n\nWho wrote Hamlet\n").unwrap();

        let retriever = fake();
        let config = RetrievalConfig {
            index:  "idx".into(),
            topics: Some(topics.to_string_lossy().into_owned()),
            ..RetrievalConfig::default()
        };

        let use_case = RetrieveUseCase::new(config, Box::new(Rc::clone(&retriever)));
        let results  = use_case.execute().unwrap();
        let queries: Vec<_> = results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["How long is the Amazon River", "Who wrote Hamlet"]);
        // Default k
        assert_eq!(results[1].passages.len(), 1);
        assert_eq!(use_case.term_idf_json().unwrap(), r#"{"photosynthesis":3.2}"#);
        assert_eq!(retriever.seen.borrow().len(), 2);
    }

    #[test]
    fn test_no_queries_is_an_error() {
        let config = RetrievalConfig { index: "idx".into(), ..RetrievalConfig::default() };
        assert!(RetrieveUseCase::new(config, Box::new(fake())).execute().is_err());
    }
}
