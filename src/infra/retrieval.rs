// ============================================================
// Layer 6 — Command Retriever
// ============================================================
// Talks to an externally hosted passage-retrieval engine by
// running it as a child process.
//
// Protocol (one exchange per call):
//   stdin  ← one JSON request
//   stdout → one JSON response
//
//   {"op":"ranked_passages","query":"...","index":"...",
//    "hits":10,"k":5,"scorer":"Idf","embeddings":null,"topics":null}
//     → {"passages":[{"passage":"...","score":3.2}, ...]}
//
//   {"op":"term_idf","index":"...","query":"..."}
//     → {"term_idf":{...}}
//
// A non-zero exit status or an unparsable response is a
// Retrieval error. Calls are blocking and never retried.
//
// Reference: std::process::Command documentation
//            serde_json crate documentation

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    cell::RefCell,
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use crate::application::retrieve_use_case::RetrievalConfig;
use crate::domain::{
    passage::{PassageQuery, ScoredPassage},
    traits::PassageRetriever,
};
use crate::error::{DataError, Result};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    RankedPassages {
        query:      &'a str,
        index:      &'a str,
        hits:       usize,
        k:          usize,
        scorer:     &'a str,
        embeddings: Option<&'a str>,
        topics:     Option<&'a str>,
    },
    TermIdf {
        index: &'a str,
        query: Option<&'a str>,
    },
}

#[derive(Debug, Deserialize)]
struct PassagesResponse {
    passages: Vec<ScoredPassage>,
}

#[derive(Debug, Deserialize)]
struct TermIdfResponse {
    term_idf: serde_json::Value,
}

pub struct CommandRetriever {
    program:    String,
    args:       Vec<String>,
    index:      String,
    scorer:     String,
    embeddings: Option<String>,
    topics:     Option<String>,
    /// Last ranked lookup, replayed for the term-IDF request
    last_query: RefCell<Option<PassageQuery>>,
}

impl CommandRetriever {
    /// `command` is the program followed by its fixed arguments.
    pub fn new(command: &[String], config: &RetrievalConfig) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| DataError::Retrieval("no retrieval command configured".into()))?;

        Ok(Self {
            program:    program.clone(),
            args:       args.to_vec(),
            index:      config.index.clone(),
            scorer:     config.scorer.clone(),
            embeddings: config.embeddings.clone(),
            topics:     config.topics.clone(),
            last_query: RefCell::new(None),
        })
    }

    fn call<T: DeserializeOwned>(&self, request: &Request<'_>) -> Result<T> {
        let body = serde_json::to_vec(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DataError::Retrieval(format!("cannot start '{}': {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The engine may answer without reading its input
            match stdin.write_all(&body) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(DataError::Retrieval(format!("cannot send request: {e}")));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| DataError::Retrieval(format!("'{}' did not finish: {e}", self.program)))?;

        if !output.status.success() {
            return Err(DataError::Retrieval(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| DataError::Retrieval(format!("unparsable response from '{}': {e}", self.program)))
    }
}

impl PassageRetriever for CommandRetriever {
    fn ranked_passages(&self, query: &PassageQuery) -> anyhow::Result<Vec<ScoredPassage>> {
        let request = Request::RankedPassages {
            query:      &query.query,
            index:      &query.index,
            hits:       query.hits,
            k:          query.k,
            scorer:     &self.scorer,
            embeddings: self.embeddings.as_deref(),
            topics:     self.topics.as_deref(),
        };

        let mut passages = self.call::<PassagesResponse>(&request)?.passages;
        passages.truncate(query.k);

        tracing::debug!("'{}' → {} passages", query.query, passages.len());
        *self.last_query.borrow_mut() = Some(query.clone());
        Ok(passages)
    }

    fn term_idf_json(&self) -> anyhow::Result<String> {
        let last    = self.last_query.borrow().clone();
        let request = Request::TermIdf {
            index: last.as_ref().map_or(self.index.as_str(), |q| q.index.as_str()),
            query: last.as_ref().map(|q| q.query.as_str()),
        };

        let response = self.call::<TermIdfResponse>(&request)?;
        Ok(response.term_idf.to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    fn config() -> RetrievalConfig {
        RetrievalConfig {
            index: "lucene-index.TrecQA".into(),
            ..RetrievalConfig::default()
        }
    }

    #[test]
    fn test_ranked_passages_truncates_to_k() {
        let script = r#"cat > /dev/null; echo '{"passages":[{"passage":"a","score":3.0},{"passage":"b","score":2.0},{"passage":"c","score":1.0}]}'"#;
        let retriever = CommandRetriever::new(&shell(script), &config()).unwrap();

        let query    = PassageQuery::new("What is photosynthesis?", "lucene-index.TrecQA", 10, 2);
        let passages = retriever.ranked_passages(&query).unwrap();

        assert_eq!(passages, vec![ScoredPassage::new("a", 3.0), ScoredPassage::new("b", 2.0)]);
    }

    #[test]
    fn test_term_idf_replays_last_query() {
        // Echo the request back inside the response
        let echo = shell(r#"printf '{"term_idf":'; cat; printf '}'"#);
        let retriever = CommandRetriever::new(&echo, &config()).unwrap();

        let before: serde_json::Value =
            serde_json::from_str(&retriever.term_idf_json().unwrap()).unwrap();
        assert_eq!(before["op"], "term_idf");
        assert_eq!(before["index"], "lucene-index.TrecQA");
        assert!(before["query"].is_null());

        let ranked = shell(r#"cat > /dev/null; echo '{"passages":[]}'"#);
        let with_query = CommandRetriever {
            program: ranked[0].clone(),
            args:    ranked[1..].to_vec(),
            ..retriever
        };
        let query = PassageQuery::new("How long is the Amazon River", "other-index", 10, 5);
        assert!(with_query.ranked_passages(&query).unwrap().is_empty());

        let replay = CommandRetriever {
            program: echo[0].clone(),
            args:    echo[1..].to_vec(),
            ..with_query
        };
        let after: serde_json::Value = serde_json::from_str(&replay.term_idf_json().unwrap()).unwrap();
        assert_eq!(after["query"], "How long is the Amazon River");
        assert_eq!(after["index"], "other-index");
    }

    #[test]
    fn test_failing_engine_is_an_error() {
        let script    = "cat > /dev/null; echo boom >&2; exit 3";
        let retriever = CommandRetriever::new(&shell(script), &config()).unwrap();
        let query     = PassageQuery::new("q", "idx", 1, 1);

        let err = retriever.ranked_passages(&query).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_garbage_response_is_an_error() {
        let retriever = CommandRetriever::new(&shell("cat > /dev/null; echo not json"), &config()).unwrap();
        let err = retriever
            .ranked_passages(&PassageQuery::new("q", "idx", 1, 1))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Retrieval(_))));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(CommandRetriever::new(&[], &config()).is_err());
    }
}
