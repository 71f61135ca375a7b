// ============================================================
// Layer 4 — Annotated Question Reader
// ============================================================
// Reads SimpleQuestions-style annotated files. Each line holds
// tab-separated columns (0-indexed):
//
//   0 subject   1 relation   2 object   3 question text
//
// Only the relation and the question text are kept. The text is
// tokenised with the filtered tokenizer, giving one record per
// line that feeds the word + relation vocabulary build.
//
// Reference: Bordes et al. (2015) SimpleQuestions
//            Rust Book §12 (Reading a File)

use std::{
    fs,
    io::{BufRead, ErrorKind},
    path::{Path, PathBuf},
};

use crate::data::{open_reader, tokenizer::tokenize};
use crate::error::{DataError, Result};

pub const RELATION_COLUMN: usize = 1;
pub const TEXT_COLUMN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    pub relation: String,
    pub tokens:   Vec<String>,
}

/// Parse one annotated line; `line_no` is 1-based.
pub fn parse_line(line: &str, path: &Path, line_no: usize) -> Result<AnnotatedRecord> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() <= TEXT_COLUMN {
        return Err(DataError::malformed(
            path,
            line_no,
            format!(
                "expected at least {} tab-separated columns, found {}",
                TEXT_COLUMN + 1,
                columns.len()
            ),
        ));
    }

    Ok(AnnotatedRecord {
        relation: columns[RELATION_COLUMN].to_string(),
        tokens:   tokenize(columns[TEXT_COLUMN]),
    })
}

/// Read every record of one annotated file.
pub fn read_annotated(path: &Path) -> Result<Vec<AnnotatedRecord>> {
    let reader = open_reader(path)?;
    reader
        .lines()
        .enumerate()
        .map(|(n, line)| {
            let line = line.map_err(|e| DataError::io(path, e))?;
            parse_line(&line, path, n + 1)
        })
        .collect()
}

/// `<dir>/<prefix>*.txt`, sorted by file name.
pub fn annotated_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DataError::MissingResource(dir.to_path_buf()))
        }
        Err(e) => return Err(DataError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DataError::io(dir, e))?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if path.is_file() && name.starts_with(prefix) && name.ends_with(".txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
