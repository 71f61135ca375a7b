// ============================================================
// Layer 4 — Paired-Example Builder
// ============================================================
// Zips several parallel text files into one Example per line.
//
// A corpus like SICK stores each field in its own file:
//
//   a.txt              b.txt                  sim.txt
//   A man is eating.   A person eats food.    4.2
//   Two dogs run.      A cat sleeps.          1.1
//
// Line k of every file belongs to example k:
//
//   Example { a: [A, man, is, eating], b: [...], label: 4.2 }
//
// Each field is described by a FieldSpec:
//   (field name, file name, parser, optional line cleanup)
//
// All files are read in lockstep, one line from each per step.
// Reading stops when the first file ends; every other file must
// end on the same line, otherwise the build fails with an
// Alignment error instead of returning a truncated dataset.
//
// Reference: Rust Book §13 (Iterators), §9 (Error Handling)

use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use crate::data::{open_reader, tokenizer::Tokenizer};
use crate::error::{DataError, Result};

// ─── FieldValue ───────────────────────────────────────────────────────────────
/// One parsed field of an Example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Tokens(Vec<String>),
    Float(f32),
    Int(i64),
    Floats(Vec<f32>),
}

impl FieldValue {
    /// Length used for sort keys: token count for text fields,
    /// element count for vectors, 1 for scalars.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Text(s)    => s.split_whitespace().count(),
            FieldValue::Tokens(t)  => t.len(),
            FieldValue::Floats(v)  => v.len(),
            FieldValue::Float(_) | FieldValue::Int(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Example ──────────────────────────────────────────────────────────────────
/// One aligned tuple of named fields, in schema order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Example {
    fields: Vec<(String, FieldValue)>,
}

impl Example {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn tokens(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            FieldValue::Tokens(t) => Some(t),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn floats(&self, name: &str) -> Option<&[f32]> {
        match self.get(name)? {
            FieldValue::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len_of(&self, name: &str) -> Option<usize> {
        self.get(name).map(FieldValue::len)
    }
}

// ─── Field schema ─────────────────────────────────────────────────────────────
/// How the raw text of one line becomes a FieldValue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Tokens(Tokenizer),
    Float,
    Int,
    /// Space-separated floats. Every line must hold `width` values;
    /// with `None` the first line fixes the width.
    Floats { width: Option<usize> },
}

/// Cleanup applied to a raw line before it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTransform {
    /// Remove trailing `.` and newline characters
    StripTrailingPeriod,
}

impl LineTransform {
    pub fn apply<'a>(&self, line: &'a str) -> &'a str {
        match self {
            LineTransform::StripTrailingPeriod => line.trim_end_matches(['.', '\n']),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name:      String,
    pub file:      PathBuf,
    pub kind:      FieldKind,
    pub transform: Option<LineTransform>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, kind: FieldKind) -> Self {
        Self {
            name:      name.into(),
            file:      file.into(),
            kind,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: LineTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Parse one (already transformed) line according to `kind`.
/// `width` carries the float count fixed by earlier lines.
pub fn parse_field(
    kind:    FieldKind,
    raw:     &str,
    width:   &mut Option<usize>,
    path:    &Path,
    line_no: usize,
) -> Result<FieldValue> {
    let value = match kind {
        FieldKind::Text       => FieldValue::Text(raw.to_string()),
        FieldKind::Tokens(t)  => FieldValue::Tokens(t.tokenize(raw)),
        FieldKind::Float => FieldValue::Float(raw.trim().parse().map_err(|e| {
            DataError::malformed(path, line_no, format!("expected a number, got '{raw}': {e}"))
        })?),
        FieldKind::Int => FieldValue::Int(raw.trim().parse().map_err(|e| {
            DataError::malformed(path, line_no, format!("expected an integer, got '{raw}': {e}"))
        })?),
        FieldKind::Floats { width: declared } => {
            let values = raw
                .split_whitespace()
                .map(|v| {
                    v.parse::<f32>().map_err(|e| {
                        DataError::malformed(path, line_no, format!("bad feature '{v}': {e}"))
                    })
                })
                .collect::<Result<Vec<f32>>>()?;

            let expected = *width.get_or_insert(declared.unwrap_or(values.len()));
            if values.len() != expected {
                return Err(DataError::malformed(
                    path,
                    line_no,
                    format!("expected {expected} features, found {}", values.len()),
                ));
            }
            FieldValue::Floats(values)
        }
    };
    Ok(value)
}

// ─── PairedDatasetBuilder ─────────────────────────────────────────────────────
/// Reads one file per FieldSpec, relative to `dir`, in lockstep.
#[derive(Debug, Clone)]
pub struct PairedDatasetBuilder {
    dir:    PathBuf,
    fields: Vec<FieldSpec>,
}

struct FieldReader {
    spec:  FieldSpec,
    path:  PathBuf,
    lines: Lines<BufReader<File>>,
    width: Option<usize>,
}

impl FieldReader {
    fn next_line(&mut self) -> Option<Result<String>> {
        let path = &self.path;
        self.lines
            .next()
            .map(|l| l.map_err(|e| DataError::io(path, e)))
    }

    fn remaining(&mut self) -> usize {
        self.lines.by_ref().count()
    }
}

impl PairedDatasetBuilder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:    dir.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Read all files and return the examples in line order.
    pub fn build(&self) -> Result<Vec<Example>> {
        // Open every file up front so a missing one fails before any parsing
        let mut readers = self
            .fields
            .iter()
            .map(|spec| {
                let path = self.dir.join(&spec.file);
                Ok(FieldReader {
                    spec:  spec.clone(),
                    lines: open_reader(&path)?.lines(),
                    path,
                    width: match spec.kind {
                        FieldKind::Floats { width } => width,
                        _ => None,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let Some((first, rest)) = readers.split_first_mut() else {
            return Ok(Vec::new());
        };

        let mut examples = Vec::new();
        let mut line_no  = 0usize;

        while let Some(head) = first.next_line() {
            let head = head?;
            line_no += 1;

            let mut raw_lines = Vec::with_capacity(rest.len() + 1);
            raw_lines.push(head);

            for reader in rest.iter_mut() {
                match reader.next_line() {
                    Some(line) => raw_lines.push(line?),
                    None => {
                        return Err(DataError::Alignment {
                            path:     reader.path.clone(),
                            expected: line_no + first.remaining(),
                            found:    line_no - 1,
                        });
                    }
                }
            }

            let mut example = Example::new();
            for (reader, raw) in std::iter::once(&mut *first).chain(rest.iter_mut()).zip(&raw_lines) {
                let cleaned = match reader.spec.transform {
                    Some(t) => t.apply(raw),
                    None    => raw.as_str(),
                };
                let value = parse_field(reader.spec.kind, cleaned, &mut reader.width, &reader.path, line_no)?;
                example.fields.push((reader.spec.name.clone(), value));
            }
            examples.push(example);
        }

        for reader in rest.iter_mut() {
            let extra = reader.remaining();
            if extra > 0 {
                return Err(DataError::Alignment {
                    path:     reader.path.clone(),
                    expected: line_no,
                    found:    line_no + extra,
                });
            }
        }

        tracing::debug!(
            "Built {} examples from {} parallel files in '{}'",
            examples.len(),
            self.fields.len(),
            self.dir.display()
        );
        Ok(examples)
    }
}
