// ============================================================
// Layer 4 — Embedding Table Loader
// ============================================================
// Reads a pretrained word-vector file into memory.
//
// File format, one row per line, values separated by any run of
// whitespace:
//   token v1 v2 ... vD
//
// There is no header line. A word2vec `<count> <dim>` header
// would be read as a one-wide row, so strip it before loading.
// A token that is empty once `#` is removed is rejected.
//
// Row i of the table is the i-th non-empty line of the file,
// and `index[token] == i`. Every `#` is removed from the token
// before it is stored. All rows must have the same width D.
//
// After loading, the tokens of a training corpus can be checked
// against the table: any corpus token that has no row is an
// out-of-vocabulary (OOV) token. The loader only reports them;
// giving OOV tokens a vector happens in `aligned_to`, which
// builds a vocabulary-ordered matrix with zero or uniform
// random rows for the unknown tokens.
//
// Reference: Mikolov et al. (2013) word2vec text format
//            Burn Book §3 (Tensors)

use burn::tensor::{backend::Backend, Tensor, TensorData};
use rand::Rng;
use std::{
    collections::{BTreeSet, HashMap},
    io::BufRead,
    path::Path,
};

use crate::data::{open_reader, vocab::Vocabulary};
use crate::error::{DataError, Result};

/// Character stripped from every token in a vector file
pub const TOKEN_MARKER: char = '#';

/// Default half-width for uniform OOV initialisation
pub const DEFAULT_UNIFORM_BOUND: f32 = 0.05;

/// Pretrained vectors in file order plus a token → row index.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: Vec<Vec<f32>>,
    index:   HashMap<String, usize>,
    dim:     usize,
}

impl EmbeddingTable {
    /// Load a vector file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path   = path.as_ref();
        let reader = open_reader(path)?;
        let table  = Self::parse(reader, path)?;

        tracing::info!(
            "Loaded {} vectors of dimension {} from '{}'",
            table.len(),
            table.dim,
            path.display()
        );
        Ok(table)
    }

    /// Load a vector file and compute the OOV set of a tokenised corpus.
    pub fn load_with_oov<I, S, T>(
        path:   impl AsRef<Path>,
        corpus: I,
    ) -> Result<(Self, BTreeSet<String>)>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let table = Self::load(path)?;
        let oov   = table.oov(corpus);
        tracing::info!("{} corpus tokens have no pretrained vector", oov.len());
        Ok((table, oov))
    }

    /// Parse vector rows from any buffered reader.
    /// `source` only labels error messages.
    pub fn parse<R: BufRead>(reader: R, source: &Path) -> Result<Self> {
        let mut table = Self::default();

        for (n, line) in reader.lines().enumerate() {
            let line_no = n + 1;
            let line    = line.map_err(|e| DataError::io(source, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            // Non-blank line, so there is at least one piece
            let word = parts.next().unwrap_or_default().replace(TOKEN_MARKER, "");
            if word.is_empty() {
                return Err(DataError::malformed(source, line_no, "empty token"));
            }

            let vector = parts
                .map(|v| {
                    v.parse::<f32>().map_err(|e| {
                        DataError::malformed(source, line_no, format!("bad value '{v}': {e}"))
                    })
                })
                .collect::<Result<Vec<f32>>>()?;

            if vector.is_empty() {
                return Err(DataError::malformed(
                    source,
                    line_no,
                    format!("token '{word}' has no vector values"),
                ));
            }

            if table.vectors.is_empty() {
                table.dim = vector.len();
            } else if vector.len() != table.dim {
                return Err(DataError::DimensionMismatch {
                    path:     source.to_path_buf(),
                    line:     line_no,
                    expected: table.dim,
                    found:    vector.len(),
                });
            }

            // A repeated token points at its latest row
            table.index.insert(word, table.vectors.len());
            table.vectors.push(vector);
        }

        Ok(table)
    }

    /// Distinct corpus tokens with no row in this table.
    pub fn oov<I, S, T>(&self, corpus: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut oov = BTreeSet::new();
        for tokens in corpus {
            for tok in tokens {
                let tok = tok.as_ref();
                if !self.index.contains_key(tok) && !oov.contains(tok) {
                    oov.insert(tok.to_string());
                }
            }
        }
        oov
    }

    pub fn id(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn vector(&self, token: &str) -> Option<&[f32]> {
        self.id(token).map(|i| self.vectors[i].as_slice())
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        self.vectors.get(i).map(Vec::as_slice)
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn index(&self) -> &HashMap<String, usize> {
        &self.index
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Build a `vocab.len() × dim` matrix in vocabulary-id order.
    /// Tokens with a pretrained row copy it; the rest use `init`.
    pub fn aligned_to<R: Rng>(
        &self,
        vocab: &Vocabulary,
        init:  OovInit,
        rng:   &mut R,
    ) -> EmbeddingMatrix {
        let mut data     = Vec::with_capacity(vocab.len() * self.dim);
        let mut oov_rows = 0usize;

        for (token, _) in vocab.iter() {
            match self.vector(token) {
                Some(v) => data.extend_from_slice(v),
                None => {
                    oov_rows += 1;
                    match init {
                        OovInit::Zero => data.extend(std::iter::repeat(0.0).take(self.dim)),
                        OovInit::Uniform(bound) => {
                            let b = bound.abs();
                            data.extend((0..self.dim).map(|_| rng.gen_range(-b..=b)));
                        }
                    }
                }
            }
        }

        tracing::debug!(
            "Aligned {} vocabulary rows ({} initialised for OOV tokens)",
            vocab.len(),
            oov_rows
        );

        EmbeddingMatrix {
            data,
            rows: vocab.len(),
            dim: self.dim,
            oov_rows,
        }
    }
}

/// How rows for tokens without a pretrained vector are filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OovInit {
    Zero,
    /// Uniform in `[-bound, bound]`
    Uniform(f32),
}

impl Default for OovInit {
    fn default() -> Self {
        OovInit::Uniform(DEFAULT_UNIFORM_BOUND)
    }
}

/// Row-major embedding weights ordered by vocabulary id.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    data:     Vec<f32>,
    rows:     usize,
    dim:      usize,
    oov_rows: usize,
}

impl EmbeddingMatrix {
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.rows).then(|| &self.data[i * self.dim..(i + 1) * self.dim])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows that came from `OovInit` rather than the file
    pub fn oov_rows(&self) -> usize {
        self.oov_rows
    }

    /// Copy the weights into a `[rows, dim]` float tensor.
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let data = TensorData::new(self.data.clone(), [self.rows, self.dim]);
        Tensor::from_data(data, device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::tokenize;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn parse(text: &str) -> Result<EmbeddingTable> {
        EmbeddingTable::parse(Cursor::new(text), Path::new("vectors.txt"))
    }

    #[test]
    fn test_rows_follow_file_order() {
        let table = parse("the 0.1 0.2\n#cat 0.3 0.4\ndog 0.5 0.6\n").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.dim(), 2);
        assert_eq!(table.id("the"), Some(0));
        // Marker character is removed from the token
        assert_eq!(table.id("cat"), Some(1));
        assert_eq!(table.id("#cat"), None);
        assert_eq!(table.vector("dog"), Some(&[0.5f32, 0.6][..]));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = parse("a 1 2\n\n   \nb 3 4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.id("b"), Some(1));
    }

    #[test]
    fn test_trailing_space_is_tolerated() {
        let table = parse("a 1 2 \n").unwrap();
        assert_eq!(table.row(0), Some(&[1.0f32, 2.0][..]));
    }

    #[test]
    fn test_duplicate_token_points_to_latest_row() {
        let table = parse("a 1 1\nb 2 2\na 3 3\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.id("a"), Some(2));
    }

    #[test]
    fn test_dimension_mismatch() {
        match parse("a 1 2 3\nb 1 2\n") {
            Err(DataError::DimensionMismatch { line, expected, found, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected: {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_bad_float_is_malformed() {
        assert!(matches!(
            parse("a 1 x\n"),
            Err(DataError::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_marker_only_token_is_malformed() {
        assert!(matches!(
            parse("a 1 2\n## 3 4\n"),
            Err(DataError::MalformedInput { line: 2, .. })
        ));
    }

    #[test]
    fn test_token_without_vector_is_malformed() {
        assert!(matches!(
            parse("a 1\nlonely\n"),
            Err(DataError::MalformedInput { line: 2, .. })
        ));
    }

    #[test]
    fn test_oov_set() {
        let table  = parse("a 1\nb 2\n").unwrap();
        let corpus = vec![tokenize("a b c"), tokenize("d . a c")];
        let oov    = table.oov(corpus);

        let expected: BTreeSet<String> = ["c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(oov, expected);
        // The table itself is untouched
        assert!(!table.contains("c"));
    }

    #[test]
    fn test_load_with_oov_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("word2vec.sst-1");
        std::fs::write(&path, "good 0.1 0.2\nbad 0.3 0.4\n").unwrap();

        let corpus = ["3 good movie", "1 bad"];
        let (table, oov) =
            EmbeddingTable::load_with_oov(&path, corpus.iter().map(|l| tokenize(l))).unwrap();

        assert_eq!(table.len(), 2);
        let oov: Vec<_> = oov.into_iter().collect();
        assert_eq!(oov, vec!["1", "3", "movie"]);
    }

    #[test]
    fn test_missing_vector_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EmbeddingTable::load(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, DataError::MissingResource(_)));
    }

    #[test]
    fn test_aligned_matrix() {
        let table = parse("b 1 2\nc 3 4\n").unwrap();
        let vocab = Vocabulary::build([vec!["a", "b", "c"]]);
        let mut rng = StdRng::seed_from_u64(7);

        let zeros = table.aligned_to(&vocab, OovInit::Zero, &mut rng);
        assert_eq!(zeros.rows(), 3);
        assert_eq!(zeros.oov_rows(), 1);
        assert_eq!(zeros.row(0), Some(&[0.0f32, 0.0][..]));
        assert_eq!(zeros.row(1), Some(&[1.0f32, 2.0][..]));
        assert_eq!(zeros.row(2), Some(&[3.0f32, 4.0][..]));
        assert_eq!(zeros.row(3), None);

        let uniform = table.aligned_to(&vocab, OovInit::Uniform(0.05), &mut rng);
        let row_a   = uniform.row(0).unwrap();
        assert!(row_a.iter().all(|v| (-0.05..=0.05).contains(v)));
        assert_eq!(uniform.row(2), Some(&[3.0f32, 4.0][..]));
    }

    #[test]
    fn test_matrix_to_tensor() {
        type TestBackend = burn::backend::NdArray;

        let table  = parse("a 1 2\nb 3 4\n").unwrap();
        let vocab  = Vocabulary::build([vec!["a", "b"]]);
        let matrix = table.aligned_to(&vocab, OovInit::Zero, &mut StdRng::seed_from_u64(0));

        let device = Default::default();
        let tensor = matrix.to_tensor::<TestBackend>(&device);
        assert_eq!(tensor.dims(), [2, 2]);

        let values: Vec<f32> = tensor.into_data().to_vec().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
