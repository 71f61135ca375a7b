use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::paired::Example;

/// Paired examples in file order, with the field used as a
/// batching sort key. Storage order never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDataset {
    name:       String,
    examples:   Vec<Example>,
    sort_field: String,
}

impl PairDataset {
    pub fn new(
        name:       impl Into<String>,
        examples:   Vec<Example>,
        sort_field: impl Into<String>,
    ) -> Self {
        Self {
            name:       name.into(),
            examples,
            sort_field: sort_field.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sort_field(&self) -> &str {
        &self.sort_field
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn sample_count(&self) -> usize {
        self.examples.len()
    }

    /// Length of the sort field for example `index`.
    pub fn sort_key(&self, index: usize) -> Option<usize> {
        self.examples.get(index)?.len_of(&self.sort_field)
    }

    /// Example indices ordered by sort key, ties kept in file order.
    /// A batcher can walk this to group examples of similar length.
    pub fn indices_by_sort_key(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.examples.len()).collect();
        indices.sort_by_key(|&i| self.sort_key(i).unwrap_or(0));
        indices
    }

    /// Token lists of the named fields across all examples,
    /// ready to feed `Vocabulary::build`.
    pub fn token_streams<'a>(
        &'a self,
        fields: &'a [&'a str],
    ) -> impl Iterator<Item = &'a [String]> + 'a {
        self.examples
            .iter()
            .flat_map(move |ex| fields.iter().filter_map(move |f| ex.tokens(f)))
    }
}

impl Dataset<Example> for PairDataset {
    fn get(&self, index: usize) -> Option<Example> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}
