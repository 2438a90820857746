// imports
use crate::error::Result;
use crate::vocab::Vocabulary;

use serde::{Deserialize, Serialize};


/// All (center, context) training pairs of a corpus, kept as two parallel id vectors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingPairs {
    pub centers: Vec<usize>,
    pub contexts: Vec<usize>,
}

impl TrainingPairs {

    /// Slides a window of radius `window_size` over `ids`. Every neighbour of position `i`
    /// yields one `(ids[i], ids[j])` pair, positions near the edges simply have fewer neighbours.
    pub fn generate(ids: &[usize], window_size: usize) -> TrainingPairs {

        let n = ids.len();
        let mut pairs = TrainingPairs::default();

        for i in 0..n {
            let left = i.saturating_sub(window_size)..i;
            let right = (i + 1)..n.min(i + window_size + 1);
            for j in left.chain(right) {
                pairs.centers.push(ids[i]);
                pairs.contexts.push(ids[j]);
            }
        }

        pairs
    }

    /// Maps the tokens through the vocabulary first, an unmapped token is an error.
    pub fn from_tokens(tokens: &[String], vocab: &Vocabulary, window_size: usize) -> Result<TrainingPairs> {
        let ids = vocab.encode(tokens)?;
        Ok(TrainingPairs::generate(&ids, window_size))
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// start offsets of consecutive batches, `[0, batch_size, 2 * batch_size, ...]`
    pub fn batch_offsets(&self, batch_size: usize) -> Vec<usize> {
        (0..self.len()).step_by(batch_size.max(1)).collect()
    }

    /// the contiguous batch starting at `offset`, the last one can be shorter
    pub fn batch(&self, offset: usize, batch_size: usize) -> (&[usize], &[usize]) {
        let end = self.len().min(offset + batch_size);
        (&self.centers[offset..end], &self.contexts[offset..end])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.centers.iter().copied().zip(self.contexts.iter().copied())
    }

}
