use ndarray::prelude::*;
use crate::error::{Result, SkipGramError};
use crate::forward::softmax;
use crate::params::ParameterSet;
use crate::vocab::Vocabulary;


/// Queries over a trained parameter set.
pub struct Similarity {
    params: ParameterSet,
    normalized: Array2<f32>, // word embedding with unit l2 rows
    vocab: Vocabulary,
}

impl Similarity {

    pub fn new(params: ParameterSet, vocab: Vocabulary) -> Result<Similarity> {

        params.check_shape(vocab.len(), params.embedding_size())?;

        // normalize so a dot product is the cosine similarity, an all zero row stays zero
        let mut normalized = params.word_embedding.clone();
        for mut row in normalized.axis_iter_mut(Axis(0)) {
            let norm = row.mapv(|a| a.powi(2)).sum().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|a| a / norm);
            }
        }

        Ok(Self { params, normalized, vocab })
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn extract_vec_from_word(&self, token: &str) -> Result<Array1<f32>> {
        let i = self.vocab.word_to_id(token)?;
        Ok(self.params.word_embedding.row(i).to_owned())
    }

    /// Ranks the whole vocabulary by the softmax output for the probe embedding `vec`,
    /// i.e. the most likely context ids of a center word embedded as `vec`.
    pub fn top_k_from_embedding(&self, vec: &Array1<f32>, k: usize) -> Result<Vec<(usize, f32)>> {

        if vec.len() != self.params.embedding_size() {
            return Err(SkipGramError::ShapeMismatch {
                what: "probe embedding",
                expected: (self.params.embedding_size(), 1),
                got: (vec.len(), 1),
            });
        }

        let probe = vec.view().insert_axis(Axis(1)); // (embedding_size, 1)
        let logits = self.params.output_projection.dot(&probe);
        let softmax_out = softmax(&logits);

        Ok(top_k(softmax_out.column(0), k))
    }

    /// The `k` tokens the trained network predicts as most likely context of `token`.
    pub fn top_k_by_softmax(&self, token: &str, k: usize) -> Result<Vec<(String, f32)>> {
        let vec = self.extract_vec_from_word(token)?;
        let ranked = self.top_k_from_embedding(&vec, k)?;
        self.with_tokens(ranked)
    }

    /// Nearest tokens to `vec` by cosine similarity over the word embedding.
    pub fn find_k_most_similar(&self, vec: &Array1<f32>, k: usize) -> Result<Vec<(String, f32)>> {

        if vec.len() != self.params.embedding_size() {
            return Err(SkipGramError::ShapeMismatch {
                what: "query vector",
                expected: (self.params.embedding_size(), 1),
                got: (vec.len(), 1),
            });
        }

        let norm = vec.mapv(|a| a.powi(2)).sum().sqrt();
        let query = if norm > 0.0 { vec / norm } else { vec.to_owned() };
        let scores = self.normalized.dot(&query); // of size vocab_size

        self.with_tokens(top_k(scores.view(), k))
    }

    pub fn extract_analogy_vec(&self, inputs: [&str; 3]) -> Result<Array1<f32>> {

        let a = self.extract_vec_from_word(inputs[0])?;
        let b = self.extract_vec_from_word(inputs[1])?;
        let c = self.extract_vec_from_word(inputs[2])?;
        Ok(b - a + c)
    }

    // a is to b as c is to ?, translates to b - a + c
    pub fn extract_analogies(&self, inputs: [&str; 3], k: usize) -> Result<Vec<(String, f32)>> {
        let analogy = self.extract_analogy_vec(inputs)?;
        self.find_k_most_similar(&analogy, k)
    }

    fn with_tokens(&self, ranked: Vec<(usize, f32)>) -> Result<Vec<(String, f32)>> {
        ranked
        .into_iter()
        .map(|(i, score)| Ok((self.vocab.id_to_word(i)?.to_string(), score)))
        .collect()
    }

}

// sorted by score in descending order, at most k entries
fn top_k(scores: ArrayView1<f32>, k: usize) -> Vec<(usize, f32)> {
    let mut indexed_scores: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed_scores.sort_by(|(_i, s), (_j, t)| t.total_cmp(s));
    indexed_scores.truncate(k);
    indexed_scores
}
