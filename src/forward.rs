use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use crate::params::ParameterSet;

/// Added to every exponential, so no probability underflows to exactly zero.
pub const SOFTMAX_EPSILON: f32 = 1e-3;


/// Intermediate values of one forward pass, needed by the backward pass of the same batch.
pub struct Cache {
    pub ids: Vec<usize>,
    pub word_vectors: Array2<f32>,      // (embedding_size, m)
    pub output_projection: Array2<f32>, // (vocab_size, embedding_size)
    pub logits: Array2<f32>,            // (vocab_size, m)
}


/// gathers the embedding rows of `ids`, returned as columns of shape (embedding_size, m)
pub fn lookup(ids: &[usize], params: &ParameterSet) -> Array2<f32> {

    let word_vectors = params.word_embedding.select(Axis(0), ids).reversed_axes();
    assert_eq!(word_vectors.dim(), (params.embedding_size(), ids.len()));
    word_vectors
}

/// logits of shape (vocab_size, m)
pub fn linear(word_vectors: &Array2<f32>, params: &ParameterSet) -> Array2<f32> {

    let logits = params.output_projection.dot(word_vectors);
    assert_eq!(logits.dim(), (params.vocab_size(), word_vectors.ncols()));
    logits
}

/// Column-wise softmax. The column max is subtracted before exponentiation, so the
/// largest term of every column is exp(0) and nothing overflows. Every term gets
/// `SOFTMAX_EPSILON` and the denominator is the sum of the smoothed terms, so a column
/// still sums to 1 and, with at least two rows, every entry lies strictly inside (0, 1).
pub fn softmax(logits: &Array2<f32>) -> Array2<f32> {

    let mut softmax_out = logits.to_owned();
    for mut column in softmax_out.axis_iter_mut(Axis(1)) {
        let max = match column.max() {
            Ok(max) if max.is_finite() => *max,
            _ => 0.0
        };
        column.mapv_inplace(|z| (z - max).exp() + SOFTMAX_EPSILON);
        let total = column.sum();
        column.mapv_inplace(|e| e / total);
    }

    assert_eq!(softmax_out.dim(), logits.dim());
    softmax_out
}

/// Runs a batch of center ids through the network, returns the softmax output (vocab_size, m)
/// and the cache for the backward pass.
pub fn forward(ids: &[usize], params: &ParameterSet) -> (Array2<f32>, Cache) {

    let word_vectors = lookup(ids, params);
    let logits = linear(&word_vectors, params);
    let softmax_out = softmax(&logits);

    let cache = Cache {
        ids: ids.to_vec(),
        word_vectors,
        output_projection: params.output_projection.clone(),
        logits,
    };
    (softmax_out, cache)
}
