use ndarray::prelude::*;
use crate::forward::Cache;

/// Keeps `ln` finite when a predicted probability underflows to zero.
pub const LOG_EPSILON: f32 = 1e-3;

// `p + LOG_EPSILON` is capped at 1 so a confident, correct prediction costs 0, never less
fn smoothed_ln(p: f32) -> f32 {
    (p + LOG_EPSILON).min(1.0).ln()
}


pub struct Gradients {
    pub dl_dz: Array2<f32>,             // (vocab_size, m)
    pub dl_doutput: Array2<f32>,        // (vocab_size, embedding_size)
    pub dl_dword_vectors: Array2<f32>,  // (embedding_size, m)
}


/// One-hot label matrix of shape (vocab_size, m), column `k` marks `contexts[k]`.
pub fn one_hot(contexts: &[usize], vocab_size: usize) -> Array2<f32> {

    let mut labels = Array2::<f32>::zeros((vocab_size, contexts.len()));
    for (k, context) in contexts.iter().enumerate() {
        labels[[*context, k]] = 1.0;
    }
    labels
}

/// Mean cross entropy of a batch, `-(1/m) * sum(Y * ln(min(softmax_out + eps, 1)))`, never negative.
pub fn cross_entropy(softmax_out: &Array2<f32>, labels: &Array2<f32>) -> f32 {

    assert_eq!(softmax_out.dim(), labels.dim());
    let m = softmax_out.ncols() as f32;
    let log_probs = softmax_out.mapv(smoothed_ln);
    -(labels * &log_probs).sum() / m
}

/// gradient of the loss with respect to the logits, softmax and cross entropy folded together
pub fn softmax_backward(labels: &Array2<f32>, softmax_out: &Array2<f32>) -> Array2<f32> {

    let dl_dz = softmax_out - labels;
    assert_eq!(dl_dz.dim(), softmax_out.dim());
    dl_dz
}

pub fn dense_backward(dl_dz: &Array2<f32>, cache: &Cache) -> (Array2<f32>, Array2<f32>) {

    let m = cache.word_vectors.ncols() as f32;

    // batch averaged, the embedding gradient is left per sample
    let dl_doutput = dl_dz.dot(&cache.word_vectors.t()) / m;
    let dl_dword_vectors = cache.output_projection.t().dot(dl_dz);

    assert_eq!(dl_doutput.dim(), cache.output_projection.dim());
    assert_eq!(dl_dword_vectors.dim(), cache.word_vectors.dim());

    (dl_doutput, dl_dword_vectors)
}

pub fn backward(labels: &Array2<f32>, softmax_out: &Array2<f32>, cache: &Cache) -> Gradients {

    let dl_dz = softmax_backward(labels, softmax_out);
    let (dl_doutput, dl_dword_vectors) = dense_backward(&dl_dz, cache);

    Gradients { dl_dz, dl_doutput, dl_dword_vectors }
}
