use ndarray_npy::{ReadNpyError, WriteNpyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkipGramError {
    #[error("corpus yields no tokens")]
    EmptyCorpus,

    #[error("invalid dimensions: vocab_size {vocab_size}, embedding_size {embedding_size}")]
    InvalidDimension { vocab_size: usize, embedding_size: usize },

    #[error("{what} shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("token '{0}' is not in the vocabulary")]
    UnknownToken(String),

    #[error("token id {0} is out of the vocabulary range")]
    UnknownId(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("epoch {epoch} ended with a non-finite cost {cost}")]
    NonFiniteLoss { epoch: usize, cost: f32 },

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read npy file: {0}")]
    ReadNpy(#[from] ReadNpyError),

    #[error("could not write npy file: {0}")]
    WriteNpy(#[from] WriteNpyError),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, SkipGramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = SkipGramError::UnknownToken("zebra".into());
        assert_eq!(e.to_string(), "token 'zebra' is not in the vocabulary");

        let e = SkipGramError::InvalidDimension { vocab_size: 0, embedding_size: 4 };
        assert_eq!(e.to_string(), "invalid dimensions: vocab_size 0, embedding_size 4");

        let e = SkipGramError::ShapeMismatch { what: "word_embedding", expected: (3, 4), got: (3, 5) };
        assert_eq!(e.to_string(), "word_embedding shape mismatch: expected (3, 4), got (3, 5)");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: SkipGramError = io.into();
        assert!(matches!(e, SkipGramError::Io(_)));
    }
}
