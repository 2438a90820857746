use ndarray::prelude::*;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::{Result, SkipGramError};

const INIT_SCALE: f32 = 0.01;


/// The two trainable matrices, both of shape (vocab_size, embedding_size).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub word_embedding: Array2<f32>,
    pub output_projection: Array2<f32>,
}

impl ParameterSet {

    /// Draws both matrices from a zero-mean gaussian scaled by 0.01.
    pub fn initialize<R: Rng + ?Sized>(vocab_size: usize, embedding_size: usize, rng: &mut R) -> Result<ParameterSet> {

        if vocab_size == 0 || embedding_size == 0 {
            return Err(SkipGramError::InvalidDimension { vocab_size, embedding_size });
        }

        let word_embedding = Array2::<f32>::random_using((vocab_size, embedding_size), StandardNormal, rng) * INIT_SCALE;
        let output_projection = Array2::<f32>::random_using((vocab_size, embedding_size), StandardNormal, rng) * INIT_SCALE;

        assert_eq!(word_embedding.dim(), (vocab_size, embedding_size));
        assert_eq!(output_projection.dim(), (vocab_size, embedding_size));

        Ok(Self { word_embedding, output_projection })
    }

    pub fn vocab_size(&self) -> usize {
        self.word_embedding.nrows()
    }

    pub fn embedding_size(&self) -> usize {
        self.word_embedding.ncols()
    }

    /// Checks that externally supplied matrices fit a vocabulary of `vocab_size` tokens.
    pub fn check_shape(&self, vocab_size: usize, embedding_size: usize) -> Result<()> {

        let expected = (vocab_size, embedding_size);
        if self.word_embedding.dim() != expected {
            return Err(SkipGramError::ShapeMismatch { what: "word_embedding", expected, got: self.word_embedding.dim() });
        }
        if self.output_projection.dim() != expected {
            return Err(SkipGramError::ShapeMismatch { what: "output_projection", expected, got: self.output_projection.dim() });
        }
        Ok(())
    }

    pub fn embedding(&self, id: usize) -> Result<ArrayView1<'_, f32>> {
        if id >= self.vocab_size() {
            return Err(SkipGramError::UnknownId(id));
        }
        Ok(self.word_embedding.row(id))
    }

}


#[cfg(test)]
mod tests {

    use super::ParameterSet;
    use crate::error::SkipGramError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn initialize_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = ParameterSet::initialize(50, 8, &mut rng).unwrap();
        assert_eq!(params.word_embedding.dim(), (50, 8));
        assert_eq!(params.output_projection.dim(), (50, 8));

        // 0.01 scaled standard normal, far away from 5 sigma is practically impossible
        assert!(params.word_embedding.iter().all(|x| x.abs() < 0.05));
        assert!(params.word_embedding.iter().any(|x| *x != 0.0));
        assert_ne!(params.word_embedding, params.output_projection);
    }

    #[test]
    fn seeded_initialize_test() {
        let a = ParameterSet::initialize(10, 4, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = ParameterSet::initialize(10, 4, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_dimension_test() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(ParameterSet::initialize(0, 4, &mut rng), Err(SkipGramError::InvalidDimension { .. })));
        assert!(matches!(ParameterSet::initialize(4, 0, &mut rng), Err(SkipGramError::InvalidDimension { .. })));
    }

    #[test]
    fn check_shape_test() {
        let params = ParameterSet::initialize(6, 3, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(params.check_shape(6, 3).is_ok());
        match params.check_shape(7, 3) {
            Err(SkipGramError::ShapeMismatch { what, expected, got }) => {
                assert_eq!(what, "word_embedding");
                assert_eq!(expected, (7, 3));
                assert_eq!(got, (6, 3));
            },
            other => panic!("unexpected result {:?}", other)
        }
        assert!(params.embedding(5).is_ok());
        assert!(params.embedding(6).is_err());
    }

}
