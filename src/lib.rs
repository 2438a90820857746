pub mod error;
pub mod config;
pub mod normalize;
pub mod vocab;
pub mod pairs;
pub mod params;
pub mod forward;
pub mod backward;
pub mod train;
pub mod similarity;
pub mod pipeline;

pub use config::{files_handling, Config, Params, TrainParams};
pub use error::{Result, SkipGramError};
pub use normalize::Normalizer;
pub use pairs::TrainingPairs;
pub use params::ParameterSet;
pub use pipeline::Pipeline;
pub use similarity::Similarity;
pub use train::{Train, TrainState};
pub use vocab::{Corpus, Tokenizer, Vocabulary, WordTokenizer};
