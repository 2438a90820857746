// imports
use crate::config::{files_handling, Config, Params};
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::pairs::TrainingPairs;
use crate::train::Train;
use crate::vocab::{Corpus, Vocabulary, WordTokenizer};

use std::time::Instant;
use tracing::info;

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure of 3 steps -
    // -> configuration of arguments
    // -> vocabulary and pairs building
    // -> training

    pub fn run(args: &[String]) -> Result<Train> {

        info!("building parameters...");
        let params = Config::new(args)?.get_params();
        info!("{}", params);
        Pipeline::train(&params)
    }

    /// Normalizes and tokenizes the corpus, returns the vocabulary and all its training pairs.
    pub fn prepare(params: &Params) -> Result<(Vocabulary, TrainingPairs)> {

        let normalizer = Normalizer::with_stop_words(&params.stop_words)?.with_min_line_words(params.min_line_words);
        let lines = normalizer.load(&params.corpus_file)?;

        let corpus = Corpus::from_lines(&lines, &WordTokenizer::new()?)?;
        let pairs = TrainingPairs::from_tokens(&corpus.tokens, &corpus.vocab, params.train.window_size)?;

        info!("{} lines, {} tokens, vocabulary of {}, {} pairs", lines.len(), corpus.tokens.len(), corpus.vocab.len(), pairs.len());
        Ok((corpus.vocab, pairs))
    }

    pub fn train(params: &Params) -> Result<Train> {

        let output_dir = params.output_dir.as_str();

        // build the pairs unless a previous run already saved them
        let (vocab, pairs) = if params.saved_pairs.unwrap_or(false) {
            info!("loading saved vocabulary and pairs from {}", output_dir);
            let vocab: Vocabulary = files_handling::read_input(output_dir, files_handling::VOCAB)?;
            let pairs: TrainingPairs = files_handling::read_input(output_dir, files_handling::PAIRS)?;
            (vocab, pairs)
        } else {
            let timer = Instant::now();
            info!("starting vocab building...");
            let (vocab, pairs) = Pipeline::prepare(params)?;
            files_handling::save_output(output_dir, files_handling::VOCAB, &vocab)?;
            files_handling::save_output(output_dir, files_handling::PAIRS, &pairs)?;
            info!("finished creation and saved vocab, took {} seconds ...", timer.elapsed().as_secs());
            (vocab, pairs)
        };

        // train and save the trained weights
        let timer = Instant::now();
        info!("starting training part...");
        let trainer = Train::run(&pairs, vocab.len(), &params.train, None)?;

        files_handling::save_parameters(output_dir, trainer.get_parameters())?;
        files_handling::save_output(output_dir, files_handling::COSTS, &trainer.costs().to_vec())?;
        info!("finished training, saved weights. Took {} seconds ...", timer.elapsed().as_secs());

        Ok(trainer)
    }

}
