use ndarray::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::ops::SubAssign;
use std::time::Instant;
use tracing::{debug, info};
use crate::backward::{self, Gradients, one_hot};
use crate::config::TrainParams;
use crate::error::{Result, SkipGramError};
use crate::forward::{self, Cache};
use crate::pairs::TrainingPairs;
use crate::params::ParameterSet;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainState {
    Idle,
    Epoch(usize),
    Batching,
    Updated,
    Done,
}

pub struct Train {
    params: ParameterSet,
    learning_rate: f32,
    state: TrainState,
    costs: Vec<f32>,          // summed batch cost of every finished epoch
    learning_rates: Vec<f32>, // the rate each epoch was trained with
    rng: StdRng,
}

struct DisplayProgress {
    epoch_cost: f32,    // sum of the batch costs of the current epoch
    n_batches: usize,   // batches seen in the current epoch
    print_every: usize, // epochs between two cost reports
}

impl DisplayProgress {

    fn new(epochs: usize) -> Self {
        Self {
            epoch_cost: 0.0,
            n_batches: 0,
            print_every: (epochs / 500).max(1),
        }
    }

    fn reset(&mut self) {
        self.epoch_cost = 0.0;
        self.n_batches = 0;
    }

    fn add(&mut self, batch_cost: f32) {
        self.epoch_cost += batch_cost;
        self.n_batches += 1;
    }

}


/// Plain SGD step. Embedding rows are scatter-subtracted one sample at a time, so a center
/// id showing up several times in a batch receives the sum of its updates.
pub fn update_parameters(params: &mut ParameterSet, cache: &Cache, grads: &Gradients, learning_rate: f32) {

    assert_eq!(grads.dl_dword_vectors.dim(), (params.embedding_size(), cache.ids.len()));
    assert_eq!(grads.dl_doutput.dim(), params.output_projection.dim());

    let dw_update: Array2<f32> = learning_rate * &grads.dl_dword_vectors;
    for (k, id) in cache.ids.iter().enumerate() {
        params.word_embedding.slice_mut(s![*id, ..]).sub_assign(&dw_update.slice(s![.., k]));
    }

    params.output_projection.scaled_add(-learning_rate, &grads.dl_doutput);
}


impl Train {

    pub fn new(vocab_size: usize, train_params: &TrainParams) -> Result<Train> {

        let mut rng = seeded_rng(train_params.seed);
        let params = ParameterSet::initialize(vocab_size, train_params.embedding_size, &mut rng)?;
        Ok(Train::from_parts(params, train_params, rng))
    }

    /// Continues training from externally supplied parameters.
    pub fn with_parameters(params: ParameterSet, vocab_size: usize, train_params: &TrainParams) -> Result<Train> {

        params.check_shape(vocab_size, train_params.embedding_size)?;
        let rng = seeded_rng(train_params.seed);
        Ok(Train::from_parts(params, train_params, rng))
    }

    fn from_parts(params: ParameterSet, train_params: &TrainParams, rng: StdRng) -> Train {
        Self {
            params,
            learning_rate: train_params.learning_rate,
            state: TrainState::Idle,
            costs: Vec::new(),
            learning_rates: Vec::new(),
            rng,
        }
    }

    pub fn get_parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn into_parameters(self) -> ParameterSet {
        self.params
    }

    pub fn costs(&self) -> &[f32] {
        &self.costs
    }

    pub fn learning_rates(&self) -> &[f32] {
        &self.learning_rates
    }

    /// the rate the next update will use
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn state(&self) -> TrainState {
        self.state
    }

    /// Forward, backward and update on one batch, returns the batch cross entropy.
    fn step(&mut self, centers: &[usize], contexts: &[usize]) -> f32 {

        let labels = one_hot(contexts, self.params.vocab_size());
        let (softmax_out, cache) = forward::forward(centers, &self.params);
        let grads = backward::backward(&labels, &softmax_out, &cache);
        update_parameters(&mut self.params, &cache, &grads, self.learning_rate);
        backward::cross_entropy(&softmax_out, &labels)
    }

    fn do_training_epoch(&mut self,
        pairs: &TrainingPairs,
        train_params: &TrainParams,
        progress_params: &mut DisplayProgress,
    ) {

        let batch_size = train_params.batch_size;

        // shuffle which batch goes first, the batches themselves stay contiguous
        let mut batch_offsets = pairs.batch_offsets(batch_size);
        batch_offsets.shuffle(&mut self.rng);

        for offset in batch_offsets {
            self.state = TrainState::Batching;
            let (centers, contexts) = pairs.batch(offset, batch_size);
            let batch_cost = self.step(centers, contexts);
            progress_params.add(batch_cost);
            self.state = TrainState::Updated;
        }

        debug!("epoch went through {} batches", progress_params.n_batches);
    }

    fn train(&mut self, pairs: &TrainingPairs, train_params: &TrainParams) -> Result<()> {

        let epochs = train_params.epochs;
        let decay_every = epochs / 100;
        let mut progress_params = DisplayProgress::new(epochs);
        let timer = Instant::now();

        for epoch in 0..epochs {

            self.state = TrainState::Epoch(epoch);
            progress_params.reset();
            self.learning_rates.push(self.learning_rate);

            self.do_training_epoch(pairs, train_params, &mut progress_params);

            let epoch_cost = progress_params.epoch_cost;
            if !epoch_cost.is_finite() {
                return Err(SkipGramError::NonFiniteLoss { epoch, cost: epoch_cost });
            }
            self.costs.push(epoch_cost);

            if train_params.print_cost && epoch % progress_params.print_every == 0 {
                info!("cost after epoch {}: {}, learning rate: {}", epoch, epoch_cost, self.learning_rate);
            }

            // less than 100 epochs keep a constant rate
            if decay_every > 0 && (epoch + 1) % decay_every == 0 {
                self.learning_rate *= train_params.decay_rate;
            }
        }

        self.state = TrainState::Done;
        info!("finished {} epochs over {} pairs, took {} seconds...", epochs, pairs.len(), timer.elapsed().as_secs());
        Ok(())
    }

    /// Trains fresh parameters, or `parameters` when given, over all the pairs.
    pub fn run(pairs: &TrainingPairs, vocab_size: usize, train_params: &TrainParams, parameters: Option<ParameterSet>) -> Result<Train> {

        train_params.validate()?;
        if let Some(id) = pairs.iter().map(|(c, x)| c.max(x)).find(|id| *id >= vocab_size) {
            return Err(SkipGramError::UnknownId(id));
        }

        let mut trainer = match parameters {
            Some(params) => Train::with_parameters(params, vocab_size, train_params)?,
            None => Train::new(vocab_size, train_params)?
        };
        trainer.train(pairs, train_params)?;
        Ok(trainer)
    }

}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy()
    }
}
