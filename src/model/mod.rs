// Prototype-seeded LDA — topic space, count matrices and the Gibbs driver.
//
// `ProtoLda` owns the frozen topic space and the mutable global counts.
// `train` samples with a LearnCommit so every assignment change lands in the
// counts; `infer` samples unseen documents with an InferCommit against the
// trained counts, which it can only borrow immutably.

pub mod commit;
pub mod counts;
pub mod distribution;
pub mod error;
pub mod sampler;
pub mod summary;
pub mod topics;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::corpus::Corpus;
use commit::{CountCommit, InferCommit, LearnCommit};
use counts::ModelCounts;
use error::ModelError;
use sampler::Sampler;
use topics::{Hyperparameters, PrototypeTopics, TopicSpace};

/// Seed used when the caller has no preference.
pub const DEFAULT_SEED: u64 = 20;

/// A prototype LDA model: regular topics plus word-seeded prototype topics.
pub struct ProtoLda {
    space: TopicSpace,
    counts: ModelCounts,
    rng: StdRng,
    trained: bool,
}

impl ProtoLda {
    /// Build the topic space over the training corpus vocabulary.
    ///
    /// Seed words are registered into `corpus`'s vocabulary, and the model's
    /// vocabulary bound is fixed at the resulting size.
    pub fn new(
        regular_topics: usize,
        hyper: Hyperparameters,
        corpus: &mut Corpus,
        prototypes: &PrototypeTopics,
        seed: u64,
    ) -> Result<Self, ModelError> {
        let space = TopicSpace::build(regular_topics, hyper, prototypes, corpus.words_mut())?;
        let counts = ModelCounts::new(space.num_words(), space.total_topics());

        info!(
            regular_topics,
            prototype_topics = space.num_proto_topics(),
            vocabulary = space.num_words(),
            alpha = hyper.alpha,
            beta = hyper.beta,
            gamma = hyper.gamma,
            "Model constructed"
        );

        Ok(Self {
            space,
            counts,
            rng: StdRng::seed_from_u64(seed),
            trained: false,
        })
    }

    /// Learn topic assignments for `corpus`, replacing any earlier counts.
    pub fn train(&mut self, iterations: usize, corpus: &mut Corpus) -> Result<(), ModelError> {
        self.trained = false;
        self.counts = ModelCounts::new(self.space.num_words(), self.space.total_topics());

        let sampler = Sampler::new(
            &self.space,
            LearnCommit::new(&mut self.counts),
            &mut self.rng,
        );
        run_sampler(sampler, iterations, corpus, "train")?;

        self.trained = true;
        info!(
            iterations,
            tokens = self.counts.total_tokens(),
            "Training finished"
        );
        Ok(())
    }

    /// Sample topic assignments for unseen documents against the trained
    /// model. Global counts are left exactly as training produced them.
    pub fn infer(&mut self, iterations: usize, corpus: &mut Corpus) -> Result<(), ModelError> {
        if !self.trained {
            return Err(ModelError::NotTrained);
        }

        let sampler = Sampler::new(&self.space, InferCommit::new(&self.counts), &mut self.rng);
        run_sampler(sampler, iterations, corpus, "infer")?;

        info!(iterations, documents = corpus.len(), "Inference finished");
        Ok(())
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn counts(&self) -> &ModelCounts {
        &self.counts
    }

    pub fn topic_space(&self) -> &TopicSpace {
        &self.space
    }
}

/// Initialize every document once, then sweep the corpus `iterations` times
/// in corpus order.
fn run_sampler<C: CountCommit>(
    mut sampler: Sampler<'_, C>,
    iterations: usize,
    corpus: &mut Corpus,
    regime: &str,
) -> Result<(), ModelError> {
    for document in corpus.iter_mut() {
        sampler.initialize_document(document);
    }
    info!(regime, documents = corpus.len(), "Sampler initialized");

    for iteration in 1..=iterations {
        debug!(regime, iteration, "Sampling iteration started");
        for document in corpus.iter_mut() {
            sampler.resample_document(document)?;
        }
    }
    Ok(())
}
