// Collapsed Gibbs sampler shared by training and inference.
//
// One algorithm, parameterized by a CountCommit strategy. For each token the
// sampler removes the token's current assignment, computes the conditional
// over all topics from the remaining counts, draws a new topic and commits
// it before moving on. The next token must see the updated counts, so
// positions and documents are strictly sequential.

use rand::distr::Open01;
use rand::rngs::StdRng;
use rand::Rng;

use super::commit::CountCommit;
use super::counts::ModelCounts;
use super::error::ModelError;
use super::topics::TopicSpace;
use crate::corpus::Document;

/// A sampler bound to one topic space, one commit strategy and one RNG.
pub struct Sampler<'a, C: CountCommit> {
    space: &'a TopicSpace,
    commit: C,
    rng: &'a mut StdRng,
    weights: Vec<f64>,
}

impl<'a, C: CountCommit> Sampler<'a, C> {
    pub fn new(space: &'a TopicSpace, commit: C, rng: &'a mut StdRng) -> Self {
        Self {
            space,
            commit,
            rng,
            weights: vec![0.0; space.total_topics()],
        }
    }

    /// Assign a uniformly random topic to every in-vocabulary position.
    ///
    /// Out-of-vocabulary tokens stay unassigned and are never committed.
    pub fn initialize_document(&mut self, document: &mut Document) {
        let total_topics = self.space.total_topics();
        for position in 0..document.len() {
            let word = document.token(position);
            if !self.space.in_vocabulary(word) {
                document.clear_topic(position);
                continue;
            }
            let topic = self.rng.random_range(0..total_topics);
            document.set_topic(position, topic);
            self.commit.increment(topic, word);
        }
    }

    /// One Gibbs sweep over a document.
    pub fn resample_document(&mut self, document: &mut Document) -> Result<(), ModelError> {
        let mut doc_topic_counts = local_topic_counts(document, self.space.total_topics());

        for position in 0..document.len() {
            let word = document.token(position);
            if !self.space.in_vocabulary(word) {
                continue;
            }

            if let Some(old) = document.topic(position) {
                self.commit.decrement(old, word);
                doc_topic_counts[old] -= 1;
            }

            let topic = self.sample(word, &doc_topic_counts)?;

            self.commit.increment(topic, word);
            doc_topic_counts[topic] += 1;
            document.set_topic(position, topic);
        }
        Ok(())
    }

    /// Draw a topic for `word` given the document's current topic counts.
    pub fn sample(&mut self, word: usize, doc_topic_counts: &[u32]) -> Result<usize, ModelError> {
        let mut weights = std::mem::take(&mut self.weights);
        conditional(
            self.space,
            self.commit.counts(),
            word,
            doc_topic_counts,
            &mut weights,
        );
        let u: f64 = self.rng.sample(Open01);
        let drawn = draw_topic(&weights, u);
        self.weights = weights;
        drawn
    }
}

/// Fill `weights` with the unnormalized conditional over all topics.
///
/// Regular topic t:   (alpha + n_dt) * (beta + n_wt) / (betaSum + n_t)
/// Prototype topic t: (alpha + n_dt) * prior[t][w]   / (betaSum + n_t)
pub fn conditional(
    space: &TopicSpace,
    counts: &ModelCounts,
    word: usize,
    doc_topic_counts: &[u32],
    weights: &mut [f64],
) {
    let hyper = space.hyperparameters();
    let beta_sum = space.beta_sum();
    let regular = space.regular_topics();

    for topic in 0..regular {
        weights[topic] = (hyper.alpha + doc_topic_counts[topic] as f64)
            * (hyper.beta + counts.word_topic_count(word, topic) as f64)
            / (beta_sum + counts.topic_count(topic) as f64);
    }
    for offset in 0..space.num_proto_topics() {
        let topic = regular + offset;
        weights[topic] = (hyper.alpha + doc_topic_counts[topic] as f64)
            * space.proto_prior(offset, word)
            / (beta_sum + counts.topic_count(topic) as f64);
    }
}

/// Walk the cumulative weights with `u` in (0, 1) and return the chosen topic.
///
/// Floating-point overshoot past the last weight clamps to the last topic.
/// A total that is not strictly positive (including NaN) is a configuration
/// error.
pub fn draw_topic(weights: &[f64], u: f64) -> Result<usize, ModelError> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return Err(ModelError::NonPositiveWeight { total });
    }

    let mut remaining = u * total;
    for (topic, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return Ok(topic);
        }
    }
    Ok(weights.len() - 1)
}

/// Per-topic counts of a document's currently assigned positions.
pub fn local_topic_counts(document: &Document, total_topics: usize) -> Vec<u32> {
    let mut counts = vec![0u32; total_topics];
    for topic in document.topics().iter().flatten() {
        counts[*topic] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Vocabulary;
    use crate::model::commit::{InferCommit, LearnCommit};
    use crate::model::topics::{Hyperparameters, PrototypeTopics};
    use rand::SeedableRng;

    fn space(regular: usize, num_words: usize) -> TopicSpace {
        let mut vocabulary = Vocabulary::new();
        for w in 0..num_words {
            vocabulary.put(&format!("w{w}"));
        }
        TopicSpace::build(
            regular,
            Hyperparameters::default(),
            &PrototypeTopics::new(),
            &mut vocabulary,
        )
        .unwrap()
    }

    #[test]
    fn test_draw_topic_walks_cumulative_weights() {
        let weights = [1.0, 2.0, 1.0];
        assert_eq!(draw_topic(&weights, 0.1).unwrap(), 0);
        assert_eq!(draw_topic(&weights, 0.25).unwrap(), 0);
        assert_eq!(draw_topic(&weights, 0.5).unwrap(), 1);
        assert_eq!(draw_topic(&weights, 0.9).unwrap(), 2);
    }

    #[test]
    fn test_draw_topic_clamps_overshoot() {
        // u just below 1 with weights that do not sum exactly
        let weights = [0.1, 0.2, 0.3];
        let topic = draw_topic(&weights, 1.0 - f64::EPSILON).unwrap();
        assert_eq!(topic, 2);
    }

    #[test]
    fn test_draw_topic_rejects_zero_total() {
        let err = draw_topic(&[0.0, 0.0], 0.5).unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveWeight { .. }));
    }

    #[test]
    fn test_draw_topic_rejects_nan_total() {
        let err = draw_topic(&[f64::NAN, 1.0], 0.5).unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveWeight { .. }));
    }

    #[test]
    fn test_conditional_matches_formula() {
        let space = space(2, 2);
        let mut counts = ModelCounts::new(2, 2);
        counts.increment(0, 1);
        counts.increment(0, 1);
        counts.increment(1, 0);

        let mut weights = vec![0.0; 2];
        conditional(&space, &counts, 1, &[3, 1], &mut weights);

        let beta_sum = space.beta_sum();
        let expected0 = (0.1 + 3.0) * (0.01 + 2.0) / (beta_sum + 2.0);
        let expected1 = (0.1 + 1.0) * (0.01 + 0.0) / (beta_sum + 1.0);
        assert!((weights[0] - expected0).abs() < 1e-12);
        assert!((weights[1] - expected1).abs() < 1e-12);
    }

    #[test]
    fn test_initialize_commits_each_token() {
        let space = space(3, 2);
        let mut counts = ModelCounts::new(space.num_words(), space.total_topics());
        let mut rng = StdRng::seed_from_u64(7);
        let mut doc = Document::new("d", vec![0, 1, 1, 0, 1]);

        let mut sampler = Sampler::new(&space, LearnCommit::new(&mut counts), &mut rng);
        sampler.initialize_document(&mut doc);

        assert_eq!(counts.total_tokens(), 5);
        assert!(counts.is_consistent());
        assert!(doc.topics().iter().all(|t| matches!(t, Some(t) if *t < 3)));
    }

    #[test]
    fn test_out_of_vocabulary_left_unassigned() {
        let space = space(2, 2);
        let mut counts = ModelCounts::new(space.num_words(), space.total_topics());
        let mut rng = StdRng::seed_from_u64(7);
        // token 5 is past the model's vocabulary bounds
        let mut doc = Document::new("d", vec![0, 5, 1]);

        let mut sampler = Sampler::new(&space, LearnCommit::new(&mut counts), &mut rng);
        sampler.initialize_document(&mut doc);
        assert_eq!(doc.topic(1), None);

        sampler.resample_document(&mut doc).unwrap();
        assert_eq!(doc.topic(1), None);
        assert_eq!(counts.total_tokens(), 2);
    }

    #[test]
    fn test_resample_keeps_local_and_global_totals() {
        let space = space(4, 3);
        let mut counts = ModelCounts::new(space.num_words(), space.total_topics());
        let mut rng = StdRng::seed_from_u64(11);
        let mut doc = Document::new("d", vec![0, 1, 2, 2, 1, 0, 0]);

        let mut sampler = Sampler::new(&space, LearnCommit::new(&mut counts), &mut rng);
        sampler.initialize_document(&mut doc);
        for _ in 0..5 {
            sampler.resample_document(&mut doc).unwrap();
            let local: u32 = local_topic_counts(&doc, 4).iter().sum();
            assert_eq!(local, 7);
        }
        assert_eq!(counts.total_tokens(), 7);
        assert!(counts.is_consistent());
    }

    #[test]
    fn test_infer_sampler_leaves_counts_untouched() {
        let space = space(2, 2);
        let mut counts = ModelCounts::new(space.num_words(), space.total_topics());
        counts.increment(0, 0);
        counts.increment(1, 1);
        let snapshot = counts.clone();
        let mut rng = StdRng::seed_from_u64(3);
        let mut doc = Document::new("u", vec![0, 1, 0]);

        let mut sampler = Sampler::new(&space, InferCommit::new(&counts), &mut rng);
        sampler.initialize_document(&mut doc);
        sampler.resample_document(&mut doc).unwrap();

        assert_eq!(counts, snapshot);
        assert!(doc.topics().iter().all(|t| t.is_some()));
    }

    #[test]
    fn test_zero_hyperparameters_fail_sampling() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.put("a");
        let hyper = Hyperparameters {
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
        };
        let space =
            TopicSpace::build(2, hyper, &PrototypeTopics::new(), &mut vocabulary).unwrap();
        let mut counts = ModelCounts::new(1, 2);
        let mut rng = StdRng::seed_from_u64(1);
        // a lone token leaves every count at zero once it is removed
        let mut doc = Document::new("d", vec![0]);

        let mut sampler = Sampler::new(&space, LearnCommit::new(&mut counts), &mut rng);
        sampler.initialize_document(&mut doc);
        let err = sampler.resample_document(&mut doc).unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveWeight { .. }));
    }
}
