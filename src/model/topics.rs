// Topic space — regular topics followed by prototype topics, plus the
// asymmetric prior that pulls each prototype topic toward its seed words.
//
// Ids [0, regular) are unsupervised topics with a symmetric beta prior.
// Ids [regular, total) are prototype topics, one per configured name, in
// name order. A prototype topic's prior is beta + gamma on its own seed
// words and plain beta everywhere else.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ModelError;
use crate::corpus::Vocabulary;

/// Prototype topic name -> seed words. Sorted by name, which fixes the
/// prototype topic ids.
pub type PrototypeTopics = BTreeMap<String, Vec<String>>;

/// Fixed smoothing hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Document-topic smoothing
    pub alpha: f64,
    /// Symmetric topic-word smoothing (baseline for prototype topics too)
    pub beta: f64,
    /// Extra prior mass on a prototype topic's own seed words
    pub gamma: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.01,
            gamma: 1.0,
        }
    }
}

/// The combined topic space, built once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TopicSpace {
    hyper: Hyperparameters,
    regular_topics: usize,
    num_words: usize,
    beta_sum: f64,
    labels: Vec<String>,
    /// [prototype offset][word id]
    proto_prior: Vec<Vec<f64>>,
}

impl TopicSpace {
    /// Build the topic space and register every seed word into `vocabulary`.
    ///
    /// Seed words are added before the prior matrix is sized, so a seed word
    /// that never occurs in the training corpus still gets a column and
    /// later lookups cannot miss.
    pub fn build(
        regular_topics: usize,
        hyper: Hyperparameters,
        prototypes: &PrototypeTopics,
        vocabulary: &mut Vocabulary,
    ) -> Result<Self, ModelError> {
        if regular_topics + prototypes.len() == 0 {
            return Err(ModelError::NoTopics);
        }

        let mut labels: Vec<String> = (0..regular_topics).map(regular_label).collect();
        for name in prototypes.keys() {
            if labels.iter().any(|l| l == name) {
                return Err(ModelError::TopicLabelCollision(name.clone()));
            }
            labels.push(name.clone());
        }

        // Register seeds first; the set of seed ids per topic dedupes repeats.
        let seed_ids: Vec<BTreeSet<usize>> = prototypes
            .values()
            .map(|words| words.iter().map(|w| vocabulary.put(w)).collect())
            .collect();
        let distinct_seeds: BTreeSet<usize> = seed_ids.iter().flatten().copied().collect();

        let num_words = vocabulary.len();
        let proto_prior: Vec<Vec<f64>> = seed_ids
            .iter()
            .map(|seeds| {
                let mut row = vec![hyper.beta; num_words];
                for &word in seeds {
                    row[word] = hyper.beta + hyper.gamma;
                }
                row
            })
            .collect();

        let beta_sum = num_words as f64 * hyper.beta + hyper.gamma * distinct_seeds.len() as f64;

        debug!(
            regular_topics,
            prototype_topics = prototypes.len(),
            num_words,
            seed_words = distinct_seeds.len(),
            beta_sum,
            "Built topic space"
        );

        Ok(Self {
            hyper,
            regular_topics,
            num_words,
            beta_sum,
            labels,
            proto_prior,
        })
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    pub fn total_topics(&self) -> usize {
        self.labels.len()
    }

    pub fn regular_topics(&self) -> usize {
        self.regular_topics
    }

    pub fn num_proto_topics(&self) -> usize {
        self.proto_prior.len()
    }

    /// Vocabulary size the count matrices are sized for. Token ids at or
    /// above this bound are out of vocabulary for the model.
    pub fn num_words(&self) -> usize {
        self.num_words
    }

    pub fn in_vocabulary(&self, word: usize) -> bool {
        word < self.num_words
    }

    pub fn beta_sum(&self) -> f64 {
        self.beta_sum
    }

    pub fn is_prototype(&self, topic: usize) -> bool {
        topic >= self.regular_topics && topic < self.total_topics()
    }

    /// Prior for prototype topic `offset` (0-based among prototypes) and `word`.
    pub fn proto_prior(&self, offset: usize, word: usize) -> f64 {
        self.proto_prior[offset][word]
    }

    /// Topic-word prior for any global topic id.
    pub fn prior(&self, topic: usize, word: usize) -> f64 {
        if topic < self.regular_topics {
            self.hyper.beta
        } else {
            self.proto_prior[topic - self.regular_topics][word]
        }
    }

    pub fn label(&self, topic: usize) -> &str {
        &self.labels[topic]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn topic_id(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

fn regular_label(topic: usize) -> String {
    format!("topic-{topic}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> Vocabulary {
        let mut v = Vocabulary::new();
        for w in words {
            v.put(w);
        }
        v
    }

    #[test]
    fn test_prototype_row_boosts_seeds_only() {
        let mut vocabulary = vocab(&["apple", "car", "banana", "road"]);
        let mut protos = PrototypeTopics::new();
        protos.insert(
            "T1".to_string(),
            vec!["apple".to_string(), "banana".to_string()],
        );
        let hyper = Hyperparameters {
            alpha: 0.1,
            beta: 0.01,
            gamma: 1.0,
        };

        let space = TopicSpace::build(2, hyper, &protos, &mut vocabulary).unwrap();

        assert_eq!(space.total_topics(), 3);
        let t1 = space.topic_id("T1").unwrap();
        assert_eq!(t1, 2);
        let offset = t1 - space.regular_topics();
        for (word, item) in vocabulary.iter() {
            let expected = if item == "apple" || item == "banana" {
                0.01 + 1.0
            } else {
                0.01
            };
            assert_eq!(space.proto_prior(offset, word), expected, "word {item}");
        }
    }

    #[test]
    fn test_seed_words_registered_in_vocabulary() {
        let mut vocabulary = vocab(&["apple"]);
        let mut protos = PrototypeTopics::new();
        protos.insert("fruit".to_string(), vec!["apple".to_string(), "kiwi".to_string()]);

        let space = TopicSpace::build(1, Hyperparameters::default(), &protos, &mut vocabulary)
            .unwrap();

        assert_eq!(vocabulary.id("kiwi"), Some(1));
        assert_eq!(space.num_words(), 2);
    }

    #[test]
    fn test_beta_sum_counts_distinct_seeds() {
        let mut vocabulary = vocab(&["a", "b", "c"]);
        let mut protos = PrototypeTopics::new();
        protos.insert("x".to_string(), vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        protos.insert("y".to_string(), vec!["b".to_string()]);
        let hyper = Hyperparameters {
            alpha: 0.1,
            beta: 0.5,
            gamma: 2.0,
        };

        let space = TopicSpace::build(0, hyper, &protos, &mut vocabulary).unwrap();

        // 3 words * 0.5 + 2.0 * |{a, b}|
        assert!((space.beta_sum() - 5.5).abs() < 1e-12);
        // duplicate seed does not add gamma twice
        assert!((space.proto_prior(0, 0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_prototype_ids_follow_name_order() {
        let mut vocabulary = Vocabulary::new();
        let mut protos = PrototypeTopics::new();
        protos.insert("zebra".to_string(), vec!["z".to_string()]);
        protos.insert("alpha".to_string(), vec!["a".to_string()]);

        let space =
            TopicSpace::build(1, Hyperparameters::default(), &protos, &mut vocabulary).unwrap();

        assert_eq!(space.labels(), &["topic-0", "alpha", "zebra"]);
        assert!(space.is_prototype(1));
        assert!(!space.is_prototype(0));
    }

    #[test]
    fn test_empty_topic_space_rejected() {
        let mut vocabulary = vocab(&["a"]);
        let err = TopicSpace::build(
            0,
            Hyperparameters::default(),
            &PrototypeTopics::new(),
            &mut vocabulary,
        )
        .unwrap_err();
        assert_eq!(err, ModelError::NoTopics);
    }

    #[test]
    fn test_label_collision_rejected() {
        let mut vocabulary = Vocabulary::new();
        let mut protos = PrototypeTopics::new();
        protos.insert("topic-1".to_string(), vec!["a".to_string()]);
        let err = TopicSpace::build(2, Hyperparameters::default(), &protos, &mut vocabulary)
            .unwrap_err();
        assert_eq!(err, ModelError::TopicLabelCollision("topic-1".to_string()));
    }
}
