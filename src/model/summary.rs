// Topic summaries — the most probable words of each topic.

use serde::Serialize;

use super::ProtoLda;
use crate::corpus::Vocabulary;

/// A topic with its strongest words, for display or JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub label: String,
    /// Whether this is a word-seeded prototype topic
    pub prototype: bool,
    /// Tokens currently assigned to this topic in the trained model
    pub tokens: u32,
    /// (word, smoothed probability), highest first
    pub top_words: Vec<(String, f64)>,
}

impl ProtoLda {
    /// The `n` most probable word ids of `topic` under the smoothed estimate
    /// `(prior + count) / (betaSum + topicCount)`.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<(usize, f64)> {
        let denominator = self.space.beta_sum() + self.counts.topic_count(topic) as f64;
        let mut scored: Vec<(usize, f64)> = (0..self.space.num_words())
            .map(|word| {
                let mass =
                    self.space.prior(topic, word) + self.counts.word_topic_count(word, topic) as f64;
                (word, mass / denominator)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(n);
        scored
    }

    /// Summaries for every topic, in topic id order.
    pub fn topic_summaries(&self, vocabulary: &Vocabulary, n: usize) -> Vec<TopicSummary> {
        (0..self.space.total_topics())
            .map(|topic| TopicSummary {
                label: self.space.label(topic).to_string(),
                prototype: self.space.is_prototype(topic),
                tokens: self.counts.topic_count(topic),
                top_words: self
                    .top_words(topic, n)
                    .into_iter()
                    .map(|(word, p)| (vocabulary.item(word).unwrap_or("?").to_string(), p))
                    .collect(),
            })
            .collect()
    }
}
