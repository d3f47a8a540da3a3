// Global count matrices — the sufficient statistics of the collapsed sampler.

/// Per-topic and per-word-per-topic token counts.
///
/// Column sums of `word_topic` always equal `topic`; every mutation goes
/// through `increment`/`decrement`, which touch both in lockstep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCounts {
    topic: Vec<u32>,
    word_topic: Vec<Vec<u32>>,
}

impl ModelCounts {
    pub fn new(num_words: usize, total_topics: usize) -> Self {
        Self {
            topic: vec![0; total_topics],
            word_topic: vec![vec![0; total_topics]; num_words],
        }
    }

    pub fn increment(&mut self, topic: usize, word: usize) {
        self.topic[topic] += 1;
        self.word_topic[word][topic] += 1;
    }

    pub fn decrement(&mut self, topic: usize, word: usize) {
        self.topic[topic] -= 1;
        self.word_topic[word][topic] -= 1;
    }

    pub fn topic_count(&self, topic: usize) -> u32 {
        self.topic[topic]
    }

    pub fn word_topic_count(&self, word: usize, topic: usize) -> u32 {
        self.word_topic[word][topic]
    }

    pub fn topic_counts(&self) -> &[u32] {
        &self.topic
    }

    pub fn num_words(&self) -> usize {
        self.word_topic.len()
    }

    /// Tokens currently assigned across all topics.
    pub fn total_tokens(&self) -> u64 {
        self.topic.iter().map(|&c| c as u64).sum()
    }

    /// Check that every topic total equals the sum of its word counts.
    pub fn is_consistent(&self) -> bool {
        (0..self.topic.len()).all(|t| {
            let column: u64 = self.word_topic.iter().map(|row| row[t] as u64).sum();
            column == self.topic[t] as u64
        })
    }
}
