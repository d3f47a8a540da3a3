// Count-commit strategies — the only difference between training and inference.
//
// The sampler reads global counts through `counts()` and reports every
// assignment change through `increment`/`decrement`. Training writes those
// changes into the model; inference drops them, so unseen documents are
// sampled against a frozen model while their own topic mixture still moves.

use super::counts::ModelCounts;

/// How the sampler's assignment changes reach the global counts.
pub trait CountCommit {
    /// The global counts the conditional distribution is computed from.
    fn counts(&self) -> &ModelCounts;

    /// A token of `word` was assigned to `topic`.
    fn increment(&mut self, topic: usize, word: usize);

    /// A token of `word` was removed from `topic`.
    fn decrement(&mut self, topic: usize, word: usize);
}

/// Training regime: commits every change to the shared model counts.
pub struct LearnCommit<'a> {
    counts: &'a mut ModelCounts,
}

impl<'a> LearnCommit<'a> {
    pub fn new(counts: &'a mut ModelCounts) -> Self {
        Self { counts }
    }
}

impl CountCommit for LearnCommit<'_> {
    fn counts(&self) -> &ModelCounts {
        self.counts
    }

    fn increment(&mut self, topic: usize, word: usize) {
        self.counts.increment(topic, word);
    }

    fn decrement(&mut self, topic: usize, word: usize) {
        self.counts.decrement(topic, word);
    }
}

/// Inference regime: reads the trained counts, never writes them.
pub struct InferCommit<'a> {
    counts: &'a ModelCounts,
}

impl<'a> InferCommit<'a> {
    pub fn new(counts: &'a ModelCounts) -> Self {
        Self { counts }
    }
}

impl CountCommit for InferCommit<'_> {
    fn counts(&self) -> &ModelCounts {
        self.counts
    }

    fn increment(&mut self, _topic: usize, _word: usize) {}

    fn decrement(&mut self, _topic: usize, _word: usize) {}
}
