// A single document: token ids plus the sampler's per-position topic labels.

/// One document of a corpus.
///
/// `topics` always has the same length as `tokens`. A position is `None`
/// until the sampler assigns it, and stays `None` for tokens the model
/// treats as out of vocabulary.
#[derive(Debug, Clone)]
pub struct Document {
    /// Opaque source id from the first corpus column
    pub source: String,
    tokens: Vec<usize>,
    topics: Vec<Option<usize>>,
    /// Document type ids (second corpus column)
    pub types: Vec<usize>,
    /// Class label ids (third corpus column)
    pub labels: Vec<usize>,
}

impl Document {
    pub fn new(source: impl Into<String>, tokens: Vec<usize>) -> Self {
        let topics = vec![None; tokens.len()];
        Self {
            source: source.into(),
            tokens,
            topics,
            types: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, types: Vec<usize>, labels: Vec<usize>) -> Self {
        self.types = types;
        self.labels = labels;
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[usize] {
        &self.tokens
    }

    pub fn token(&self, position: usize) -> usize {
        self.tokens[position]
    }

    pub fn topics(&self) -> &[Option<usize>] {
        &self.topics
    }

    pub fn topic(&self, position: usize) -> Option<usize> {
        self.topics[position]
    }

    pub fn set_topic(&mut self, position: usize, topic: usize) {
        self.topics[position] = Some(topic);
    }

    pub fn clear_topic(&mut self, position: usize) {
        self.topics[position] = None;
    }
}
