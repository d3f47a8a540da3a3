// Per-document topic proportions and the distribution file writer.
//
// Output format:
//
//   source\ttopic:proportion...
//   <source>\t<label> <proportion> <label> <proportion> ...
//
// Pairs are in descending proportion order and stop at the first zero.
// A document with no in-vocabulary tokens has no proportions; its line is
// the source followed by a tab and nothing else.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::ProtoLda;
use crate::corpus::{Corpus, Document};

const HEADER: &str = "source\ttopic:proportion...";

impl ProtoLda {
    /// Topic proportions for one document, highest first, zeros dropped.
    ///
    /// Each proportion is `(smooth + count) / len`, where `len` counts the
    /// document's assigned in-vocabulary tokens. Returns an empty list when
    /// `len` is zero.
    pub fn topic_distribution(&self, document: &Document, smooth: f64) -> Vec<(usize, f64)> {
        let total_topics = self.space.total_topics();
        let mut counts = vec![0u32; total_topics];
        let mut doc_len = 0usize;

        for (position, &word) in document.tokens().iter().enumerate() {
            if !self.space.in_vocabulary(word) {
                continue;
            }
            if let Some(topic) = document.topic(position) {
                counts[topic] += 1;
                doc_len += 1;
            }
        }

        if doc_len == 0 {
            return Vec::new();
        }

        let mut proportions: Vec<(usize, f64)> = counts
            .iter()
            .enumerate()
            .map(|(topic, &count)| (topic, (smooth + count as f64) / doc_len as f64))
            .collect();
        // Stable sort keeps ties in topic id order
        proportions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        proportions
            .into_iter()
            .take_while(|&(_, p)| p > 0.0)
            .collect()
    }

    /// Write the topic distribution of every document in `corpus`.
    pub fn write_distributions<W: Write>(
        &self,
        mut writer: W,
        corpus: &Corpus,
        smooth: f64,
    ) -> Result<()> {
        writeln!(writer, "{HEADER}")?;
        for document in corpus.iter() {
            let pairs: Vec<String> = self
                .topic_distribution(document, smooth)
                .into_iter()
                .map(|(topic, p)| format!("{} {}", self.space.label(topic), p))
                .collect();
            writeln!(writer, "{}\t{}", document.source, pairs.join(" "))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the distributions to a file, creating or truncating it.
    pub fn write_distributions_to_path(
        &self,
        path: impl AsRef<Path>,
        corpus: &Corpus,
        smooth: f64,
    ) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create distribution file {}", path.display()))?;
        self.write_distributions(BufWriter::new(file), corpus, smooth)
            .with_context(|| format!("Failed to write distribution file {}", path.display()))?;

        info!(path = %path.display(), documents = corpus.len(), "Wrote topic distributions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::topics::{Hyperparameters, PrototypeTopics};

    fn trained_model(corpus: &mut Corpus) -> ProtoLda {
        let mut model = ProtoLda::new(
            3,
            Hyperparameters::default(),
            corpus,
            &PrototypeTopics::new(),
            20,
        )
        .unwrap();
        model.train(3, corpus).unwrap();
        model
    }

    #[test]
    fn test_distribution_sums_to_one_without_smoothing() {
        let mut corpus = Corpus::new();
        let ids: Vec<usize> = ["x", "y", "z", "x", "y"]
            .iter()
            .map(|w| corpus.words_mut().put(w))
            .collect();
        corpus.push(Document::new("d1", ids));
        let model = trained_model(&mut corpus);

        let dist = model.topic_distribution(&corpus.documents()[0], 0.0);
        let sum: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
        assert!(dist.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(dist.iter().all(|&(_, p)| p > 0.0));
    }

    #[test]
    fn test_smoothing_keeps_every_topic() {
        let mut corpus = Corpus::new();
        let a = corpus.words_mut().put("a");
        corpus.push(Document::new("d1", vec![a, a]));
        let model = trained_model(&mut corpus);

        let dist = model.topic_distribution(&corpus.documents()[0], 0.5);
        assert_eq!(dist.len(), 3);
    }

    #[test]
    fn test_write_format() {
        let mut corpus = Corpus::new();
        let a = corpus.words_mut().put("a");
        corpus.push(Document::new("doc-1", vec![a, a, a]));
        let model = trained_model(&mut corpus);

        let mut out = Vec::new();
        model.write_distributions(&mut out, &corpus, 0.0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "source\ttopic:proportion...");
        assert!(lines[1].starts_with("doc-1\ttopic-"), "got: {}", lines[1]);
        assert!(text.ends_with('\n'));
    }
}
