// Corpus container and the tab-separated corpus reader.
//
// Each non-blank line holds four tab-separated fields:
//
//   source \t type,type,... \t label,label,... \t pre-tokenized words
//
// Words are split on whitespace; tokenization is expected to have happened
// upstream. Every new word, label and type is interned as it is seen.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::document::Document;
use super::vocabulary::Vocabulary;

/// An ordered collection of documents plus the indices their ids refer to.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: Vocabulary,
    labels: Vocabulary,
    types: Vocabulary,
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a corpus that shares word ids with an existing vocabulary.
    ///
    /// Used for unseen documents: words already known to a trained model keep
    /// their ids, and new words get ids past the model's vocabulary bounds.
    pub fn with_vocabulary(words: Vocabulary) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    /// Read a corpus file, appending its documents to this corpus.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open corpus file {}", path.display()))?;
        let added = self
            .read_from(BufReader::new(file))
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;

        info!(
            path = %path.display(),
            documents = added,
            vocabulary = self.words.len(),
            "Loaded corpus"
        );
        Ok(added)
    }

    /// Read corpus lines from any buffered reader. Returns the number of
    /// documents added.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document = self.parse_line(&line, index + 1)?;
            self.documents.push(document);
            added += 1;
        }
        Ok(added)
    }

    fn parse_line(&mut self, line: &str, line_number: usize) -> Result<Document> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            anyhow::bail!(
                "Malformed corpus line {line_number}: expected 4 tab-separated fields, found {}",
                fields.len()
            );
        }

        let types = intern_list(&mut self.types, fields[1]);
        let labels = intern_list(&mut self.labels, fields[2]);
        let tokens: Vec<usize> = fields[3]
            .split_whitespace()
            .map(|word| self.words.put(word))
            .collect();

        Ok(Document::new(fields[0], tokens).with_metadata(types, labels))
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Document> {
        self.documents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn words(&self) -> &Vocabulary {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut Vocabulary {
        &mut self.words
    }

    pub fn labels(&self) -> &Vocabulary {
        &self.labels
    }

    pub fn types(&self) -> &Vocabulary {
        &self.types
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    /// Give up the word vocabulary, e.g. to seed an unseen-document corpus.
    pub fn into_vocabulary(self) -> Vocabulary {
        self.words
    }
}

/// Intern a comma-separated field, ignoring empty entries.
fn intern_list(index: &mut Vocabulary, field: &str) -> Vec<usize> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| index.put(s))
        .collect()
}
