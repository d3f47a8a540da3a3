// Corpus handling — vocabulary indices, documents, and the TSV corpus reader.
//
// These are the plain data structures the sampler works over. Words, class
// labels and document types are each interned into their own Vocabulary so
// the model only ever sees dense integer ids.

pub mod document;
pub mod reader;
pub mod vocabulary;

pub use document::Document;
pub use reader::Corpus;
pub use vocabulary::Vocabulary;
