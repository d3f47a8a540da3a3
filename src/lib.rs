// protolda: prototype-seeded LDA topic modeling
//
// This is the library root. Each module corresponds to a stage of a run:
// load a corpus, build and sample the model, write or display the results.

pub mod config;
pub mod corpus;
pub mod model;
pub mod output;

pub use corpus::{Corpus, Document, Vocabulary};
pub use model::error::ModelError;
pub use model::topics::{Hyperparameters, PrototypeTopics};
pub use model::ProtoLda;
