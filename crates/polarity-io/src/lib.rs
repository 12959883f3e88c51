//! Corpus loading, run configuration, and result writing for the polarity pipeline.

mod config;
mod corpus;
mod domain;
mod error;
mod vocabulary;
mod writer;

pub use config::RunConfig;
pub use corpus::CorpusReader;
pub use domain::{DatasetLayout, ExperimentName};
pub use error::IoError;
pub use vocabulary::{VocabularyReader, retain_present};
pub use writer::{CurveRow, ModelReport, ResultWriter};
