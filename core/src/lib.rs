//! In-memory information retrieval over a fixed document collection.
//!
//! - [`index`]: presence-only inverted index and vocabulary
//! - [`boolean`]: left-to-right AND/OR/NOT queries over the index
//! - [`vector`]: TF-IDF vectors ranked by dot product
//! - [`spelling`]: Levenshtein correction against the index vocabulary
//! - [`link_rank`]: damped random-walk scores over a directed graph
//! - [`eval`]: precision, recall and F1 for a retrieved set

pub mod boolean;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod eval;
pub mod index;
pub mod link_rank;
pub mod spelling;
pub mod tokenizer;
pub mod vector;

pub use config::EngineConfig;
pub use corpus::{Corpus, DocId, Document};
pub use engine::SearchEngine;
pub use error::{Error, Result};
pub use index::{IndexConfig, InvertedIndex};
pub use link_rank::{compute_rank, DanglingPolicy, LinkGraph, LinkRank, LinkRankConfig};
pub use spelling::{levenshtein_distance, CorrectedSearch, SpellingConfig, SpellingCorrector};
pub use tokenizer::Analyzer;
pub use vector::{VectorConfig, VectorModel};

use std::collections::BTreeSet;

pub fn build_index(corpus: &Corpus) -> InvertedIndex {
    InvertedIndex::build(corpus, &IndexConfig::default())
}

pub fn boolean_search(index: &InvertedIndex, query: &str) -> BTreeSet<DocId> {
    boolean::evaluate(index, query)
}

pub fn build_vector_model(corpus: &Corpus) -> VectorModel {
    VectorModel::build(corpus, VectorConfig::default())
}

/// Matching documents, best first; documents scoring zero are left out.
pub fn vector_search(model: &VectorModel, query: &str) -> Vec<(DocId, f64)> {
    model.search(query)
}

pub fn build_vocabulary(corpus: &Corpus) -> (InvertedIndex, BTreeSet<String>) {
    let index = build_index(corpus);
    let vocabulary = index.vocabulary().map(str::to_string).collect();
    (index, vocabulary)
}

pub fn corrected_search(index: &InvertedIndex, vocabulary: &BTreeSet<String>, query: &str) -> CorrectedSearch {
    SpellingCorrector::from_vocabulary(vocabulary, SpellingConfig::default()).corrected_search(index, query)
}
