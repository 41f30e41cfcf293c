use crate::boolean;
use crate::config::EngineConfig;
use crate::corpus::{Corpus, DocId};
use crate::index::InvertedIndex;
use crate::spelling::{CorrectedSearch, SpellingConfig, SpellingCorrector};
use crate::vector::VectorModel;
use std::collections::BTreeSet;

/// Every document-backed engine built over one corpus.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    corpus: Corpus,
    index: InvertedIndex,
    model: VectorModel,
    spelling: SpellingConfig,
}

impl SearchEngine {
    pub fn build(corpus: Corpus, config: &EngineConfig) -> Self {
        let index = InvertedIndex::build(&corpus, &config.index);
        let model = VectorModel::build(&corpus, config.vector.clone());
        tracing::info!(
            num_docs = corpus.len(),
            num_terms = index.num_terms(),
            num_dims = model.num_dims(),
            "search engine ready"
        );
        SearchEngine { corpus, index, model, spelling: config.spelling.clone() }
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn model(&self) -> &VectorModel { &self.model }

    pub fn corrector(&self) -> SpellingCorrector<'_> {
        SpellingCorrector::from_index(&self.index, self.spelling.clone())
    }

    pub fn boolean_search(&self, query: &str) -> BTreeSet<DocId> {
        boolean::evaluate(&self.index, query)
    }

    pub fn vector_search(&self, query: &str) -> Vec<(DocId, f64)> {
        self.model.search(query)
    }

    pub fn corrected_search(&self, query: &str) -> CorrectedSearch {
        self.corrector().corrected_search(&self.index, query)
    }
}
