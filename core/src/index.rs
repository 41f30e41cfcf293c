use crate::corpus::{Corpus, DocId};
use crate::tokenizer::Analyzer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static NO_POSTINGS: BTreeSet<DocId> = BTreeSet::new();

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub analyzer: Analyzer,
}

/// Term -> set of documents containing the term at least once.
///
/// The vocabulary is the key set of `postings`; no term is stored with an
/// empty postings set.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: BTreeMap<String, BTreeSet<DocId>>,
    doc_ids: BTreeSet<DocId>,
    analyzer: Analyzer,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build(corpus: &Corpus, config: &IndexConfig) -> Self {
        let mut index = InvertedIndex { analyzer: config.analyzer, ..Self::default() };
        for doc in corpus {
            index.doc_ids.insert(doc.id);
            let distinct: BTreeSet<String> = config.analyzer.terms(&doc.text).into_iter().collect();
            for term in distinct {
                index.postings.entry(term).or_default().insert(doc.id);
            }
        }
        tracing::debug!(num_docs = index.num_docs(), num_terms = index.num_terms(), "built inverted index");
        index
    }

    /// Documents containing `term`; empty when the term is unknown.
    pub fn postings(&self, term: &str) -> &BTreeSet<DocId> {
        self.postings.get(term).unwrap_or(&NO_POSTINGS)
    }

    /// Vocabulary in lexicographic order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn contains_term(&self, term: &str) -> bool { self.postings.contains_key(term) }

    /// Every indexed document, including documents that produced no terms.
    pub fn doc_ids(&self) -> &BTreeSet<DocId> { &self.doc_ids }

    pub fn num_docs(&self) -> usize { self.doc_ids.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn analyzer(&self) -> Analyzer { self.analyzer }

    /// Documents containing every query term known to the index. Unknown terms
    /// are skipped; if none are known the result is empty.
    pub fn search_all(&self, query: &str) -> BTreeSet<DocId> {
        let mut known = self
            .analyzer
            .terms(query)
            .into_iter()
            .filter_map(|t| self.postings.get(&t));
        let Some(first) = known.next() else { return BTreeSet::new(); };
        known.fold(first.clone(), |acc, p| &acc & p)
    }
}
