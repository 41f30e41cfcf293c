//! TF-IDF vector space ranking.
//!
//! The model fixes its term dimensions and document frequencies when it is
//! built. Queries are weighted with the same statistics, so a term the
//! collection never contained has no dimension and cannot move a score.

use crate::corpus::{Corpus, DocId};
use crate::tokenizer::Analyzer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TfWeighting {
    /// `tf = count`
    #[default]
    Raw,
    /// `tf = 1 + ln(count)`
    LogScaled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfWeighting {
    /// `idf = ln((1 + N) / (1 + df)) + 1`
    #[default]
    Smooth,
    /// `idf = ln(N / df)`
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub analyzer: Analyzer,
    pub tf: TfWeighting,
    pub idf: IdfWeighting,
    /// Scale every document and query vector to unit L2 length, which turns the
    /// dot product into cosine similarity.
    pub normalize: bool,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            analyzer: Analyzer::Word,
            tf: TfWeighting::Raw,
            idf: IdfWeighting::Smooth,
            normalize: true,
        }
    }
}

fn tf_weight(count: u32, variant: TfWeighting) -> f64 {
    match variant {
        TfWeighting::Raw => count as f64,
        TfWeighting::LogScaled if count > 0 => 1.0 + (count as f64).ln(),
        TfWeighting::LogScaled => 0.0,
    }
}

fn idf_weight(num_docs: usize, doc_freq: usize, variant: IdfWeighting) -> f64 {
    let n = num_docs as f64;
    let df = doc_freq as f64;
    match variant {
        IdfWeighting::Smooth => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
        IdfWeighting::Standard => (n / df.max(1.0)).ln(),
    }
}

/// Sparse weights sorted by term dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] { &self.entries }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[derive(Debug, Clone)]
pub struct VectorModel {
    config: VectorConfig,
    dims: HashMap<String, usize>,
    idf: Vec<f64>,
    docs: Vec<(DocId, SparseVector)>,
}

impl VectorModel {
    pub fn build(corpus: &Corpus, config: VectorConfig) -> Self {
        let counts: Vec<(DocId, HashMap<String, u32>)> = corpus
            .iter()
            .map(|doc| (doc.id, term_counts(config.analyzer.terms(&doc.text))))
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, tf) in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let num_docs = corpus.len();
        let mut dims = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (dim, (term, df)) in doc_freq.iter().enumerate() {
            dims.insert(term.to_string(), dim);
            idf.push(idf_weight(num_docs, *df, config.idf));
        }

        let mut model = VectorModel { config, dims, idf, docs: Vec::with_capacity(num_docs) };
        let docs: Vec<(DocId, SparseVector)> = counts
            .iter()
            .map(|(id, tf)| (*id, model.weigh(tf)))
            .collect();
        model.docs = docs;
        tracing::debug!(num_docs, num_dims = model.num_dims(), "built tf-idf model");
        model
    }

    pub fn config(&self) -> &VectorConfig { &self.config }

    pub fn num_dims(&self) -> usize { self.idf.len() }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn doc_vector(&self, id: DocId) -> Option<&SparseVector> {
        self.docs.iter().find(|(doc_id, _)| *doc_id == id).map(|(_, v)| v)
    }

    /// Weight a query with the fitted statistics. Unknown terms are dropped.
    pub fn vectorize(&self, text: &str) -> SparseVector {
        self.weigh(&term_counts(self.config.analyzer.terms(text)))
    }

    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVector {
        let mut entries: Vec<(usize, f64)> = counts
            .iter()
            .filter_map(|(term, &count)| {
                let dim = *self.dims.get(term)?;
                let w = tf_weight(count, self.config.tf) * self.idf[dim];
                (w != 0.0).then_some((dim, w))
            })
            .collect();
        entries.sort_unstable_by_key(|(dim, _)| *dim);
        let mut v = SparseVector { entries };
        if self.config.normalize {
            let norm = v.norm();
            if norm > 0.0 {
                for (_, w) in v.entries.iter_mut() { *w /= norm; }
            }
        }
        v
    }

    /// Every document scored against `query`, highest first. Equal scores keep
    /// corpus order.
    pub fn rank(&self, query: &str) -> Vec<(DocId, f64)> {
        let q = self.vectorize(query);
        let mut scored: Vec<(DocId, f64)> = self
            .docs
            .iter()
            .map(|(id, v)| (*id, v.dot(&q)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    /// [`rank`](Self::rank) without the documents that scored zero.
    pub fn search(&self, query: &str) -> Vec<(DocId, f64)> {
        self.rank(query).into_iter().filter(|(_, s)| *s > 0.0).collect()
    }

    pub fn rank_many<S: AsRef<str> + Sync>(&self, queries: &[S]) -> Vec<Vec<(DocId, f64)>> {
        queries.par_iter().map(|q| self.rank(q.as_ref())).collect()
    }
}

fn term_counts(terms: Vec<String>) -> HashMap<String, u32> {
    let mut tf = HashMap::new();
    for term in terms {
        *tf.entry(term).or_insert(0) += 1;
    }
    tf
}
