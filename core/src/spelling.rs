//! Edit-distance spelling correction against an index vocabulary.

use crate::corpus::DocId;
use crate::index::InvertedIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Edit distance in chars: the fewest single-char insertions, deletions and
/// substitutions that turn `a` into `b`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // table[i][j]: distance between the first i chars of `a` and the first j of `b`
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitute = table[i - 1][j - 1] + usize::from(a[i - 1] != b[j - 1]);
            let delete = table[i - 1][j] + 1;
            let insert = table[i][j - 1] + 1;
            table[i][j] = substitute.min(delete).min(insert);
        }
    }

    table[a.len()][b.len()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Vocabularies with at least this many terms are scanned in parallel.
    pub parallel_threshold: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self { parallel_threshold: 4096 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub term: String,
    pub distance: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectedSearch {
    /// Corrected tokens in query order.
    pub terms: Vec<String>,
    pub doc_ids: BTreeSet<DocId>,
}

impl CorrectedSearch {
    pub fn corrected_query(&self) -> String { self.terms.join(" ") }
}

/// Maps arbitrary tokens to their nearest vocabulary term.
///
/// The vocabulary is scanned in lexicographic order and the first term that
/// reaches the smallest distance wins, so ties always resolve to the
/// alphabetically first candidate.
#[derive(Debug, Clone)]
pub struct SpellingCorrector<'a> {
    terms: Vec<&'a str>,
    config: SpellingConfig,
}

impl<'a> SpellingCorrector<'a> {
    pub fn from_index(index: &'a InvertedIndex, config: SpellingConfig) -> Self {
        Self { terms: index.vocabulary().collect(), config }
    }

    pub fn from_vocabulary(vocabulary: &'a BTreeSet<String>, config: SpellingConfig) -> Self {
        Self { terms: vocabulary.iter().map(String::as_str).collect(), config }
    }

    pub fn vocabulary_len(&self) -> usize { self.terms.len() }

    /// Nearest vocabulary term and its distance, or `None` for an empty vocabulary.
    pub fn correct_with_distance(&self, token: &str) -> Option<Correction> {
        let token = token.to_lowercase();
        let (distance, pos) = if self.terms.len() >= self.config.parallel_threshold {
            self.terms
                .par_iter()
                .enumerate()
                .map(|(pos, term)| (levenshtein_distance(&token, term), pos))
                .min()?
        } else {
            self.nearest_sequential(&token)?
        };
        Some(Correction { term: self.terms[pos].to_string(), distance })
    }

    fn nearest_sequential(&self, token: &str) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (pos, term) in self.terms.iter().enumerate() {
            let d = levenshtein_distance(token, term);
            if best.map_or(true, |(best_d, _)| d < best_d) {
                best = Some((d, pos));
                if d == 0 { break; }
            }
        }
        best
    }

    /// Nearest vocabulary term. With an empty vocabulary the lower-cased token
    /// is returned unchanged.
    pub fn correct(&self, token: &str) -> String {
        match self.correct_with_distance(token) {
            Some(c) => c.term,
            None => token.to_lowercase(),
        }
    }

    pub fn correct_query(&self, query: &str) -> Vec<String> {
        query.split_whitespace().map(|t| self.correct(t)).collect()
    }

    /// Correct every query token, then intersect the corrected terms' postings.
    pub fn corrected_search(&self, index: &InvertedIndex, query: &str) -> CorrectedSearch {
        let terms = self.correct_query(query);
        let doc_ids = intersect_postings(index, &terms);
        tracing::info!(query, corrected = %terms.join(" "), hits = doc_ids.len(), "corrected query");
        CorrectedSearch { terms, doc_ids }
    }
}

fn intersect_postings(index: &InvertedIndex, terms: &[String]) -> BTreeSet<DocId> {
    let Some((first, rest)) = terms.split_first() else { return BTreeSet::new(); };
    let mut acc = index.postings(first).clone();
    for term in rest {
        if acc.is_empty() { break; }
        let postings = index.postings(term);
        acc.retain(|id| postings.contains(id));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::index::IndexConfig;

    fn sample() -> InvertedIndex {
        let corpus = Corpus::new([
            (1, "Web content extraction involves retrieving structured data"),
            (2, "Search engines use document indexing for efficient retrieval"),
            (3, "Document retrieval is important in web mining applications"),
            (4, "Indexing helps in retrieving relevant documents based on query terms"),
        ])
        .unwrap();
        InvertedIndex::build(&corpus, &IndexConfig::default())
    }

    #[test]
    fn distance_reference_values() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let words = ["retrieval", "retrievel", "document", "documnt", "", "web", "mining"];
        for a in words {
            assert_eq!(levenshtein_distance(a, a), 0);
            for b in words {
                assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
            }
        }
    }

    #[test]
    fn corrects_misspellings_from_sample() {
        let index = sample();
        let corrector = SpellingCorrector::from_index(&index, SpellingConfig::default());
        assert_eq!(corrector.correct("retrievel"), "retrieval");
        assert_eq!(corrector.correct("Documnt"), "document");
        assert_eq!(corrector.correct("minng"), "mining");
        assert_eq!(corrector.correct("strctured"), "structured");
    }

    #[test]
    fn vocabulary_terms_correct_to_themselves() {
        let index = sample();
        let corrector = SpellingCorrector::from_index(&index, SpellingConfig::default());
        for term in index.vocabulary() {
            assert_eq!(
                corrector.correct_with_distance(term),
                Some(Correction { term: term.to_string(), distance: 0 })
            );
        }
    }

    #[test]
    fn ties_go_to_lexicographically_first_term() {
        let vocab: BTreeSet<String> = ["cat", "bat", "rat"].iter().map(|s| s.to_string()).collect();
        let corrector = SpellingCorrector::from_vocabulary(&vocab, SpellingConfig::default());
        assert_eq!(corrector.correct("hat"), "bat");
    }

    #[test]
    fn parallel_scan_agrees_with_sequential() {
        let index = sample();
        let sequential = SpellingCorrector::from_index(&index, SpellingConfig::default());
        let parallel = SpellingCorrector::from_index(&index, SpellingConfig { parallel_threshold: 0 });
        for token in ["retrievel", "xyz", "in", "", "documnts", "serch", "wbe"] {
            assert_eq!(parallel.correct_with_distance(token), sequential.correct_with_distance(token));
        }
    }

    #[test]
    fn empty_vocabulary_returns_token() {
        let vocab = BTreeSet::new();
        let corrector = SpellingCorrector::from_vocabulary(&vocab, SpellingConfig::default());
        assert_eq!(corrector.correct("Hello"), "hello");
        assert!(corrector.correct_with_distance("hello").is_none());
    }

    #[test]
    fn corrected_search_intersects_corrected_terms() {
        let index = sample();
        let corrector = SpellingCorrector::from_index(&index, SpellingConfig::default());

        let hit = corrector.corrected_search(&index, "documnt indexing");
        assert_eq!(hit.corrected_query(), "document indexing");
        assert_eq!(hit.doc_ids, BTreeSet::from([2]));

        assert_eq!(corrector.corrected_search(&index, "retrievel").doc_ids, BTreeSet::from([2, 3]));
        assert_eq!(corrector.corrected_search(&index, "web minng").doc_ids, BTreeSet::from([3]));
        assert_eq!(corrector.corrected_search(&index, "strctured data").doc_ids, BTreeSet::from([1]));

        let empty = corrector.corrected_search(&index, "   ");
        assert!(empty.terms.is_empty());
        assert!(empty.doc_ids.is_empty());
    }
}
