//! Boolean retrieval as a left-to-right fold.
//!
//! There is no precedence and no grouping: `a or b and c` is `((U ∩ a) ∪ b) ∩ c`
//! where `U` is the set of every indexed document. Connectives only change the
//! operator used for the terms that follow them, and the operator sticks until
//! the next connective.

use crate::corpus::DocId;
use crate::index::InvertedIndex;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BooleanOp {
    #[default]
    And,
    Or,
    Not,
}

impl BooleanOp {
    fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "and" => Some(BooleanOp::And),
            "or" => Some(BooleanOp::Or),
            "not" => Some(BooleanOp::Not),
            _ => None,
        }
    }

    fn apply(self, acc: &mut BTreeSet<DocId>, postings: &BTreeSet<DocId>) {
        match self {
            BooleanOp::And => acc.retain(|id| postings.contains(id)),
            BooleanOp::Or => acc.extend(postings.iter().copied()),
            BooleanOp::Not => acc.retain(|id| !postings.contains(id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Op(BooleanOp),
    Term(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanQuery {
    tokens: Vec<Token>,
}

impl BooleanQuery {
    /// Split on whitespace and lower-case; `and`, `or` and `not` become operators.
    pub fn parse(query: &str) -> Self {
        let tokens = query
            .split_whitespace()
            .map(|raw| {
                let token = raw.to_lowercase();
                match BooleanOp::from_keyword(&token) {
                    Some(op) => Token::Op(op),
                    None => Token::Term(token),
                }
            })
            .collect();
        BooleanQuery { tokens }
    }

    pub fn tokens(&self) -> &[Token] { &self.tokens }

    pub fn evaluate(&self, index: &InvertedIndex) -> BTreeSet<DocId> {
        let analyzer = index.analyzer();
        let mut result = index.doc_ids().clone();
        let mut op = BooleanOp::default();
        for token in &self.tokens {
            match token {
                Token::Op(next) => op = *next,
                Token::Term(term) => {
                    let postings = token_postings(index, &analyzer.normalize_token(term));
                    op.apply(&mut result, &postings);
                }
            }
        }
        result
    }
}

/// Documents holding every term a query token analyzed into. A token the
/// analyzer discards (e.g. a stopword) matches nothing.
fn token_postings(index: &InvertedIndex, terms: &[String]) -> BTreeSet<DocId> {
    let Some((first, rest)) = terms.split_first() else { return BTreeSet::new(); };
    rest.iter().fold(index.postings(first).clone(), |acc, term| &acc & index.postings(term))
}

pub fn evaluate(index: &InvertedIndex, query: &str) -> BTreeSet<DocId> {
    BooleanQuery::parse(query).evaluate(index)
}
