use crate::corpus::DocId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Set-based retrieval quality against a ground-truth set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

pub fn evaluate(relevant: &BTreeSet<DocId>, retrieved: &BTreeSet<DocId>) -> Evaluation {
    let tp = relevant.intersection(retrieved).count();
    let fp = retrieved.difference(relevant).count();
    let fn_ = relevant.difference(retrieved).count();
    let precision = ratio(tp as f64, (tp + fp) as f64);
    let recall = ratio(tp as f64, (tp + fn_) as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);
    Evaluation { true_positives: tp, false_positives: fp, false_negatives: fn_, precision, recall, f1 }
}
