//! Iterative link-rank scoring over a directed graph.
//!
//! Every node starts at `1/N`. One pass computes, for every node `n`,
//!
//! ```text
//! new(n) = (1 - d) / N + d * Σ_{m -> n} old(m) / outdeg(m)
//! ```
//!
//! from the previous vector only, then replaces it wholesale. Iteration stops
//! once no score moved by `tolerance` or more, or after `max_iterations`
//! passes, whichever comes first.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What happens to the score held by nodes without out-links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Their score flows nowhere, so the total drops below 1.
    #[default]
    Leak,
    /// Their damped score is spread evenly over every node.
    Redistribute,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkRankConfig {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub dangling: DanglingPolicy,
}

impl Default for LinkRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
            dangling: DanglingPolicy::Leak,
        }
    }
}

impl LinkRankConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(Error::invalid_config(format!("damping must be in (0, 1), got {}", self.damping)));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid_config("max_iterations must be >= 1"));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(Error::invalid_config(format!("tolerance must be a positive number, got {}", self.tolerance)));
        }
        Ok(())
    }
}

/// A read-only directed graph with an in-link index built once up front.
///
/// Nodes are stored in sorted order. A node that only ever appears as a link
/// target is part of the graph with no out-links.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    nodes: Vec<String>,
    out_degree: Vec<usize>,
    in_links: Vec<Vec<usize>>,
}

impl LinkGraph {
    pub fn from_adjacency<I, N, E, T>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut adj: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (node, targets) in adjacency {
            let targets: Vec<String> = targets.into_iter().map(Into::into).collect();
            adj.entry(node.into()).or_default().extend(targets);
        }
        let targets_only: Vec<String> = adj
            .values()
            .flatten()
            .filter(|t| !adj.contains_key(*t))
            .cloned()
            .collect();
        for t in targets_only {
            adj.entry(t).or_default();
        }

        let nodes: Vec<String> = adj.keys().cloned().collect();
        let position: BTreeMap<&str, usize> = nodes.iter().enumerate().map(|(i, n)| (n.as_str(), i)).collect();
        let mut out_degree = vec![0; nodes.len()];
        let mut in_links = vec![Vec::new(); nodes.len()];
        for (src, targets) in &adj {
            let s = position[src.as_str()];
            out_degree[s] = targets.len();
            for t in targets {
                in_links[position[t.as_str()]].push(s);
            }
        }
        LinkGraph { nodes, out_degree, in_links }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ { self.nodes.iter().map(String::as_str) }

    pub fn num_nodes(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn out_degree(&self, node: &str) -> Option<usize> {
        self.position(node).map(|i| self.out_degree[i])
    }

    pub fn dangling_nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .iter()
            .zip(&self.out_degree)
            .filter(|(_, deg)| **deg == 0)
            .map(|(n, _)| n.as_str())
    }

    fn position(&self, node: &str) -> Option<usize> {
        self.nodes.binary_search_by(|n| n.as_str().cmp(node)).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkRank {
    pub scores: BTreeMap<String, f64>,
    /// `false` when `max_iterations` ran out first; the scores are then the
    /// last vector computed.
    pub converged: bool,
    pub iterations: usize,
    /// Largest absolute score change in the final pass.
    pub delta: f64,
}

impl LinkRank {
    pub fn score(&self, node: &str) -> Option<f64> { self.scores.get(node).copied() }

    /// Highest score first; equal scores by node name.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.scores.iter().map(|(n, s)| (n.as_str(), *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn total(&self) -> f64 { self.scores.values().sum() }
}

pub fn compute_rank(graph: &LinkGraph, config: &LinkRankConfig) -> Result<LinkRank> {
    config.validate()?;
    let n = graph.num_nodes();
    if n == 0 {
        return Ok(LinkRank { scores: BTreeMap::new(), converged: true, iterations: 0, delta: 0.0 });
    }

    let d = config.damping;
    let teleport = (1.0 - d) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];
    let mut converged = false;
    let mut iterations = 0;
    let mut delta = 0.0;

    while iterations < config.max_iterations {
        iterations += 1;
        let dangling_share = match config.dangling {
            DanglingPolicy::Leak => 0.0,
            DanglingPolicy::Redistribute => {
                let mass: f64 = (0..n).filter(|&m| graph.out_degree[m] == 0).map(|m| scores[m]).sum();
                d * mass / n as f64
            }
        };
        for (v, slot) in next.iter_mut().enumerate() {
            let inbound: f64 = graph.in_links[v]
                .iter()
                .map(|&m| scores[m] / graph.out_degree[m] as f64)
                .sum();
            *slot = teleport + dangling_share + d * inbound;
        }
        delta = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (new - old).abs())
            .fold(0.0, f64::max);
        std::mem::swap(&mut scores, &mut next);
        tracing::debug!(iteration = iterations, delta, "link-rank pass");
        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::info!(iterations, delta, "link-rank converged");
    } else {
        tracing::info!(iterations, delta, "link-rank stopped at iteration limit");
    }

    let scores = graph.nodes.iter().cloned().zip(scores).collect();
    Ok(LinkRank { scores, converged, iterations, delta })
}
