use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sift_core::{
    compute_rank, eval, Corpus, DanglingPolicy, DocId, Document, EngineConfig, LinkGraph, LinkRankConfig,
    SearchEngine,
};
use walkdir::WalkDir;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    #[serde(alias = "body")]
    text: String,
}

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Boolean, vector, spell-corrected and link-rank retrieval over small collections", long_about = None)]
pub struct Cli {
    /// JSON engine configuration; missing fields keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an AND/OR/NOT query left to right
    Boolean {
        /// Document file (.json/.jsonl) or directory
        #[arg(long)]
        docs: PathBuf,
        query: Vec<String>,
    },
    /// Rank documents by TF-IDF similarity
    Vector {
        #[arg(long)]
        docs: PathBuf,
        /// Include documents that scored zero
        #[arg(long, default_value_t = false)]
        all: bool,
        query: Vec<String>,
    },
    /// Spell-correct the query against the vocabulary, then AND the terms
    Correct {
        #[arg(long)]
        docs: PathBuf,
        query: Vec<String>,
    },
    /// Documents containing every known query term
    Search {
        #[arg(long)]
        docs: PathBuf,
        query: Vec<String>,
    },
    /// Compute link-rank scores for a JSON adjacency map
    Rank {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        damping: Option<f64>,
        #[arg(long)]
        max_iterations: Option<usize>,
        #[arg(long)]
        tolerance: Option<f64>,
        /// Spread the score of nodes without out-links over all nodes
        #[arg(long, default_value_t = false)]
        redistribute_dangling: bool,
    },
    /// Precision, recall and F1 of a retrieved set
    Evaluate {
        #[arg(long, value_delimiter = ',')]
        relevant: Vec<DocId>,
        #[arg(long, value_delimiter = ',')]
        retrieved: Vec<DocId>,
    },
}

#[derive(Serialize)]
struct SetResult<'a> {
    query: &'a str,
    doc_ids: &'a BTreeSet<DocId>,
}

#[derive(Serialize)]
struct RankedResult<'a> {
    query: &'a str,
    results: Vec<ScoredDoc>,
}

#[derive(Serialize)]
struct ScoredDoc {
    doc_id: DocId,
    score: f64,
}

#[derive(Serialize)]
struct CorrectedResult<'a> {
    query: &'a str,
    corrected_query: String,
    doc_ids: &'a BTreeSet<DocId>,
}

#[derive(Serialize)]
struct NodeScore<'a> {
    node: &'a str,
    score: f64,
}

#[derive(Serialize)]
struct RankResult<'a> {
    converged: bool,
    iterations: usize,
    delta: f64,
    scores: Vec<NodeScore<'a>>,
}

pub fn run(cli: Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Boolean { docs, query } => {
            let engine = SearchEngine::build(load_corpus(&docs)?, &config);
            let query = query.join(" ");
            let hits = engine.boolean_search(&query);
            render_set(cli.json, &query, &hits, "Documents")
        }
        Commands::Search { docs, query } => {
            let engine = SearchEngine::build(load_corpus(&docs)?, &config);
            let query = query.join(" ");
            let hits = engine.index().search_all(&query);
            render_set(cli.json, &query, &hits, "Documents")
        }
        Commands::Vector { docs, all, query } => {
            let engine = SearchEngine::build(load_corpus(&docs)?, &config);
            let query = query.join(" ");
            let ranked = if all { engine.model().rank(&query) } else { engine.vector_search(&query) };
            if cli.json {
                let results = ranked.into_iter().map(|(doc_id, score)| ScoredDoc { doc_id, score }).collect();
                return Ok(serde_json::to_string_pretty(&RankedResult { query: &query, results })?);
            }
            let shown: Vec<String> = ranked.iter().map(|(id, s)| format!("({id}, {s:.4})")).collect();
            Ok(format!("Query : '{query}' -> Ranked Documents : [{}]", shown.join(", ")))
        }
        Commands::Correct { docs, query } => {
            let engine = SearchEngine::build(load_corpus(&docs)?, &config);
            let query = query.join(" ");
            let result = engine.corrected_search(&query);
            if cli.json {
                let out = CorrectedResult { query: &query, corrected_query: result.corrected_query(), doc_ids: &result.doc_ids };
                return Ok(serde_json::to_string_pretty(&out)?);
            }
            let found = render_set(false, &query, &result.doc_ids, "Corrected Documents")?;
            Ok(format!("Corrected Query : {}\n{found}", result.corrected_query()))
        }
        Commands::Rank { graph, damping, max_iterations, tolerance, redistribute_dangling } => {
            let mut rank_config: LinkRankConfig = config.link_rank.clone();
            if let Some(d) = damping { rank_config.damping = d; }
            if let Some(n) = max_iterations { rank_config.max_iterations = n; }
            if let Some(t) = tolerance { rank_config.tolerance = t; }
            if redistribute_dangling { rank_config.dangling = DanglingPolicy::Redistribute; }

            let graph = load_graph(&graph)?;
            let rank = compute_rank(&graph, &rank_config)?;
            let ranked = rank.ranked();
            if cli.json {
                let scores = ranked.into_iter().map(|(node, score)| NodeScore { node, score }).collect();
                let out = RankResult { converged: rank.converged, iterations: rank.iterations, delta: rank.delta, scores };
                return Ok(serde_json::to_string_pretty(&out)?);
            }
            let mut lines: Vec<String> = ranked.iter().map(|(node, score)| format!("Page {node} : {score:.6}")).collect();
            let status = if rank.converged { "converged" } else { "stopped at iteration limit" };
            lines.push(format!("{status} after {} iterations (delta {:.3e})", rank.iterations, rank.delta));
            Ok(lines.join("\n"))
        }
        Commands::Evaluate { relevant, retrieved } => {
            let relevant: BTreeSet<DocId> = relevant.into_iter().collect();
            let retrieved: BTreeSet<DocId> = retrieved.into_iter().collect();
            let e = eval::evaluate(&relevant, &retrieved);
            if cli.json {
                return Ok(serde_json::to_string_pretty(&e)?);
            }
            Ok([
                format!("True Positives (TP): {}", e.true_positives),
                format!("False Positives (FP): {}", e.false_positives),
                format!("False Negatives (FN): {}", e.false_negatives),
                format!("Precision: {:.4}", e.precision),
                format!("Recall: {:.4}", e.recall),
                format!("F1-Score: {:.4}", e.f1),
            ]
            .join("\n"))
        }
    }
}

fn render_set(json: bool, query: &str, hits: &BTreeSet<DocId>, label: &str) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&SetResult { query, doc_ids: hits })?);
    }
    if hits.is_empty() {
        return Ok(format!("Query : '{query}' -> {label} : No matching documents"));
    }
    let ids: Vec<String> = hits.iter().map(|id| id.to_string()).collect();
    Ok(format!("Query : '{query}' -> {label} : [{}]", ids.join(", ")))
}

/// Read documents from a `.json` / `.jsonl` file or every such file under a directory.
pub fn load_corpus(input: &Path) -> Result<Corpus> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else {
        files.push(input.to_path_buf());
    }

    let mut docs: Vec<Document> = Vec::new();
    for file in &files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(file, &mut docs)?;
        } else {
            read_json(file, &mut docs)?;
        }
    }
    tracing::info!(num_docs = docs.len(), num_files = files.len(), "loaded documents");
    Ok(Corpus::from_documents(docs)?)
}

fn read_jsonl(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), n + 1))?;
        docs.push(Document { id: doc.id, text: doc.text });
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                docs.push(Document { id: doc.id, text: doc.text });
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            docs.push(Document { id: doc.id, text: doc.text });
        }
        _ => anyhow::bail!("{}: expected a document object or an array of them", file.display()),
    }
    Ok(())
}

/// Read a JSON object mapping each node to the list of nodes it links to.
pub fn load_graph(path: &Path) -> Result<LinkGraph> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let adjacency: BTreeMap<String, Vec<String>> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    let graph = LinkGraph::from_adjacency(adjacency);
    tracing::info!(num_nodes = graph.num_nodes(), "loaded graph");
    Ok(graph)
}
