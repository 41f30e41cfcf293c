use clap::Parser;
use serde_json::Value;
use sift_cli::{load_corpus, load_graph, run, Cli};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE_JSONL: &str = r#"{"id": 1, "text": "Web content extraction involves retrieving structured data"}
{"id": 2, "text": "Search engines use document indexing for efficient retrieval"}

{"id": 3, "body": "Document retrieval is important in web mining applications"}
{"id": 4, "text": "Indexing helps in retrieving relevant documents based on query terms"}
"#;

fn write_sample(dir: &Path) -> String {
    let path = dir.join("docs.jsonl");
    fs::write(&path, SAMPLE_JSONL).unwrap();
    path.to_string_lossy().to_string()
}

fn sift(args: &[&str]) -> String {
    let mut argv = vec!["sift"];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn loads_jsonl_json_and_directories() {
    let dir = tempdir().unwrap();
    let docs = write_sample(dir.path());
    let corpus = load_corpus(Path::new(&docs)).unwrap();
    assert_eq!(corpus.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

    let nested = dir.path().join("nested");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("a.json"), r#"[{"id": 10, "text": "alpha"}, {"id": 11, "text": "beta"}]"#).unwrap();
    fs::write(nested.join("b.json"), r#"{"id": 12, "text": "gamma", "title": "ignored"}"#).unwrap();
    fs::write(nested.join("notes.txt"), "not a document").unwrap();
    let corpus = load_corpus(&nested).unwrap();
    assert_eq!(corpus.ids().collect::<Vec<_>>(), vec![10, 11, 12]);
}

#[test]
fn duplicate_ids_across_files_fail() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.json"), r#"{"id": 1, "text": "alpha"}"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"{"id": 1, "text": "beta"}"#).unwrap();
    assert!(load_corpus(dir.path()).is_err());
}

#[test]
fn boolean_command_prints_sorted_ids() {
    let dir = tempdir().unwrap();
    let docs = write_sample(dir.path());
    assert_eq!(
        sift(&["boolean", "--docs", &docs, "retrieval", "AND", "document"]),
        "Query : 'retrieval AND document' -> Documents : [2, 3]"
    );
    assert_eq!(
        sift(&["boolean", "--docs", &docs, "retrieval", "NOT", "retrieval"]),
        "Query : 'retrieval NOT retrieval' -> Documents : No matching documents"
    );
}

#[test]
fn search_command_intersects_known_terms() {
    let dir = tempdir().unwrap();
    let docs = write_sample(dir.path());
    assert_eq!(
        sift(&["search", "--docs", &docs, "document", "indexing"]),
        "Query : 'document indexing' -> Documents : [2]"
    );
}

#[test]
fn vector_command_hides_zero_scores_unless_asked() {
    let dir = tempdir().unwrap();
    let docs = write_sample(dir.path());
    assert_eq!(
        sift(&["vector", "--docs", &docs, "document", "retrieval"]),
        "Query : 'document retrieval' -> Ranked Documents : [(3, 0.4378), (2, 0.4256)]"
    );

    let json: Value = serde_json::from_str(&sift(&["--json", "vector", "--docs", &docs, "--all", "web"])).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[3]["score"].as_f64(), Some(0.0));
}

#[test]
fn correct_command_reports_corrected_query() {
    let dir = tempdir().unwrap();
    let docs = write_sample(dir.path());
    assert_eq!(
        sift(&["correct", "--docs", &docs, "documnt", "indexing"]),
        "Corrected Query : document indexing\nQuery : 'documnt indexing' -> Corrected Documents : [2]"
    );
    let json: Value = serde_json::from_str(&sift(&["correct", "--json", "--docs", &docs, "web", "minng"])).unwrap();
    assert_eq!(json["corrected_query"], "web mining");
    assert_eq!(json["doc_ids"], serde_json::json!([3]));
}

#[test]
fn rank_command_uses_flags_and_config() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("graph.json");
    fs::write(&graph, r#"{"A": ["B", "C"], "B": ["C"], "C": ["A"], "D": ["C"]}"#).unwrap();
    let graph = graph.to_string_lossy().to_string();
    assert_eq!(load_graph(Path::new(&graph)).unwrap().num_nodes(), 4);

    let out = sift(&["rank", "--graph", &graph]);
    let first = out.lines().next().unwrap();
    assert_eq!(first, "Page C : 0.394149");
    assert!(out.lines().last().unwrap().starts_with("converged after 28 iterations"));

    let json: Value = serde_json::from_str(&sift(&["rank", "--json", "--graph", &graph, "--max-iterations", "1"])).unwrap();
    assert_eq!(json["iterations"], 1);
    assert_eq!(json["converged"], false);
    assert_eq!(json["scores"][0]["node"], "C");

    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"link_rank": {"max_iterations": 2}}"#).unwrap();
    let config = config.to_string_lossy().to_string();
    let json: Value =
        serde_json::from_str(&sift(&["--config", &config, "--json", "rank", "--graph", &graph])).unwrap();
    assert_eq!(json["iterations"], 2);
}

#[test]
fn rank_command_rejects_bad_damping() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("graph.json");
    fs::write(&graph, r#"{"A": ["B"]}"#).unwrap();
    let graph = graph.to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["sift", "rank", "--graph", graph.as_str(), "--damping", "1.2"]).unwrap();
    assert!(run(cli).is_err());
}

#[test]
fn evaluate_command_matches_reference_example() {
    let out = sift(&["evaluate", "--relevant", "1,2,3,5,7", "--retrieved", "1,2,4,5,6"]);
    assert_eq!(
        out,
        "True Positives (TP): 3\nFalse Positives (FP): 2\nFalse Negatives (FN): 2\nPrecision: 0.6000\nRecall: 0.6000\nF1-Score: 0.6000"
    );
}
