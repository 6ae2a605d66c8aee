use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use engine::eval::{evaluate_judgements, load_judgements};
use engine::{load_directory, EngineConfig, RetrievalModel, SearchEngine};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Boolean and vector-space search over a directory of text documents", long_about = None)]
struct Cli {
    /// Corpus directory containing *.txt documents
    #[arg(long, global = true, default_value = "./data")]
    data: String,
    /// Optional JSON engine configuration
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query
    Query {
        /// Retrieval model: boolean or vsm
        #[arg(long)]
        model: RetrievalModel,
        #[arg(long)]
        query: String,
        /// Number of results (vsm only)
        #[arg(long, default_value_t = 3)]
        k: usize,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Score both models against a JSON file of relevance judgements
    Eval {
        #[arg(long)]
        qrels: String,
        #[arg(long, default_value_t = 5)]
        k: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Interactive ranked search; type `exit` to quit
    Chat {
        #[arg(long, default_value_t = 3)]
        k: usize,
    },
    /// Print corpus and index statistics
    Inspect,
}

#[derive(Serialize)]
struct JsonHit<'a> {
    doc: &'a str,
    score: Option<f64>,
    explain: Option<String>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path).with_context(|| format!("loading config {path}"))?,
        None => EngineConfig::default(),
    };
    let report = load_directory(&cli.data)?;
    for skipped in &report.skipped {
        tracing::warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped document");
    }
    let skipped = report.skipped.len();
    let engine = SearchEngine::build(report.documents, config)?;

    match cli.command {
        Commands::Query { model, query, k, json } => run_query(&engine, model, &query, k, json),
        Commands::Eval { qrels, k, json } => run_eval(&engine, &qrels, k, json),
        Commands::Chat { k } => run_chat(&engine, k),
        Commands::Inspect => {
            let stats = engine.stats();
            println!("documents:        {}", stats.documents);
            println!("skipped files:    {skipped}");
            println!("empty documents:  {}", stats.empty_documents);
            println!("index terms:      {}", stats.index_terms);
            println!("vsm vocabulary:   {}", stats.vocabulary);
            let (rows, cols) = engine.incidence().shape();
            println!("incidence matrix: {rows}x{cols}, {} non-zero", stats.incidence_nnz);
            println!("stemmer:          {}", stats.stemmer);
            Ok(())
        }
    }
}

fn run_query(engine: &SearchEngine, model: RetrievalModel, query: &str, k: usize, json: bool) -> Result<()> {
    if k == 0 {
        bail!("--k must be at least 1");
    }
    match model {
        RetrievalModel::Boolean => {
            let hits = match engine.explain_boolean(query) {
                Ok(hits) => hits,
                Err(err) => {
                    tracing::info!(%err, "malformed boolean query");
                    Default::default()
                }
            };
            if json {
                let out: Vec<JsonHit> = hits.iter().map(|d| JsonHit { doc: d, score: None, explain: None }).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!("--- model: BOOLEAN ---\nquery: {query}\n");
            if hits.is_empty() {
                println!("No matching documents.");
            }
            for doc in &hits {
                println!("- {doc}");
            }
        }
        RetrievalModel::Vsm => {
            let hits = engine.ranked(query, k);
            let explain = |doc: &str| {
                let terms: Vec<String> = engine.vsm().top_terms(doc, 3).into_iter().map(|(t, _)| t).collect();
                format!("top terms: {}", terms.join(", "))
            };
            if json {
                let out: Vec<JsonHit> = hits
                    .iter()
                    .map(|h| JsonHit { doc: &h.doc, score: Some(h.score), explain: Some(explain(&h.doc)) })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!("--- model: VSM ---\nquery: {query}\n\ntop-{k}:");
            if hits.is_empty() {
                println!("No relevant documents.");
            }
            for hit in &hits {
                println!("- {}\n  score: {:.4}\n  {}\n", hit.doc, hit.score, explain(&hit.doc));
            }
        }
    }
    Ok(())
}

fn run_eval(engine: &SearchEngine, qrels: &str, k: usize, json: bool) -> Result<()> {
    let judgements = load_judgements(qrels).with_context(|| format!("loading judgements {qrels}"))?;
    let report = evaluate_judgements(engine, &judgements, k.max(1));
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{:<32} {:>6} {:>6} {:>6} | {:>6} {:>6} {:>6}", "query", "P", "R", "F1", "P@k", "AP@k", "nDCG");
    for q in &report.queries {
        println!(
            "{:<32} {:>6.3} {:>6.3} {:>6.3} | {:>6.3} {:>6.3} {:>6.3}",
            q.query, q.precision, q.recall, q.f1, q.precision_at_k, q.average_precision, q.ndcg
        );
    }
    println!("\nMAP@{}: {:.4}\nmean nDCG@{}: {:.4}", report.k, report.map, report.k, report.mean_ndcg);
    Ok(())
}

/// First line of a document, capped at 150 characters.
fn key_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > 150 {
        format!("{}...", line.chars().take(150).collect::<String>())
    } else {
        line.to_string()
    }
}

fn run_chat(engine: &SearchEngine, k: usize) -> Result<()> {
    println!("Ready. Type 'exit' to quit.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\nquery> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") {
            break;
        }
        if engine.normalizer().normalize(query).is_empty() {
            println!("Query has no searchable terms.");
            continue;
        }
        let hits = engine.ranked(query, k);
        if hits.is_empty() {
            println!("Sorry, no relevant documents found.");
            continue;
        }
        println!("Top results:\n");
        for hit in hits {
            let text = engine.document(&hit.doc).map(|d| d.text.as_str()).unwrap_or("");
            println!("--- {} (score: {:.4}) ---\n\"{}\"\n", hit.doc, hit.score, key_line(text));
        }
    }
    Ok(())
}
