use clap::Parser;
use shinsa::prelude::*;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Evaluate a risk decision graph against feature data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph definition JSON file
    graph_path: String,
    /// Path to a JSON file holding one feature object, or an array of them
    features_path: String,

    /// Map an external node kind onto a built-in one, e.g. `--alias rule_node=ruleset`
    #[arg(short, long, value_parser = parse_alias)]
    alias: Vec<(String, String)>,

    /// Evaluate the feature data this many times and report timing
    #[arg(short, long, default_value_t = 1)]
    repeat: usize,

    /// Print decisions as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_alias(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(user, builtin)| (user.to_string(), builtin.to_string()))
        .ok_or_else(|| format!("alias '{}' is not of the form user=builtin", raw))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.repeat == 0 {
        exit_with_error("--repeat must be at least 1");
    }

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let graph_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            cli.graph_path, e
        ))
    });
    let features_json = fs::read_to_string(&cli.features_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read features file '{}': {}",
            cli.features_path, e
        ))
    });
    let load_duration = load_start.elapsed();

    // --- 2. Graph Construction ---
    let build_start = Instant::now();
    let definition = GraphDefinition::from_json(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let builder = cli
        .alias
        .iter()
        .fold(Graph::builder(definition), |builder, (user, builtin)| {
            builder.with_kind_alias(user, builtin)
        });
    let graph = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Graph construction failed: {}", e)));
    let build_duration = build_start.elapsed();
    let executor = Executor::new(Arc::new(graph));

    let bags = parse_features(&features_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse features JSON: {}", e)));

    // --- 3. Execution ---
    let eval_start = Instant::now();
    let mut results = Vec::new();
    for _ in 0..cli.repeat {
        results = executor.execute_batch(bags.clone());
    }
    let eval_duration = eval_start.elapsed();

    // --- 4. Results and Summary ---
    let mut failed = false;
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(decision) if cli.json => match serde_json::to_string(decision) {
                Ok(line) => println!("{}", line),
                Err(e) => exit_with_error(&format!("Failed to serialize decision: {}", e)),
            },
            Ok(decision) => {
                println!("[{}] -> Decision: {} at '{}'", index, decision.tag, decision.id);
                if !decision.label.is_empty() {
                    println!("    Label:  {}", decision.label);
                }
                if !decision.hits.is_empty() {
                    println!("    Hits:   {}", decision.hits.join(", "));
                }
                println!("    Reason: {}", decision.reason);
            }
            Err(e) => {
                failed = true;
                eprintln!("[{}] -> Error: {}", index, e);
            }
        }
    }

    if !cli.json {
        println!("\n--- Performance Summary ---");
        println!("Requests:             {}", bags.len());
        println!("File Loading:         {:?}", load_duration);
        println!("Graph Construction:   {:?}", build_duration);
        println!("Execution (x{}):      {:?}", cli.repeat, eval_duration);
        println!(
            "Per Traversal:        {:?}",
            eval_duration / (cli.repeat * bags.len().max(1)) as u32
        );
    }

    if failed {
        std::process::exit(2);
    }
}

fn parse_features(json: &str) -> std::result::Result<Vec<FeatureBag>, serde_json::Error> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value::<FeatureBag>)
            .collect(),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
