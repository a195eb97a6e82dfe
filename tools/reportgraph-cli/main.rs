use clap::{Parser, Subcommand};
use reportgraph::definition::check_definition;
use reportgraph::prelude::*;
use reportgraph::store::ReportSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Compile, reopen and validate visual report graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write the result to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a graph into a report definition
    Compile {
        /// Path to the graph JSON file
        graph_path: PathBuf,
        /// Treat the input as a flow-editor canvas document
        #[arg(long)]
        canvas: bool,
        /// Existing definition to recompile over (keeps id, bumps version)
        #[arg(long)]
        prior: Option<PathBuf>,
        /// Name for a brand-new definition
        #[arg(long)]
        name: Option<String>,
    },
    /// Turn a stored definition back into an editable graph
    Decompile { definition_path: PathBuf },
    /// Check the structure of a graph, or of a definition's embedded graph
    Validate {
        path: PathBuf,
        #[arg(long)]
        canvas: bool,
        /// The input is a report definition
        #[arg(long)]
        definition: bool,
    },
    /// Check a stored definition for document-level integrity
    Check { definition_path: PathBuf },
    /// Create an empty definition
    Blank {
        #[arg(long, default_value = "New Report")]
        name: String,
        #[arg(long, default_value = "account")]
        entity: String,
    },
    /// Print the bundled sample definition
    Sample,
    /// Work with a directory of stored definitions
    Library {
        /// Directory holding one JSON file per report
        #[arg(long, default_value = ".reports")]
        dir: PathBuf,
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Subcommand, Debug)]
enum LibraryAction {
    /// List stored reports
    List,
    /// Search names, descriptions, tags and entities
    Search { query: String },
    /// Show library statistics
    Stats,
    /// Store a definition file
    Add { definition_path: PathBuf },
    /// Copy a stored report under a new id
    Duplicate {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a stored report
    Delete { id: String },
    /// Write an export bundle of the given reports (all when none given)
    Export { ids: Vec<String> },
    /// Import every valid report of an export bundle
    Import { bundle_path: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let output = cli.output.as_deref();

    match cli.command {
        Command::Compile {
            graph_path,
            canvas,
            prior,
            name,
        } => run_compile(&graph_path, canvas, prior.as_deref(), name, output),
        Command::Decompile { definition_path } => {
            let definition = load_definition(&definition_path);
            let graph = decompile(&definition)
                .unwrap_or_else(|e| exit_with_error(&format!("Decompilation failed: {}", e)));
            emit(&graph, output);
        }
        Command::Validate {
            path,
            canvas,
            definition,
        } => {
            let report = if definition {
                validate_definition(&load_definition(&path))
            } else {
                let graph = load_graph(&path, canvas);
                validate(&graph.nodes, &graph.edges)
            };
            emit(&report, output);
            if !report.is_valid {
                std::process::exit(2);
            }
        }
        Command::Check { definition_path } => {
            let report = check_definition(&load_definition(&definition_path));
            for error in &report.errors {
                eprintln!("  - {}", error);
            }
            if report.is_valid {
                println!("Definition is well-formed.");
            } else {
                exit_with_error(&format!("{} integrity problem(s) found", report.errors.len()));
            }
        }
        Command::Blank { name, entity } => emit(&reportgraph::create_blank(&name, &entity), output),
        Command::Sample => emit(&reportgraph::create_sample(), output),
        Command::Library { dir, action } => run_library(&dir, action, output),
    }
}

fn run_compile(
    graph_path: &Path,
    canvas: bool,
    prior: Option<&Path>,
    name: Option<String>,
    output: Option<&Path>,
) {
    let graph = load_graph(graph_path, canvas);

    let report = validate(&graph.nodes, &graph.edges);
    for warning in &report.warnings {
        log::warn!("{}", warning);
    }
    if !report.is_valid {
        for error in &report.errors {
            eprintln!("  - {}", error);
        }
        exit_with_error("Graph failed validation; nothing was compiled");
    }

    let prior_definition = prior.map(load_definition);
    let mut metadata = prior_definition
        .as_ref()
        .map(DefinitionMetadata::from)
        .unwrap_or_default();
    if name.is_some() {
        metadata.name = name;
    }

    let compile_start = Instant::now();
    let definition = Compiler::default().compile(&graph.nodes, &graph.edges, Some(&metadata));
    log::info!(
        "Compiled '{}' v{} ({} node(s), sheets: [{}]) in {:?}",
        definition.name,
        definition.report_version,
        definition.graph.nodes.len(),
        definition.sheet_names().join(", "),
        compile_start.elapsed()
    );

    emit(&definition, output);
}

fn run_library(dir: &Path, action: LibraryAction, output: Option<&Path>) {
    let mut store = FileStore::new(dir);
    store
        .load_from_disk()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load library: {}", e)));
    let mut library = ReportLibrary::new(store);

    match action {
        LibraryAction::List => print_summaries(&library.summaries()),
        LibraryAction::Search { query } => print_summaries(&library.search(&query)),
        LibraryAction::Stats => emit(&library.statistics(), output),
        LibraryAction::Add { definition_path } => {
            let definition = load_definition(&definition_path);
            let id = definition.id.clone();
            library
                .save(definition)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to store report: {}", e)));
            println!("Stored report '{}'", id);
        }
        LibraryAction::Duplicate { id, name } => {
            match library.duplicate(&id, name.as_deref()) {
                Ok(Some(copy)) => println!("Created '{}' ({})", copy.name, copy.id),
                Ok(None) => exit_with_error(&format!("No report with id '{}'", id)),
                Err(e) => exit_with_error(&format!("Failed to duplicate report: {}", e)),
            }
        }
        LibraryAction::Delete { id } => match library.delete(&id) {
            Ok(true) => println!("Deleted report '{}'", id),
            Ok(false) => exit_with_error(&format!("No report with id '{}'", id)),
            Err(e) => exit_with_error(&format!("Failed to delete report: {}", e)),
        },
        LibraryAction::Export { ids } => {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            let bundle = library.export_bundle((!ids.is_empty()).then_some(ids.as_slice()));
            emit(&bundle, output);
        }
        LibraryAction::Import { bundle_path } => {
            let json = read_file(&bundle_path);
            let outcome = library
                .import_bundle(&json)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            println!("Imported {} report(s)", outcome.imported);
            for error in &outcome.errors {
                eprintln!("  - {}", error);
            }
        }
    }
}

fn print_summaries(summaries: &[ReportSummary]) {
    if summaries.is_empty() {
        println!("No reports found.");
        return;
    }
    for summary in summaries {
        println!(
            "{:<40} v{:<4} {:<16} {}",
            summary.id, summary.report_version, summary.primary_entity, summary.name
        );
    }
}

fn load_graph(path: &Path, canvas: bool) -> Graph {
    let json = read_file(path);
    if canvas {
        let document: CanvasDocument = serde_json::from_str(&json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse canvas JSON: {}", e)));
        document
            .into_graph()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert canvas: {}", e)))
    } else {
        serde_json::from_str(&json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)))
    }
}

fn load_definition(path: &Path) -> ReportDefinition {
    let json = read_file(path);
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse definition JSON: {}", e)))
}

fn read_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read file '{}': {}", path.display(), e))
    })
}

/// Writes `value` as pretty JSON to `output`, or to stdout.
fn emit<T: Serialize>(value: &T, output: Option<&Path>) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    match output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
            });
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
