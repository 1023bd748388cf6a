//! Bulk Turtle → property-graph ingestion binary.
//!
//! Reads one or more `.ttl` files (or directories of them), parses everything
//! into a single four-table property graph, and exports the tables as CSV or
//! JSON. Any parse error aborts the run before anything is written.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use mimalloc::MiMalloc;
use terrapin_graph::PropertyGraph;
use tracing::{error, info};

mod error;
mod export;

use error::{IngestError, Result};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "terrapin-ingest", about = "Bulk Turtle ingestion into property-graph tables")]
struct Args {
    /// Turtle files or directories to ingest (directories are scanned for
    /// *.ttl, sorted by name)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the exported tables
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Export format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Print table counts after ingestion
    #[arg(long)]
    summary: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn init_logging(quiet: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::EnvFilter;

    let default_filter = if quiet {
        "warn"
    } else {
        "terrapin_ingest=info,terrapin_turtle=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact());

    let _ = tracing::dispatcher::set_global_default(tracing::Dispatch::new(subscriber));
}

/// Expand the input arguments into a sorted list of .ttl files.
fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "ttl"))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        return Err(IngestError::NoInputs);
    }
    Ok(files)
}

fn ingest_file(graph: &mut PropertyGraph, path: &Path) -> Result<(usize, f64)> {
    let ttl = std::fs::read_to_string(path)?;
    let size_mb = ttl.len() as f64 / (1024.0 * 1024.0);

    let before = graph.edge_count();
    terrapin_turtle::parse(&ttl, graph).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((graph.edge_count() - before, size_mb))
}

fn run(args: &Args) -> Result<PropertyGraph> {
    let files = discover_inputs(&args.inputs)?;
    let total = files.len();
    info!("Found {} input file(s)", total);

    let mut graph = PropertyGraph::new();
    let mut total_mb = 0.0_f64;
    let run_start = Instant::now();

    for (i, path) in files.iter().enumerate() {
        let file_start = Instant::now();
        let (edges, size_mb) = ingest_file(&mut graph, path)?;
        let secs = file_start.elapsed().as_secs_f64();
        total_mb += size_mb;

        info!(
            "[{}/{}] {} ({:.1} MB): {} edges in {:.2}s ({:.1} MB/s)",
            i + 1,
            total,
            path.display(),
            size_mb,
            edges,
            secs,
            size_mb / secs.max(f64::EPSILON),
        );
    }

    let secs = run_start.elapsed().as_secs_f64();
    info!(
        "Ingestion complete: {} resources, {} literals, {} edges from {:.1} MB in {:.2}s ({:.1} MB/s)",
        graph.resource_count(),
        graph.literal_count(),
        graph.edge_count(),
        total_mb,
        secs,
        total_mb / secs.max(f64::EPSILON),
    );

    match args.format {
        Format::Csv => export::write_csv(&graph, &args.out_dir)?,
        Format::Json => export::write_json(&graph, &args.out_dir)?,
    }
    Ok(graph)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.quiet);

    match run(&args) {
        Ok(graph) => {
            if args.summary {
                println!("resource nodes:  {}", graph.resource_count());
                println!("literal nodes:   {}", graph.literal_count());
                println!("resource edges:  {}", graph.resource_edges().len());
                println!("literal edges:   {}", graph.literal_edges().len());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_sorts_and_filters() {
        let dir = std::env::temp_dir().join("terrapin-discover-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.ttl"), "").unwrap();
        std::fs::write(dir.join("a.ttl"), "").unwrap();
        std::fs::write(dir.join("notes.txt"), "").unwrap();

        let files = discover_inputs(&[dir.clone()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.ttl", "b.ttl"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let dir = std::env::temp_dir().join("terrapin-discover-empty");
        std::fs::create_dir_all(&dir).unwrap();
        assert!(matches!(
            discover_inputs(&[dir.clone()]),
            Err(IngestError::NoInputs)
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_failure_names_the_file() {
        let dir = std::env::temp_dir().join("terrapin-ingest-err-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.ttl");
        std::fs::write(&path, "this is not turtle").unwrap();

        let mut graph = PropertyGraph::new();
        let err = ingest_file(&mut graph, &path).unwrap_err();
        assert!(err.to_string().contains("bad.ttl"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
