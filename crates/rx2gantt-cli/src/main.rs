//! rx2gantt: medication-timeline generator for discharge order sheets.
//!
//! Takes a PDF (or a folder of PDFs), reconstructs the medication order
//! table from positioned text, and writes a classification summary CSV
//! and a time-scaled Gantt PNG next to each input.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;

use rx2gantt_core::{Classify, NoopClassifier};
use rx2gantt_rxnav::RxNavClient;

use rx2gantt_cli::discover::discover_documents;
use rx2gantt_cli::pipeline::{process_document, ProcessOptions, ProcessOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "rx2gantt",
    version,
    about = "Generate medication Gantt timelines and classification summaries from order-sheet PDFs"
)]
struct Cli {
    /// PDF file, or folder of PDFs to process as a batch
    input: PathBuf,

    /// Skip the Gantt PNG
    #[arg(long)]
    no_chart: bool,

    /// Skip the summary CSV
    #[arg(long)]
    no_summary: bool,

    /// Skip drug classification lookups (records export unclassified)
    #[arg(long)]
    offline: bool,

    /// Worker threads for batch processing (defaults to all cores)
    #[arg(long)]
    jobs: Option<usize>,

    /// Font file for chart labels (falls back to common system fonts)
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let documents = discover_documents(&cli.input)?;
    if documents.is_empty() {
        bail!("no PDF documents found in {}", cli.input.display());
    }

    let mut options = ProcessOptions::default();
    options.chart = !cli.no_chart;
    options.summary = !cli.no_summary;
    options.classify = !cli.offline;
    options.render.font_path = cli.font.clone();

    let classifier = build_classifier(cli.offline);

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }

    println!("Processing {} document(s)...", documents.len());

    let results: Vec<(PathBuf, Result<ProcessOutcome>)> = {
        use rayon::prelude::*;
        documents
            .par_iter()
            .map(|doc| (doc.clone(), process_document(doc, &options, classifier.as_ref())))
            .collect()
    };

    let mut failures = 0usize;
    for (document, result) in &results {
        match result {
            Ok(outcome) => report_outcome(outcome),
            Err(e) => {
                failures += 1;
                println!("{} {}: {e:#}", "✗".red(), document.display());
            }
        }
    }

    let succeeded = results.len() - failures;
    println!("Done: {succeeded} succeeded, {failures} failed.");
    if succeeded == 0 {
        bail!("all {} document(s) failed", failures);
    }
    Ok(())
}

/// Pick the classifier for this run. Offline mode and an unreachable
/// classification service both degrade to the no-op classifier so the
/// timeline and summary still export.
fn build_classifier(offline: bool) -> Box<dyn Classify> {
    if offline {
        log::info!("offline mode, skipping classification");
        return Box::new(NoopClassifier);
    }
    match RxNavClient::new() {
        Ok(client) if client.is_online() => Box::new(client),
        Ok(_) => {
            log::warn!("classification service unreachable, records will export unclassified");
            Box::new(NoopClassifier)
        }
        Err(e) => {
            log::warn!("classification client unavailable ({e}), records will export unclassified");
            Box::new(NoopClassifier)
        }
    }
}

fn report_outcome(outcome: &ProcessOutcome) {
    if outcome.nothing_to_render {
        println!(
            "{} {}: no valid medication records",
            "✓".yellow(),
            outcome.input.display()
        );
    } else {
        println!(
            "{} {}: {} record(s)",
            "✓".green(),
            outcome.input.display(),
            outcome.records
        );
    }
    if let Some(path) = &outcome.summary_csv {
        println!("    summary: {}", path.display());
    }
    if let Some(path) = &outcome.gantt_png {
        println!("    gantt:   {}", path.display());
    }
}
