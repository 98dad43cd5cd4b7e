//! Command-line analyzer: consolidates a credit report document and optional
//! transaction CSVs into a summary JSON file.

use anyhow::Context;
use rust_credit_api::consolidate::consolidate;
use rust_credit_api::document::{DocumentConverter, PlainTextConverter};
use rust_credit_api::extraction::FieldExtractor;
use rust_credit_api::subscriptions::detect_subscriptions;
use rust_credit_api::tabular::{classify_rows, TabularSummary};
use std::fs::File;
use std::path::PathBuf;

const USAGE: &str = "usage: analyze_report <REPORT> [--csv FILE]... [--output FILE]";

/// Main entry point for the report analysis utility.
///
/// Extracts fields and subscriptions from the report, classifies any given
/// CSVs, and writes the consolidated summary as JSON.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut report_path: Option<PathBuf> = None;
    let mut csv_paths: Vec<PathBuf> = Vec::new();
    let mut output_path = PathBuf::from("summary.json");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--report" => {
                report_path = Some(args.next().map(PathBuf::from).context(USAGE)?);
            }
            "--csv" => {
                csv_paths.push(args.next().map(PathBuf::from).context(USAGE)?);
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).context(USAGE)?;
            }
            other if report_path.is_none() && !other.starts_with("--") => {
                report_path = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("unrecognized argument: {} ({})", other, USAGE),
        }
    }
    let report_path = report_path.context(USAGE)?;

    println!("Extracting text from report: {}", report_path.display());
    let text = PlainTextConverter
        .extract_text(&report_path)
        .with_context(|| format!("failed to read report {}", report_path.display()))?;

    println!("Extracting credit information from report...");
    let fields = FieldExtractor::new().extract(&text);

    println!("Extracting subscription services from report...");
    let text_subscriptions = detect_subscriptions(&text);

    let mut tabular = TabularSummary::default();
    for path in &csv_paths {
        println!("Parsing tabular file: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let parsed =
            classify_rows(file).with_context(|| format!("failed to parse {}", path.display()))?;
        tabular.merge(parsed);
    }

    println!("Consolidating extracted information...");
    let summary = consolidate(fields, text_subscriptions, tabular);

    let rendered = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&output_path, &rendered)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    println!("Summary saved to {}", output_path.display());
    println!("{}", rendered);

    Ok(())
}
