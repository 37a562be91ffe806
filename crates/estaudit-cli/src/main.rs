//! estaudit - pricing-estimate link audit CLI
//!
//! `scan` walks a docs corpus, audits every scenario against the reference
//! inventory, and writes the scan-results JSON (plus the needs-review
//! subset). `compare` recomputes comparison statuses over an existing
//! results file without rescanning.

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use estaudit_core::{AuditEngine, ReferenceIndex};
use estaudit_ingest::{load_inventory, CorpusScanner, RepoLocator};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod compare;
mod report;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Command::new("estaudit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pricing-estimate link audit over documentation scenarios")
        .subcommand_required(true)
        .subcommand(
            Command::new("scan")
                .about("Scan a docs corpus and compare against the reference inventory")
                .arg(
                    Arg::new("repo-root")
                        .long("repo-root")
                        .default_value(".")
                        .help("Repository root containing the docs tree"),
                )
                .arg(
                    Arg::new("docs-root")
                        .long("docs-root")
                        .default_value("docs")
                        .help("Docs directory, relative to the repo root"),
                )
                .arg(
                    Arg::new("repo")
                        .long("repo")
                        .default_value("MicrosoftDocs/architecture-center")
                        .help("GitHub repository slug for derived blob/raw URLs"),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .default_value("main")
                        .help("Branch name for derived GitHub URLs"),
                )
                .arg(
                    Arg::new("inventory")
                        .long("inventory")
                        .help("Reference inventory JSON (omit to treat every passing scenario as new)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .default_value("scan-results.json")
                        .help("Scan results output path"),
                )
                .arg(
                    Arg::new("review-output")
                        .long("review-output")
                        .help("Write the needs-review subset to this path"),
                )
                .arg(
                    Arg::new("debug-output")
                        .long("debug-output")
                        .help("Write the raw extraction records to this path"),
                )
                .arg(
                    Arg::new("sequential")
                        .long("sequential")
                        .action(ArgAction::SetTrue)
                        .help("Process scenarios on a single thread"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Recompute comparison statuses over existing scan results")
                .arg(
                    Arg::new("scan-results")
                        .long("scan-results")
                        .default_value("scan-results.json")
                        .help("Existing scan results to update"),
                )
                .arg(
                    Arg::new("inventory")
                        .long("inventory")
                        .required(true)
                        .help("Reference inventory JSON"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Output path (defaults to updating the input in place)"),
                )
                .arg(
                    Arg::new("review-output")
                        .long("review-output")
                        .help("Write the needs-review subset to this path"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("scan", matches)) => run_scan(matches),
        Some(("compare", matches)) => run_compare(matches),
        _ => unreachable!("subcommand is required"),
    }
}

fn run_scan(matches: &ArgMatches) -> anyhow::Result<()> {
    let repo_root = arg_path(matches, "repo-root");
    let docs_root = matches.get_one::<String>("docs-root").expect("defaulted");
    let output = arg_path(matches, "output");
    let inventory_path = matches.get_one::<String>("inventory");
    let sequential = matches.get_flag("sequential");

    let (index, warnings) = match inventory_path {
        Some(path) => {
            let records = load_inventory(Path::new(path))
                .with_context(|| format!("loading inventory {path}"))?;
            ReferenceIndex::build(records)
        }
        None => {
            warn!("no inventory supplied; every passing scenario will be a new-estimate candidate");
            (ReferenceIndex::default(), Vec::new())
        }
    };
    for warning in &warnings {
        warn!(%warning, "inventory data-quality warning");
    }

    let repo_slug = matches.get_one::<String>("repo").expect("defaulted");
    let branch = matches.get_one::<String>("branch").expect("defaulted");
    let records = CorpusScanner::new(&repo_root, docs_root.clone())
        .with_github(RepoLocator::new(repo_slug.clone(), branch.clone()))
        .scan()
        .context("scanning corpus")?;

    if let Some(path) = matches.get_one::<String>("debug-output") {
        report::write_json(Path::new(path), &records)?;
        info!(records = records.len(), path = %path, "wrote extraction records");
    }

    let engine = AuditEngine::new(index);
    let rows = report::build_rows(&engine, &records, !sequential);
    let scan_report = report::build_report(
        repo_slug,
        branch,
        docs_root,
        inventory_path.map(String::as_str),
        &warnings,
        rows,
    );

    report::write_json(&output, &scan_report)?;
    info!(
        total = scan_report.summary.total,
        criteria_passed = scan_report.summary.criteria_passed,
        needs_review = scan_report.summary.needs_review,
        output = %output.display(),
        "scan complete"
    );

    write_review_subset(matches, &scan_report)?;
    Ok(())
}

fn run_compare(matches: &ArgMatches) -> anyhow::Result<()> {
    let results_path = arg_path(matches, "scan-results");
    let inventory_path = matches.get_one::<String>("inventory").expect("required");
    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| results_path.clone());

    let mut scan_report = report::read_report(&results_path)?;
    let records = load_inventory(Path::new(inventory_path))
        .with_context(|| format!("loading inventory {inventory_path}"))?;

    let warnings = compare::recompare(&mut scan_report, records);
    for warning in &warnings {
        warn!(%warning, "inventory data-quality warning");
    }
    scan_report.inventory = Some(inventory_path.clone());

    report::write_json(&output, &scan_report)?;
    info!(
        same_estimate = scan_report.summary.same_estimate,
        new_estimate = scan_report.summary.new_estimate,
        new_candidates = scan_report.summary.new_candidates,
        output = %output.display(),
        "comparison updated"
    );

    write_review_subset(matches, &scan_report)?;
    Ok(())
}

fn write_review_subset(matches: &ArgMatches, scan_report: &report::ScanReport) -> anyhow::Result<()> {
    let Some(path) = matches.get_one::<String>("review-output") else {
        return Ok(());
    };
    let subset = report::review_rows(&scan_report.items);
    report::write_json(Path::new(path), &subset)?;
    info!(rows = subset.len(), path = %path, "wrote needs-review subset");
    Ok(())
}

fn arg_path(matches: &ArgMatches, name: &str) -> PathBuf {
    PathBuf::from(matches.get_one::<String>(name).expect("defaulted or required"))
}
