//! regup - registry updater
#![allow(missing_docs)]
//!
//! Runs the built-in extraction rules against a `just-install` registry file
//! and rewrites the entries whose upstream version or download links moved.
//! The heavy lifting lives in `regup-core`; this crate parses flags, loads
//! and saves the registry, renders the results, and decides the exit code.

pub mod commit;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use regup_core::{Fetcher, Report, UpdateOptions, Updater, table};
use regup_schema::Registry;

#[derive(Debug, Parser)]
#[command(name = "regup")]
#[command(author, version, about = "Updates registry entries from upstream release pages")]
pub struct Cli {
    /// Path to the registry file (just-install.json)
    pub registry: PathBuf,

    /// Packages to update (default is all)
    pub packages: Vec<String>,

    /// Show more output
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not actually write the changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Update all entries including ones with a matching version
    #[arg(short, long)]
    pub force: bool,

    /// Save a commit message describing the changes to a file
    #[arg(short, long, value_name = "FILE")]
    pub commit_message_file: Option<PathBuf>,

    /// Do not output progress info
    #[arg(short, long)]
    pub quiet: bool,
}

/// Loads the registry, reconciles it, and reports.
///
/// Returns the process exit code: 1 when any package errored, else 0.
/// I/O failures and unknown package requests abort with an error instead.
pub async fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut registry = Registry::load(&cli.registry)
        .with_context(|| format!("could not load registry at {}", cli.registry.display()))?;

    let rules = table::builtin();
    let fetcher = Fetcher::new().context("could not build the HTTP clients")?;
    let options = UpdateOptions {
        packages: cli.packages.clone(),
        force: cli.force,
    };
    let report = Updater::new(&rules, &fetcher)
        .run(&mut registry, &options)
        .await?;

    // Written even on a dry run, like the registry is not.
    if let Some(path) = &cli.commit_message_file {
        fs::write(path, commit::render(&report))
            .with_context(|| format!("could not write commit message to {}", path.display()))?;
    }

    if !cli.dry_run {
        registry
            .save(&cli.registry)
            .with_context(|| format!("could not write registry at {}", cli.registry.display()))?;
    }

    print_results(&report, cli.dry_run);

    Ok(i32::from(report.has_errors()))
}

/// Prints the bucketed results. Error lines go to stderr so they survive
/// output redirection; everything else is ordinary program output.
fn print_results(report: &Report, dry_run: bool) {
    println!("\n===== RESULTS =====");
    if !report.no_rule.is_empty() {
        println!("No rule:");
        for name in &report.no_rule {
            println!("  {name}");
        }
        println!();
    }
    if !report.unchanged.is_empty() {
        println!("Unchanged:");
        for name in &report.unchanged {
            println!("  {name}");
        }
        println!();
    }
    if !report.updated.is_empty() {
        println!("Updated:");
        for (name, version) in &report.updated {
            println!("  {name} to {version}");
        }
        println!();
    }
    if !report.errored.is_empty() {
        println!("Errors:");
        for (name, error) in &report.errored {
            eprintln!("  {name}: {error}");
        }
        println!();
    }
    println!("Summary: {}", report.summary());

    if dry_run {
        println!("\nDRY RUN. NO CHANGES WERE MADE.");
    }
}
