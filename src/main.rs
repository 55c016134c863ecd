//! CLI entry point for preflight.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use preflight::status::{self, Status};
use preflight::{checks, facts, modules, report, utc_now_iso};

#[derive(Parser)]
#[command(name = "preflight")]
#[command(version)]
#[command(about = "Validate Expo iOS project contracts before a build may proceed", long_about = None)]
struct Cli {
    /// Project directory to validate
    #[arg(long, value_name = "PATH")]
    project_dir: PathBuf,

    /// Optional path to write the machine-readable validation report JSON
    #[arg(long, value_name = "PATH")]
    report_path: Option<PathBuf>,

    /// Suppress per-check output; print only the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(Status::Pass) => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            std::process::exit(2);
        }
    }
}

fn run(cli: &Cli) -> Result<Status> {
    let started_at = utc_now_iso();

    let facts = facts::gather(&cli.project_dir);
    let evaluation = checks::run_checks(&facts);
    let module_checks = modules::run_module_checks(&facts);

    let infra = status::infra_status(&evaluation.checks);
    let feature = status::feature_status(&module_checks);
    let overall = status::overall_status(infra, feature, &evaluation.checks);

    let finished_at = utc_now_iso();

    if !cli.quiet {
        report::print_results(&evaluation.checks, &module_checks);
        report::print_warnings(&evaluation.warnings);
    }
    report::print_summary(overall);

    if let Some(report_path) = &cli.report_path {
        let document = report::Report::new(
            overall,
            infra,
            feature,
            started_at,
            finished_at,
            &facts.project_dir,
            evaluation.checks,
            module_checks,
            evaluation.warnings,
        );
        let written = report::write_report(&document, report_path)?;
        println!("{} Wrote report: {}", "[OK]".green(), written.display());
    }

    Ok(overall)
}
