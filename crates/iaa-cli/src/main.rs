//! IAA CLI - inter-annotator agreement reports
//!
//! ## Commands
//!
//! - `report`: Krippendorff's alpha and pairwise proportional agreement for
//!   the original and clean variants of an experiment run
//! - `pairs`: list the annotator pairs compared for an item with `k` judgements

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iaa_core::{
    enumerate_pairs, init_tracing, pair_count, write_agreement_report_json, AgreementOrchestrator,
    AgreementReportArtifact, Cleaner, CommandCleaner, FsRecordLoader, NoopCleaner,
    NormalizingParser, Selector, Variant,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

use config::{FileConfig, Overrides};

#[derive(Parser)]
#[command(name = "iaa")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inter-annotator agreement for crowd-sourced experiments", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute agreement for each dataset variant of a run
    Report {
        /// Config file (default: ./iaa.toml if present)
        #[arg(short, long, env = "IAA_CONFIG")]
        config: Option<PathBuf>,

        /// Root directory of experiment data
        #[arg(long, env = "IAA_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Experiment run number
        #[arg(long)]
        run: Option<u32>,

        /// Experiment group
        #[arg(long)]
        group: Option<String>,

        /// Batch selector ("*" for all)
        #[arg(long)]
        batch: Option<Selector>,

        /// Question-set selector ("*" for all)
        #[arg(long)]
        questions: Option<Selector>,

        /// Keep judgements that failed or skipped validation
        #[arg(long)]
        keep_not_val: bool,

        /// Variant to report (repeatable; default: original, clean)
        #[arg(long = "variant")]
        variants: Vec<Variant>,

        /// Command that writes the clean dataset (whitespace-separated)
        #[arg(long, env = "IAA_CLEAN_CMD")]
        clean_cmd: Option<String>,

        /// Timeout for the clean command in seconds (0 = none)
        #[arg(long)]
        clean_timeout: Option<u64>,

        /// Also write a JSON report artifact to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Show the annotator pairs compared for an item with k judgements
    Pairs {
        /// Number of judgements for the item
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Report {
            config,
            data_dir,
            run,
            group,
            batch,
            questions,
            keep_not_val,
            variants,
            clean_cmd,
            clean_timeout,
            json_out,
        } => {
            let overrides = Overrides {
                data_dir,
                run,
                group,
                batch,
                questions,
                keep_not_val,
                variants,
                clean_cmd,
                clean_timeout_secs: clean_timeout,
            };
            cmd_report(config, overrides, json_out).await
        }
        Commands::Pairs { k } => cmd_pairs(k),
    }
}

async fn cmd_report(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    json_out: Option<PathBuf>,
) -> Result<()> {
    let file = FileConfig::load(config_path.as_deref())?;
    let settings = config::resolve(file, overrides)?;

    info!(
        data_dir = %settings.data_dir.display(),
        run = settings.selection.run,
        group = %settings.selection.group,
        "starting agreement report"
    );

    let cleaner: Arc<dyn Cleaner> = match &settings.clean_command {
        Some(argv) => Arc::new(CommandCleaner::new(
            argv.clone(),
            settings.clean_timeout_secs,
        )),
        None => Arc::new(NoopCleaner),
    };
    let parser = NormalizingParser::new().context("Failed to build answer parser")?;

    let orchestrator = AgreementOrchestrator::new(
        Arc::new(FsRecordLoader::new(&settings.data_dir)),
        cleaner,
        Arc::new(parser),
    );

    println!("--- analyzing run {} ---", settings.selection.run);
    let mut stdout = std::io::stdout();
    let reports = orchestrator
        .run_variants(&settings.selection, &settings.variants, &mut stdout)
        .await
        .with_context(|| {
            format!(
                "Agreement analysis failed for run {} of group {}",
                settings.selection.run, settings.selection.group
            )
        })?;

    if let Some(path) = json_out {
        let artifact = AgreementReportArtifact::new(settings.selection.clone(), reports);
        write_agreement_report_json(&path, &artifact)?;
        info!(path = %path.display(), "wrote agreement report");
    }
    Ok(())
}

fn cmd_pairs(k: usize) -> Result<()> {
    println!("{} annotators -> {} pairs", k, pair_count(k));
    for (i, j) in enumerate_pairs(k) {
        println!("  ({}, {})", i, j);
    }
    Ok(())
}
