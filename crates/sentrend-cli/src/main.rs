mod commands;
mod pipeline;

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sentrend")]
#[command(about = "Sentiment aggregation and trend engine for collected social posts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// How the rolling trend treats days with no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GapArg {
    /// Roll over the last N observed days
    Skip,
    /// Roll over the last N calendar days
    Calendar,
}

/// Options shared by every command that runs the pipeline.
#[derive(Debug, Args)]
pub(crate) struct PipelineArgs {
    /// Collector output files, one JSON record per line
    #[arg(long = "input", required = true, num_args = 1..)]
    pub(crate) inputs: Vec<PathBuf>,

    /// Rolling-mean window (overrides `SENTREND_TREND_WINDOW`)
    #[arg(long)]
    pub(crate) window: Option<usize>,

    /// Minimum normalized text length (overrides `SENTREND_MIN_TEXT_LEN`)
    #[arg(long)]
    pub(crate) min_text_len: Option<usize>,

    /// Query-group file (overrides `SENTREND_QUERIES_PATH`)
    #[arg(long)]
    pub(crate) queries: Option<PathBuf>,

    /// Treatment of days without records in the rolling trend
    #[arg(long, value_enum, default_value_t = GapArg::Skip)]
    pub(crate) gaps: GapArg,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline, write CSV artifacts and print the report
    Analyze {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Directory for CSV artifacts (overrides `SENTREND_OUTPUT_DIR`)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Append unified rows to this CSV instead of writing a new combined file
        #[arg(long)]
        append: Option<PathBuf>,
    },
    /// Run the pipeline and print the markdown report only
    Report {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print daily and rolling sentiment per query
    Trend {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Show a single query group
        #[arg(long)]
        query: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let config = sentrend_core::load_engine_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze {
            pipeline,
            output_dir,
            append,
        }) => commands::run_analyze(&config, &pipeline, output_dir, append.as_deref())?,
        Some(Commands::Report { pipeline }) => commands::run_report(&config, &pipeline)?,
        Some(Commands::Trend { pipeline, query }) => {
            commands::run_trend(&config, &pipeline, query.as_deref())?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
