//! Handlers for `analyze`, `report` and `trend`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use sentrend_core::EngineConfig;
use sentrend_sentiment::{
    append_unified_csv, build_report, build_trend_report, write_counts_csv, write_means_csv,
    write_trend_csv, write_unified_csv, ReportInput, ReportOptions, SentimentError,
};

use crate::pipeline::{resolve_settings, run_pipeline, RunOutput};
use crate::PipelineArgs;

/// File names written by one `analyze` run, all prefixed with the run stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArtifactPaths {
    pub(crate) combined: PathBuf,
    pub(crate) counts_by_query: PathBuf,
    pub(crate) counts_by_query_source: PathBuf,
    pub(crate) means: PathBuf,
    pub(crate) trend: PathBuf,
}

impl ArtifactPaths {
    pub(crate) fn new(dir: &Path, run_at: DateTime<Utc>) -> Self {
        let stamp = run_at.format("%Y%m%d_%H%M%S");
        let file = |suffix: &str| dir.join(format!("{stamp}_{suffix}.csv"));
        Self {
            combined: file("combined_sentiment"),
            counts_by_query: file("counts_by_query"),
            counts_by_query_source: file("counts_by_query_source"),
            means: file("means"),
            trend: file("trend"),
        }
    }
}

fn write_artifact<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(BufWriter<File>) -> Result<(), SentimentError>,
{
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write(BufWriter::new(file)).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote artifact");
    Ok(())
}

fn render_report(config: &EngineConfig, output: &RunOutput, generated_at: DateTime<Utc>) -> String {
    let options = ReportOptions {
        sample_size: config.sample_size,
        ..ReportOptions::default()
    };
    build_report(
        &ReportInput {
            table: &output.unified.table,
            unify: &output.unified.report,
            aggregation: &output.aggregation,
            trend: &output.trend,
            generated_at,
        },
        &options,
    )
}

/// Write every CSV artifact for `output` and return the paths written.
///
/// With `append` set, unified rows go to that file (stamped with `run_at`)
/// instead of a fresh combined CSV.
pub(crate) fn write_artifacts(
    output: &RunOutput,
    output_dir: &Path,
    append: Option<&Path>,
    run_at: DateTime<Utc>,
) -> anyhow::Result<ArtifactPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;
    let paths = ArtifactPaths::new(output_dir, run_at);

    if let Some(target) = append {
        let outcome = append_unified_csv(target, &output.unified.table, Some(run_at))
            .with_context(|| format!("failed to append to {}", target.display()))?;
        if !outcome.added_columns.is_empty() {
            tracing::info!(columns = ?outcome.added_columns, "new metric columns");
        }
    } else {
        write_artifact(&paths.combined, |w| {
            write_unified_csv(w, &output.unified.table, None)
        })?;
    }

    write_artifact(&paths.counts_by_query, |w| {
        write_counts_csv(w, &output.aggregation.by_query)
    })?;
    write_artifact(&paths.counts_by_query_source, |w| {
        write_counts_csv(w, &output.aggregation.by_query_source)
    })?;
    write_artifact(&paths.means, |w| write_means_csv(w, &output.aggregation.by_query))?;
    write_artifact(&paths.trend, |w| write_trend_csv(w, &output.trend))?;

    Ok(paths)
}

/// Run the pipeline, write CSV artifacts and print the report.
///
/// # Errors
///
/// Returns an error if inputs cannot be read or artifacts cannot be written.
pub(crate) fn run_analyze(
    config: &EngineConfig,
    args: &PipelineArgs,
    output_dir: Option<PathBuf>,
    append: Option<&Path>,
) -> anyhow::Result<()> {
    let settings = resolve_settings(config, args)?;
    let output = run_pipeline(&args.inputs, &settings)?;
    let run_at = Utc::now();

    if output.unified.table.is_empty() {
        println!("no records accepted; nothing to analyze");
        return Ok(());
    }

    let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    write_artifacts(&output, &dir, append, run_at)?;
    println!("{}", render_report(config, &output, run_at));
    Ok(())
}

/// Run the pipeline and print the report.
///
/// # Errors
///
/// Returns an error if inputs cannot be read.
pub(crate) fn run_report(config: &EngineConfig, args: &PipelineArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(config, args)?;
    let output = run_pipeline(&args.inputs, &settings)?;
    println!("{}", render_report(config, &output, Utc::now()));
    Ok(())
}

/// Print the daily and rolling series per query.
///
/// # Errors
///
/// Returns an error if inputs cannot be read.
pub(crate) fn run_trend(
    config: &EngineConfig,
    args: &PipelineArgs,
    query: Option<&str>,
) -> anyhow::Result<()> {
    let settings = resolve_settings(config, args)?;
    let output = run_pipeline(&args.inputs, &settings)?;
    print!("{}", build_trend_report(&output.trend, query));
    Ok(())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
