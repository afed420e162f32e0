//! One run-cycle: read collector files, unify, aggregate, roll the trend.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sentrend_core::{load_queries, EngineConfig, QueriesFile};
use sentrend_sentiment::{
    aggregate, read_jsonl_file, trend_with_policy, unify, AggregationResult, GapPolicy,
    IngestOutcome, TrendSeries, Unified, UnifyConfig,
};

use crate::{GapArg, PipelineArgs};

/// Config values after command-line overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub(crate) window: usize,
    pub(crate) gap_policy: GapPolicy,
    pub(crate) unify: UnifyConfig,
}

impl From<GapArg> for GapPolicy {
    fn from(arg: GapArg) -> Self {
        match arg {
            GapArg::Skip => GapPolicy::Skip,
            GapArg::Calendar => GapPolicy::Calendar,
        }
    }
}

/// Load query groups.
///
/// An explicitly requested file must exist. The configured default is
/// optional; without it records keep their raw query labels.
fn load_query_groups(
    explicit: Option<&Path>,
    default: &Path,
) -> anyhow::Result<Option<QueriesFile>> {
    if let Some(path) = explicit {
        let queries = load_queries(path)
            .with_context(|| format!("failed to load query groups from {}", path.display()))?;
        return Ok(Some(queries));
    }
    if !default.exists() {
        tracing::warn!(
            path = %default.display(),
            "query group file not found; queries are not grouped"
        );
        return Ok(None);
    }
    let queries = load_queries(default)
        .with_context(|| format!("failed to load query groups from {}", default.display()))?;
    Ok(Some(queries))
}

/// Merge `config` with the command-line overrides in `args`.
///
/// # Errors
///
/// Returns an error if the window is zero or a query group file cannot be
/// loaded.
pub(crate) fn resolve_settings(
    config: &EngineConfig,
    args: &PipelineArgs,
) -> anyhow::Result<RunSettings> {
    let window = args.window.unwrap_or(config.trend_window);
    anyhow::ensure!(window >= 1, "--window must be at least 1");

    let mut unify = UnifyConfig::from_engine_config(config);
    if let Some(min) = args.min_text_len {
        unify.min_text_len = min;
    }
    if let Some(queries) = load_query_groups(args.queries.as_deref(), &config.queries_path)? {
        tracing::debug!(groups = ?queries.names(), "loaded query groups");
        unify = unify.with_queries(&queries);
    }

    Ok(RunSettings {
        window,
        gap_policy: args.gaps.into(),
        unify,
    })
}

/// Everything a run-cycle produces.
pub(crate) struct RunOutput {
    pub(crate) unified: Unified,
    pub(crate) aggregation: AggregationResult,
    pub(crate) trend: TrendSeries,
}

/// Read every input file and run the pipeline over their combined records.
///
/// # Errors
///
/// Returns an error if an input file cannot be read. Undecodable lines and
/// rejected records are counted, not fatal.
pub(crate) fn run_pipeline(inputs: &[PathBuf], settings: &RunSettings) -> anyhow::Result<RunOutput> {
    let mut ingested = IngestOutcome::default();
    for path in inputs {
        let outcome = read_jsonl_file(path)
            .with_context(|| format!("failed to read collector output {}", path.display()))?;
        ingested.extend(outcome);
    }

    let mut unified = unify(ingested.records, &settings.unify);
    unified.report.absorb(ingested.rejections);

    if unified.report.rejected_count() > 0 {
        let by_kind = unified.report.rejected_by_kind();
        tracing::warn!(
            rejected = unified.report.rejected_count(),
            ?by_kind,
            "some records were rejected"
        );
    }

    let aggregation = aggregate(&unified.table);
    let trend = trend_with_policy(&unified.table, settings.window, settings.gap_policy);

    Ok(RunOutput {
        unified,
        aggregation,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("sentrend-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn args(inputs: Vec<PathBuf>) -> PipelineArgs {
        PipelineArgs {
            inputs,
            window: None,
            min_text_len: None,
            queries: None,
            gaps: GapArg::Skip,
        }
    }

    fn config_without_queries(dir: &Path) -> EngineConfig {
        EngineConfig {
            queries_path: dir.join("missing-queries.yaml"),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn settings_take_config_defaults() {
        let dir = scratch_dir("defaults");
        let settings = resolve_settings(&config_without_queries(&dir), &args(vec![])).unwrap();
        assert_eq!(settings.window, 7);
        assert_eq!(settings.gap_policy, GapPolicy::Skip);
        assert_eq!(settings.unify.min_text_len, 10);
        assert!(settings.unify.query_aliases.is_empty());
    }

    #[test]
    fn cli_values_override_config() {
        let dir = scratch_dir("overrides");
        let mut a = args(vec![]);
        a.window = Some(3);
        a.min_text_len = Some(25);
        a.gaps = GapArg::Calendar;
        let settings = resolve_settings(&config_without_queries(&dir), &a).unwrap();
        assert_eq!(settings.window, 3);
        assert_eq!(settings.unify.min_text_len, 25);
        assert_eq!(settings.gap_policy, GapPolicy::Calendar);
    }

    #[test]
    fn zero_window_is_rejected() {
        let dir = scratch_dir("zero-window");
        let mut a = args(vec![]);
        a.window = Some(0);
        assert!(resolve_settings(&config_without_queries(&dir), &a).is_err());
    }

    #[test]
    fn explicit_missing_queries_file_is_an_error() {
        let dir = scratch_dir("explicit-queries");
        let mut a = args(vec![]);
        a.queries = Some(dir.join("nope.yaml"));
        assert!(resolve_settings(&config_without_queries(&dir), &a).is_err());
    }

    #[test]
    fn queries_file_populates_aliases() {
        let dir = scratch_dir("queries");
        let path = dir.join("queries.yaml");
        fs::write(&path, "queries:\n  - name: UAE\n    aliases: [Dubai]\n").unwrap();
        let mut a = args(vec![]);
        a.queries = Some(path);
        let settings = resolve_settings(&config_without_queries(&dir), &a).unwrap();
        assert_eq!(
            settings.unify.query_aliases.get("dubai").map(String::as_str),
            Some("UAE")
        );
    }

    #[test]
    fn pipeline_combines_files_and_counts_bad_lines() {
        let dir = scratch_dir("pipeline");
        let reddit = dir.join("reddit.jsonl");
        let bluesky = dir.join("bluesky.jsonl");
        fs::write(
            &reddit,
            concat!(
                r#"{"source":"Reddit","id":"t3_1","text":"Doha was wonderful this week","author":"a","created_at":"2024-03-01T10:00:00Z","source_specific_metrics":{"subreddit":"qatar"},"query":"Qatar"}"#,
                "\n",
                "{broken\n"
            ),
        )
        .unwrap();
        fs::write(
            &bluesky,
            r#"{"source":"Bluesky","id":"at://1","text":"Qatar airport delays were terrible","author":"b","created_at":1709460000,"source_specific_metrics":{"like_count":2},"query":"Qatar"}"#,
        )
        .unwrap();

        let settings = resolve_settings(&config_without_queries(&dir), &args(vec![])).unwrap();
        let output = run_pipeline(&[reddit, bluesky], &settings).unwrap();

        assert_eq!(output.unified.report.accepted, 2);
        assert_eq!(output.unified.report.rejected_count(), 1);
        let counts = output.aggregation.counts_for_query("Qatar").unwrap();
        assert_eq!(counts.total(), 2);
        assert_eq!(output.trend.queries["Qatar"].daily.len(), 2);
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let dir = scratch_dir("unreadable");
        let settings = resolve_settings(&config_without_queries(&dir), &args(vec![])).unwrap();
        let err = run_pipeline(&[dir.join("absent.jsonl")], &settings)
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("failed to read collector output"));
    }
}
