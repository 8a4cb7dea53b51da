//! Evaluate command implementation.

use anyhow::{anyhow, bail, Context, Result};
use a11y_eval_core::{load_ruleset_from_file, Config, EvaluationResult, Evaluator, SnapshotNode};
use a11y_eval_rules::Preset;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Directories never searched for snapshots.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

/// Options of the evaluate command.
#[derive(Debug, Default)]
pub struct Options {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule ids or patterns.
    pub rules: Option<String>,
    /// Declarative ruleset file.
    pub ruleset: Option<PathBuf>,
    /// Page title override.
    pub title: Option<String>,
    /// Page URL override.
    pub url: Option<String>,
    /// Include passed and hidden results.
    pub include_passed: bool,
}

/// One evaluated snapshot.
pub struct Page {
    /// Snapshot file.
    pub path: PathBuf,
    /// Evaluation of the snapshot.
    pub result: EvaluationResult,
}

/// Runs the evaluate command.
///
/// Returns `true` when any page has results at or above the configured
/// `fail_on` kind.
pub fn run(path: &Path, options: &Options, source: &ConfigSource) -> Result<bool> {
    let config = source.load()?;
    let fail_on = config.fail_threshold()?;
    let include_passed = options.include_passed || config.evaluator.include_passed;

    let evaluator = build_evaluator(config, options)?;
    let files = collect_snapshots(path)?;

    tracing::info!(
        "Evaluating {} snapshot(s) with {} rule(s)",
        files.len(),
        evaluator.rule_count()
    );

    let pages = evaluate_all(&evaluator, &files, options)?;

    super::output::print(&pages, options.format, include_passed)?;

    Ok(pages
        .iter()
        .any(|p| p.result.has_results_at_least(fail_on)))
}

fn build_evaluator(config: Config, options: &Options) -> Result<Evaluator> {
    let preset = match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => Preset::from_name(name).with_context(|| {
            format!(
                "Unknown preset `{name}`. Valid presets: {}",
                Preset::NAMES.join(", ")
            )
        })?,
    };

    let mut builder = match &options.ruleset {
        Some(path) => {
            let catalog = Preset::Strict.catalog(&config);
            let ruleset = load_ruleset_from_file(path, &catalog)
                .with_context(|| format!("Failed to load ruleset: {}", path.display()))?;
            tracing::info!("Using ruleset {}", ruleset.identity());
            Evaluator::builder().catalog(catalog).ruleset(ruleset)
        }
        None => preset.apply(Evaluator::builder(), &config),
    };

    if let Some(filter) = &options.rules {
        let patterns: Vec<&str> = filter
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        builder = builder.only(patterns);
    }

    let evaluator = builder
        .config(config)
        .build()
        .context("Failed to build evaluator")?;
    if evaluator.rule_count() == 0 {
        tracing::warn!("No rules selected");
    }
    Ok(evaluator)
}

/// Snapshot files under `path`, sorted by name.
fn collect_snapshots(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e));
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read {}", path.display()))?;
        let is_json = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        bail!("No snapshot files found in {}", path.display());
    }
    Ok(files)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

/// Evaluates every file, a batch of at most one file per core at a time.
fn evaluate_all(evaluator: &Evaluator, files: &[PathBuf], options: &Options) -> Result<Vec<Page>> {
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let mut pages = Vec::with_capacity(files.len());

    for batch in files.chunks(workers) {
        let results: Vec<Result<Page>> = std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|file| (file, scope.spawn(move || evaluate_file(evaluator, file, options))))
                .collect();
            handles
                .into_iter()
                .map(|(file, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(anyhow!("Evaluation of {} panicked", file.display())))
                })
                .collect()
        });
        for result in results {
            pages.push(result?);
        }
    }

    Ok(pages)
}

fn evaluate_file(evaluator: &Evaluator, path: &Path, options: &Options) -> Result<Page> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let page = SnapshotNode::from_json(&json)
        .with_context(|| format!("Invalid snapshot: {}", path.display()))?;

    let title = options.title.as_deref().unwrap_or_default();
    let url = options
        .url
        .clone()
        .unwrap_or_else(|| path.display().to_string());

    Ok(Page {
        path: path.to_path_buf(),
        result: evaluator.evaluate(&page, title, &url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r#"{
        "kind": "document",
        "children": [
            { "tag": "html", "attributes": [["lang", "en"]], "children": [
                { "tag": "body", "children": [
                    { "tag": "img", "attributes": [["src", "a.png"]] }
                ] }
            ] }
        ]
    }"#;

    fn config_source(dir: &Path, content: &str) -> ConfigSource {
        let path = dir.join("a11y-eval.toml");
        fs::write(&path, content).unwrap();
        ConfigSource::Project(path)
    }

    #[test]
    fn collects_json_files_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages/nested")).unwrap();
        fs::create_dir_all(tmp.path().join("target")).unwrap();
        fs::create_dir_all(tmp.path().join(".cache")).unwrap();
        fs::write(tmp.path().join("pages/b.json"), PAGE).unwrap();
        fs::write(tmp.path().join("pages/a.json"), PAGE).unwrap();
        fs::write(tmp.path().join("pages/nested/c.JSON"), PAGE).unwrap();
        fs::write(tmp.path().join("pages/notes.txt"), "").unwrap();
        fs::write(tmp.path().join("target/skip.json"), PAGE).unwrap();
        fs::write(tmp.path().join(".cache/skip.json"), PAGE).unwrap();

        let files = collect_snapshots(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("pages/a.json"),
                PathBuf::from("pages/b.json"),
                PathBuf::from("pages/nested/c.JSON"),
            ]
        );
    }

    #[test]
    fn empty_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = collect_snapshots(tmp.path()).unwrap_err();
        assert!(err.to_string().starts_with("No snapshot files found"));
    }

    #[test]
    fn rules_filter_limits_plan() {
        let options = Options {
            rules: Some("IMAGE_*, TITLE_1".to_string()),
            ..Options::default()
        };
        let evaluator = build_evaluator(Config::default(), &options).unwrap();
        let ids: Vec<_> = evaluator.planned_rules().map(|(id, _)| id).collect();
        assert_eq!(ids, ["IMAGE_1", "IMAGE_2", "TITLE_1"]);
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let config = Config::parse("preset = \"lenient\"\n").unwrap();
        let err = build_evaluator(config, &Options::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown preset `lenient`"));
    }

    #[test]
    fn evaluates_directory_and_reports_failure() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.json"), PAGE).unwrap();
        fs::write(tmp.path().join("two.json"), PAGE).unwrap();
        let source = config_source(tmp.path(), "preset = \"minimal\"\n");

        let options = Options {
            format: OutputFormat::Compact,
            rules: Some("IMAGE_1".to_string()),
            ..Options::default()
        };
        assert!(run(tmp.path(), &options, &source).unwrap());

        let evaluator = build_evaluator(source.load().unwrap(), &options).unwrap();
        let files = collect_snapshots(tmp.path()).unwrap();
        let pages = evaluate_all(&evaluator, &files, &options).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].path.ends_with("one.json"));
        assert_eq!(pages[0].result.summary().violations, 1);
    }

    #[test]
    fn fail_on_controls_exit_status() {
        let tmp = TempDir::new().unwrap();
        let page = tmp.path().join("page.json");
        fs::write(&page, PAGE).unwrap();
        let options = Options {
            format: OutputFormat::Compact,
            rules: Some("IMAGE_1".to_string()),
            ..Options::default()
        };

        let lenient = config_source(tmp.path(), "[rules.IMAGE_1]\nrequired = false\n");
        assert!(!run(&page, &options, &lenient).unwrap());

        let strict = config_source(
            tmp.path(),
            "fail_on = \"warning\"\n[rules.IMAGE_1]\nrequired = false\n",
        );
        assert!(run(&page, &options, &strict).unwrap());
    }

    #[test]
    fn invalid_snapshot_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let page = tmp.path().join("broken.json");
        fs::write(&page, "{ not json").unwrap();

        let err = run(&page, &Options::default(), &ConfigSource::Default).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
