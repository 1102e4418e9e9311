//! Integration tests for the per-module loader pipeline.
//!
//! A counting stub engine stands in for the linter and a recording host
//! stands in for the bundler.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cslint_core::{
    CacheError, CacheSetting, EngineError, Formatter, HostCapabilities, Issue, LintEngine, Loader,
    LoaderContext, LoaderError, LoaderOptions, ReportPayload, Reporter, RuleSet,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

struct CountingEngine {
    issues: Vec<Issue>,
    calls: AtomicUsize,
    seen_rules: Mutex<Vec<RuleSet>>,
    fail: bool,
}

impl CountingEngine {
    fn new(issues: Vec<Issue>) -> Arc<Self> {
        Arc::new(Self {
            issues,
            calls: AtomicUsize::new(0),
            seen_rules: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            issues: Vec::new(),
            calls: AtomicUsize::new(0),
            seen_rules: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LintEngine for CountingEngine {
    fn version(&self) -> &str {
        "2.1.0"
    }

    fn lint(
        &self,
        _source: &str,
        rules: &RuleSet,
        _literate: bool,
    ) -> Result<Vec<Issue>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_rules.lock().push(rules.clone());
        if self.fail {
            return Err(EngineError::output("linter crashed"));
        }
        Ok(self.issues.clone())
    }
}

struct RecordingHost {
    resource_path: PathBuf,
    global: LoaderOptions,
    options: LoaderOptions,
    capabilities: HostCapabilities,
    dependencies: Vec<PathBuf>,
    cacheable: bool,
    warnings: Vec<ReportPayload>,
    errors: Vec<ReportPayload>,
}

impl RecordingHost {
    fn new(resource_path: PathBuf, options: LoaderOptions) -> Self {
        Self {
            resource_path,
            global: LoaderOptions::default(),
            options,
            capabilities: HostCapabilities::full(),
            dependencies: Vec::new(),
            cacheable: false,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl LoaderContext for RecordingHost {
    fn global_options(&self) -> LoaderOptions {
        self.global.clone()
    }

    fn loader_options(&self) -> LoaderOptions {
        self.options.clone()
    }

    fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    fn cacheable(&mut self) {
        self.cacheable = true;
    }

    fn add_dependency(&mut self, path: &Path) {
        self.dependencies.push(path.to_path_buf());
    }

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn emit_warning(&mut self, payload: ReportPayload) {
        self.warnings.push(payload);
    }

    fn emit_error(&mut self, payload: ReportPayload) {
        self.errors.push(payload);
    }
}

struct Fixture {
    temp_dir: TempDir,
    rules_path: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let rules_path = temp_dir.path().join("coffeelint.json");
        fs::write(
            &rules_path,
            r#"{
                // project rules
                "no_tabs": { "level": "error" }
            }"#,
        )
        .unwrap();
        Self {
            temp_dir,
            rules_path,
        }
    }

    fn options(&self, cache: bool) -> LoaderOptions {
        LoaderOptions {
            config_file: Some(self.rules_path.clone()),
            cache: Some(if cache {
                CacheSetting::Directory(self.temp_dir.path().join("cache"))
            } else {
                CacheSetting::Enabled(false)
            }),
            ..Default::default()
        }
    }

    fn host(&self, options: LoaderOptions) -> RecordingHost {
        RecordingHost::new(self.temp_dir.path().join("src").join("app.coffee"), options)
    }

    fn loader(&self, engine: &Arc<CountingEngine>) -> Loader {
        Loader::new(Arc::clone(engine))
            .with_formatter(Formatter::plain())
            .with_working_dir(self.temp_dir.path())
    }
}

const SOURCE: &str = "square = (x) -> x * x\n";

#[tokio::test]
async fn test_clean_module_passes_through() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let mut host = fixture.host(fixture.options(true));

    let output = fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), Some("{\"version\":3}".to_string()))
        .await
        .unwrap();

    assert_eq!(output.source, SOURCE);
    assert_eq!(output.source_map.as_deref(), Some("{\"version\":3}"));
    assert!(host.warnings.is_empty());
    assert!(host.errors.is_empty());
    assert!(host.cacheable);
    assert_eq!(host.dependencies, vec![fixture.rules_path.clone()]);
}

#[tokio::test]
async fn test_cache_hit_skips_engine() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "max_line_length", "too long")]);
    let loader = fixture.loader(&engine);

    for _ in 0..3 {
        let mut host = fixture.host(fixture.options(true));
        loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();
        assert_eq!(host.warnings.len(), 1);
    }
    assert_eq!(engine.calls(), 1);

    let mut host = fixture.host(fixture.options(true));
    loader
        .run(&mut host, "cube = (x) -> x * x * x\n".to_string(), None)
        .await
        .unwrap();
    assert_eq!(engine.calls(), 2);
}

#[tokio::test]
async fn test_changed_rule_invalidates_cache() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let loader = fixture.loader(&engine);

    let mut host = fixture.host(fixture.options(true));
    loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();

    fs::write(&fixture.rules_path, r#"{ "no_tabs": { "level": "ignore" } }"#).unwrap();
    let mut host = fixture.host(fixture.options(true));
    loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();

    let mut options = fixture.options(true);
    options.quiet = Some(true);
    let mut host = fixture.host(options);
    loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();

    assert_eq!(engine.calls(), 3);
}

#[tokio::test]
async fn test_cache_disabled_runs_engine_every_time() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let loader = fixture.loader(&engine);

    for _ in 0..2 {
        let mut host = fixture.host(fixture.options(false));
        loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();
    }

    assert_eq!(engine.calls(), 2);
    assert!(!fixture.temp_dir.path().join("cache").exists());
}

#[tokio::test]
async fn test_file_rules_override_inline_rules() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let mut options = fixture.options(false);
    options.rules = match json!({
        "no_tabs": { "level": "warn" },
        "max_line_length": { "value": 120 }
    }) {
        serde_json::Value::Object(map) => Some(map),
        _ => unreachable!(),
    };
    let mut host = fixture.host(options);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    let seen = engine.seen_rules.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["no_tabs"], json!({ "level": "error" }));
    assert_eq!(seen[0]["max_line_length"], json!({ "value": 120 }));
}

#[tokio::test]
async fn test_errors_are_emitted_as_errors() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![
        Issue::error(1, "no_tabs", "Line contains tab indentation"),
        Issue::error(4, "no_tabs", "Line contains tab indentation"),
    ]);
    let mut host = fixture.host(fixture.options(false));

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert!(host.warnings.is_empty());
    assert_eq!(host.errors.len(), 1);
    let payload = &host.errors[0];
    assert!(matches!(payload, ReportPayload::Structured(_)));
    assert!(payload.text().starts_with("\nsrc/app.coffee\n"));
    assert!(payload.text().contains("2 problems (2 errors, 0 warnings)"));
}

#[tokio::test]
async fn test_fail_on_warning() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(2, "max_line_length", "too long")]);
    let mut options = fixture.options(false);
    options.fail_on_warning = Some(true);
    let mut host = fixture.host(options);

    let err = fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap_err();

    match err {
        LoaderError::LintFailed(report) => {
            assert!(
                report
                    .message()
                    .starts_with("Module failed because of a cslint warning.")
            );
            assert!(report.message().contains("1 problem (0 errors, 1 warning)"));
        }
        other => panic!("expected a lint failure, got {:?}", other),
    }
    assert!(host.warnings.is_empty());
}

#[tokio::test]
async fn test_emit_warning_overrides_error_channel() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::error(1, "no_tabs", "tab")]);
    let mut options = fixture.options(false);
    options.emit_warning = Some(true);
    let mut host = fixture.host(options);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert_eq!(host.warnings.len(), 1);
    assert!(host.errors.is_empty());
}

#[tokio::test]
async fn test_quiet_reports_only_errors() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![
        Issue::warning(1, "a", "w1"),
        Issue::warning(2, "a", "w2"),
        Issue::error(3, "b", "e1"),
        Issue::warning(4, "a", "w3"),
    ]);
    let mut options = fixture.options(false);
    options.quiet = Some(true);
    let mut host = fixture.host(options);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert_eq!(host.errors.len(), 1);
    let text = host.errors[0].text();
    assert!(text.contains("1 problem (1 error, 0 warnings)"));
    assert!(!text.contains("w1"));
}

#[tokio::test]
async fn test_host_without_emit_hooks() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let mut options = fixture.options(false);
    options.fail_on_warning = Some(true);
    let mut host = fixture.host(options);
    host.capabilities = HostCapabilities::none();

    let err = fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Emission(_)));
    assert!(
        err.to_string()
            .starts_with("Your module system doesn't support emitWarning.")
    );
}

#[tokio::test]
async fn test_plain_payload_host() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let mut host = fixture.host(fixture.options(false));
    host.capabilities.structured_payload = false;

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert!(matches!(host.warnings[0], ReportPayload::PlainText(_)));
}

#[tokio::test]
async fn test_custom_reporter_receives_issues() {
    let fixture = Fixture::new();
    let issues = vec![Issue::error(1, "no_tabs", "tab")];
    let engine = CountingEngine::new(issues.clone());
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let mut options = fixture.options(false);
    options.reporter = Some(Reporter::new(move |issues| {
        sink.lock().extend_from_slice(issues)
    }));
    options.fail_on_error = Some(true);
    let mut host = fixture.host(options);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert_eq!(*received.lock(), issues);
    assert!(host.errors.is_empty());
}

#[tokio::test]
async fn test_global_options_are_overridden() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let mut host = fixture.host(fixture.options(false));
    host.global = LoaderOptions {
        fail_on_warning: Some(true),
        quiet: Some(false),
        ..Default::default()
    };
    host.options.fail_on_warning = Some(false);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert_eq!(host.warnings.len(), 1);
}

#[tokio::test]
async fn test_missing_rules_file() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let mut options = fixture.options(false);
    options.config_file = Some(fixture.temp_dir.path().join("missing.json"));
    let mut host = fixture.host(options);

    let err = fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Config(_)));
    assert!(host.dependencies.is_empty());
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_engine_failure_aborts_module() {
    let fixture = Fixture::new();
    let engine = CountingEngine::failing();
    let loader = fixture.loader(&engine);

    for cache in [false, true] {
        let mut host = fixture.host(fixture.options(cache));
        let err = loader
            .run(&mut host, SOURCE.to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::Engine(_)));
    }
}

#[tokio::test]
async fn test_corrupted_cache_entry_aborts_module() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let loader = fixture.loader(&engine);

    let mut host = fixture.host(fixture.options(true));
    loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();

    let cache_dir = fixture.temp_dir.path().join("cache");
    for entry in fs::read_dir(&cache_dir).unwrap() {
        fs::write(entry.unwrap().path(), b"not an entry").unwrap();
    }

    let mut host = fixture.host(fixture.options(true));
    let err = loader
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Cache(CacheError::Corrupted(_))));
    assert_eq!(engine.calls(), 1);
    assert!(host.warnings.is_empty());
}

#[tokio::test]
async fn test_unusable_cache_dir_aborts_module() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![]);
    let blocker = fixture.temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let mut options = fixture.options(true);
    options.cache = Some(CacheSetting::Directory(blocker));
    let mut host = fixture.host(options);

    let err = fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Cache(_)));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_quiet_with_only_warnings_emits_empty_report() {
    let fixture = Fixture::new();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let mut options = fixture.options(false);
    options.quiet = Some(true);
    let mut host = fixture.host(options);

    fixture
        .loader(&engine)
        .run(&mut host, SOURCE.to_string(), None)
        .await
        .unwrap();

    assert!(host.errors.is_empty());
    assert_eq!(host.warnings.len(), 1);
    let text = host.warnings[0].text();
    assert!(text.ends_with("0 problems (0 errors, 0 warnings)"));
    assert!(!text.contains("  1  warning"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_rules_path_is_cached() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = Fixture::new();
    let rules_path = fixture
        .temp_dir
        .path()
        .join(OsStr::from_bytes(b"rules-\xff.json"));
    fs::copy(&fixture.rules_path, &rules_path).unwrap();
    let engine = CountingEngine::new(vec![Issue::warning(1, "a", "w")]);
    let loader = fixture.loader(&engine);

    for _ in 0..2 {
        let mut options = fixture.options(true);
        options.config_file = Some(rules_path.clone());
        let mut host = fixture.host(options);
        loader.run(&mut host, SOURCE.to_string(), None).await.unwrap();
        assert_eq!(host.warnings.len(), 1);
    }

    assert_eq!(engine.calls(), 1);
}
