//! Engine backed by an external `coffeelint`-compatible executable.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{EngineError, EngineProvider, Issue, LintEngine, RuleSet};

/// Runs the linter as a child process and reads its raw JSON report.
///
/// The executable must understand `--version`, `--stdin`, `--reporter raw`,
/// `-f <config>` and `--literate`, as the `coffeelint` CLI does.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    version: String,
}

impl CommandEngine {
    /// Executable used when no linter path is configured.
    pub const DEFAULT_PROGRAM: &'static str = "coffeelint";

    /// Locates the linter and records its version.
    pub fn detect(program: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let program = program.into();
        let output = Command::new(&program)
            .arg("--version")
            .output()
            .map_err(|source| EngineError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::version(format!(
                "'{} --version' exited with {}",
                program.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(EngineError::version(format!(
                "'{} --version' printed nothing",
                program.display()
            )));
        }

        debug!("Detected {} version {}", program.display(), version);
        Ok(Self::with_version(program, version))
    }

    /// Creates an engine with a known version, skipping detection.
    pub fn with_version(program: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            version: version.into(),
        }
    }

    /// Path of the linter executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, source: &str, rules_path: &Path, literate: bool) -> Result<Output, EngineError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--stdin")
            .args(["--reporter", "raw"])
            .arg("-f")
            .arg(rules_path);
        if literate {
            command.arg("--literate");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::output("linter stdin was not captured"))?;

        // Feed stdin from a separate thread so a chatty child cannot fill its
        // stdout pipe while we are still writing.
        std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output()?;
            match writer.join() {
                Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                Err(_) => return Err(EngineError::output("stdin writer panicked")),
                _ => {}
            }
            Ok(output)
        })
    }
}

impl LintEngine for CommandEngine {
    fn version(&self) -> &str {
        &self.version
    }

    fn lint(
        &self,
        source: &str,
        rules: &RuleSet,
        literate: bool,
    ) -> Result<Vec<Issue>, EngineError> {
        let mut rules_file = tempfile::Builder::new()
            .prefix("cslint-rules-")
            .suffix(".json")
            .tempfile()?;
        serde_json::to_writer(&mut rules_file, rules)?;
        rules_file.flush()?;

        let output = self.run(source, rules_file.path(), literate)?;

        // The linter exits non-zero whenever it found errors, so the report
        // itself decides success.
        match parse_raw_report(&output.stdout) {
            Ok(issues) => {
                debug!(
                    "{} reported {} issues (exit {})",
                    self.program.display(),
                    issues.len(),
                    output.status
                );
                Ok(issues)
            }
            Err(e) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!("Linter exited with {}: {}", output.status, stderr.trim());
                Err(EngineError::output(format!("{} ({})", e, stderr.trim())))
            }
        }
    }
}

/// Detects one `CommandEngine` per linter path and reuses it afterwards.
#[derive(Debug, Default)]
pub struct CommandEngineProvider {
    engines: Mutex<HashMap<PathBuf, Arc<CommandEngine>>>,
}

impl CommandEngineProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngineProvider for CommandEngineProvider {
    fn engine(&self, cslint_path: Option<&str>) -> Result<Arc<dyn LintEngine>, EngineError> {
        let program = PathBuf::from(cslint_path.unwrap_or(CommandEngine::DEFAULT_PROGRAM));

        let mut engines = self.engines.lock();
        if let Some(engine) = engines.get(&program) {
            return Ok(Arc::clone(engine) as Arc<dyn LintEngine>);
        }

        let engine = Arc::new(CommandEngine::detect(&program)?);
        engines.insert(program, Arc::clone(&engine));
        Ok(engine as Arc<dyn LintEngine>)
    }
}

/// Parses the raw reporter output: a map of file name to issue list.
pub(crate) fn parse_raw_report(stdout: &[u8]) -> Result<Vec<Issue>, EngineError> {
    let report: BTreeMap<String, Vec<Issue>> = serde_json::from_slice(stdout)?;
    Ok(report.into_values().flatten().collect())
}
