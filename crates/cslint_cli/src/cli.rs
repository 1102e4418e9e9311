//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cslint_core::{CacheSetting, LoaderOptions};

/// cslint - CoffeeLint with caching, reporting and failure policy
#[derive(Parser)]
#[command(name = "cslint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Loader options file (JSON), applied to every file
    #[arg(short, long, global = true)]
    pub options: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable caching
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files
    Lint(LintArgs),

    /// Manage the result cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove every cached result
    Clean,
}

#[derive(Args)]
pub struct LintArgs {
    /// Files to lint
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Rules file (default: ./coffeelint.json)
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// Linter executable (default: coffeelint)
    #[arg(long)]
    pub cslint_path: Option<String>,

    /// Lint as literate CoffeeScript
    #[arg(long)]
    pub literate: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Report everything as errors
    #[arg(long)]
    pub emit_error: bool,

    /// Report everything as warnings
    #[arg(long)]
    pub emit_warning: bool,

    /// Fail a file that has errors
    #[arg(long)]
    pub fail_on_error: bool,

    /// Fail a file that has warnings
    #[arg(long)]
    pub fail_on_warning: bool,

    /// Hand reports to the host as plain text
    #[arg(long)]
    pub plain_payload: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl LintArgs {
    /// Per-file options: only flags that were given override the options file.
    pub fn loader_options(&self, cli: &Cli) -> LoaderOptions {
        let cache = if cli.no_cache {
            Some(CacheSetting::Enabled(false))
        } else {
            cli.cache_dir.clone().map(CacheSetting::Directory)
        };

        LoaderOptions {
            cslint_path: self.cslint_path.clone(),
            config_file: self.config_file.clone(),
            literate: self.literate.then_some(true),
            cache,
            quiet: self.quiet.then_some(true),
            emit_error: self.emit_error.then_some(true),
            emit_warning: self.emit_warning.then_some(true),
            fail_on_error: self.fail_on_error.then_some(true),
            fail_on_warning: self.fail_on_warning.then_some(true),
            ..Default::default()
        }
    }
}
