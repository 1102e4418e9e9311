//! # cslint_engine
//!
//! Lint engine abstraction for cslint.
//!
//! This crate provides:
//! - The `Issue` record produced by a lint engine
//! - The `LintEngine` trait the loader delegates to
//! - `CommandEngine`, which drives an external `coffeelint`-compatible executable
//!
//! ## Example
//!
//! ```rust,ignore
//! use cslint_engine::{CommandEngine, LintEngine, RuleSet};
//!
//! let engine = CommandEngine::detect("coffeelint")?;
//! let issues = engine.lint("x = 1\n", &RuleSet::new(), false)?;
//! ```

mod command;
mod engine;
mod error;
mod issue;

pub use command::{CommandEngine, CommandEngineProvider};
pub use engine::{EngineProvider, LintEngine, RuleSet};
pub use error::EngineError;
pub use issue::{Issue, Severity};
