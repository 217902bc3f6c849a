//! Console output for batch commands

use fa_validate::Problem;
use serde::Serialize;
use std::io::{self, Write};

/// How much a command prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors and summary only
    Minimal,
    /// Per-file outcomes and problem lists
    #[default]
    Normal,
    /// Everything, including batch setup
    All,
}

/// Per-batch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Files rewritten by prep or clean
    pub updated: usize,
    /// Files prep or clean left alone
    pub unchanged: usize,
    /// Files loaded into the store
    pub loaded: usize,
    /// Files that passed a check
    pub passed: usize,
    /// Files skipped because of errors
    pub errored: usize,
}

impl BatchReport {
    /// True when no file failed
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errored == 0
    }
}

/// `"1 document"`, `"2 documents"`, `"0 documents"`
#[must_use]
pub fn documents(count: usize) -> String {
    format!("{count} document{}", if count == 1 { "" } else { "s" })
}

/// Write a problem list under an `Errors found:` heading
///
/// # Errors
///
/// Propagates write failures.
pub fn write_problems(out: &mut impl Write, problems: &[Problem]) -> io::Result<()> {
    writeln!(out, "  Errors found:")?;
    for problem in problems {
        writeln!(out, "    {}", problem.message)?;
        for detail in &problem.details {
            writeln!(out, "      {detail}")?;
        }
    }
    Ok(())
}

/// One file's result in `check --json` output
#[derive(Debug, Serialize)]
pub struct FileProblems<'a> {
    /// Source path as given
    pub file: String,
    /// Why the file could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Problems in validator order
    pub problems: &'a [Problem],
}
