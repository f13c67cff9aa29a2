// src/operator.rs

//! Interactive collaborators: confirmation prompts and the merge tool
//!
//! Command flows ask the operator before mutating anything; the
//! reconciliation engine itself never prompts. `merge_config` is the only
//! engine operation that talks to the operator.

use crate::error::{Error, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Default three-way merge command
pub const DEFAULT_MERGE_TOOL: &str = "vim -d";

/// Someone (or something) answering questions on behalf of the user
pub trait Operator {
    /// Ask a yes/no question; `default` is the answer for an empty reply
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Merge `alternative` into `target`; returns whether the tool succeeded
    fn merge(&self, target: &Path, alternative: &Path) -> Result<bool>;
}

/// Prompts on the terminal and runs an external merge tool
#[derive(Debug, Clone)]
pub struct TerminalOperator {
    merge_tool: Vec<String>,
}

impl TerminalOperator {
    /// Create an operator using `merge_tool`, a whitespace-separated command
    pub fn new(merge_tool: &str) -> Self {
        let merge_tool = merge_tool.split_whitespace().map(str::to_string).collect();
        Self { merge_tool }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_TOOL)
    }
}

impl Operator for TerminalOperator {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            debug!("stdin is not a terminal, answering '{}' with default", prompt);
            return Ok(default);
        }

        let question = if default {
            format!("{} [Y/n] ", prompt)
        } else {
            format!("{} [y/N] ", prompt)
        };

        let mut input = stdin.lock();
        loop {
            print!("{}", question);
            io::stdout().flush()?;

            let mut answer = String::new();
            if input.read_line(&mut answer)? == 0 {
                return Ok(default);
            }
            match parse_answer(&answer, default) {
                Some(answer) => return Ok(answer),
                None => println!("Invalid input. Please enter 'y' or 'n'."),
            }
        }
    }

    fn merge(&self, target: &Path, alternative: &Path) -> Result<bool> {
        let Some((program, args)) = self.merge_tool.split_first() else {
            return Err(Error::MergeError("No merge tool configured".to_string()));
        };
        let program = which::which(program).map_err(|e| {
            Error::MergeError(format!("Merge tool '{}' not found: {}", program, e))
        })?;

        info!(
            "Running {} on {} and {}",
            program.display(),
            target.display(),
            alternative.display()
        );
        let status = Command::new(&program)
            .args(args)
            .arg(target)
            .arg(alternative)
            .status()
            .map_err(|e| {
                Error::MergeError(format!("Failed to run {}: {}", program.display(), e))
            })?;

        Ok(status.success())
    }
}

/// Answers every question the same way; used for `--yes` / `--no`
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Operator for FixedAnswer {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        debug!("Answering '{}' with {}", prompt, self.0);
        Ok(self.0)
    }

    fn merge(&self, target: &Path, alternative: &Path) -> Result<bool> {
        Err(Error::MergeError(format!(
            "Cannot merge {} into {} non-interactively",
            alternative.display(),
            target.display()
        )))
    }
}

fn parse_answer(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        "" => Some(default),
        _ => None,
    }
}
