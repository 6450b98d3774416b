//! Error types for specification building and test case generation.
//!
//! Specification errors are fatal and surface before anything is generated.
//! Everything else is recorded per test case (or per group, for combination)
//! and reported without stopping the run.
use crate::verifier::{ConstraintsVerificationResult, MultipleTestCasesConstraintsVerificationResult};
use std::fmt;
use thiserror::Error;

/// Malformed I/O format, constraint suite, or test suite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SpecificationError {
    message: String,
}

impl SpecificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What the scanner saw where a token was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Eof,
    Whitespace,
    Token(String),
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Eof => write!(f, "<EOF>"),
            Found::Whitespace => write!(f, "<whitespace>"),
            Found::Token(token) => write!(f, "'{token}'"),
        }
    }
}

/// Separator required between or after tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Newline,
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separator::Space => write!(f, "<space>"),
            Separator::Newline => write!(f, "<newline>"),
        }
    }
}

fn after_clause(after: &Option<String>) -> String {
    match after {
        Some(variable) => format!(" after '{variable}'"),
        None => String::new(),
    }
}

/// Malformed text while reading variables back from a test file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Cannot parse for '{variable}'. Found: {found}")]
    Unparsable { variable: String, found: Found },
    #[error("Expected: {expected}{}", after_clause(.after))]
    MissingSeparator {
        expected: Separator,
        after: Option<String>,
    },
    #[error("Expected: <EOF>")]
    TrailingInput,
}

impl ParseError {
    /// Fully qualified variable path the failure refers to, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            ParseError::Unparsable { variable, .. } => Some(variable),
            ParseError::MissingSeparator { after, .. } => after.as_deref(),
            ParseError::TrailingInput => None,
        }
    }
}

/// Bound container dimensions disagree with the declared segment size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error(
        "Number of elements of vector '{variable}' unsatisfied. Expected: {expected}, actual: {actual}"
    )]
    VectorSize {
        variable: String,
        expected: usize,
        actual: usize,
    },
    #[error(
        "Number of rows of matrix '{variable}' unsatisfied. Expected: {expected}, actual: {actual}"
    )]
    MatrixRows {
        variable: String,
        expected: usize,
        actual: usize,
    },
    #[error("Number of columns of row {row} of matrix '{variable}' unsatisfied. Expected: {expected}, actual: {actual}")]
    MatrixColumns {
        variable: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl PrintError {
    pub fn variable(&self) -> &str {
        match self {
            PrintError::VectorSize { variable, .. }
            | PrintError::MatrixRows { variable, .. }
            | PrintError::MatrixColumns { variable, .. } => variable,
        }
    }
}

fn stderr_clause(stderr: &str) -> String {
    let line = stderr.trim().lines().next().unwrap_or_default();
    if line.is_empty() {
        String::new()
    } else {
        format!(": {line}")
    }
}

/// The solution process could not be launched or exited abnormally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalProcessFailure {
    #[error("Failed to launch solution `{command}`: {reason}")]
    Launch { command: String, reason: String },
    #[error("Solution `{command}` exited with {status}{}", stderr_clause(.stderr))]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Why a single test case was not generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("{}", .0.reasons().join("; "))]
    Verification(ConstraintsVerificationResult),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Print(#[from] PrintError),
    #[error(transparent)]
    Process(#[from] ExternalProcessFailure),
    #[error("Sample output mismatch. Expected: {expected:?}, actual: {actual:?}")]
    SampleOutputMismatch { expected: String, actual: String },
    #[error("{0}")]
    Io(String),
}

impl GenerationFailure {
    pub(crate) fn io(err: &anyhow::Error) -> Self {
        GenerationFailure::Io(format!("{err:#}"))
    }

    /// One line per reason, most specific first.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            GenerationFailure::Verification(result) => result.reasons(),
            other => vec![other.to_string()],
        }
    }
}

/// Why a group's per-case files were not combined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombinationFailure {
    #[error("Test case count {count} cannot be assigned to '{variable}'")]
    CountOutOfRange { variable: String, count: usize },
    #[error("{}", .0.reasons().join("; "))]
    Constraints(MultipleTestCasesConstraintsVerificationResult),
    #[error("{0}")]
    Io(String),
}

impl CombinationFailure {
    pub(crate) fn io(err: &anyhow::Error) -> Self {
        CombinationFailure::Io(format!("{err:#}"))
    }

    pub fn reasons(&self) -> Vec<String> {
        match self {
            CombinationFailure::Constraints(result) => result.reasons(),
            other => vec![other.to_string()],
        }
    }
}
