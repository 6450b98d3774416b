//! Declarative test data generation for competitive programming problems.
//!
//! A problem is described by a state type implementing [`ProblemSpec`] and
//! [`TestSpec`]: its input/output format, its constraints and subtasks, and
//! the scenarios that produce each test case. [`run`] turns that description
//! into verified `.in`/`.out` files.
pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod format;
pub mod generator;
pub mod logger;
pub mod manipulator;
pub mod os;
pub mod random;
pub mod runner;
pub mod spec;
pub mod testcase;
pub mod variable;
pub mod verifier;

pub use config::GeneratorConfig;
pub use constraint::ConstraintSuiteBuilder;
pub use error::{
    CombinationFailure, ExternalProcessFailure, GenerationFailure, ParseError, PrintError,
    SpecificationError,
};
pub use format::{IOFormatBuilder, Size};
pub use generator::{GenerationReport, Generator};
pub use logger::{ConsoleLogger, GeneratorLogger};
pub use os::{LocalOperatingSystem, OperatingSystem};
pub use random::Random;
pub use runner::{run, Runner};
pub use spec::{CoreSpec, ProblemConfigBuilder, ProblemSpec, TestSpec};
pub use testcase::TestSuiteBuilder;
pub use variable::Variable;
pub use verifier::SubtaskAttribution;
