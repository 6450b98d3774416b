//! Shared problem definitions and helpers for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tcforge::cli::Args;
use tcforge::{
    ConsoleLogger, ConstraintSuiteBuilder, IOFormatBuilder, LocalOperatingSystem,
    ProblemConfigBuilder, ProblemSpec, Runner, TestSpec, TestSuiteBuilder, Variable,
};
use tempfile::TempDir;

/// Result of one in-process generator run against a temporary directory.
pub struct RunOutcome {
    pub successful: bool,
    pub transcript: String,
}

pub fn tc_args(root: &TempDir) -> Args {
    Args {
        tc_dir: Some(root.path().join("tc")),
        ..Args::default()
    }
}

pub fn run_problem<S: TestSpec>(args: &Args) -> anyhow::Result<RunOutcome> {
    let logger = ConsoleLogger::new(Vec::new());
    let successful = Runner::new(&LocalOperatingSystem, &logger).run::<S>(args)?;
    let transcript = String::from_utf8(logger.into_inner()).expect("transcript is UTF-8");
    Ok(RunOutcome {
        successful,
        transcript,
    })
}

pub fn read(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

pub fn tc_file(root: &TempDir, name: &str) -> PathBuf {
    root.path().join("tc").join(name)
}

/// `A B` on one line, echoed back by the solution.
#[derive(Default)]
pub struct Echo {
    pub t: u32,
    pub a: i32,
    pub b: i32,
}

impl ProblemSpec for Echo {
    fn config(config: &mut ProblemConfigBuilder<Self>) {
        config
            .slug("echo")
            .multiple_test_cases_count("T", |s: &mut Echo| &mut s.t);
    }

    fn input_format(format: &mut IOFormatBuilder<Self>) {
        format
            .line()
            .add(Variable::scalar("A", |s: &Echo| &s.a, |s: &mut Echo| &mut s.a))
            .add(Variable::scalar("B", |s: &Echo| &s.b, |s: &mut Echo| &mut s.b));
    }

    fn constraints(constraints: &mut ConstraintSuiteBuilder<Self>) {
        constraints
            .constraint("1<=A<=100", |s| (1..=100).contains(&s.a))
            .multiple_test_cases_constraint("1<=T<=20", |s| (1..=20).contains(&s.t));
    }
}

impl TestSpec for Echo {
    fn test_suite(suite: &mut TestSuiteBuilder<Self>) {
        suite
            .case("first", |s, _| {
                s.a = 1;
                s.b = 2;
            })
            .case("second", |s, _| {
                s.a = 3;
                s.b = 4;
            })
            .case("third", |s, _| {
                s.a = 5;
                s.b = 6;
            });
    }
}

/// A line segment that places a matrix; rejected before generation.
#[derive(Default)]
pub struct Broken {
    pub m: Vec<Vec<i32>>,
}

impl ProblemSpec for Broken {
    fn input_format(format: &mut IOFormatBuilder<Self>) {
        format
            .line()
            .add(Variable::matrix("bogus", |s: &Broken| &s.m, |s: &mut Broken| &mut s.m));
    }
}

impl TestSpec for Broken {
    fn test_suite(suite: &mut TestSuiteBuilder<Self>) {
        suite.case("never generated", |s, _| s.m = vec![vec![1]]);
    }
}
