//! Command-line surface of a problem's generator binary.
use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Flags override the config file, which overrides the problem's own
/// declarations.
#[derive(Parser, Debug, Default)]
#[command(
    version,
    about = "Generate and validate test cases for a problem",
    after_help = "Examples:\n  ab-plus --seed 42 --solution ./solution\n  ab-plus --config tcforge.json --report tc/report.json"
)]
pub struct Args {
    /// Problem short name used in test case file names
    #[arg(long)]
    pub slug: Option<String>,

    /// Seed for the random generator handed to test case scenarios
    #[arg(long)]
    pub seed: Option<u64>,

    /// Command that reads a test input on stdin and writes its output
    #[arg(long, value_name = "COMMAND")]
    pub solution: Option<String>,

    /// Directory receiving the generated files
    #[arg(long, value_name = "DIR")]
    pub tc_dir: Option<PathBuf>,

    /// Reject cases that satisfy subtasks they do not claim
    #[arg(long)]
    pub strict_subtasks: bool,

    /// JSON generator config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a JSON generation report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Emit debug-level diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            slug: self.slug.clone(),
            seed: self.seed,
            solution: self.solution.clone(),
            tc_dir: self.tc_dir.clone(),
            strict_subtasks: self.strict_subtasks,
        }
    }
}
