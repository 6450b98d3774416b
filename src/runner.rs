//! Entry point wiring arguments, config, spec, and generator together.
use crate::cli::Args;
use crate::config::{load_config_file, resolve_config};
use crate::generator::Generator;
use crate::logger::{ConsoleLogger, GeneratorLogger};
use crate::os::{LocalOperatingSystem, OperatingSystem};
use crate::spec::{declared_slug, CoreSpec, TestSpec};
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub struct Runner<'a> {
    os: &'a dyn OperatingSystem,
    logger: &'a dyn GeneratorLogger,
}

impl<'a> Runner<'a> {
    pub fn new(os: &'a dyn OperatingSystem, logger: &'a dyn GeneratorLogger) -> Self {
        Self { os, logger }
    }

    /// Returns whether every case and combination succeeded. Config and I/O
    /// setup problems are errors; an invalid spec is logged and reported as
    /// `Ok(false)`.
    pub fn run<S: TestSpec>(&self, args: &Args) -> Result<bool> {
        let file = args.config.as_deref().map(load_config_file).transpose()?;
        let config = resolve_config(
            declared_slug::<S>().as_deref(),
            file.as_ref(),
            &args.overrides(),
        )?;
        tracing::debug!(
            slug = %config.slug,
            seed = config.seed,
            tc_dir = %config.tc_dir.display(),
            "resolved generator config"
        );

        let spec = match CoreSpec::<S>::build(&config.slug) {
            Ok(spec) => spec,
            Err(err) => {
                self.logger.log_specification_failure(&err);
                return Ok(false);
            }
        };

        let report = Generator::new(self.os, self.logger).generate(&spec, &config)?;
        if let Some(path) = args.report.as_deref() {
            report.write_json(path)?;
        }
        Ok(report.successful)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse the process arguments and generate `S`'s test cases.
pub fn run<S: TestSpec>() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let logger = ConsoleLogger::stdout();
    match Runner::new(&LocalOperatingSystem, &logger).run::<S>(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
