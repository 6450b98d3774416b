//! Generation pipeline.
//!
//! Groups and their cases run strictly in declared order against one seeded
//! [`Random`]. A failing case never stops the run; every case is attempted and
//! the run succeeds only if every case and every combination step did.
mod report;
mod test_case;

use crate::config::GeneratorConfig;
use crate::error::CombinationFailure;
use crate::logger::GeneratorLogger;
use crate::os::OperatingSystem;
use crate::random::Random;
use crate::spec::{CaseCount, CoreSpec};
use crate::testcase::{base_id, TestGroup};
use crate::verifier::Verifier;
use anyhow::{Context, Result};
use std::time::Instant;
use test_case::TestCaseGenerator;

pub use report::{CaseReport, CombinationReport, GenerationReport, GroupReport, REPORT_SCHEMA_VERSION};

pub struct Generator<'a> {
    os: &'a dyn OperatingSystem,
    logger: &'a dyn GeneratorLogger,
}

impl<'a> Generator<'a> {
    pub fn new(os: &'a dyn OperatingSystem, logger: &'a dyn GeneratorLogger) -> Self {
        Self { os, logger }
    }

    /// Generate every test case of `spec` into `config.tc_dir`.
    ///
    /// Only a failure to prepare the output directory is returned as an
    /// error; everything else is recorded in the report.
    pub fn generate<S: Default>(
        &self,
        spec: &CoreSpec<S>,
        config: &GeneratorConfig,
    ) -> Result<GenerationReport> {
        let start = Instant::now();
        self.logger.log_introduction();
        self.os
            .force_make_dir(&config.tc_dir)
            .with_context(|| format!("prepare output directory {}", config.tc_dir.display()))?;

        let cases = TestCaseGenerator::new(spec, self.os, config);
        let mut random = Random::new(config.seed);
        let mut groups = Vec::with_capacity(spec.test_suite().groups().len());
        for group in spec.test_suite().groups() {
            groups.push(self.generate_group(spec, config, &cases, group, &mut random));
        }

        let report = GenerationReport::new(&config.slug, config.seed, groups);
        let elapsed_ms = start.elapsed().as_millis();
        tracing::info!(
            elapsed_ms,
            case_count = report.case_count,
            pass_count = report.pass_count,
            fail_count = report.fail_count,
            "generation complete"
        );
        self.logger.log_result(report.successful);
        Ok(report)
    }

    fn generate_group<S: Default>(
        &self,
        spec: &CoreSpec<S>,
        config: &GeneratorConfig,
        cases: &TestCaseGenerator<'_, S>,
        group: &TestGroup<S>,
        random: &mut Random,
    ) -> GroupReport {
        self.logger.log_test_group_introduction(group.id());
        let mut reports = Vec::with_capacity(group.test_cases().len());
        let mut with_output = true;
        for test_case in group.test_cases() {
            self.logger.log_test_case_introduction(test_case.id());
            let outcome = cases.generate(test_case, random);
            let reasons = match &outcome {
                Ok(wrote_output) => {
                    self.logger.log_test_case_ok();
                    with_output &= *wrote_output;
                    Vec::new()
                }
                Err(failure) => {
                    self.logger.log_test_case_failed(failure);
                    failure.reasons()
                }
            };
            reports.push(CaseReport {
                id: test_case.id().to_string(),
                description: test_case.description().to_string(),
                subtasks: test_case.subtask_ids().clone(),
                successful: outcome.is_ok(),
                reasons,
            });
        }

        let mut successful = reports.iter().all(|case| case.successful);
        let mut combination = None;
        if let Some(count) = spec.case_count() {
            if successful && !group.test_cases().is_empty() {
                let base = base_id(&config.slug, group.id());
                self.logger.log_combination_introduction(&base);
                let outcome = self.combine(spec, config, count, &base, group, with_output);
                let reasons = match &outcome {
                    Ok(()) => {
                        self.logger.log_combination_ok();
                        Vec::new()
                    }
                    Err(failure) => {
                        self.logger.log_combination_failed(failure);
                        failure.reasons()
                    }
                };
                successful = outcome.is_ok();
                combination = Some(CombinationReport {
                    base_id: base,
                    successful,
                    reasons,
                });
            }
        }

        GroupReport {
            id: group.id(),
            successful,
            cases: reports,
            combination,
        }
    }

    fn combine<S: Default>(
        &self,
        spec: &CoreSpec<S>,
        config: &GeneratorConfig,
        count: &CaseCount<S>,
        base: &str,
        group: &TestGroup<S>,
        with_output: bool,
    ) -> Result<(), CombinationFailure> {
        let case_count = group.test_cases().len();
        let mut state = S::default();
        count.assign(&mut state, case_count)?;
        let verification = Verifier::new(spec.constraint_suite(), config.attribution)
            .verify_multiple_test_cases_constraints(&state);
        if !verification.is_valid() {
            return Err(CombinationFailure::Constraints(verification));
        }
        self.os
            .combine_multiple_test_cases(&config.tc_dir.join(base), case_count, with_output)
            .map_err(|err| CombinationFailure::io(&err))
    }
}
