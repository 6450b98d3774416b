//! Per-case pipeline: apply, verify, write input, produce output.
use crate::config::GeneratorConfig;
use crate::error::{ExternalProcessFailure, GenerationFailure};
use crate::os::{ExecutionRequest, OperatingSystem};
use crate::random::Random;
use crate::spec::CoreSpec;
use crate::testcase::{Applier, TestCase};
use crate::verifier::Verifier;
use std::path::PathBuf;

pub(crate) struct TestCaseGenerator<'a, S> {
    spec: &'a CoreSpec<S>,
    verifier: Verifier<'a, S>,
    os: &'a dyn OperatingSystem,
    config: &'a GeneratorConfig,
}

impl<'a, S: Default> TestCaseGenerator<'a, S> {
    pub(crate) fn new(
        spec: &'a CoreSpec<S>,
        os: &'a dyn OperatingSystem,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            spec,
            verifier: Verifier::new(spec.constraint_suite(), config.attribution),
            os,
            config,
        }
    }

    /// Files are only written once the case's bindings pass verification.
    /// Returns whether `<id>.out` was written; when it was not, any `.out`
    /// left from an earlier run is removed.
    pub(crate) fn generate(
        &self,
        test_case: &TestCase<S>,
        random: &mut Random,
    ) -> Result<bool, GenerationFailure> {
        let manipulator = self.spec.manipulator();
        let mut state = S::default();
        match test_case.applier() {
            Applier::Scenario(scenario) => scenario(&mut state, random),
            Applier::Literal { input, .. } => manipulator.parse_input(&mut state, input)?,
        }

        let verification = self
            .verifier
            .verify_test_case(&state, test_case.subtask_ids());
        if !verification.is_valid() {
            return Err(GenerationFailure::Verification(verification));
        }

        let input_path = self.case_path(test_case.id(), "in");
        let input = manipulator.print_input(&state)?;
        self.os
            .write_file(&input_path, &input)
            .map_err(|err| GenerationFailure::io(&err))?;

        let output_path = self.case_path(test_case.id(), "out");
        let declared_output = match test_case.applier() {
            Applier::Literal { output, .. } => output.as_deref(),
            Applier::Scenario(_) => None,
        };

        if let Some(command) = self.config.solution.as_deref() {
            self.run_solution(command, &input_path, &output_path)?;
            let actual = self
                .os
                .read_file(&output_path)
                .map_err(|err| GenerationFailure::io(&err))?;
            if manipulator.has_output_format() {
                manipulator.parse_output(&mut state, &actual)?;
            }
            if let Some(expected) = declared_output {
                if expected != actual {
                    return Err(GenerationFailure::SampleOutputMismatch {
                        expected: expected.to_string(),
                        actual,
                    });
                }
            }
            return Ok(true);
        }

        let output = match declared_output {
            Some(expected) => {
                if manipulator.has_output_format() {
                    manipulator.parse_output(&mut state, expected)?;
                }
                Some(expected.to_string())
            }
            None if manipulator.has_output_format()
                && matches!(test_case.applier(), Applier::Scenario(_)) =>
            {
                Some(manipulator.print_output(&state)?)
            }
            None => None,
        };
        match output {
            Some(output) => {
                self.os
                    .write_file(&output_path, &output)
                    .map_err(|err| GenerationFailure::io(&err))?;
                Ok(true)
            }
            None => {
                self.os
                    .remove_file(&output_path)
                    .map_err(|err| GenerationFailure::io(&err))?;
                Ok(false)
            }
        }
    }

    fn run_solution(
        &self,
        command: &str,
        input_path: &std::path::Path,
        output_path: &std::path::Path,
    ) -> Result<(), GenerationFailure> {
        let request = ExecutionRequest {
            command,
            stdin: input_path,
            stdout: output_path,
        };
        let result = self.os.execute(&request).map_err(|err| {
            GenerationFailure::Process(ExternalProcessFailure::Launch {
                command: command.to_string(),
                reason: format!("{err:#}"),
            })
        })?;
        if !result.success {
            return Err(GenerationFailure::Process(ExternalProcessFailure::Exit {
                command: command.to_string(),
                status: result.status,
                stderr: result.stderr,
            }));
        }
        Ok(())
    }

    fn case_path(&self, id: &str, extension: &str) -> PathBuf {
        self.config.tc_dir.join(format!("{id}.{extension}"))
    }
}
