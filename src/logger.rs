//! One-way notifications from the generation pipeline.
use crate::error::{CombinationFailure, GenerationFailure, SpecificationError};
use crate::testcase::{SAMPLE_GROUP_ID, UNGROUPED_ID};
use std::cell::RefCell;
use std::io::{self, Write};

/// Receives progress from the generator; never influences control flow.
pub trait GeneratorLogger {
    fn log_introduction(&self);
    fn log_test_group_introduction(&self, group_id: i32);
    fn log_test_case_introduction(&self, test_case_id: &str);
    fn log_test_case_ok(&self);
    fn log_test_case_failed(&self, failure: &GenerationFailure);
    fn log_combination_introduction(&self, base_id: &str);
    fn log_combination_ok(&self);
    fn log_combination_failed(&self, failure: &CombinationFailure);
    fn log_result(&self, successful: bool);
    fn log_specification_failure(&self, error: &SpecificationError);
}

/// Human-readable transcript, mirrored as tracing events.
pub struct ConsoleLogger<W: Write> {
    out: RefCell<W>,
}

impl ConsoleLogger<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleLogger<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    // Transcript writes are best effort.
    fn write(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn reasons(&self, reasons: &[String]) {
        let mut text = String::from("    Reasons:\n");
        for reason in reasons {
            text.push_str(&format!("    * {reason}\n"));
        }
        self.write(&text);
    }
}

impl<W: Write> GeneratorLogger for ConsoleLogger<W> {
    fn log_introduction(&self) {
        tracing::info!("generation started");
        self.write("Generating test cases...\n");
    }

    fn log_test_group_introduction(&self, group_id: i32) {
        tracing::debug!(group_id, "test group started");
        let header = match group_id {
            SAMPLE_GROUP_ID => "[ SAMPLE TEST CASES ]".to_string(),
            UNGROUPED_ID => "[ OFFICIAL TEST CASES ]".to_string(),
            id => format!("[ TEST GROUP {id} ]"),
        };
        self.write(&format!("\n{header}\n"));
    }

    fn log_test_case_introduction(&self, test_case_id: &str) {
        tracing::debug!(test_case_id, "test case started");
        self.write(&format!("  {test_case_id}: "));
    }

    fn log_test_case_ok(&self) {
        self.write("OK\n");
    }

    fn log_test_case_failed(&self, failure: &GenerationFailure) {
        let reasons = failure.reasons();
        tracing::warn!(reasons = ?reasons, "test case failed");
        self.write("FAILED\n");
        self.reasons(&reasons);
    }

    fn log_combination_introduction(&self, base_id: &str) {
        tracing::debug!(base_id, "combining test cases");
        self.write(&format!("  Combining test cases into a single file ({base_id}): "));
    }

    fn log_combination_ok(&self) {
        self.write("OK\n");
    }

    fn log_combination_failed(&self, failure: &CombinationFailure) {
        let reasons = failure.reasons();
        tracing::warn!(reasons = ?reasons, "combination failed");
        self.write("FAILED\n");
        self.reasons(&reasons);
    }

    fn log_result(&self, successful: bool) {
        tracing::info!(successful, "generation finished");
        if successful {
            self.write("\nGeneration finished. All test cases OK.\n");
        } else {
            self.write("\nGeneration finished. Some test cases FAILED.\n");
        }
    }

    fn log_specification_failure(&self, error: &SpecificationError) {
        tracing::error!(error = %error, "specification is invalid");
        self.write(&format!(
            "Specification failed:\n    Reasons:\n    * {}\n",
            error.message()
        ));
    }
}
