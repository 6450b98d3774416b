//! Constraint verification with per-subtask accounting.
use crate::constraint::{Constraint, ConstraintSuite, GLOBAL_SUBTASK_ID};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Whether a case may silently satisfy subtasks it does not claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskAttribution {
    #[default]
    Lenient,
    /// A declared, non-claimed subtask whose constraints all hold makes the
    /// case invalid.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintsVerificationResult {
    /// Failed constraint descriptions keyed by subtask id; only ids with at
    /// least one failure are present.
    pub unsatisfied: BTreeMap<i32, Vec<String>>,
    pub satisfied_but_not_assigned: BTreeSet<i32>,
    pub undeclared: BTreeSet<i32>,
}

impl ConstraintsVerificationResult {
    pub fn is_valid(&self) -> bool {
        self.unsatisfied.is_empty()
            && self.satisfied_but_not_assigned.is_empty()
            && self.undeclared.is_empty()
    }

    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        for id in &self.undeclared {
            reasons.push(format!("Claims subtask {id} which is not declared"));
        }
        for (id, descriptions) in &self.unsatisfied {
            for description in descriptions {
                if *id == GLOBAL_SUBTASK_ID {
                    reasons.push(format!("Does not satisfy constraints, on: {description}"));
                } else {
                    reasons.push(format!(
                        "Does not satisfy subtask {id}, on constraint: {description}"
                    ));
                }
            }
        }
        for id in &self.satisfied_but_not_assigned {
            reasons.push(format!("Satisfies subtask {id} but is not assigned to it"));
        }
        reasons
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipleTestCasesConstraintsVerificationResult {
    pub unsatisfied: Vec<String>,
}

impl MultipleTestCasesConstraintsVerificationResult {
    pub fn is_valid(&self) -> bool {
        self.unsatisfied.is_empty()
    }

    pub fn reasons(&self) -> Vec<String> {
        self.unsatisfied
            .iter()
            .map(|description| {
                format!("Does not satisfy multiple test cases constraints, on: {description}")
            })
            .collect()
    }
}

pub struct Verifier<'a, S> {
    suite: &'a ConstraintSuite<S>,
    attribution: SubtaskAttribution,
}

impl<'a, S> Verifier<'a, S> {
    pub fn new(suite: &'a ConstraintSuite<S>, attribution: SubtaskAttribution) -> Self {
        Self { suite, attribution }
    }

    /// Failed constraint descriptions of every subtask, including those with
    /// no failures (as empty lists).
    pub fn verify_constraints(&self, state: &S) -> BTreeMap<i32, Vec<String>> {
        self.suite
            .subtasks()
            .iter()
            .map(|subtask| (subtask.id(), failed(subtask.constraints(), state)))
            .collect()
    }

    /// Judges a case claiming `claimed` subtasks; an empty claim means every
    /// declared subtask.
    pub fn verify_test_case(&self, state: &S, claimed: &BTreeSet<i32>) -> ConstraintsVerificationResult {
        let declared = self.suite.declared_subtask_ids();
        let effective: BTreeSet<i32> = if claimed.is_empty() {
            declared.clone()
        } else {
            claimed.clone()
        };

        let mut result = ConstraintsVerificationResult {
            undeclared: effective.difference(&declared).copied().collect(),
            ..Default::default()
        };
        for (id, failures) in self.verify_constraints(state) {
            let checked = id == GLOBAL_SUBTASK_ID || effective.contains(&id);
            if checked {
                if !failures.is_empty() {
                    result.unsatisfied.insert(id, failures);
                }
            } else if self.attribution == SubtaskAttribution::Strict && failures.is_empty() {
                result.satisfied_but_not_assigned.insert(id);
            }
        }
        result
    }

    pub fn verify_multiple_test_cases_constraints(
        &self,
        state: &S,
    ) -> MultipleTestCasesConstraintsVerificationResult {
        MultipleTestCasesConstraintsVerificationResult {
            unsatisfied: failed(self.suite.multiple_test_cases_constraints(), state),
        }
    }
}

fn failed<S>(constraints: &[Constraint<S>], state: &S) -> Vec<String> {
    constraints
        .iter()
        .filter(|constraint| !constraint.holds(state))
        .map(|constraint| constraint.description().to_string())
        .collect()
}
