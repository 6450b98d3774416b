//! Constraints and subtasks declared by the problem spec.
use crate::error::SpecificationError;
use std::collections::BTreeSet;

/// Subtask id for constraints that hold regardless of subtask.
pub const GLOBAL_SUBTASK_ID: i32 = -1;

/// A predicate over the current bindings. The description is only used in
/// diagnostics.
pub struct Constraint<S> {
    description: String,
    predicate: Box<dyn Fn(&S) -> bool>,
}

impl<S> Constraint<S> {
    pub fn new(description: impl Into<String>, predicate: impl Fn(&S) -> bool + 'static) -> Self {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn holds(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

pub struct Subtask<S> {
    id: i32,
    constraints: Vec<Constraint<S>>,
}

impl<S> Subtask<S> {
    pub fn new(id: i32, constraints: Vec<Constraint<S>>) -> Self {
        Self { id, constraints }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn constraints(&self) -> &[Constraint<S>] {
        &self.constraints
    }
}

pub struct ConstraintSuite<S> {
    subtasks: Vec<Subtask<S>>,
    multiple_test_cases_constraints: Vec<Constraint<S>>,
}

impl<S> ConstraintSuite<S> {
    pub fn new(subtasks: Vec<Subtask<S>>, multiple_test_cases_constraints: Vec<Constraint<S>>) -> Self {
        Self {
            subtasks,
            multiple_test_cases_constraints,
        }
    }

    /// Subtasks in declaration order; the global subtask, when present, first.
    pub fn subtasks(&self) -> &[Subtask<S>] {
        &self.subtasks
    }

    pub fn multiple_test_cases_constraints(&self) -> &[Constraint<S>] {
        &self.multiple_test_cases_constraints
    }

    /// Ids of user-declared subtasks (excludes the global id).
    pub fn declared_subtask_ids(&self) -> BTreeSet<i32> {
        self.subtasks
            .iter()
            .map(Subtask::id)
            .filter(|id| *id != GLOBAL_SUBTASK_ID)
            .collect()
    }
}

impl<S> Default for ConstraintSuite<S> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

pub struct SubtaskBuilder<S> {
    id: i32,
    constraints: Vec<Constraint<S>>,
}

impl<S> SubtaskBuilder<S> {
    pub fn constraint(
        &mut self,
        description: impl Into<String>,
        predicate: impl Fn(&S) -> bool + 'static,
    ) -> &mut Self {
        self.constraints.push(Constraint::new(description, predicate));
        self
    }
}

/// Collects global constraints, subtasks, and multiple-test-cases constraints.
pub struct ConstraintSuiteBuilder<S> {
    global: Vec<Constraint<S>>,
    subtasks: Vec<SubtaskBuilder<S>>,
    multiple_test_cases: Vec<Constraint<S>>,
}

impl<S> Default for ConstraintSuiteBuilder<S> {
    fn default() -> Self {
        Self {
            global: Vec::new(),
            subtasks: Vec::new(),
            multiple_test_cases: Vec::new(),
        }
    }
}

impl<S> ConstraintSuiteBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint that applies to every test case.
    pub fn constraint(
        &mut self,
        description: impl Into<String>,
        predicate: impl Fn(&S) -> bool + 'static,
    ) -> &mut Self {
        self.global.push(Constraint::new(description, predicate));
        self
    }

    pub fn subtask(&mut self, id: i32) -> &mut SubtaskBuilder<S> {
        self.subtasks.push(SubtaskBuilder {
            id,
            constraints: Vec::new(),
        });
        let last = self.subtasks.len() - 1;
        &mut self.subtasks[last]
    }

    /// Add a constraint over the injected test case count only.
    pub fn multiple_test_cases_constraint(
        &mut self,
        description: impl Into<String>,
        predicate: impl Fn(&S) -> bool + 'static,
    ) -> &mut Self {
        self.multiple_test_cases
            .push(Constraint::new(description, predicate));
        self
    }

    pub fn build(self) -> Result<ConstraintSuite<S>, SpecificationError> {
        let mut subtasks = Vec::with_capacity(self.subtasks.len() + 1);
        if !self.global.is_empty() {
            subtasks.push(Subtask::new(GLOBAL_SUBTASK_ID, self.global));
        }
        let mut seen = BTreeSet::new();
        for builder in self.subtasks {
            if builder.id <= 0 {
                return Err(SpecificationError::new(format!(
                    "Subtask ids must be positive (got {})",
                    builder.id
                )));
            }
            if !seen.insert(builder.id) {
                return Err(SpecificationError::new(format!(
                    "Subtask {} is declared more than once",
                    builder.id
                )));
            }
            subtasks.push(Subtask::new(builder.id, builder.constraints));
        }
        Ok(ConstraintSuite::new(subtasks, self.multiple_test_cases))
    }
}
