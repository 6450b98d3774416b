//! Test cases, test groups, and the test suite they form.
use crate::error::SpecificationError;
use crate::random::Random;
use std::collections::BTreeSet;

/// Group id of the sample test cases.
pub const SAMPLE_GROUP_ID: i32 = 0;

/// Group id of official cases declared outside any group.
pub const UNGROUPED_ID: i32 = -1;

pub type Scenario<S> = Box<dyn Fn(&mut S, &mut Random)>;

/// How a case's bindings get their values.
pub enum Applier<S> {
    /// Assigns bindings directly.
    Scenario(Scenario<S>),
    /// Literal sample text; the input is parsed into the bindings and the
    /// declared output, if any, is the expected answer.
    Literal {
        input: String,
        output: Option<String>,
    },
}

pub struct TestCase<S> {
    id: String,
    description: String,
    subtask_ids: BTreeSet<i32>,
    applier: Applier<S>,
}

impl<S> TestCase<S> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Claimed subtasks; empty means every declared subtask.
    pub fn subtask_ids(&self) -> &BTreeSet<i32> {
        &self.subtask_ids
    }

    pub fn applier(&self) -> &Applier<S> {
        &self.applier
    }
}

pub struct TestGroup<S> {
    id: i32,
    test_cases: Vec<TestCase<S>>,
}

impl<S> TestGroup<S> {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn test_cases(&self) -> &[TestCase<S>] {
        &self.test_cases
    }

    pub fn is_sample(&self) -> bool {
        self.id == SAMPLE_GROUP_ID
    }
}

/// Groups in generation order: samples (if any) first, then official groups.
pub struct TestSuite<S> {
    groups: Vec<TestGroup<S>>,
}

impl<S> TestSuite<S> {
    pub fn groups(&self) -> &[TestGroup<S>] {
        &self.groups
    }

    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|group| group.test_cases.len()).sum()
    }
}

impl<S> Default for TestSuite<S> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

pub fn test_case_id(slug: &str, group_id: i32, number: usize) -> String {
    match group_id {
        SAMPLE_GROUP_ID => format!("{slug}_sample_{number}"),
        UNGROUPED_ID => format!("{slug}_{number}"),
        id => format!("{slug}_{id}_{number}"),
    }
}

/// Basename of a group's combined files.
pub fn base_id(slug: &str, group_id: i32) -> String {
    match group_id {
        SAMPLE_GROUP_ID => format!("{slug}_sample"),
        UNGROUPED_ID => slug.to_string(),
        id => format!("{slug}_{id}"),
    }
}

struct PendingCase<S> {
    description: String,
    applier: Applier<S>,
    subtask_ids: BTreeSet<i32>,
}

pub struct TestGroupBuilder<S> {
    subtask_ids: BTreeSet<i32>,
    cases: Vec<PendingCase<S>>,
}

impl<S> TestGroupBuilder<S> {
    /// Subtasks claimed by every case in this group.
    pub fn subtasks(&mut self, ids: impl IntoIterator<Item = i32>) -> &mut Self {
        self.subtask_ids = ids.into_iter().collect();
        self
    }

    pub fn case(
        &mut self,
        description: impl Into<String>,
        scenario: impl Fn(&mut S, &mut Random) + 'static,
    ) -> &mut Self {
        self.cases.push(PendingCase {
            description: description.into(),
            applier: Applier::Scenario(Box::new(scenario)),
            subtask_ids: BTreeSet::new(),
        });
        self
    }
}

pub struct SampleBuilder {
    input: String,
    output: Option<String>,
    subtask_ids: BTreeSet<i32>,
}

impl SampleBuilder {
    pub fn output(&mut self, lines: &[&str]) -> &mut Self {
        self.output = Some(join_lines(lines));
        self
    }

    pub fn subtasks(&mut self, ids: impl IntoIterator<Item = i32>) -> &mut Self {
        self.subtask_ids = ids.into_iter().collect();
        self
    }
}

fn join_lines(lines: &[&str]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

pub struct TestSuiteBuilder<S> {
    samples: Vec<SampleBuilder>,
    ungrouped: Vec<PendingCase<S>>,
    groups: Vec<TestGroupBuilder<S>>,
}

impl<S> Default for TestSuiteBuilder<S> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
            ungrouped: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl<S> TestSuiteBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a sample from its input lines.
    pub fn sample(&mut self, input: &[&str]) -> &mut SampleBuilder {
        self.samples.push(SampleBuilder {
            input: join_lines(input),
            output: None,
            subtask_ids: BTreeSet::new(),
        });
        let last = self.samples.len() - 1;
        &mut self.samples[last]
    }

    /// Declare an official case outside any group.
    pub fn case(
        &mut self,
        description: impl Into<String>,
        scenario: impl Fn(&mut S, &mut Random) + 'static,
    ) -> &mut Self {
        self.ungrouped.push(PendingCase {
            description: description.into(),
            applier: Applier::Scenario(Box::new(scenario)),
            subtask_ids: BTreeSet::new(),
        });
        self
    }

    /// Open the next test group; ids are assigned 1, 2, ... in order.
    pub fn group(&mut self) -> &mut TestGroupBuilder<S> {
        self.groups.push(TestGroupBuilder {
            subtask_ids: BTreeSet::new(),
            cases: Vec::new(),
        });
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn build(self, slug: &str) -> Result<TestSuite<S>, SpecificationError> {
        if !self.ungrouped.is_empty() && !self.groups.is_empty() {
            return Err(SpecificationError::new(
                "Test cases must be declared inside test groups once any test group is declared",
            ));
        }

        let mut groups = Vec::new();
        if !self.samples.is_empty() {
            let cases = self
                .samples
                .into_iter()
                .map(|sample| PendingCase {
                    description: String::new(),
                    applier: Applier::Literal {
                        input: sample.input,
                        output: sample.output,
                    },
                    subtask_ids: sample.subtask_ids,
                })
                .collect();
            groups.push(assemble(slug, SAMPLE_GROUP_ID, cases));
        }
        if !self.ungrouped.is_empty() {
            groups.push(assemble(slug, UNGROUPED_ID, self.ungrouped));
        }
        for (index, group) in self.groups.into_iter().enumerate() {
            let id = i32::try_from(index + 1)
                .map_err(|_| SpecificationError::new("Too many test groups"))?;
            let claimed = group.subtask_ids;
            let cases = group
                .cases
                .into_iter()
                .map(|case| PendingCase {
                    subtask_ids: claimed.clone(),
                    ..case
                })
                .collect();
            groups.push(assemble(slug, id, cases));
        }
        Ok(TestSuite { groups })
    }
}

fn assemble<S>(slug: &str, group_id: i32, cases: Vec<PendingCase<S>>) -> TestGroup<S> {
    let test_cases = cases
        .into_iter()
        .enumerate()
        .map(|(index, case)| TestCase {
            id: test_case_id(slug, group_id, index + 1),
            description: case.description,
            subtask_ids: case.subtask_ids,
            applier: case.applier,
        })
        .collect();
    TestGroup {
        id: group_id,
        test_cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct State {
        a: i32,
    }

    fn ids<S>(group: &TestGroup<S>) -> Vec<&str> {
        group.test_cases().iter().map(TestCase::id).collect()
    }

    #[test]
    fn ungrouped_cases_are_numbered_from_one() {
        let mut builder = TestSuiteBuilder::<State>::new();
        builder
            .case("A = 1", |s, _| s.a = 1)
            .case("A = 2", |s, _| s.a = 2);
        let suite = builder.build("ab").unwrap();
        assert_eq!(suite.groups().len(), 1);
        assert_eq!(suite.groups()[0].id(), UNGROUPED_ID);
        assert_eq!(ids(&suite.groups()[0]), vec!["ab_1", "ab_2"]);
        assert_eq!(suite.groups()[0].test_cases()[1].description(), "A = 2");
    }

    #[test]
    fn grouped_cases_inherit_group_subtasks() {
        let mut builder = TestSuiteBuilder::<State>::new();
        builder.group().subtasks([1, 2]).case("small", |s, _| s.a = 1);
        builder
            .group()
            .subtasks([2])
            .case("large", |s, _| s.a = 1000)
            .case("larger", |s, _| s.a = 2000);
        let suite = builder.build("ab").unwrap();
        assert_eq!(suite.groups()[0].id(), 1);
        assert_eq!(suite.groups()[1].id(), 2);
        assert_eq!(ids(&suite.groups()[1]), vec!["ab_2_1", "ab_2_2"]);
        let claimed: Vec<i32> = suite.groups()[0].test_cases()[0]
            .subtask_ids()
            .iter()
            .copied()
            .collect();
        assert_eq!(claimed, vec![1, 2]);
        assert_eq!(suite.case_count(), 3);
    }

    #[test]
    fn samples_come_first_with_literal_text() {
        let mut builder = TestSuiteBuilder::<State>::new();
        builder.case("official", |s, _| s.a = 3);
        builder.sample(&["1 2"]).output(&["3"]);
        builder.sample(&["5 6"]).subtasks([1]);
        let suite = builder.build("ab").unwrap();
        let samples = &suite.groups()[0];
        assert!(samples.is_sample());
        assert_eq!(ids(samples), vec!["ab_sample_1", "ab_sample_2"]);
        match samples.test_cases()[0].applier() {
            Applier::Literal { input, output } => {
                assert_eq!(input, "1 2\n");
                assert_eq!(output.as_deref(), Some("3\n"));
            }
            Applier::Scenario(_) => panic!("sample must be literal"),
        }
        assert_eq!(suite.groups()[1].id(), UNGROUPED_ID);
    }

    #[test]
    fn mixing_ungrouped_cases_with_groups_is_rejected() {
        let mut builder = TestSuiteBuilder::<State>::new();
        builder.case("loose", |s, _| s.a = 1);
        builder.group().case("grouped", |s, _| s.a = 2);
        let err = builder.build("ab").err().unwrap();
        assert_eq!(
            err.message(),
            "Test cases must be declared inside test groups once any test group is declared"
        );
    }

    #[test]
    fn base_ids_follow_group_kind() {
        assert_eq!(base_id("ab", SAMPLE_GROUP_ID), "ab_sample");
        assert_eq!(base_id("ab", UNGROUPED_ID), "ab");
        assert_eq!(base_id("ab", 3), "ab_3");
        assert_eq!(test_case_id("ab", 3, 12), "ab_3_12");
    }
}
