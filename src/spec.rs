//! Problem and test specifications, and the assembled core spec the generator
//! consumes.
use crate::constraint::{ConstraintSuite, ConstraintSuiteBuilder};
use crate::error::{CombinationFailure, SpecificationError};
use crate::format::{FormatSection, IOFormat, IOFormatBuilder};
use crate::manipulator::IOManipulator;
use crate::testcase::{TestSuite, TestSuiteBuilder};

/// Declares a problem's I/O format and constraints. Implemented by the state
/// type holding the problem's variables.
pub trait ProblemSpec: Default + Sized + 'static {
    fn config(_config: &mut ProblemConfigBuilder<Self>) {}

    fn input_format(format: &mut IOFormatBuilder<Self>);

    fn output_format(_format: &mut IOFormatBuilder<Self>) {}

    fn constraints(_constraints: &mut ConstraintSuiteBuilder<Self>) {}
}

/// Adds the test suite to a problem spec.
pub trait TestSpec: ProblemSpec {
    fn test_suite(suite: &mut TestSuiteBuilder<Self>);
}

type AssignCount<S> = Box<dyn Fn(&mut S, usize) -> bool>;

/// Binding that receives a group's case count before combination.
pub struct CaseCount<S> {
    name: String,
    assign: AssignCount<S>,
}

impl<S: 'static> CaseCount<S> {
    pub fn new<T>(name: impl Into<String>, get_mut: fn(&mut S) -> &mut T) -> Self
    where
        T: TryFrom<usize> + 'static,
    {
        Self {
            name: name.into(),
            assign: Box::new(move |state: &mut S, count: usize| match T::try_from(count) {
                Ok(value) => {
                    *get_mut(state) = value;
                    true
                }
                Err(_) => false,
            }),
        }
    }
}

impl<S> CaseCount<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `count` in the binding; fails when the binding's type cannot
    /// represent it.
    pub(crate) fn assign(&self, state: &mut S, count: usize) -> Result<(), CombinationFailure> {
        if (self.assign)(state, count) {
            Ok(())
        } else {
            Err(CombinationFailure::CountOutOfRange {
                variable: self.name.clone(),
                count,
            })
        }
    }
}

impl<S> std::fmt::Debug for CaseCount<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseCount").field("name", &self.name).finish()
    }
}

pub struct ProblemConfigBuilder<S> {
    slug: Option<String>,
    case_count: Option<CaseCount<S>>,
}

impl<S> Default for ProblemConfigBuilder<S> {
    fn default() -> Self {
        Self {
            slug: None,
            case_count: None,
        }
    }
}

impl<S: 'static> ProblemConfigBuilder<S> {
    pub fn slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.slug = Some(slug.into());
        self
    }

    /// Enable multi-case combination; `get_mut` reaches the count variable.
    pub fn multiple_test_cases_count<T>(
        &mut self,
        name: impl Into<String>,
        get_mut: fn(&mut S) -> &mut T,
    ) -> &mut Self
    where
        T: TryFrom<usize> + 'static,
    {
        self.case_count = Some(CaseCount::new(name, get_mut));
        self
    }
}

/// Slug declared by the problem itself, if any.
pub fn declared_slug<P: ProblemSpec>() -> Option<String> {
    let mut config = ProblemConfigBuilder::default();
    P::config(&mut config);
    config.slug
}

/// Everything the generator needs, built and validated once.
pub struct CoreSpec<S> {
    manipulator: IOManipulator<S>,
    constraint_suite: ConstraintSuite<S>,
    case_count: Option<CaseCount<S>>,
    test_suite: TestSuite<S>,
}

impl<S> CoreSpec<S> {
    pub fn new(
        io_format: IOFormat<S>,
        constraint_suite: ConstraintSuite<S>,
        case_count: Option<CaseCount<S>>,
        test_suite: TestSuite<S>,
    ) -> Self {
        Self {
            manipulator: IOManipulator::new(io_format),
            constraint_suite,
            case_count,
            test_suite,
        }
    }

    pub fn io_format(&self) -> &IOFormat<S> {
        self.manipulator.format()
    }

    pub fn manipulator(&self) -> &IOManipulator<S> {
        &self.manipulator
    }

    pub fn constraint_suite(&self) -> &ConstraintSuite<S> {
        &self.constraint_suite
    }

    pub fn case_count(&self) -> Option<&CaseCount<S>> {
        self.case_count.as_ref()
    }

    pub fn test_suite(&self) -> &TestSuite<S> {
        &self.test_suite
    }
}

impl<S: TestSpec> CoreSpec<S> {
    /// Run every declaration hook of `S`; case ids are derived from `slug`.
    pub fn build(slug: &str) -> Result<Self, SpecificationError> {
        let mut config = ProblemConfigBuilder::default();
        S::config(&mut config);

        let mut input = IOFormatBuilder::new(FormatSection::Input);
        S::input_format(&mut input);
        let mut output = IOFormatBuilder::new(FormatSection::Output);
        S::output_format(&mut output);
        let io_format = IOFormat::new(input.build()?, output.build()?);

        let mut constraints = ConstraintSuiteBuilder::new();
        S::constraints(&mut constraints);
        let constraint_suite = constraints.build()?;

        let mut suite = TestSuiteBuilder::new();
        S::test_suite(&mut suite);
        let test_suite = suite.build(slug)?;

        Ok(Self::new(io_format, constraint_suite, config.case_count, test_suite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Variable;

    #[derive(Default)]
    struct Sum {
        t: u8,
        a: i32,
        b: i32,
        c: i32,
    }

    impl ProblemSpec for Sum {
        fn config(config: &mut ProblemConfigBuilder<Self>) {
            config
                .slug("sum")
                .multiple_test_cases_count("T", |s: &mut Sum| &mut s.t);
        }

        fn input_format(format: &mut IOFormatBuilder<Self>) {
            format
                .line()
                .add(Variable::scalar("A", |s: &Sum| &s.a, |s: &mut Sum| &mut s.a))
                .add(Variable::scalar("B", |s: &Sum| &s.b, |s: &mut Sum| &mut s.b));
        }

        fn output_format(format: &mut IOFormatBuilder<Self>) {
            format
                .line()
                .add(Variable::scalar("C", |s: &Sum| &s.c, |s: &mut Sum| &mut s.c));
        }

        fn constraints(constraints: &mut ConstraintSuiteBuilder<Self>) {
            constraints.constraint("1 <= A && A <= 100", |s| (1..=100).contains(&s.a));
        }
    }

    impl TestSpec for Sum {
        fn test_suite(suite: &mut TestSuiteBuilder<Self>) {
            suite.case("A = B = 1", |s, _| {
                s.a = 1;
                s.b = 1;
                s.c = 2;
            });
        }
    }

    #[test]
    fn builds_every_declared_piece() {
        assert_eq!(declared_slug::<Sum>().as_deref(), Some("sum"));
        let spec = CoreSpec::<Sum>::build("sum").unwrap();
        assert_eq!(spec.io_format().input_format().len(), 1);
        assert_eq!(spec.io_format().output_format().len(), 1);
        assert_eq!(spec.constraint_suite().subtasks().len(), 1);
        assert_eq!(spec.case_count().map(CaseCount::name), Some("T"));
        assert_eq!(spec.test_suite().groups()[0].test_cases()[0].id(), "sum_1");
    }

    #[test]
    fn case_count_rejects_unrepresentable_counts() {
        let count = CaseCount::new("T", |s: &mut Sum| &mut s.t);
        let mut state = Sum::default();
        count.assign(&mut state, 3).unwrap();
        assert_eq!(state.t, 3);

        let err = count.assign(&mut state, 300).unwrap_err();
        assert_eq!(err.to_string(), "Test case count 300 cannot be assigned to 'T'");
    }
}
