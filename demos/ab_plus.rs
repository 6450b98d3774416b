//! A + B with two subtasks, samples, and multi-case combination.
//!
//! `cargo run --example ab-plus -- --seed 7 --tc-dir tc`
use std::process::ExitCode;
use tcforge::{
    ConstraintSuiteBuilder, IOFormatBuilder, ProblemConfigBuilder, ProblemSpec, Random, TestSpec,
    TestSuiteBuilder, Variable,
};

#[derive(Default)]
struct AbPlus {
    t: i32,
    a: i64,
    b: i64,
    c: i64,
}

fn set(s: &mut AbPlus, a: i64, b: i64) {
    s.a = a;
    s.b = b;
    s.c = a + b;
}

fn random_pair(s: &mut AbPlus, random: &mut Random, max: i64) {
    let a = random.next_long(1, max);
    let b = random.next_long(1, max);
    set(s, a, b);
}

impl ProblemSpec for AbPlus {
    fn config(config: &mut ProblemConfigBuilder<Self>) {
        config
            .slug("ab-plus")
            .multiple_test_cases_count("T", |s: &mut AbPlus| &mut s.t);
    }

    fn input_format(format: &mut IOFormatBuilder<Self>) {
        format
            .line()
            .add(Variable::scalar("A", |s: &AbPlus| &s.a, |s: &mut AbPlus| &mut s.a))
            .add(Variable::scalar("B", |s: &AbPlus| &s.b, |s: &mut AbPlus| &mut s.b));
    }

    fn output_format(format: &mut IOFormatBuilder<Self>) {
        format
            .line()
            .add(Variable::scalar("C", |s: &AbPlus| &s.c, |s: &mut AbPlus| &mut s.c));
    }

    fn constraints(constraints: &mut ConstraintSuiteBuilder<Self>) {
        constraints
            .subtask(1)
            .constraint("1 <= A <= 1000", |s| (1..=1000).contains(&s.a))
            .constraint("1 <= B <= 1000", |s| (1..=1000).contains(&s.b));
        constraints
            .subtask(2)
            .constraint("1 <= A <= 10^9", |s| (1..=1_000_000_000).contains(&s.a))
            .constraint("1 <= B <= 10^9", |s| (1..=1_000_000_000).contains(&s.b));
        constraints.multiple_test_cases_constraint("1 <= T <= 20", |s| (1..=20).contains(&s.t));
    }
}

impl TestSpec for AbPlus {
    fn test_suite(suite: &mut TestSuiteBuilder<Self>) {
        suite.sample(&["1 2"]).output(&["3"]);
        suite.sample(&["100 200"]).output(&["300"]);

        suite
            .group()
            .subtasks([1, 2])
            .case("smallest", |s, _| set(s, 1, 1))
            .case("largest small", |s, _| set(s, 1000, 1000))
            .case("random small", |s, random| random_pair(s, random, 1000));

        let large = suite.group();
        large
            .subtasks([2])
            .case("largest", |s, _| set(s, 1_000_000_000, 1_000_000_000));
        for _ in 0..5 {
            large.case("random large", |s, random| random_pair(s, random, 1_000_000_000));
        }
    }
}

fn main() -> ExitCode {
    tcforge::run::<AbPlus>()
}
