//! Grid queries: a character grid followed by cell queries.
//!
//! `cargo run --example grid-paths -- --solution ./grid_solution`
use std::process::ExitCode;
use tcforge::{
    ConstraintSuiteBuilder, IOFormatBuilder, ProblemConfigBuilder, ProblemSpec, Random, Size,
    TestSpec, TestSuiteBuilder, Variable,
};

#[derive(Default)]
struct GridPaths {
    n: usize,
    m: usize,
    g: Vec<Vec<char>>,
    k: usize,
    r: Vec<usize>,
    c: Vec<usize>,
    free: Vec<u8>,
}

impl GridPaths {
    fn answer(&mut self) {
        self.k = self.r.len();
        self.free = self
            .r
            .iter()
            .zip(&self.c)
            .map(|(&r, &c)| u8::from(self.g[r][c] == '.'))
            .collect();
    }
}

fn random_grid(s: &mut GridPaths, random: &mut Random, n: usize, m: usize, queries: usize) {
    s.n = n;
    s.m = m;
    s.g = (0..n)
        .map(|_| {
            (0..m)
                .map(|_| if random.next_int(0, 3) == 0 { '#' } else { '.' })
                .collect()
        })
        .collect();
    s.r.clear();
    s.c.clear();
    for _ in 0..queries {
        s.r.push(random.next_int(0, n as i32 - 1) as usize);
        s.c.push(random.next_int(0, m as i32 - 1) as usize);
    }
    s.answer();
}

impl ProblemSpec for GridPaths {
    fn config(config: &mut ProblemConfigBuilder<Self>) {
        config.slug("grid-paths");
    }

    fn input_format(format: &mut IOFormatBuilder<Self>) {
        format
            .line()
            .add(Variable::scalar("N", |s: &GridPaths| &s.n, |s: &mut GridPaths| &mut s.n))
            .add(Variable::scalar("M", |s: &GridPaths| &s.m, |s: &mut GridPaths| &mut s.m));
        format
            .grid()
            .add(Variable::matrix("G", |s: &GridPaths| &s.g, |s: &mut GridPaths| &mut s.g))
            .grid_size(Size::of(|s: &GridPaths| s.n), Size::of(|s: &GridPaths| s.m));
        format
            .line()
            .add(Variable::scalar("K", |s: &GridPaths| &s.k, |s: &mut GridPaths| &mut s.k));
        format
            .lines()
            .add(Variable::vector("R", |s: &GridPaths| &s.r, |s: &mut GridPaths| &mut s.r))
            .add(Variable::vector("C", |s: &GridPaths| &s.c, |s: &mut GridPaths| &mut s.c))
            .size(Size::of(|s: &GridPaths| s.k));
    }

    fn output_format(format: &mut IOFormatBuilder<Self>) {
        format
            .lines()
            .add(Variable::vector(
                "FREE",
                |s: &GridPaths| &s.free,
                |s: &mut GridPaths| &mut s.free,
            ))
            .size(Size::of(|s: &GridPaths| s.k));
    }

    fn constraints(constraints: &mut ConstraintSuiteBuilder<Self>) {
        constraints
            .constraint("1 <= N, M <= 50", |s| {
                (1..=50).contains(&s.n) && (1..=50).contains(&s.m)
            })
            .constraint("G[i][j] is '.' or '#'", |s| {
                s.g.iter().flatten().all(|&cell| cell == '.' || cell == '#')
            })
            .constraint("0 <= R[i] < N, 0 <= C[i] < M", |s| {
                s.r.iter().all(|&r| r < s.n) && s.c.iter().all(|&c| c < s.m)
            });
    }
}

impl TestSpec for GridPaths {
    fn test_suite(suite: &mut TestSuiteBuilder<Self>) {
        suite
            .sample(&["2 3", ". # .", ". . #", "2", "0 1", "1 0"])
            .output(&["0", "1"]);

        suite.case("single free cell", |s, _| {
            s.n = 1;
            s.m = 1;
            s.g = vec![vec!['.']];
            s.r = vec![0];
            s.c = vec![0];
            s.answer();
        });
        suite.case("no queries", |s, random| random_grid(s, random, 3, 4, 0));
        suite.case("largest", |s, random| random_grid(s, random, 50, 50, 100));
    }
}

fn main() -> ExitCode {
    tcforge::run::<GridPaths>()
}
