//! Serialization of bound variables to and from test file text.
use crate::error::{ParseError, PrintError};
use crate::format::scanner::Scanner;
use crate::format::{GridSegment, IOFormat, IOSegment, LineSegment, LinesSegment};
use crate::variable::{matrix_element_name, vector_element_name, Binding};

pub struct IOManipulator<S> {
    format: IOFormat<S>,
}

impl<S> IOManipulator<S> {
    pub fn new(format: IOFormat<S>) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &IOFormat<S> {
        &self.format
    }

    pub fn has_output_format(&self) -> bool {
        !self.format.output_format().is_empty()
    }

    pub fn print_input(&self, state: &S) -> Result<String, PrintError> {
        print_segments(self.format.input_format(), state)
    }

    pub fn print_output(&self, state: &S) -> Result<String, PrintError> {
        print_segments(self.format.output_format(), state)
    }

    pub fn parse_input(&self, state: &mut S, text: &str) -> Result<(), ParseError> {
        parse_segments(self.format.input_format(), state, text)
    }

    pub fn parse_output(&self, state: &mut S, text: &str) -> Result<(), ParseError> {
        parse_segments(self.format.output_format(), state, text)
    }
}

fn print_segments<S>(segments: &[IOSegment<S>], state: &S) -> Result<String, PrintError> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            IOSegment::Line(segment) => print_line(segment, state, &mut out)?,
            IOSegment::Lines(segment) => print_lines(segment, state, &mut out)?,
            IOSegment::Grid(segment) => print_grid(segment, state, &mut out)?,
        }
    }
    Ok(out)
}

fn parse_segments<S>(segments: &[IOSegment<S>], state: &mut S, text: &str) -> Result<(), ParseError> {
    let mut scanner = Scanner::new(text);
    for segment in segments {
        match segment {
            IOSegment::Line(segment) => parse_line(segment, state, &mut scanner)?,
            IOSegment::Lines(segment) => parse_lines(segment, state, &mut scanner)?,
            IOSegment::Grid(segment) => parse_grid(segment, state, &mut scanner)?,
        }
    }
    scanner.expect_eof()
}

fn push_line(out: &mut String, tokens: &[String]) {
    out.push_str(&tokens.join(" "));
    out.push('\n');
}

fn check_vector_size(name: &str, expected: usize, actual: usize) -> Result<(), PrintError> {
    if expected != actual {
        return Err(PrintError::VectorSize {
            variable: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_matrix_rows(name: &str, expected: usize, actual: usize) -> Result<(), PrintError> {
    if expected != actual {
        return Err(PrintError::MatrixRows {
            variable: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn print_line<S>(segment: &LineSegment<S>, state: &S, out: &mut String) -> Result<(), PrintError> {
    let mut tokens = Vec::new();
    for item in &segment.items {
        let name = item.variable.name();
        match &item.variable.binding {
            Binding::Scalar(binding) => tokens.push(binding.print(state)),
            Binding::Vector(binding) => {
                let len = binding.len(state);
                if let Some(size) = &item.size {
                    check_vector_size(name, size.resolve(state), len)?;
                }
                tokens.extend((0..len).map(|index| binding.print_element(state, index)));
            }
            // Rejected when the segment is built.
            Binding::Matrix(_) => {}
        }
    }
    push_line(out, &tokens);
    Ok(())
}

fn print_lines<S>(segment: &LinesSegment<S>, state: &S, out: &mut String) -> Result<(), PrintError> {
    let size = segment.size.resolve(state);
    for vector in &segment.vectors {
        if let Binding::Vector(binding) = &vector.binding {
            check_vector_size(vector.name(), size, binding.len(state))?;
        }
    }
    if let Some(jagged) = &segment.jagged {
        if let Binding::Matrix(binding) = &jagged.binding {
            check_matrix_rows(jagged.name(), size, binding.rows(state))?;
        }
    }

    for row in 0..size {
        let mut tokens = Vec::new();
        for vector in &segment.vectors {
            if let Binding::Vector(binding) = &vector.binding {
                tokens.push(binding.print_element(state, row));
            }
        }
        if let Some(jagged) = &segment.jagged {
            if let Binding::Matrix(binding) = &jagged.binding {
                let columns = binding.columns(state, row);
                tokens.extend((0..columns).map(|column| binding.print_element(state, row, column)));
            }
        }
        push_line(out, &tokens);
    }
    Ok(())
}

fn print_grid<S>(segment: &GridSegment<S>, state: &S, out: &mut String) -> Result<(), PrintError> {
    let Binding::Matrix(binding) = &segment.matrix.binding else {
        return Ok(());
    };
    let name = segment.matrix.name();
    let rows = segment.rows.resolve(state);
    let columns = segment.columns.resolve(state);
    check_matrix_rows(name, rows, binding.rows(state))?;
    for row in 0..rows {
        let actual = binding.columns(state, row);
        if actual != columns {
            return Err(PrintError::MatrixColumns {
                variable: name.to_string(),
                row,
                expected: columns,
                actual,
            });
        }
    }

    for row in 0..rows {
        let tokens: Vec<String> = (0..columns)
            .map(|column| binding.print_element(state, row, column))
            .collect();
        push_line(out, &tokens);
    }
    Ok(())
}

fn parse_line<S>(
    segment: &LineSegment<S>,
    state: &mut S,
    scanner: &mut Scanner<'_>,
) -> Result<(), ParseError> {
    let mut last: Option<String> = None;
    for item in &segment.items {
        let name = item.variable.name();
        match &item.variable.binding {
            Binding::Scalar(binding) => {
                if last.is_some() {
                    scanner.expect_space(last.as_deref())?;
                }
                binding.parse(state, scanner, name)?;
                last = Some(name.to_string());
            }
            Binding::Vector(binding) => {
                binding.clear(state);
                match &item.size {
                    Some(size) => {
                        let size = size.resolve(state);
                        for index in 0..size {
                            if last.is_some() {
                                scanner.expect_space(last.as_deref())?;
                            }
                            let path = vector_element_name(name, index);
                            binding.parse_and_push(state, scanner, &path)?;
                            last = Some(path);
                        }
                    }
                    None => {
                        let mut index = 0;
                        while !scanner.at_line_end() {
                            if last.is_some() {
                                scanner.expect_space(last.as_deref())?;
                            }
                            let path = vector_element_name(name, index);
                            binding.parse_and_push(state, scanner, &path)?;
                            last = Some(path);
                            index += 1;
                        }
                    }
                }
            }
            Binding::Matrix(_) => {}
        }
    }
    scanner.expect_newline(last.as_deref())
}

fn parse_lines<S>(
    segment: &LinesSegment<S>,
    state: &mut S,
    scanner: &mut Scanner<'_>,
) -> Result<(), ParseError> {
    for vector in &segment.vectors {
        if let Binding::Vector(binding) = &vector.binding {
            binding.clear(state);
        }
    }
    if let Some(jagged) = &segment.jagged {
        if let Binding::Matrix(binding) = &jagged.binding {
            binding.clear(state);
        }
    }

    let size = segment.size.resolve(state);
    for row in 0..size {
        let mut last: Option<String> = None;
        for vector in &segment.vectors {
            if let Binding::Vector(binding) = &vector.binding {
                if last.is_some() {
                    scanner.expect_space(last.as_deref())?;
                }
                let path = vector_element_name(vector.name(), row);
                binding.parse_and_push(state, scanner, &path)?;
                last = Some(path);
            }
        }
        if let Some(jagged) = &segment.jagged {
            if let Binding::Matrix(binding) = &jagged.binding {
                binding.add_row(state);
                let mut column = 0;
                while !scanner.at_line_end() {
                    if last.is_some() {
                        scanner.expect_space(last.as_deref())?;
                    }
                    let path = matrix_element_name(jagged.name(), row, column);
                    binding.parse_and_push_to_last_row(state, scanner, &path)?;
                    last = Some(path);
                    column += 1;
                }
            }
        }
        scanner.expect_newline(last.as_deref())?;
    }
    Ok(())
}

fn parse_grid<S>(
    segment: &GridSegment<S>,
    state: &mut S,
    scanner: &mut Scanner<'_>,
) -> Result<(), ParseError> {
    let Binding::Matrix(binding) = &segment.matrix.binding else {
        return Ok(());
    };
    let name = segment.matrix.name();
    binding.clear(state);
    let rows = segment.rows.resolve(state);
    let columns = segment.columns.resolve(state);
    for row in 0..rows {
        binding.add_row(state);
        let mut last: Option<String> = None;
        for column in 0..columns {
            if last.is_some() {
                scanner.expect_space(last.as_deref())?;
            }
            let path = matrix_element_name(name, row, column);
            binding.parse_and_push_to_last_row(state, scanner, &path)?;
            last = Some(path);
        }
        scanner.expect_newline(last.as_deref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatSection, IOFormatBuilder, Size};
    use crate::variable::Variable;

    #[derive(Default, Debug, PartialEq)]
    struct State {
        a: i32,
        b: i32,
        n: usize,
        x: Vec<i32>,
        y: Vec<i32>,
        z: Vec<Vec<i32>>,
        g: Vec<Vec<i32>>,
        r: usize,
        c: usize,
    }

    fn manipulator(build: impl FnOnce(&mut IOFormatBuilder<State>)) -> IOManipulator<State> {
        let mut input = IOFormatBuilder::new(FormatSection::Input);
        build(&mut input);
        IOManipulator::new(IOFormat::new(input.build().unwrap(), Vec::new()))
    }

    fn grid_manipulator() -> IOManipulator<State> {
        manipulator(|io| {
            io.grid()
                .add(Variable::matrix("G", |s: &State| &s.g, |s: &mut State| &mut s.g))
                .grid_size(Size::of(|s: &State| s.r), Size::of(|s: &State| s.c));
        })
    }

    #[test]
    fn prints_line_of_scalars() {
        let io = manipulator(|io| {
            io.line()
                .add(Variable::scalar("A", |s: &State| &s.a, |s: &mut State| &mut s.a))
                .add(Variable::scalar("B", |s: &State| &s.b, |s: &mut State| &mut s.b));
        });
        let state = State {
            a: 1,
            b: 2,
            ..State::default()
        };
        assert_eq!(io.print_input(&state).unwrap(), "1 2\n");
    }

    #[test]
    fn line_vector_size_mismatch_is_print_error() {
        let io = manipulator(|io| {
            io.line().add_sized(
                Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x),
                Size::fixed(3),
            );
        });
        let state = State {
            x: vec![1, 2],
            ..State::default()
        };
        let err = io.print_input(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of elements of vector 'X' unsatisfied. Expected: 3, actual: 2"
        );
    }

    #[test]
    fn line_trailing_vector_reads_to_end_of_line() {
        let io = manipulator(|io| {
            io.line()
                .add(Variable::scalar("N", |s: &State| &s.n, |s: &mut State| &mut s.n))
                .add(Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x));
        });
        let mut state = State::default();
        io.parse_input(&mut state, "3 4 5 6\n").unwrap();
        assert_eq!(state.n, 3);
        assert_eq!(state.x, vec![4, 5, 6]);

        io.parse_input(&mut state, "0\n").unwrap();
        assert!(state.x.is_empty());
    }

    #[test]
    fn lines_with_jagged_vector_round_trip() {
        let io = manipulator(|io| {
            io.lines()
                .add(Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x))
                .add(Variable::matrix("Z", |s: &State| &s.z, |s: &mut State| &mut s.z))
                .size(Size::of(|s: &State| s.n));
        });
        let state = State {
            n: 3,
            x: vec![1, 2, 3],
            z: vec![vec![7, 8], vec![], vec![9]],
            ..State::default()
        };
        let text = io.print_input(&state).unwrap();
        assert_eq!(text, "1 7 8\n2\n3 9\n");

        let mut parsed = State {
            n: 3,
            ..State::default()
        };
        io.parse_input(&mut parsed, &text).unwrap();
        assert_eq!(parsed.x, state.x);
        assert_eq!(parsed.z, state.z);
    }

    #[test]
    fn lines_of_size_zero_are_empty() {
        let io = manipulator(|io| {
            io.lines()
                .add(Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x))
                .add(Variable::vector("Y", |s: &State| &s.y, |s: &mut State| &mut s.y))
                .size(Size::fixed(0));
        });
        let state = State::default();
        assert_eq!(io.print_input(&state).unwrap(), "");

        let mut parsed = State {
            x: vec![5],
            ..State::default()
        };
        io.parse_input(&mut parsed, "").unwrap();
        assert!(parsed.x.is_empty());
        assert!(parsed.y.is_empty());
    }

    #[test]
    fn lines_vector_length_must_match_size() {
        let io = manipulator(|io| {
            io.lines()
                .add(Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x))
                .add(Variable::vector("Y", |s: &State| &s.y, |s: &mut State| &mut s.y))
                .size(Size::fixed(2));
        });
        let state = State {
            x: vec![1, 2],
            y: vec![1],
            ..State::default()
        };
        let err = io.print_input(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of elements of vector 'Y' unsatisfied. Expected: 2, actual: 1"
        );
    }

    #[test]
    fn grid_round_trip_for_all_small_shapes() {
        let io = grid_manipulator();
        for rows in 0..4 {
            for columns in 0..4 {
                let g: Vec<Vec<i32>> = (0..rows)
                    .map(|r| (0..columns).map(|c| (r * 10 + c) as i32).collect())
                    .collect();
                let state = State {
                    r: rows,
                    c: columns,
                    g: g.clone(),
                    ..State::default()
                };
                let text = io.print_input(&state).unwrap();
                assert_eq!(text.matches('\n').count(), rows);

                let mut parsed = State {
                    r: rows,
                    c: columns,
                    ..State::default()
                };
                io.parse_input(&mut parsed, &text).unwrap();
                assert_eq!(parsed.g, g, "{rows}x{columns}");
            }
        }
    }

    #[test]
    fn grid_parse_error_names_matrix_element() {
        let io = grid_manipulator();
        let mut state = State {
            r: 2,
            c: 2,
            ..State::default()
        };
        let err = io.parse_input(&mut state, "1 2\na 4\n").unwrap_err();
        assert_eq!(err.variable(), Some("G[1][0]"));
        assert_eq!(err.to_string(), "Cannot parse for 'G[1][0]'. Found: 'a'");
    }

    #[test]
    fn grid_dimension_mismatch_is_print_error() {
        let io = grid_manipulator();
        let state = State {
            r: 2,
            c: 2,
            g: vec![vec![1, 2], vec![3]],
            ..State::default()
        };
        let err = io.print_input(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of columns of row 1 of matrix 'G' unsatisfied. Expected: 2, actual: 1"
        );
    }

    #[test]
    fn trailing_text_after_format_is_rejected() {
        let io = manipulator(|io| {
            io.line()
                .add(Variable::scalar("A", |s: &State| &s.a, |s: &mut State| &mut s.a));
        });
        let mut state = State::default();
        let err = io.parse_input(&mut state, "1\n2\n").unwrap_err();
        assert_eq!(err, ParseError::TrailingInput);

        let err = io.parse_input(&mut state, "1 2\n").unwrap_err();
        assert_eq!(err.to_string(), "Expected: <newline> after 'A'");
    }

    #[test]
    fn line_requires_space_between_scalars() {
        let io = manipulator(|io| {
            io.line()
                .add(Variable::scalar("A", |s: &State| &s.a, |s: &mut State| &mut s.a))
                .add(Variable::scalar("B", |s: &State| &s.b, |s: &mut State| &mut s.b));
        });
        let mut state = State::default();
        let err = io.parse_input(&mut state, "1\n2\n").unwrap_err();
        assert_eq!(err.variable(), Some("A"));
        assert_eq!(err.to_string(), "Expected: <space> after 'A'");
    }

    #[test]
    fn matrix_row_count_mismatch_is_print_error() {
        let io = grid_manipulator();
        let state = State {
            r: 2,
            c: 1,
            g: vec![vec![1]],
            ..State::default()
        };
        let err = io.print_input(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of rows of matrix 'G' unsatisfied. Expected: 2, actual: 1"
        );

        let io = manipulator(|io| {
            io.lines()
                .add(Variable::vector("X", |s: &State| &s.x, |s: &mut State| &mut s.x))
                .add(Variable::matrix("Z", |s: &State| &s.z, |s: &mut State| &mut s.z))
                .size(Size::of(|s: &State| s.n));
        });
        let state = State {
            n: 3,
            x: vec![1, 2, 3],
            z: vec![vec![7], vec![]],
            ..State::default()
        };
        let err = io.print_input(&state).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number of rows of matrix 'Z' unsatisfied. Expected: 3, actual: 2"
        );
    }
}
