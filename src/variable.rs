//! Named bindings from I/O variables to fields of the problem state.
//!
//! The state type owns the storage; a [`Variable`] only knows how to reach a
//! field (through a pair of accessor functions) and how to print or parse it.
use crate::format::scanner::Scanner;
use crate::error::ParseError;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

/// Element types that can appear in test files.
pub trait Value: Display + FromStr + 'static {}

impl<T> Value for T where T: Display + FromStr + 'static {}

pub type Getter<S, T> = fn(&S) -> &T;
pub type Setter<S, T> = fn(&mut S) -> &mut T;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Scalar,
    Vector,
    Matrix,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Scalar => "scalar",
            VariableKind::Vector => "vector",
            VariableKind::Matrix => "matrix",
        }
    }
}

pub(crate) fn vector_element_name(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

pub(crate) fn matrix_element_name(name: &str, row: usize, column: usize) -> String {
    format!("{name}[{row}][{column}]")
}

pub(crate) trait ScalarBinding<S> {
    fn print(&self, state: &S) -> String;
    fn parse(&self, state: &mut S, scanner: &mut Scanner<'_>, path: &str)
        -> Result<(), ParseError>;
}

pub(crate) trait VectorBinding<S> {
    fn len(&self, state: &S) -> usize;
    fn print_element(&self, state: &S, index: usize) -> String;
    fn clear(&self, state: &mut S);
    fn parse_and_push(
        &self,
        state: &mut S,
        scanner: &mut Scanner<'_>,
        path: &str,
    ) -> Result<(), ParseError>;
}

pub(crate) trait MatrixBinding<S> {
    fn rows(&self, state: &S) -> usize;
    fn columns(&self, state: &S, row: usize) -> usize;
    fn print_element(&self, state: &S, row: usize, column: usize) -> String;
    fn clear(&self, state: &mut S);
    fn add_row(&self, state: &mut S);
    fn parse_and_push_to_last_row(
        &self,
        state: &mut S,
        scanner: &mut Scanner<'_>,
        path: &str,
    ) -> Result<(), ParseError>;
}

struct FieldBinding<S, T> {
    get: Getter<S, T>,
    get_mut: Setter<S, T>,
}

impl<S, T: Value> ScalarBinding<S> for FieldBinding<S, T> {
    fn print(&self, state: &S) -> String {
        (self.get)(state).to_string()
    }

    fn parse(
        &self,
        state: &mut S,
        scanner: &mut Scanner<'_>,
        path: &str,
    ) -> Result<(), ParseError> {
        let value = scanner.parse_value::<T>(path)?;
        *(self.get_mut)(state) = value;
        Ok(())
    }
}

impl<S, T: Value> VectorBinding<S> for FieldBinding<S, Vec<T>> {
    fn len(&self, state: &S) -> usize {
        (self.get)(state).len()
    }

    fn print_element(&self, state: &S, index: usize) -> String {
        (self.get)(state)[index].to_string()
    }

    fn clear(&self, state: &mut S) {
        (self.get_mut)(state).clear();
    }

    fn parse_and_push(
        &self,
        state: &mut S,
        scanner: &mut Scanner<'_>,
        path: &str,
    ) -> Result<(), ParseError> {
        let value = scanner.parse_value::<T>(path)?;
        (self.get_mut)(state).push(value);
        Ok(())
    }
}

impl<S, T: Value> MatrixBinding<S> for FieldBinding<S, Vec<Vec<T>>> {
    fn rows(&self, state: &S) -> usize {
        (self.get)(state).len()
    }

    fn columns(&self, state: &S, row: usize) -> usize {
        (self.get)(state)[row].len()
    }

    fn print_element(&self, state: &S, row: usize, column: usize) -> String {
        (self.get)(state)[row][column].to_string()
    }

    fn clear(&self, state: &mut S) {
        (self.get_mut)(state).clear();
    }

    fn add_row(&self, state: &mut S) {
        (self.get_mut)(state).push(Vec::new());
    }

    fn parse_and_push_to_last_row(
        &self,
        state: &mut S,
        scanner: &mut Scanner<'_>,
        path: &str,
    ) -> Result<(), ParseError> {
        let value = scanner.parse_value::<T>(path)?;
        let matrix = (self.get_mut)(state);
        match matrix.last_mut() {
            Some(row) => row.push(value),
            None => matrix.push(vec![value]),
        }
        Ok(())
    }
}

pub(crate) enum Binding<S> {
    Scalar(Box<dyn ScalarBinding<S>>),
    Vector(Box<dyn VectorBinding<S>>),
    Matrix(Box<dyn MatrixBinding<S>>),
}

/// A named I/O variable bound to a field of `S`.
pub struct Variable<S> {
    name: String,
    pub(crate) binding: Binding<S>,
}

impl<S: 'static> Variable<S> {
    pub fn scalar<T: Value>(name: impl Into<String>, get: Getter<S, T>, get_mut: Setter<S, T>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Scalar(Box::new(FieldBinding { get, get_mut })),
        }
    }

    pub fn vector<T: Value>(
        name: impl Into<String>,
        get: Getter<S, Vec<T>>,
        get_mut: Setter<S, Vec<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Vector(Box::new(FieldBinding { get, get_mut })),
        }
    }

    pub fn matrix<T: Value>(
        name: impl Into<String>,
        get: Getter<S, Vec<Vec<T>>>,
        get_mut: Setter<S, Vec<Vec<T>>>,
    ) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Matrix(Box::new(FieldBinding { get, get_mut })),
        }
    }
}

impl<S> Variable<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        match self.binding {
            Binding::Scalar(_) => VariableKind::Scalar,
            Binding::Vector(_) => VariableKind::Vector,
            Binding::Matrix(_) => VariableKind::Matrix,
        }
    }
}

impl<S> std::fmt::Debug for Variable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct State {
        x: i32,
        v: Vec<i64>,
        g: Vec<Vec<i32>>,
    }

    #[test]
    fn scalar_binding_reads_and_writes_field() {
        let var = Variable::scalar("X", |s: &State| &s.x, |s: &mut State| &mut s.x);
        assert_eq!(var.kind(), VariableKind::Scalar);
        let Binding::Scalar(binding) = &var.binding else {
            panic!("expected scalar binding");
        };
        let mut state = State::default();
        let mut scanner = Scanner::new("42");
        binding.parse(&mut state, &mut scanner, "X").unwrap();
        assert_eq!(state.x, 42);
        assert_eq!(binding.print(&state), "42");
    }

    #[test]
    fn vector_binding_grows_container() {
        let var = Variable::vector("V", |s: &State| &s.v, |s: &mut State| &mut s.v);
        let Binding::Vector(binding) = &var.binding else {
            panic!("expected vector binding");
        };
        let mut state = State {
            v: vec![9, 9, 9],
            ..State::default()
        };
        binding.clear(&mut state);
        let mut scanner = Scanner::new("7");
        binding.parse_and_push(&mut state, &mut scanner, "V[0]").unwrap();
        assert_eq!(state.v, vec![7]);
        assert_eq!(binding.len(&state), 1);
    }

    #[test]
    fn matrix_binding_reports_element_path() {
        let var = Variable::matrix("G", |s: &State| &s.g, |s: &mut State| &mut s.g);
        let Binding::Matrix(binding) = &var.binding else {
            panic!("expected matrix binding");
        };
        let mut state = State::default();
        binding.add_row(&mut state);
        let mut scanner = Scanner::new("a");
        let path = matrix_element_name(var.name(), 0, 0);
        let err = binding
            .parse_and_push_to_last_row(&mut state, &mut scanner, &path)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot parse for 'G[0][0]'. Found: 'a'");
    }
}
