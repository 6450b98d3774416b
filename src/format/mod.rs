//! Declarative input/output format.
//!
//! A format is an ordered list of segments per section (input, output). It is
//! built once from the problem spec and never changes afterward.
pub(crate) mod scanner;
mod segment;

use crate::error::SpecificationError;
use std::collections::BTreeSet;

pub use segment::{
    GridSegment, IOSegment, LineItem, LineSegment, LinesSegment, SegmentBuilder, SegmentKind, Size,
};

/// Ordered input and output segments.
pub struct IOFormat<S> {
    input: Vec<IOSegment<S>>,
    output: Vec<IOSegment<S>>,
}

impl<S> IOFormat<S> {
    pub fn new(input: Vec<IOSegment<S>>, output: Vec<IOSegment<S>>) -> Self {
        Self { input, output }
    }

    pub fn input_format(&self) -> &[IOSegment<S>] {
        &self.input
    }

    pub fn output_format(&self) -> &[IOSegment<S>] {
        &self.output
    }
}

impl<S> Default for IOFormat<S> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Which half of the format a builder describes; only used in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSection {
    Input,
    Output,
}

impl FormatSection {
    fn as_str(self) -> &'static str {
        match self {
            FormatSection::Input => "input",
            FormatSection::Output => "output",
        }
    }
}

/// Collects the segments of one format section.
///
/// Each `line()`/`lines()`/`grid()` call starts a new segment and returns its
/// builder; validation is deferred until [`IOFormatBuilder::build`].
pub struct IOFormatBuilder<S> {
    section: FormatSection,
    segments: Vec<SegmentBuilder<S>>,
}

impl<S> IOFormatBuilder<S> {
    pub fn new(section: FormatSection) -> Self {
        Self {
            section,
            segments: Vec::new(),
        }
    }

    pub fn line(&mut self) -> &mut SegmentBuilder<S> {
        self.push(SegmentKind::Line)
    }

    pub fn lines(&mut self) -> &mut SegmentBuilder<S> {
        self.push(SegmentKind::Lines)
    }

    pub fn grid(&mut self) -> &mut SegmentBuilder<S> {
        self.push(SegmentKind::Grid)
    }

    fn push(&mut self, kind: SegmentKind) -> &mut SegmentBuilder<S> {
        self.segments.push(SegmentBuilder::new(kind));
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    pub fn build(self) -> Result<Vec<IOSegment<S>>, SpecificationError> {
        let mut names = BTreeSet::new();
        let mut segments = Vec::with_capacity(self.segments.len());
        for builder in self.segments {
            let segment = builder.build()?;
            for name in segment.variable_names() {
                if !names.insert(name.to_string()) {
                    return Err(SpecificationError::new(format!(
                        "Variable '{name}' is declared more than once in the {} format",
                        self.section.as_str()
                    )));
                }
            }
            segments.push(segment);
        }
        Ok(segments)
    }
}
