//! Segment model: the typed units an I/O format is composed of.
use crate::error::SpecificationError;
use crate::variable::{Variable, VariableKind};
use serde::Serialize;

/// A dimension resolved against the current bindings when a file is
/// printed or parsed.
pub enum Size<S> {
    Fixed(usize),
    Bound(Box<dyn Fn(&S) -> usize>),
}

impl<S> Size<S> {
    pub fn fixed(size: usize) -> Self {
        Size::Fixed(size)
    }

    pub fn of(resolve: impl Fn(&S) -> usize + 'static) -> Self {
        Size::Bound(Box::new(resolve))
    }

    pub fn resolve(&self, state: &S) -> usize {
        match self {
            Size::Fixed(size) => *size,
            Size::Bound(resolve) => resolve(state),
        }
    }
}

impl<S> From<usize> for Size<S> {
    fn from(size: usize) -> Self {
        Size::Fixed(size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Line,
    Lines,
    Grid,
}

impl SegmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Line => "line",
            SegmentKind::Lines => "lines",
            SegmentKind::Grid => "grid",
        }
    }
}

/// One entry of a line segment; vectors may carry a fixed size.
pub struct LineItem<S> {
    pub(crate) variable: Variable<S>,
    pub(crate) size: Option<Size<S>>,
}

/// Exactly one line of scalars and vectors in declared order.
pub struct LineSegment<S> {
    pub(crate) items: Vec<LineItem<S>>,
}

/// `size` rows; row `j` holds element `j` of every vector, followed by the
/// elements of row `j` of the trailing jagged vector, if any.
pub struct LinesSegment<S> {
    pub(crate) vectors: Vec<Variable<S>>,
    pub(crate) jagged: Option<Variable<S>>,
    pub(crate) size: Size<S>,
}

/// A single matrix, row-major, one line per row.
pub struct GridSegment<S> {
    pub(crate) matrix: Variable<S>,
    pub(crate) rows: Size<S>,
    pub(crate) columns: Size<S>,
}

pub enum IOSegment<S> {
    Line(LineSegment<S>),
    Lines(LinesSegment<S>),
    Grid(GridSegment<S>),
}

impl<S> IOSegment<S> {
    pub fn kind(&self) -> SegmentKind {
        match self {
            IOSegment::Line(_) => SegmentKind::Line,
            IOSegment::Lines(_) => SegmentKind::Lines,
            IOSegment::Grid(_) => SegmentKind::Grid,
        }
    }

    pub fn variable_names(&self) -> Vec<&str> {
        match self {
            IOSegment::Line(segment) => segment
                .items
                .iter()
                .map(|item| item.variable.name())
                .collect(),
            IOSegment::Lines(segment) => segment
                .vectors
                .iter()
                .chain(segment.jagged.iter())
                .map(Variable::name)
                .collect(),
            IOSegment::Grid(segment) => vec![segment.matrix.name()],
        }
    }
}

/// Accumulates one segment's declarations; validated when the format is built.
pub struct SegmentBuilder<S> {
    kind: SegmentKind,
    variables: Vec<(Variable<S>, Option<Size<S>>)>,
    size: Option<Size<S>>,
    columns: Option<Size<S>>,
}

impl<S> SegmentBuilder<S> {
    pub(crate) fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            variables: Vec::new(),
            size: None,
            columns: None,
        }
    }

    /// Add a variable; vectors in a line segment added this way read to end
    /// of line.
    pub fn add(&mut self, variable: Variable<S>) -> &mut Self {
        self.variables.push((variable, None));
        self
    }

    /// Add a vector with a fixed element count to a line segment. Any other
    /// use is rejected when the format is built.
    pub fn add_sized(&mut self, variable: Variable<S>, size: impl Into<Size<S>>) -> &mut Self {
        self.variables.push((variable, Some(size.into())));
        self
    }

    /// Row count of a lines segment.
    pub fn size(&mut self, size: impl Into<Size<S>>) -> &mut Self {
        self.size = Some(size.into());
        self
    }

    /// Row and column counts of a grid segment.
    pub fn grid_size(&mut self, rows: impl Into<Size<S>>, columns: impl Into<Size<S>>) -> &mut Self {
        self.size = Some(rows.into());
        self.columns = Some(columns.into());
        self
    }

    pub(crate) fn build(self) -> Result<IOSegment<S>, SpecificationError> {
        match self.kind {
            SegmentKind::Line => self.build_line(),
            SegmentKind::Lines => self.build_lines(),
            SegmentKind::Grid => self.build_grid(),
        }
    }

    fn build_line(self) -> Result<IOSegment<S>, SpecificationError> {
        let count = self.variables.len();
        let mut items = Vec::with_capacity(count);
        for (index, (variable, size)) in self.variables.into_iter().enumerate() {
            match variable.kind() {
                VariableKind::Scalar if size.is_some() => {
                    return Err(sized_item(&variable, SegmentKind::Line));
                }
                VariableKind::Scalar => {}
                VariableKind::Vector => {
                    if size.is_none() && index + 1 != count {
                        return Err(SpecificationError::new(
                            "Vector without size can only be the last variable in a line segment",
                        ));
                    }
                }
                VariableKind::Matrix => return Err(unsupported(&variable, SegmentKind::Line)),
            }
            items.push(LineItem { variable, size });
        }
        Ok(IOSegment::Line(LineSegment { items }))
    }

    fn build_lines(self) -> Result<IOSegment<S>, SpecificationError> {
        if self.variables.is_empty() {
            return Err(SpecificationError::new(
                "Lines segment must have at least one variable",
            ));
        }
        reject_item_sizes(&self.variables, SegmentKind::Lines)?;
        let size = self
            .size
            .ok_or_else(|| SpecificationError::new("Lines segment must define vector sizes"))?;
        let count = self.variables.len();
        let mut vectors = Vec::with_capacity(count);
        let mut jagged = None;
        for (index, (variable, _)) in self.variables.into_iter().enumerate() {
            match variable.kind() {
                VariableKind::Vector => vectors.push(variable),
                VariableKind::Matrix => {
                    if index + 1 != count {
                        return Err(SpecificationError::new(
                            "Jagged vector can only be the last variable in a lines segment",
                        ));
                    }
                    jagged = Some(variable);
                }
                VariableKind::Scalar => return Err(unsupported(&variable, SegmentKind::Lines)),
            }
        }
        Ok(IOSegment::Lines(LinesSegment {
            vectors,
            jagged,
            size,
        }))
    }

    fn build_grid(mut self) -> Result<IOSegment<S>, SpecificationError> {
        if self.variables.len() != 1 {
            return Err(SpecificationError::new(
                "Grid segment must have exactly one variable",
            ));
        }
        reject_item_sizes(&self.variables, SegmentKind::Grid)?;
        let (matrix, _) = self.variables.remove(0);
        if matrix.kind() != VariableKind::Matrix {
            return Err(unsupported(&matrix, SegmentKind::Grid));
        }
        let (Some(rows), Some(columns)) = (self.size, self.columns) else {
            return Err(SpecificationError::new(
                "Grid segment must define matrix sizes",
            ));
        };
        Ok(IOSegment::Grid(GridSegment {
            matrix,
            rows,
            columns,
        }))
    }
}

/// Per-variable sizes only exist for vectors in a line segment.
fn reject_item_sizes<S>(
    variables: &[(Variable<S>, Option<Size<S>>)],
    kind: SegmentKind,
) -> Result<(), SpecificationError> {
    match variables.iter().find(|(_, size)| size.is_some()) {
        Some((variable, _)) => Err(sized_item(variable, kind)),
        None => Ok(()),
    }
}

fn sized_item<S>(variable: &Variable<S>, kind: SegmentKind) -> SpecificationError {
    SpecificationError::new(format!(
        "Variable '{}' cannot be given a size in a {} segment",
        variable.name(),
        kind.as_str()
    ))
}

fn unsupported<S>(variable: &Variable<S>, kind: SegmentKind) -> SpecificationError {
    SpecificationError::new(format!(
        "The type of variable '{}' is not supported for a {} segment",
        variable.name(),
        kind.as_str()
    ))
}
