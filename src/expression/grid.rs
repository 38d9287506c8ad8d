//! Two-dimensional grids of parsed codes

use super::{ExpressionError, Term};

/// One parsed grid entry
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The literal `"0"`: contributes nothing
    Zero,
    /// A well-formed term
    Term(Term),
    /// Anything else, kept verbatim so evaluation can name it
    Malformed(String),
}

impl Cell {
    /// Classify a raw code
    pub fn parse(code: &str) -> Self {
        if code == "0" {
            return Cell::Zero;
        }
        match Term::parse(code) {
            Ok(term) => Cell::Term(term),
            Err(_) => Cell::Malformed(code.to_string()),
        }
    }

    /// The term of this cell, `None` for zero cells
    ///
    /// # Errors
    ///
    /// [`ExpressionError::InvalidEntry`] for malformed cells.
    pub fn term(&self) -> Result<Option<&Term>, ExpressionError> {
        match self {
            Cell::Zero => Ok(None),
            Cell::Term(term) => Ok(Some(term)),
            Cell::Malformed(code) => Err(ExpressionError::InvalidEntry { code: code.clone() }),
        }
    }
}

/// Rectangular, row-major grid of cells
///
/// Codes are parsed once at construction. A malformed code does not make
/// construction fail: it is reported the first time the cell is evaluated,
/// or up front through [`ExpressionGrid::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl ExpressionGrid {
    /// Build a grid from rows of codes
    ///
    /// # Errors
    ///
    /// [`ExpressionError::InvalidArgument`] when rows have different lengths.
    pub fn new<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, ExpressionError> {
        let cols = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ExpressionError::InvalidArgument(format!(
                    "ragged grid: row {i} has {} entries, expected {cols}",
                    row.len()
                )));
            }
            cells.extend(row.iter().map(|code| Cell::parse(code.as_ref())));
        }

        Ok(Self { rows: rows.len(), cols, cells })
    }

    /// Build a grid from borrowed string slices
    pub fn from_strs(rows: &[&[&str]]) -> Result<Self, ExpressionError> {
        let owned: Vec<Vec<&str>> = rows.iter().map(|row| row.to_vec()).collect();
        Self::new(&owned)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Non-empty with as many rows as columns
    pub fn is_square(&self) -> bool {
        !self.is_empty() && self.rows == self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = (row * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Report the first malformed cell, scanning row by row
    pub fn validate(&self) -> Result<(), ExpressionError> {
        self.cells.iter().try_for_each(|cell| cell.term().map(|_| ()))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
