//! Fixed-size two-dimensional array of rows.
//!
//! This module provides [`RectangularGrid`], a `height × width` grid stored as one
//! contiguous row-major buffer. Every constructor checks that the input is rectangular,
//! and once built the grid's dimensions never change; only element values can be
//! mutated.

use std::fmt;
use std::ops::{Index, IndexMut};

use thiserror::Error;

/// Why a grid could not be built from the given input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// A row's length differs from the first row's.
    #[error("width of all rows must be equal (row {row} has width {found}, expected {expected})")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A flat buffer's length is not a whole number of rows.
    #[error("element count {len} is not a multiple of width {width}")]
    IndivisibleLength { len: usize, width: usize },
    /// `width * height` does not fit in `usize`.
    #[error("{width}x{height} elements do not fit in memory")]
    TooLarge { width: usize, height: usize },
}

/// Error type for [`RectangularGrid`] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Construction failed; no grid was produced.
    #[error("invalid grid shape: {0}")]
    InvalidShape(#[from] ShapeError),
    /// The coordinates fall outside the grid.
    #[error("({x}, {y}) is out of range for a {width}x{height} grid")]
    IndexOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A rectangular grid of `T`, addressed as `(x, y)` with `x` the column and `y` the row.
///
/// Iteration is row-major: every `x` of row `0`, then every `x` of row `1`, and so on.
///
/// # Examples
///
/// ```rust
/// use validated_collections::generic::rectangular_grid::RectangularGrid;
///
/// let mut grid = RectangularGrid::from_fn(3, 2, |x, y| x + 10 * y).unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.get(2, 1), Ok(&12));
///
/// grid.set(0, 0, 99).unwrap();
/// let values: Vec<_> = grid.iter().copied().collect();
/// assert_eq!(values, vec![99, 1, 2, 10, 11, 12]);
///
/// assert!(grid.get(3, 0).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RectangularGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> RectangularGrid<T> {
    /// Creates a grid with a width and height of `0`.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    /// Creates a `width × height` grid whose elements are produced by `init(x, y)`,
    /// called in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TooLarge`] if `width * height` overflows.
    pub fn from_fn<F>(width: usize, height: usize, mut init: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, usize) -> T,
    {
        let len = area(width, height)?;
        let mut cells = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                cells.push(init(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from a list of rows.
    ///
    /// The width is the first row's length, or `0` if there are no rows.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::RaggedRows`] if any row's length differs from the first row's.
    ///
    /// ```rust
    /// use validated_collections::generic::rectangular_grid::{GridError, RectangularGrid, ShapeError};
    ///
    /// let grid = RectangularGrid::from_rows(vec![vec!['a', 'b'], vec!['c', 'd']]).unwrap();
    /// assert_eq!(grid.row(1), Some(&['c', 'd'][..]));
    ///
    /// let ragged = RectangularGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5]]);
    /// assert_eq!(
    ///     ragged,
    ///     Err(GridError::InvalidShape(ShapeError::RaggedRows { row: 1, expected: 3, found: 2 }))
    /// );
    /// ```
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(ShapeError::RaggedRows {
                row,
                expected: width,
                found,
            }
            .into());
        }

        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Creates a grid of the given `width` from a flat row-major buffer.
    ///
    /// An empty buffer is accepted for any width and yields a grid of height `0`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::IndivisibleLength`] if `elements` is non-empty and its length is
    /// not a multiple of `width` (including `width == 0`).
    pub fn from_flat(width: usize, elements: Vec<T>) -> Result<Self, GridError> {
        if elements.is_empty() {
            return Ok(Self {
                width,
                height: 0,
                cells: elements,
            });
        }
        if width == 0 || elements.len() % width != 0 {
            return Err(ShapeError::IndivisibleLength {
                len: elements.len(),
                width,
            }
            .into());
        }
        Ok(Self {
            width,
            height: elements.len() / width,
            cells: elements,
        })
    }

    /// Creates a `width × height` grid with every element set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::TooLarge`] if `width * height` overflows.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        let len = area(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![value; len],
        })
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no elements, i.e. its width or height is `0`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the element at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfRange`] if `x >= width` or `y >= height`.
    pub fn get(&self, x: usize, y: usize) -> Result<&T, GridError> {
        let offset = self.offset(x, y)?;
        Ok(&self.cells[offset])
    }

    /// Returns a mutable reference to the element at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfRange`] if `x >= width` or `y >= height`.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut T, GridError> {
        let offset = self.offset(x, y)?;
        Ok(&mut self.cells[offset])
    }

    /// Stores `value` at `(x, y)`, returning the previous element.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfRange`] if `x >= width` or `y >= height`; the grid is
    /// left unchanged.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<T, GridError> {
        let offset = self.offset(x, y)?;
        Ok(std::mem::replace(&mut self.cells[offset], value))
    }

    /// Returns row `y`, or `None` if `y >= height`.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        (y < self.height).then(|| &self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.height).map(move |y| &self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Iterates over every element in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Iterates over every element in row-major order together with its `(x, y)`.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(offset, value)| (offset % width, offset / width, value))
    }

    /// Builds a grid of the same shape by applying `f` to every element.
    pub fn map<U, F>(&self, f: F) -> RectangularGrid<U>
    where
        F: FnMut(&T) -> U,
    {
        RectangularGrid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Consumes the grid, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<T>> {
        let mut cells = self.cells.into_iter();
        (0..self.height)
            .map(|_| cells.by_ref().take(self.width).collect())
            .collect()
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::IndexOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}

fn area(width: usize, height: usize) -> Result<usize, GridError> {
    width
        .checked_mul(height)
        .ok_or(GridError::InvalidShape(ShapeError::TooLarge { width, height }))
}

impl<T> Default for RectangularGrid<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Index<(usize, usize)> for RectangularGrid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `(x, y)` is out of range.
    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is out of range for a {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for RectangularGrid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is out of range for a {}x{} grid",
            self.width,
            self.height
        );
        &mut self.cells[y * self.width + x]
    }
}

impl<'a, T> IntoIterator for &'a RectangularGrid<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl<T> TryFrom<Vec<Vec<T>>> for RectangularGrid<T> {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl<T: fmt::Debug> fmt::Debug for RectangularGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

/// Renders the grid like a nested array, e.g. `[[1, 2], [3, 4]]`.
impl<T: fmt::Display> fmt::Display for RectangularGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (x, value) in row.iter().enumerate() {
                if x > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for RectangularGrid<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for RectangularGrid<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Self::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
