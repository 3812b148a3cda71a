use bitvec::vec::BitVec;
use thiserror::Error;

/// Module (aka, a cell) of a QR symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    Light,
    Dark,
}

impl From<bool> for Module {
    fn from(value: bool) -> Self {
        match value {
            true => Module::Dark,
            false => Module::Light,
        }
    }
}

impl From<Module> for bool {
    fn from(value: Module) -> Self {
        match value {
            Module::Dark => true,
            Module::Light => false,
        }
    }
}

/// Reasons a grid of modules is not a valid [ModuleMatrix].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("module matrix is empty")]
    Empty,
    #[error("module matrix is not square: expected {expected} modules in column {column}, found {found}")]
    NotSquare {
        column: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected} modules for a {side}x{side} matrix, found {found}")]
    WrongLength {
        side: usize,
        expected: usize,
        found: usize,
    },
}

/// An immutable, non-empty, square matrix of modules.
///
/// Positions are addressed as `(x, y)`: `x` is the column (horizontal axis, growing to the right)
/// and `y` is the row (vertical axis, growing downwards). Storage is row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    data: BitVec,
    side: usize,
}

impl ModuleMatrix {
    /// Build a matrix of side `side` where the module at `(x, y)` is dark iff `f(x, y)`.
    /// # Example
    /// ```
    /// use qrpix_core::{Module, ModuleMatrix};
    /// let diagonal = ModuleMatrix::from_fn(3, |x, y| x == y).unwrap();
    /// assert_eq!(diagonal.get(1, 1), Some(Module::Dark));
    /// assert_eq!(diagonal.get(2, 0), Some(Module::Light));
    /// ```
    pub fn from_fn<F>(side: usize, mut f: F) -> Result<Self, MatrixError>
    where
        F: FnMut(usize, usize) -> bool,
    {
        if side == 0 {
            return Err(MatrixError::Empty);
        }
        let mut data = BitVec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                data.push(f(x, y));
            }
        }
        Ok(Self { data, side })
    }

    /// Build a matrix of side `side` from its modules listed row by row, top to bottom.
    pub fn from_modules<I>(side: usize, modules: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator,
        I::Item: Into<Module>,
    {
        if side == 0 {
            return Err(MatrixError::Empty);
        }
        let data: BitVec = modules
            .into_iter()
            .map(|module| {
                let module: Module = module.into();
                bool::from(module)
            })
            .collect();
        if data.len() != side * side {
            return Err(MatrixError::WrongLength {
                side,
                expected: side * side,
                found: data.len(),
            });
        }
        Ok(Self { data, side })
    }

    /// Get the side length of the matrix, in modules.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Get the 1D index of the data array corresponding to position `(x, y)`, checking for validity.
    #[inline]
    fn linearized_index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.side && y < self.side {
            Some(self.side * y + x)
        } else {
            None
        }
    }

    /// Get the module at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Module> {
        self.is_dark(x, y).map(Module::from)
    }

    /// Check whether the module at column `x`, row `y` is set.
    #[inline]
    pub fn is_dark(&self, x: usize, y: usize) -> Option<bool> {
        self.data.get(self.linearized_index(x, y)?).map(|bit| *bit)
    }

    /// Iterate over the modules of row `y`, left to right.
    pub fn row(&self, y: usize) -> Option<impl Iterator<Item = Module> + '_> {
        let start = self.linearized_index(0, y)?;
        Some(
            self.data[start..start + self.side]
                .iter()
                .map(|bit| Module::from(*bit)),
        )
    }
}

impl std::fmt::Debug for ModuleMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ModuleMatrix({0}x{0}) {{", self.side)?;
        for y in 0..self.side {
            write!(f, "    ")?;
            for x in 0..self.side {
                let c = if self.is_dark(x, y) == Some(true) { '#' } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

/// Build a matrix from `columns[x][y]`: the outer vector holds columns, the inner vectors the
/// modules of each column from top to bottom.
impl TryFrom<Vec<Vec<bool>>> for ModuleMatrix {
    type Error = MatrixError;

    fn try_from(columns: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        let side = columns.len();
        if side == 0 {
            return Err(MatrixError::Empty);
        }
        if let Some((column, found)) = columns
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != side)
        {
            return Err(MatrixError::NotSquare {
                column,
                expected: side,
                found,
            });
        }
        Self::from_fn(side, |x, y| columns[x][y])
    }
}
