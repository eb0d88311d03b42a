//! A fixed-size, row-packed bit grid using const generics.
//!
//! Each of the `N` rows is packed into one unsigned integer `T`, so the grid
//! holds boards up to `T::BITS` columns without heap allocation. Used by the
//! opponent engine for its blocked/sunk/visited masks.

use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

use crate::board::Coord;

/// Errors returned by bit grid operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitGridError {
    /// Row or column index is out of bounds [0..N).
    IndexOutOfBounds { x: usize, y: usize },
}

impl fmt::Display for BitGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitGridError::IndexOutOfBounds { x, y } => {
                write!(f, "IndexOutOfBounds: x={}, y={}", x, y)
            }
        }
    }
}

/// An N×N bit grid with one `T` per row.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitGrid<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    rows: [T; N],
}

impl<T, const N: usize> BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Evaluated per instantiation; a row type narrower than `N` fails to build.
    const FITS: () = assert!(N <= mem::size_of::<T>() * 8, "row type too narrow for board");

    /// Create an empty grid.
    #[inline]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        BitGrid {
            rows: [T::zero(); N],
        }
    }

    #[inline]
    fn check_bounds(x: usize, y: usize) -> Result<(), BitGridError> {
        if x >= N || y >= N {
            Err(BitGridError::IndexOutOfBounds { x, y })
        } else {
            Ok(())
        }
    }

    /// Gets the bit at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Result<bool, BitGridError> {
        Self::check_bounds(x, y)?;
        Ok(((self.rows[y] >> x) & T::one()) != T::zero())
    }

    /// Sets the bit at (x, y).
    pub fn set(&mut self, x: usize, y: usize) -> Result<(), BitGridError> {
        Self::check_bounds(x, y)?;
        self.rows[y] = self.rows[y] | (T::one() << x);
        Ok(())
    }

    /// `true` if `at` is on the grid and its bit is set.
    #[inline]
    pub fn contains(&self, at: Coord) -> bool {
        self.get(at.x, at.y).unwrap_or(false)
    }

    /// Set `at`, ignoring positions off the grid.
    #[inline]
    pub fn insert(&mut self, at: Coord) {
        let _ = self.set(at.x, at.y);
    }

    /// Iterator over set cells in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..N).flat_map(move |y| {
            (0..N)
                .filter(move |&x| ((self.rows[y] >> x) & T::one()) != T::zero())
                .map(move |x| Coord::new(x, y))
        })
    }
}

impl<T, const N: usize> Default for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid<{}, {}>:", core::any::type_name::<T>(), N)?;
        for y in 0..N {
            for x in 0..N {
                let bit = if ((self.rows[y] >> x) & T::one()) != T::zero() {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Mask type used for the standard board sizes (up to 32 columns).
pub type Mask<const N: usize> = BitGrid<u32, N>;
