//! Deferred-division arithmetic for exact elimination.
//!
//! Gaussian elimination wants to divide at every pivot, which is lossy for
//! integers and unavailable for plain rings. A [`Frac`] carries a
//! numerator/denominator pair instead, so elimination proceeds with ring
//! operations only and the single final division happens in [`Frac::resolve`]
//! — exact whenever the true result lives in the element type, as a
//! determinant of an integer matrix does.

use tensa_core::{Element, Result, TensaError};

/// A numerator/denominator pair over one element type.
///
/// Invariant: the denominator is never the element's zero. All constructors
/// and arithmetic preserve this.
#[derive(Debug, Clone, PartialEq)]
pub struct Frac<T: Element> {
    pub(crate) num: T,
    pub(crate) den: T,
}

impl<T: Element> Frac<T> {
    /// `num / den`. Fails with [`TensaError::ArgumentInvalid`] on a zero
    /// denominator.
    pub fn new(num: T, den: T) -> Result<Self> {
        if den.is_zero() {
            return Err(TensaError::ArgumentInvalid(
                "fraction with zero denominator".into(),
            ));
        }
        Ok(Self { num, den })
    }

    /// Lift a plain value: `v / 1`.
    pub fn from_value(num: T) -> Self {
        Self { num, den: T::one() }
    }

    pub fn zero() -> Self {
        Self::from_value(T::zero())
    }

    pub fn one() -> Self {
        Self::from_value(T::one())
    }

    /// `a/b + c/d = (ad + cb) / bd`.
    pub fn add(&self, rhs: &Self) -> Self {
        Self {
            num: self.num.mul(&rhs.den).add(&rhs.num.mul(&self.den)),
            den: self.den.mul(&rhs.den),
        }
    }

    /// `a/b - c/d = (ad - cb) / bd`.
    pub fn sub(&self, rhs: &Self) -> Self {
        Self {
            num: self.num.mul(&rhs.den).sub(&rhs.num.mul(&self.den)),
            den: self.den.mul(&rhs.den),
        }
    }

    /// `(a/b)(c/d) = ac / bd`.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self {
            num: self.num.mul(&rhs.num),
            den: self.den.mul(&rhs.den),
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    /// `(a/b) / (c/d) = ad / bc`. Fails when `rhs` is zero.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        if rhs.num.is_zero() {
            return Err(TensaError::ArgumentInvalid(
                "fraction division by zero".into(),
            ));
        }
        Ok(Self {
            num: self.num.mul(&rhs.den),
            den: self.den.mul(&rhs.num),
        })
    }

    /// Reciprocal. Fails when this fraction is zero.
    pub fn invert(&self) -> Result<Self> {
        Self::one().div(self)
    }

    /// A fraction is zero exactly when its numerator is (denominators are
    /// nonzero by invariant).
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Perform the deferred division through the element's `div` capability.
    pub fn resolve(&self) -> Result<T> {
        self.num.div(&self.den)
    }
}

/// Forward elimination over a row-major fraction buffer.
///
/// Transforms `cells` in place into row echelon form using row swaps and
/// subtraction of scaled pivot rows only; the per-row factor is a fraction
/// quotient, so no element division happens. Returns the pivot positions in
/// row order and whether an odd number of row swaps occurred (the
/// determinant sign).
pub(crate) fn forward_eliminate<T: Element>(
    cells: &mut [Frac<T>],
    rows: usize,
    cols: usize,
) -> (Vec<(usize, usize)>, bool) {
    let mut pivots = Vec::new();
    let mut odd_swaps = false;
    let mut pivot_row = 0;
    for col in 0..cols {
        if pivot_row == rows {
            break;
        }
        let Some(found) =
            (pivot_row..rows).find(|&r| !cells[r * cols + col].is_zero())
        else {
            continue; // column has no pivot below; move right
        };
        if found != pivot_row {
            for j in 0..cols {
                cells.swap(found * cols + j, pivot_row * cols + j);
            }
            odd_swaps = !odd_swaps;
        }
        for i in pivot_row + 1..rows {
            if cells[i * cols + col].is_zero() {
                continue;
            }
            // Pivot numerator is nonzero, so this quotient's denominator is
            // nonzero and the invariant holds without a checked division.
            let pivot = &cells[pivot_row * cols + col];
            let factor = Frac {
                num: cells[i * cols + col].num.mul(&pivot.den),
                den: cells[i * cols + col].den.mul(&pivot.num),
            };
            for j in col..cols {
                let scaled = factor.mul(&cells[pivot_row * cols + j]);
                cells[i * cols + j] = cells[i * cols + j].sub(&scaled);
            }
        }
        pivots.push((pivot_row, col));
        pivot_row += 1;
    }
    (pivots, odd_swaps)
}
