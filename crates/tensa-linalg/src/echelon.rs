//! Row echelon forms and elementary row operations.
//!
//! Both echelon forms run the shared fraction-based elimination and resolve
//! every cell through the element's `div` capability at the very end, so all
//! intermediate arithmetic is exact. The resolved cells inherit the element
//! type's division semantics (truncating for integers, IEEE for floats).

use tensa_core::{Element, Result, TensaError, Tensor};

use crate::fraction::{forward_eliminate, Frac};
use crate::require_matrix;

fn lift<T: Element>(m: &Tensor<T>) -> Vec<Frac<T>> {
    m.iter().map(|v| Frac::from_value(v.clone())).collect()
}

fn resolve<T: Element>(cells: &[Frac<T>], rows: usize, cols: usize) -> Result<Tensor<T>> {
    let mut data = Vec::with_capacity(cells.len());
    for c in cells {
        data.push(c.resolve()?);
    }
    Tensor::from_vec(data, &[rows, cols])
}

/// Row echelon form: zeros below every pivot, pivot columns strictly
/// advancing, rows without a pivot pushed to the bottom.
pub fn row_echelon<T: Element>(m: &Tensor<T>) -> Result<Tensor<T>> {
    let (rows, cols) = require_matrix(m)?;
    let mut cells = lift(m);
    forward_eliminate(&mut cells, rows, cols);
    resolve(&cells, rows, cols)
}

/// Reduced row echelon form: every pivot is one with zeros above and below.
pub fn reduced_row_echelon<T: Element>(m: &Tensor<T>) -> Result<Tensor<T>> {
    let (rows, cols) = require_matrix(m)?;
    let mut cells = lift(m);
    let (pivots, _) = forward_eliminate(&mut cells, rows, cols);
    // Back-substitute above each pivot, last pivot first.
    for &(r, c) in pivots.iter().rev() {
        let inv = cells[r * cols + c].invert()?;
        for j in c..cols {
            cells[r * cols + j] = cells[r * cols + j].mul(&inv);
        }
        for i in 0..r {
            let factor = cells[i * cols + c].clone();
            if factor.is_zero() {
                continue;
            }
            for j in c..cols {
                let scaled = factor.mul(&cells[r * cols + j]);
                cells[i * cols + j] = cells[i * cols + j].sub(&scaled);
            }
        }
    }
    resolve(&cells, rows, cols)
}

fn check_row(rows: usize, row: usize) -> Result<()> {
    if row >= rows {
        return Err(TensaError::IndexOutOfBounds {
            axis: 0,
            index: row,
            extent: rows,
        });
    }
    Ok(())
}

/// Exchange two rows in place.
pub fn swap_rows<T: Element>(m: &mut Tensor<T>, row1: usize, row2: usize) -> Result<()> {
    let (rows, cols) = require_matrix(m)?;
    check_row(rows, row1)?;
    check_row(rows, row2)?;
    if row1 == row2 {
        return Ok(());
    }
    for j in 0..cols {
        let a = m.get(&[row1, j])?.clone();
        let b = m.get(&[row2, j])?.clone();
        m.set(&[row1, j], b)?;
        m.set(&[row2, j], a)?;
    }
    Ok(())
}

/// Scale one row by a factor in place. Zero and negative factors are valid.
pub fn multiply_row<T: Element>(m: &mut Tensor<T>, row: usize, factor: &T) -> Result<()> {
    let (rows, cols) = require_matrix(m)?;
    check_row(rows, row)?;
    for j in 0..cols {
        let v = m.get(&[row, j])?.mul(factor);
        m.set(&[row, j], v)?;
    }
    Ok(())
}

/// Add `factor` times row `src` into row `dst` in place. `src == dst` is
/// permitted and scales the row by `1 + factor`.
pub fn add_scaled_row<T: Element>(
    m: &mut Tensor<T>,
    dst: usize,
    src: usize,
    factor: &T,
) -> Result<()> {
    let (rows, cols) = require_matrix(m)?;
    check_row(rows, dst)?;
    check_row(rows, src)?;
    for j in 0..cols {
        let contribution = m.get(&[src, j])?.mul(factor);
        let v = m.get(&[dst, j])?.add(&contribution);
        m.set(&[dst, j], v)?;
    }
    Ok(())
}
