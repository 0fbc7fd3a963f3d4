//! Integer powers of square matrices.

use tensa_core::{Element, Result, TensaError, Tensor};

use crate::inverse::invert;
use crate::matmul::matmul;
use crate::require_square;

/// `m` raised to an integer exponent by binary exponentiation.
///
/// Exponent 0 yields the identity for any square matrix, including singular
/// ones. Negative exponents invert first, so they require an invertible
/// matrix and the element's `div` capability.
pub fn power<T: Element>(m: &Tensor<T>, exponent: i64) -> Result<Tensor<T>> {
    let n = require_square(m)?;
    if exponent == 0 {
        return Ok(Tensor::identity(n));
    }
    if exponent < 0 {
        let positive = exponent.checked_neg().ok_or_else(|| {
            TensaError::ArgumentInvalid(format!("exponent {exponent} out of range"))
        })?;
        return power(&invert(m)?, positive);
    }
    let mut base = m.copy();
    let mut acc: Option<Tensor<T>> = None;
    let mut e = exponent as u64;
    while e > 0 {
        if e & 1 == 1 {
            acc = Some(match acc {
                Some(prev) => matmul(&prev, &base)?,
                None => base.clone(),
            });
        }
        e >>= 1;
        if e > 0 {
            base = matmul(&base, &base)?;
        }
    }
    match acc {
        Some(result) => Ok(result),
        None => Ok(Tensor::identity(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroth_power_is_identity() {
        let m = Tensor::from_vec(vec![1i64, 2, 2, 4], &[2, 2]).unwrap();
        // Even a singular matrix has the identity as its zeroth power.
        assert_eq!(power(&m, 0).unwrap(), Tensor::identity(2));
    }

    #[test]
    fn test_small_powers() {
        let m = Tensor::from_vec(vec![1i64, 1, 0, 1], &[2, 2]).unwrap();
        assert_eq!(power(&m, 1).unwrap(), m);
        // Shear matrices compose additively in the corner.
        assert_eq!(power(&m, 5).unwrap().to_vec(), vec![1, 5, 0, 1]);
        assert_eq!(power(&m, 12).unwrap().to_vec(), vec![1, 12, 0, 1]);
    }

    #[test]
    fn test_fibonacci_power() {
        let q = Tensor::from_vec(vec![1i64, 1, 1, 0], &[2, 2]).unwrap();
        let q10 = power(&q, 10).unwrap();
        assert_eq!(q10.get(&[0, 1]).unwrap(), &55);
        assert_eq!(q10.get(&[0, 0]).unwrap(), &89);
    }

    #[test]
    fn test_negative_power_inverts_first() {
        let m = Tensor::from_vec(vec![2i64, 1, 1, 1], &[2, 2]).unwrap();
        let inv = invert(&m).unwrap();
        assert_eq!(power(&m, -3).unwrap(), power(&inv, 3).unwrap());
        assert_eq!(
            matmul(&power(&m, 3).unwrap(), &power(&m, -3).unwrap()).unwrap(),
            Tensor::identity(2)
        );
    }

    #[test]
    fn test_negative_power_of_singular_fails() {
        let m = Tensor::from_vec(vec![1i64, 2, 2, 4], &[2, 2]).unwrap();
        assert_eq!(power(&m, -1).unwrap_err(), TensaError::InvalidDeterminant);
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Tensor::from_vec(vec![1i64, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        assert!(power(&m, 2).is_err());
    }
}
