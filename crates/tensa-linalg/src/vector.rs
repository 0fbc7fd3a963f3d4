//! Vector products.

use tensa_core::{Element, Result, TensaError, Tensor};

/// Dot product of two equal-length rank-1 tensors.
///
/// The empty dot product is the element's zero.
pub fn dot<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<T> {
    match (a.shape().dims(), b.shape().dims()) {
        (&[n], &[m]) if n == m => {
            let mut acc = T::zero();
            for (x, y) in a.iter().zip(b.iter()) {
                acc = acc.add(&x.mul(y));
            }
            Ok(acc)
        }
        (&[n], dims) => Err(TensaError::shape_mismatch(
            format!("a vector of length {n}"),
            dims,
        )),
        (dims, _) => Err(TensaError::shape_mismatch("a rank-1 vector", dims)),
    }
}

/// Cross product, defined for length-3 vectors only.
pub fn cross<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    let (x, y) = (a.shape().dims(), b.shape().dims());
    if x != [3] || y != [3] {
        return Err(TensaError::NotSupported(format!(
            "cross product requires two length-3 vectors, got {} and {}",
            a.shape(),
            b.shape()
        )));
    }
    let av = a.to_vec();
    let bv = b.to_vec();
    let out = vec![
        av[1].mul(&bv[2]).sub(&av[2].mul(&bv[1])),
        av[2].mul(&bv[0]).sub(&av[0].mul(&bv[2])),
        av[0].mul(&bv[1]).sub(&av[1].mul(&bv[0])),
    ];
    Tensor::from_vec(out, &[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot() {
        let a = Tensor::from_vec(vec![1i64, 2, 3], &[3]).unwrap();
        let b = Tensor::from_vec(vec![-3i64, 5, 3], &[3]).unwrap();
        assert_eq!(dot(&a, &b).unwrap(), 16);
    }

    #[test]
    fn test_dot_empty_is_zero() {
        let a = Tensor::<i64>::from_shape(&[0]);
        assert_eq!(dot(&a, &a).unwrap(), 0);
    }

    #[test]
    fn test_dot_shape_errors() {
        let a = Tensor::from_vec(vec![1i64, 2, 3], &[3]).unwrap();
        let b = Tensor::from_vec(vec![1i64, 2], &[2]).unwrap();
        assert!(matches!(
            dot(&a, &b).unwrap_err(),
            TensaError::ShapeMismatch { .. }
        ));
        let m = Tensor::from_vec(vec![1i64, 2, 3, 4], &[2, 2]).unwrap();
        assert!(dot(&m, &a).is_err());
    }

    #[test]
    fn test_cross_basis() {
        let x = Tensor::from_vec(vec![1i64, 0, 0], &[3]).unwrap();
        let y = Tensor::from_vec(vec![0i64, 1, 0], &[3]).unwrap();
        let z = cross(&x, &y).unwrap();
        assert_eq!(z.to_vec(), vec![0, 0, 1]);
        // Anticommutative.
        assert_eq!(cross(&y, &x).unwrap().to_vec(), vec![0, 0, -1]);
    }

    #[test]
    fn test_cross_is_orthogonal() {
        let a = Tensor::from_vec(vec![2i64, -1, 4], &[3]).unwrap();
        let b = Tensor::from_vec(vec![3i64, 5, -2], &[3]).unwrap();
        let c = cross(&a, &b).unwrap();
        assert_eq!(dot(&a, &c).unwrap(), 0);
        assert_eq!(dot(&b, &c).unwrap(), 0);
    }

    #[test]
    fn test_cross_wrong_length() {
        let a = Tensor::from_vec(vec![1i64, 2], &[2]).unwrap();
        let b = Tensor::from_vec(vec![1i64, 2, 3], &[3]).unwrap();
        assert!(matches!(
            cross(&a, &b).unwrap_err(),
            TensaError::NotSupported(_)
        ));
    }
}
