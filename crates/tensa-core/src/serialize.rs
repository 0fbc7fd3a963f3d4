//! Byte-exact tensor serialization.
//!
//! Layout of the stream (every integer is a little-endian `i32`):
//!
//! ```text
//! +--------+--------------------+--------------------------------------+
//! | rank   | extent x rank      | (len, payload) x volume              |
//! | i32    | i32 each           | i32 + len bytes each                 |
//! +--------+--------------------+--------------------------------------+
//! ```
//!
//! Cells are emitted in logical row-major order and each payload comes from
//! the element type's `encode` capability, so a permuted-stride tensor
//! round-trips by value into a contiguous one. Decoding consumes exactly the
//! stream; truncation or trailing garbage is a [`TensaError::DecodeError`].

use crate::element::Element;
use crate::error::TensaError;
use crate::tensor::Tensor;
use crate::Result;

/// Cursor over a decode stream with truncation-checked reads.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.bytes.len() {
            return Err(TensaError::DecodeError(format!(
                "end of data: needed {} bytes at position {}, stream has {}",
                n,
                self.pos,
                self.bytes.len()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        let arr: [u8; 4] = bytes
            .try_into()
            .map_err(|_| TensaError::DecodeError("short integer field".into()))?;
        Ok(i32::from_le_bytes(arr))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

fn write_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

impl<T: Element> Tensor<T> {
    /// Serialize shape and cells into a self-describing byte stream.
    ///
    /// Requires the element type's `encode` capability.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(4 + 4 * self.rank() + 8 * self.volume());
        write_i32(&mut out, self.rank() as i32);
        for &extent in self.shape().dims() {
            write_i32(&mut out, extent as i32);
        }
        let mut payload = Vec::new();
        for cell in self.iter() {
            payload.clear();
            cell.encode(&mut payload)?;
            write_i32(&mut out, payload.len() as i32);
            out.extend_from_slice(&payload);
        }
        Ok(out)
    }

    /// Reconstruct a tensor from a stream [`Tensor::to_bytes`] produced.
    pub fn from_bytes(bytes: &[u8]) -> Result<Tensor<T>> {
        let mut reader = ByteReader::new(bytes);
        let rank = reader.read_i32()?;
        if rank < 0 {
            return Err(TensaError::DecodeError(format!("negative rank {rank}")));
        }
        let mut dims = Vec::with_capacity(rank as usize);
        for _ in 0..rank {
            let extent = reader.read_i32()?;
            if extent < 0 {
                return Err(TensaError::DecodeError(format!(
                    "negative extent {extent}"
                )));
            }
            dims.push(extent as usize);
        }
        let volume = if dims.is_empty() {
            1
        } else {
            dims.iter().product()
        };
        let mut data = Vec::with_capacity(volume);
        for _ in 0..volume {
            let len = reader.read_i32()?;
            if len < 0 {
                return Err(TensaError::DecodeError(format!(
                    "negative cell length {len}"
                )));
            }
            data.push(T::decode(reader.take(len as usize)?)?);
        }
        if reader.remaining() > 0 {
            return Err(TensaError::DecodeError(format!(
                "{} trailing bytes after the last cell",
                reader.remaining()
            )));
        }
        Tensor::from_vec(data, &dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_int() {
        let t = Tensor::from_vec(vec![1i32, -2, 3, -4, 5, -6], &[2, 3]).unwrap();
        let restored = Tensor::<i32>::from_bytes(&t.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, t);
    }

    #[test]
    fn test_roundtrip_float_and_complex() {
        use crate::element::Complex;

        let t = Tensor::from_vec(vec![0.5f64, -1.25, f64::MAX], &[3]).unwrap();
        assert_eq!(Tensor::<f64>::from_bytes(&t.to_bytes().unwrap()).unwrap(), t);

        let c = Tensor::from_vec(
            vec![Complex::new(1.0, -2.0), Complex::new(0.0, 0.5)],
            &[2],
        )
        .unwrap();
        assert_eq!(
            Tensor::<Complex>::from_bytes(&c.to_bytes().unwrap()).unwrap(),
            c
        );
    }

    #[test]
    fn test_roundtrip_scalar_and_empty() {
        let s = Tensor::scalar(9i64);
        assert_eq!(Tensor::<i64>::from_bytes(&s.to_bytes().unwrap()).unwrap(), s);

        let e = Tensor::<i32>::from_shape(&[2, 0]);
        let restored = Tensor::<i32>::from_bytes(&e.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.shape().dims(), &[2, 0]);
    }

    #[test]
    fn test_permuted_tensor_roundtrips_by_value() {
        let mut t = Tensor::from_vec(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        t.transpose(0, 1).unwrap();
        let restored = Tensor::<i32>::from_bytes(&t.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, t);
        assert!(restored.is_contiguous());
    }

    #[test]
    fn test_truncated_stream() {
        let t = Tensor::from_vec(vec![1i32, 2], &[2]).unwrap();
        let bytes = t.to_bytes().unwrap();
        for cut in [0, 3, bytes.len() - 1] {
            let err = Tensor::<i32>::from_bytes(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, TensaError::DecodeError(_)), "cut at {cut}");
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let t = Tensor::from_vec(vec![1i32, 2], &[2]).unwrap();
        let mut bytes = t.to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(
            Tensor::<i32>::from_bytes(&bytes).unwrap_err(),
            TensaError::DecodeError(_)
        ));
    }

    #[test]
    fn test_negative_header_fields_rejected() {
        let mut bytes = Vec::new();
        write_i32(&mut bytes, -1);
        assert!(Tensor::<i32>::from_bytes(&bytes).is_err());

        let mut bytes = Vec::new();
        write_i32(&mut bytes, 1);
        write_i32(&mut bytes, -3);
        assert!(Tensor::<i32>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_corrupt_cell_length_rejected() {
        let t = Tensor::from_vec(vec![7i32], &[1]).unwrap();
        let mut bytes = t.to_bytes().unwrap();
        // Corrupt the cell length to a negative value.
        let cell_len_at = 4 + 4;
        bytes[cell_len_at..cell_len_at + 4].copy_from_slice(&(-2i32).to_le_bytes());
        assert!(matches!(
            Tensor::<i32>::from_bytes(&bytes).unwrap_err(),
            TensaError::DecodeError(_)
        ));
    }
}
