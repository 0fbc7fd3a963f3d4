//! The numeric capability contract supplied once per element type.
//!
//! Every generic algorithm in the engine routes its cell arithmetic through
//! [`Element`] instead of branching on a concrete type. The trait is
//! monomorphized into each algorithm, so dispatch is resolved at compile time
//! and hot loops pay no per-call cost.
//!
//! Operations a type does not supply (`div`, `encode`, `decode`) keep their
//! default bodies and fail with [`TensaError::NotImplemented`] at call time —
//! there is no static completeness check, matching the contract that an
//! element type is usable for exactly the algorithms whose capabilities it
//! provides.

use std::fmt;

use crate::error::TensaError;
use crate::Result;

/// Arithmetic and serialization capabilities for one element type.
///
/// `Clone` covers the copy/forward capability, `PartialEq` equality, and
/// `Display` the textual rendering; `Send + Sync` let tensors of the type
/// cross rayon worker boundaries.
pub trait Element:
    Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Additive identity, also the default cell value of fresh tensors.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    fn neg(&self) -> Self;

    /// Division. Fallible: exact types fail on a zero divisor, and types that
    /// never supply division fail with `NotImplemented` when an algorithm
    /// actually invokes it.
    fn div(&self, rhs: &Self) -> Result<Self> {
        let _ = rhs;
        Err(TensaError::NotImplemented("div"))
    }

    /// Whether this value is the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Append this value's serialized bytes to `out`.
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        let _ = out;
        Err(TensaError::NotImplemented("encode"))
    }

    /// Reconstruct a value from exactly the bytes `encode` produced.
    fn decode(bytes: &[u8]) -> Result<Self> {
        let _ = bytes;
        Err(TensaError::NotImplemented("decode"))
    }
}

macro_rules! impl_element_int {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn zero() -> Self {
                    0
                }

                fn one() -> Self {
                    1
                }

                fn add(&self, rhs: &Self) -> Self {
                    self + rhs
                }

                fn sub(&self, rhs: &Self) -> Self {
                    self - rhs
                }

                fn mul(&self, rhs: &Self) -> Self {
                    self * rhs
                }

                fn neg(&self) -> Self {
                    -self
                }

                // Truncating division, per Rust `/` semantics.
                fn div(&self, rhs: &Self) -> Result<Self> {
                    if *rhs == 0 {
                        return Err(TensaError::ArgumentInvalid(
                            "integer division by zero".into(),
                        ));
                    }
                    Ok(self / rhs)
                }

                fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
                    out.extend_from_slice(&self.to_le_bytes());
                    Ok(())
                }

                fn decode(bytes: &[u8]) -> Result<Self> {
                    let arr = bytes.try_into().map_err(|_| {
                        TensaError::DecodeError(format!(
                            "expected {} bytes for {}, got {}",
                            std::mem::size_of::<$t>(),
                            stringify!($t),
                            bytes.len()
                        ))
                    })?;
                    Ok(<$t>::from_le_bytes(arr))
                }
            }
        )*
    };
}

macro_rules! impl_element_float {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                fn zero() -> Self {
                    0.0
                }

                fn one() -> Self {
                    1.0
                }

                fn add(&self, rhs: &Self) -> Self {
                    self + rhs
                }

                fn sub(&self, rhs: &Self) -> Self {
                    self - rhs
                }

                fn mul(&self, rhs: &Self) -> Self {
                    self * rhs
                }

                fn neg(&self) -> Self {
                    -self
                }

                // IEEE division: never fails, zero divisors yield inf/NaN.
                fn div(&self, rhs: &Self) -> Result<Self> {
                    Ok(self / rhs)
                }

                fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
                    out.extend_from_slice(&self.to_le_bytes());
                    Ok(())
                }

                fn decode(bytes: &[u8]) -> Result<Self> {
                    let arr = bytes.try_into().map_err(|_| {
                        TensaError::DecodeError(format!(
                            "expected {} bytes for {}, got {}",
                            std::mem::size_of::<$t>(),
                            stringify!($t),
                            bytes.len()
                        ))
                    })?;
                    Ok(<$t>::from_le_bytes(arr))
                }
            }
        )*
    };
}

impl_element_int!(i32, i64);
impl_element_float!(f32, f64);

/// Complex number over f64 components.
///
/// Doubles as the reference for adapting a user-defined numeric type to the
/// [`Element`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}{}i", self.re, self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

impl Element for Complex {
    fn zero() -> Self {
        Complex::new(0.0, 0.0)
    }

    fn one() -> Self {
        Complex::new(1.0, 0.0)
    }

    fn add(&self, rhs: &Self) -> Self {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }

    fn sub(&self, rhs: &Self) -> Self {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }

    fn mul(&self, rhs: &Self) -> Self {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }

    fn neg(&self) -> Self {
        Complex::new(-self.re, -self.im)
    }

    fn div(&self, rhs: &Self) -> Result<Self> {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        if denom == 0.0 {
            return Err(TensaError::ArgumentInvalid(
                "complex division by zero".into(),
            ));
        }
        Ok(Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        ))
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.re.to_le_bytes());
        out.extend_from_slice(&self.im.to_le_bytes());
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 16 {
            return Err(TensaError::DecodeError(format!(
                "expected 16 bytes for Complex, got {}",
                bytes.len()
            )));
        }
        let re = f64::decode(&bytes[..8])?;
        let im = f64::decode(&bytes[8..])?;
        Ok(Complex::new(re, im))
    }
}
