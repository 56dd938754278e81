//! Scalar codec.
//!
//! Conversion between fixed width rust values and their postgres binary
//! representation.
//!
//! <https://www.postgresql.org/docs/current/protocol-overview.html#PROTOCOL-FORMAT-CODES>
//!
//! - single byte types are passed through unchanged
//! - integers are written in network byte order using the [`swap`][crate::swap] engine
//! - floats are transferred bit for bit through the unsigned integer of the same width,
//!   the value itself is never touched
use crate::{
    row::DecodeError,
    swap::{to_network16, to_network32, to_network64},
};

/// A fixed width type with a postgres binary representation.
///
/// This trait is sealed, the set of supported types is closed.
pub trait Network: Copy + sealed::Sealed {
    /// Size of the encoded value in bytes.
    const SIZE: usize;

    /// Encoded bytes, always `[u8; SIZE]`.
    type Repr: AsRef<[u8]> + Copy + for<'a> TryFrom<&'a [u8]>;

    /// Encode value into network order bytes.
    fn to_network(self) -> Self::Repr;

    /// Decode value from network order bytes.
    fn from_network(repr: Self::Repr) -> Self;

    /// Decode value from a slice which must contains exactly [`SIZE`][Network::SIZE] bytes.
    fn read_network(raw: &[u8]) -> Result<Self, DecodeError> {
        match <Self::Repr>::try_from(raw) {
            Ok(repr) => Ok(Self::from_network(repr)),
            Err(_) => Err(DecodeError::Length { expected: Self::SIZE, actual: raw.len() }),
        }
    }

    /// Decode value by reading [`SIZE`][Network::SIZE] bytes starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of [`SIZE`][Network::SIZE] bytes. No alignment is required.
    unsafe fn read_network_unchecked(ptr: *const u8) -> Self {
        // SAFETY: caller guarantees `SIZE` readable bytes, `Repr` is a byte array
        let repr = unsafe { ptr.cast::<Self::Repr>().read_unaligned() };
        Self::from_network(repr)
    }
}

const fn pass(value: u8) -> u8 {
    value
}

macro_rules! network {
    ($ty:ty as $uint:ty, $swap:ident, |$v:ident| $bits:expr, |$u:ident| $from:expr) => {
        impl sealed::Sealed for $ty { }

        impl Network for $ty {
            const SIZE: usize = size_of::<$ty>();

            type Repr = [u8; size_of::<$ty>()];

            fn to_network(self) -> Self::Repr {
                let $v = self;
                $swap($bits).to_ne_bytes()
            }

            fn from_network(repr: Self::Repr) -> Self {
                let $u = $swap(<$uint>::from_ne_bytes(repr));
                $from
            }
        }
    };
}

network!(u8 as u8, pass, |v| v, |u| u);
network!(i8 as u8, pass, |v| v as u8, |u| u as i8);
network!(u16 as u16, to_network16, |v| v, |u| u);
network!(i16 as u16, to_network16, |v| v as u16, |u| u as i16);
network!(u32 as u32, to_network32, |v| v, |u| u);
network!(i32 as u32, to_network32, |v| v as u32, |u| u as i32);
network!(u64 as u64, to_network64, |v| v, |u| u);
network!(i64 as u64, to_network64, |v| v as u64, |u| u as i64);
network!(f32 as u32, to_network32, |v| v.to_bits(), |u| f32::from_bits(u));
network!(f64 as u64, to_network64, |v| v.to_bits(), |u| f64::from_bits(u));

mod sealed {
    pub trait Sealed { }
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip<T: Network + PartialEq + std::fmt::Debug>(value: T) {
        let repr = value.to_network();
        assert_eq!(repr.as_ref().len(), T::SIZE);
        assert_eq!(T::from_network(repr), value);
        assert_eq!(T::read_network(repr.as_ref()).unwrap(), value);
        assert_eq!(unsafe { T::read_network_unchecked(repr.as_ref().as_ptr()) }, value);
    }

    #[test]
    fn known_encoding() {
        assert_eq!(0x1234u16.to_network(), [0x12, 0x34]);
        assert_eq!(1i32.to_network(), [0, 0, 0, 1]);
        assert_eq!((-1i16).to_network(), [0xFF, 0xFF]);
        assert_eq!(0xABu8.to_network(), [0xAB]);
        assert_eq!((-2i8).to_network(), [0xFE]);
        assert_eq!(20i64.to_network(), [0, 0, 0, 0, 0, 0, 0, 20]);
        assert_eq!(1.0f32.to_network(), [0x3F, 0x80, 0, 0]);
        assert_eq!(1.0f64.to_network(), [0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn integer_roundtrip() {
        for v in 0..=u8::MAX {
            roundtrip(v);
            roundtrip(v as i8);
        }
        for v in 0..=u16::MAX {
            roundtrip(v);
            roundtrip(v as i16);
        }
        for v in [0u32, 1, 0x8000_0000, 0xDEAD_BEEF, u32::MAX] {
            roundtrip(v);
            roundtrip(v as i32);
        }
        for v in [0u64, 1, 1 << 63, 0xDEAD_BEEF_CAFE_BABE, u64::MAX] {
            roundtrip(v);
            roundtrip(v as i64);
        }
        roundtrip(i64::MIN);
        roundtrip(i32::MIN);
    }

    #[test]
    fn float_bit_exact() {
        let f32s = [
            0.0f32, -0.0, 1.5, f32::MIN_POSITIVE, f32::INFINITY, f32::NEG_INFINITY,
            f32::from_bits(0x7FC0_0001), f32::from_bits(0xFF80_0001),
        ];
        for v in f32s {
            let back = f32::from_network(v.to_network());
            assert_eq!(back.to_bits(), v.to_bits());
        }

        let f64s = [
            0.0f64, -0.0, std::f64::consts::PI, f64::MAX, f64::INFINITY, f64::NEG_INFINITY,
            f64::from_bits(0x7FF8_0000_0000_0001), f64::from_bits(0xFFF0_0000_0000_0002),
        ];
        for v in f64s {
            let back = f64::from_network(v.to_network());
            assert_eq!(back.to_bits(), v.to_bits());
        }
        assert_eq!((-0.0f64).to_network()[0], 0x80);
    }

    #[test]
    fn unaligned_unchecked_read() {
        let raw = [0xAA, 0, 0, 0, 0, 0, 0, 0, 42];
        let value = unsafe { i64::read_network_unchecked(raw[1..].as_ptr()) };
        assert_eq!(value, 42);
    }

    #[test]
    fn checked_read_length() {
        match i32::read_network(&[0, 0, 1]) {
            Err(DecodeError::Length { expected: 4, actual: 3 }) => {},
            other => panic!("unexpected {other:?}"),
        }
        assert!(u16::read_network(&[0, 0, 1]).is_err());
        assert_eq!(u8::read_network(&[7]).unwrap(), 7);
    }
}
