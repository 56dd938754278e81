//! Parameter encoding.
use std::ffi::{CStr, CString, c_char, c_int};

use crate::{
    array::{ArrayElement, encode_array},
    ext::UsizeExt,
    network::Network,
    postgres::PgFormat,
    value::ValueRef,
};

/// Value that can be encoded to be bound to sql parameter.
///
/// Implemented for:
///
/// - `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`, sent as [`Binary`][b]
/// - [`&CStr`][CStr] and [`&CString`][CString], sent as [`Text`][t] without copy
/// - slices, arrays and [`Vec`] of an [`ArrayElement`], sent as one dimensional [`Binary`][b] array
///
/// [t]: PgFormat::Text
/// [b]: PgFormat::Binary
pub trait Encode<'q> {
    fn encode(self) -> Encoded<'q>;
}

/// Postgres encoded value.
#[derive(Debug)]
pub struct Encoded<'q> {
    value: ValueRef<'q>,
    format: PgFormat,
}

impl<'q> Encoded<'q> {
    pub(crate) fn new(value: ValueRef<'q>, format: PgFormat) -> Self {
        Self { value, format }
    }

    /// Encode a scalar as binary.
    pub fn scalar<T: Network>(value: T) -> Encoded<'static> {
        Encoded::new(ValueRef::inline(value.to_network().as_ref()), PgFormat::Binary)
    }

    /// Pass a nul terminated string as text.
    pub fn text(value: &'q CStr) -> Self {
        Self::new(ValueRef::CStr(value), PgFormat::Text)
    }

    /// Encode a one dimensional array as binary.
    pub fn array<T: ArrayElement>(values: &[T]) -> Encoded<'static> {
        Encoded::new(ValueRef::Bytes(encode_array(values)), PgFormat::Binary)
    }

    /// Returns the transmission format.
    pub fn format(&self) -> PgFormat {
        self.format
    }

    /// The length declared to the server.
    ///
    /// Zero for text, the server infer the length from the nul terminator.
    pub fn declared_len(&self) -> c_int {
        match self.format {
            PgFormat::Text => 0,
            PgFormat::Binary => self.value.len().to_i32(),
        }
    }

    /// The encoded bytes, strings exclude the nul terminator.
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    pub(crate) fn as_ptr(&self) -> *const c_char {
        self.value.as_ptr()
    }
}

impl<'q> Encode<'q> for Encoded<'q> {
    fn encode(self) -> Encoded<'q> {
        self
    }
}

macro_rules! encode {
    ($($ty:ty),*) => {
        $(
            impl<'q> Encode<'q> for $ty {
                fn encode(self) -> Encoded<'q> {
                    Encoded::scalar(self)
                }
            }
        )*
    };
}

encode!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<'q> Encode<'q> for &'q CStr {
    fn encode(self) -> Encoded<'q> {
        Encoded::text(self)
    }
}

impl<'q> Encode<'q> for &'q CString {
    fn encode(self) -> Encoded<'q> {
        Encoded::text(self.as_c_str())
    }
}

impl<'q, T: ArrayElement> Encode<'q> for &[T] {
    fn encode(self) -> Encoded<'q> {
        Encoded::array(self)
    }
}

impl<'q, T: ArrayElement> Encode<'q> for &Vec<T> {
    fn encode(self) -> Encoded<'q> {
        Encoded::array(self)
    }
}

impl<'q, T: ArrayElement> Encode<'q> for Vec<T> {
    fn encode(self) -> Encoded<'q> {
        Encoded::array(&self)
    }
}

impl<'q, T: ArrayElement, const N: usize> Encode<'q> for [T; N] {
    fn encode(self) -> Encoded<'q> {
        Encoded::array(&self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::array::HEADER_SIZE;

    #[test]
    fn scalar_is_binary() {
        let e = 0x1234u16.encode();
        assert_eq!(e.format(), PgFormat::Binary);
        assert_eq!(e.declared_len(), 2);
        assert_eq!(e.as_bytes(), &[0x12, 0x34]);

        let e = 1i32.encode();
        assert_eq!(e.as_bytes(), &[0, 0, 0, 1]);
        assert_eq!(e.declared_len(), 4);

        for e in [
            1u8.encode(), 1i8.encode(), 1u32.encode(), 1u64.encode(),
            1i16.encode(), 1i64.encode(), 1f32.encode(), 1f64.encode(),
        ] {
            assert_eq!(e.format().format_code(), 1);
            assert_eq!(e.declared_len() as usize, e.as_bytes().len());
        }
    }

    #[test]
    fn cstr_is_text() {
        let owned = CString::new("foo").unwrap();
        for e in [c"foo".encode(), (&owned).encode()] {
            assert_eq!(e.format(), PgFormat::Text);
            assert_eq!(e.format().format_code(), 0);
            assert_eq!(e.declared_len(), 0);
            assert_eq!(e.as_bytes(), b"foo");
        }
        let e = (&owned).encode();
        assert_eq!(e.as_ptr(), owned.as_ptr());
    }

    #[test]
    fn array_is_binary() {
        let values = vec![1i64, 2];
        let expected = (HEADER_SIZE + 2 * 12) as c_int;
        for e in [(&values).encode(), values[..].encode(), [1i64, 2].encode(), values.clone().encode()] {
            assert_eq!(e.format(), PgFormat::Binary);
            assert_eq!(e.declared_len(), expected);
        }

        let empty: &[i64] = &[];
        assert_eq!(empty.encode().declared_len(), HEADER_SIZE as c_int);
    }
}
