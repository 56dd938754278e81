//! Postgres row operation.
//!
//! - [`Row`]
//! - [`Rows`]
//! - [`FromRow`]
//! - [`Decode`]
//!
//! - [`DecodeError`]
use std::{
    ffi::{CStr, CString, NulError},
    fmt,
    str::Utf8Error,
    string::FromUtf8Error,
};

use crate::{executor::ResultSet, network::Network};

/// A single row of a [`ResultSet`].
pub struct Row<'r, R: ?Sized> {
    result: &'r R,
    row: usize,
}

impl<'r, R: ResultSet + ?Sized> Row<'r, R> {
    /// Returns the row index within the result.
    pub const fn index(&self) -> usize {
        self.row
    }

    /// Returns `true` if row contains no columns.
    pub fn is_empty(&self) -> bool {
        self.result.columns() == 0
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.result.columns()
    }

    /// Returns raw column bytes, [`None`] for `NULL`.
    pub fn try_get_raw(&self, column: usize) -> Result<Option<&'r [u8]>, DecodeError> {
        if column >= self.result.columns() {
            return Err(DecodeError::IndexOutOfBounds(column));
        }
        Ok(self.result.value(self.row, column))
    }

    /// Try get and decode column.
    pub fn try_get<T: Decode<'r>>(&self, column: usize) -> Result<T, DecodeError> {
        if !T::NUL_TERMINATED {
            return T::decode(self.try_get_raw(column)?);
        }
        if column >= self.result.columns() {
            return Err(DecodeError::IndexOutOfBounds(column));
        }
        T::decode(self.result.value_with_nul(self.row, column))
    }

    /// Try decode type using [`FromRow`] implementation.
    pub fn decode<D: FromRow<'r>>(self) -> Result<D, DecodeError> {
        D::from_row(self)
    }
}

impl<R: ?Sized> Clone for Row<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized> Copy for Row<'_, R> { }

impl<R: ResultSet + ?Sized> fmt::Debug for Row<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::ext::FmtExt;
        let mut dbg = f.debug_list();
        for column in 0..self.result.columns() {
            match self.result.value(self.row, column) {
                Some(value) => dbg.entry(&value.lossy()),
                None => dbg.entry(&"NULL"),
            };
        }
        dbg.finish()
    }
}

/// Iterator over rows of a [`ResultSet`].
pub struct Rows<'r, R: ?Sized> {
    result: &'r R,
    next: usize,
    end: usize,
}

impl<'r, R: ResultSet + ?Sized> Rows<'r, R> {
    pub(crate) fn new(result: &'r R) -> Self {
        Self { result, next: 0, end: result.rows() }
    }
}

impl<'r, R: ResultSet + ?Sized> Iterator for Rows<'r, R> {
    type Item = Row<'r, R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }
        let row = Row { result: self.result, row: self.next };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.next;
        (len, Some(len))
    }
}

impl<R: ResultSet + ?Sized> DoubleEndedIterator for Rows<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }
        self.end -= 1;
        Some(Row { result: self.result, row: self.end })
    }
}

impl<R: ResultSet + ?Sized> ExactSizeIterator for Rows<'_, R> { }

/// Row access on a [`ResultSet`].
pub trait ResultSetExt: ResultSet {
    /// Returns row at given index.
    fn row(&self, row: usize) -> Option<Row<'_, Self>> {
        match row < self.rows() {
            true => Some(Row { result: self, row }),
            false => None,
        }
    }

    /// Iterate over rows.
    fn iter(&self) -> Rows<'_, Self> {
        Rows::new(self)
    }

    /// Decode every row using [`FromRow`] implementation.
    fn decode_all<'r, D: FromRow<'r>>(&'r self) -> Result<Vec<D>, DecodeError> {
        self.iter().map(Row::decode).collect()
    }
}

impl<R: ResultSet + ?Sized> ResultSetExt for R { }

/// A type that can be constructed from [`Row`].
pub trait FromRow<'r>: Sized {
    /// Try construct self from row.
    fn from_row<R: ResultSet + ?Sized>(row: Row<'r, R>) -> Result<Self, DecodeError>;
}

macro_rules! from_row_tuple {
    ($($t:ident $i:tt),*) => {
        impl<'r, $($t),*> FromRow<'r> for ($($t,)*)
        where
            $($t: Decode<'r>),*
        {
            fn from_row<R: ResultSet + ?Sized>(row: Row<'r, R>) -> Result<Self, DecodeError> {
                Ok((
                    $(row.try_get($i)?,)*
                ))
            }
        }
    };
}

from_row_tuple!(T0 0);
from_row_tuple!(T0 0, T1 1);
from_row_tuple!(T0 0, T1 1, T2 2);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);

/// A type that can be decoded from a binary result column.
pub trait Decode<'r>: Sized {
    /// Whether `raw` includes the nul terminator, see [`ResultSet::value_with_nul`].
    const NUL_TERMINATED: bool = false;

    /// Try decode self from raw column bytes, [`None`] is `NULL`.
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError>;
}

impl<'r, T: Decode<'r>> Decode<'r> for Option<T> {
    const NUL_TERMINATED: bool = T::NUL_TERMINATED;

    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        match raw {
            None => Ok(None),
            Some(_) => T::decode(raw).map(Some),
        }
    }
}

macro_rules! decode {
    ($($ty:ty),*) => {
        $(
            impl<'r> Decode<'r> for $ty {
                fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
                    <$ty>::read_network(raw.ok_or(DecodeError::Null)?)
                }
            }
        )*
    };
}

decode!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<'r> Decode<'r> for &'r [u8] {
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        raw.ok_or(DecodeError::Null)
    }
}

impl<'r> Decode<'r> for Vec<u8> {
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        raw.map(<[u8]>::to_vec).ok_or(DecodeError::Null)
    }
}

impl<'r> Decode<'r> for &'r str {
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        Ok(std::str::from_utf8(raw.ok_or(DecodeError::Null)?)?)
    }
}

impl<'r> Decode<'r> for String {
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        Ok(String::from_utf8(Vec::<u8>::decode(raw)?)?)
    }
}

/// Borrow the column in place as nul terminated string.
///
/// Reads [`ResultSet::value_with_nul`], the only nul must be the terminator.
impl<'r> Decode<'r> for &'r CStr {
    const NUL_TERMINATED: bool = true;

    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        let raw = raw.ok_or(DecodeError::Null)?;
        match raw.iter().position(|b| *b == b'\0') {
            Some(end) if end + 1 == raw.len() => {
                CStr::from_bytes_until_nul(raw).map_err(|_| DecodeError::MissingNul)
            },
            Some(end) => Err(DecodeError::InteriorNul(end)),
            None => Err(DecodeError::MissingNul),
        }
    }
}

/// Copy the column into a new nul terminated string.
///
/// A column containing nul is an error rather than truncated.
impl<'r> Decode<'r> for CString {
    fn decode(raw: Option<&'r [u8]>) -> Result<Self, DecodeError> {
        Ok(CString::new(Vec::<u8>::decode(raw)?)?)
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DecodeError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

/// An error when decoding row value.
pub enum DecodeError {
    /// Column requested is out of bounds.
    IndexOutOfBounds(usize),
    /// Column length does not match the type size.
    Length {
        expected: usize,
        actual: usize,
    },
    /// Column is null.
    Null,
    /// Postgres return non utf8 string.
    Utf8(Utf8Error),
    /// Column is not nul terminated.
    MissingNul,
    /// Column contains nul at given position, before the terminator if any.
    InteriorNul(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode value, ")?;
        match self {
            Self::IndexOutOfBounds(u) => write!(f, "index out of bounds: {u:?}"),
            Self::Length { expected, actual } => {
                write!(f, "expected {expected} bytes, found {actual}")
            }
            Self::Null => write!(f, "unexpected NULL value"),
            Self::Utf8(e) => write!(f, "{e}"),
            Self::MissingNul => write!(f, "string is not nul terminated"),
            Self::InteriorNul(at) => write!(f, "string contains nul at {at}"),
        }
    }
}

from!(<Utf8Error>e => Self::Utf8(e));
from!(<FromUtf8Error>e => Self::Utf8(e.utf8_error()));
from!(<NulError>e => Self::InteriorNul(e.nul_position()));

impl std::error::Error for DecodeError { }

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
