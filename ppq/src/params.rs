//! Parameter marshaling.
//!
//! A parameter list is handed to the execution primitive as three parallel arrays,
//! matched by position:
//!
//! - values: address of each encoded value
//! - lengths: declared length of each value, zero for text
//! - formats: format code of each value, zero for text and one for binary
//!
//! [`Params`] owns every encoded value, and [`Marshaled`] borrows it, so the
//! addresses stay valid until the borrow ends. An empty list marshals to [`None`],
//! which is forwarded as null arrays with zero count.
use std::{
    ffi::{c_char, c_int},
    ptr,
};

use crate::{
    common::verbose,
    encode::{Encode, Encoded},
    ext::UsizeExt,
    postgres::PgFormat,
};

/// Ordered list of encoded parameters.
#[derive(Debug, Default)]
pub struct Params<'q> {
    params: Vec<Encoded<'q>>,
}

impl<'q> Params<'q> {
    /// Create empty parameter list.
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Create empty parameter list with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { params: Vec::with_capacity(capacity) }
    }

    /// Bind next parameter.
    pub fn bind<V: Encode<'q>>(mut self, value: V) -> Self {
        self.push(value);
        self
    }

    /// Push next parameter.
    pub fn push<V: Encode<'q>>(&mut self, value: V) {
        self.params.push(value.encode());
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if there is no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Produce the parallel arrays consumed by the execution primitive.
    ///
    /// Returns [`None`] if there is no parameters.
    pub fn marshal(&self) -> Option<Marshaled<'_>> {
        if self.params.is_empty() {
            verbose!("no parameters");
            return None;
        }

        let len = self.params.len();
        let mut values = Vec::with_capacity(len);
        let mut lengths = Vec::with_capacity(len);
        let mut formats = Vec::with_capacity(len);

        for param in &self.params {
            values.push(param.as_ptr());
            lengths.push(param.declared_len());
            formats.push(param.format().format_code());
        }

        verbose!(params = len, ?formats, ?lengths, "marshal parameters");

        Some(Marshaled { values, lengths, formats, params: &self.params })
    }
}

/// The parallel arrays of a non empty parameter list.
///
/// Holds raw pointers into [`Params`], it cannot outlive the borrow.
#[derive(Debug)]
pub struct Marshaled<'p> {
    values: Vec<*const c_char>,
    lengths: Vec<c_int>,
    formats: Vec<c_int>,
    params: &'p [Encoded<'p>],
}

impl<'p> Marshaled<'p> {
    /// Returns the number of parameters, never zero.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`, empty list marshals to [`None`].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Address of each value.
    pub fn values(&self) -> &[*const c_char] {
        &self.values
    }

    /// Declared length of each value.
    pub fn lengths(&self) -> &[c_int] {
        &self.lengths
    }

    /// Format code of each value.
    pub fn formats(&self) -> &[c_int] {
        &self.formats
    }

    /// Iterate over value bytes and its format.
    ///
    /// Text values exclude the nul terminator.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'p [u8], PgFormat)> + 'p {
        let params = self.params;
        params.iter().map(|e| (e.as_bytes(), e.format()))
    }
}

/// Raw arguments of the execution primitive.
///
/// The pointers borrow from [`Marshaled`].
#[derive(Debug, Clone, Copy)]
pub struct RawParams {
    pub n_params: c_int,
    pub values: *const *const c_char,
    pub lengths: *const c_int,
    pub formats: *const c_int,
}

impl RawParams {
    /// Returns raw arguments, null pointers with zero count for [`None`].
    pub fn new(params: Option<&Marshaled<'_>>) -> RawParams {
        match params {
            Some(m) => RawParams {
                n_params: m.len().to_i32(),
                values: m.values.as_ptr(),
                lengths: m.lengths.as_ptr(),
                formats: m.formats.as_ptr(),
            },
            None => RawParams {
                n_params: 0,
                values: ptr::null(),
                lengths: ptr::null(),
                formats: ptr::null(),
            },
        }
    }

    /// Returns `true` if this is the "no parameters" marker.
    pub fn is_none(&self) -> bool {
        self.values.is_null()
    }
}

/// A heterogeneous list of values that can be bound positionally.
///
/// Implemented for [`Params`], `()`, and tuples up to 12 values.
pub trait ToParams<'q> {
    fn to_params(self) -> Params<'q>;
}

impl<'q> ToParams<'q> for Params<'q> {
    fn to_params(self) -> Params<'q> {
        self
    }
}

impl<'q> ToParams<'q> for () {
    fn to_params(self) -> Params<'q> {
        Params::new()
    }
}

macro_rules! to_params_tuple {
    ($len:literal; $($t:ident $i:tt),*) => {
        impl<'q, $($t),*> ToParams<'q> for ($($t,)*)
        where
            $($t: Encode<'q>),*
        {
            fn to_params(self) -> Params<'q> {
                let mut params = Params::with_capacity($len);
                $(params.push(self.$i);)*
                params
            }
        }
    };
}

to_params_tuple!(1; T0 0);
to_params_tuple!(2; T0 0, T1 1);
to_params_tuple!(3; T0 0, T1 1, T2 2);
to_params_tuple!(4; T0 0, T1 1, T2 2, T3 3);
to_params_tuple!(5; T0 0, T1 1, T2 2, T3 3, T4 4);
to_params_tuple!(6; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
to_params_tuple!(7; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
to_params_tuple!(8; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
to_params_tuple!(9; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
to_params_tuple!(10; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
to_params_tuple!(11; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
to_params_tuple!(12; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);
